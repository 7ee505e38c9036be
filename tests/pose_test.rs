use nalgebra as na;
use std::f64::consts::{FRAC_PI_2, PI};
use vo_monitor::{CameraPose, MonitorError, PoseHistory};

fn yaw_pose(rows: [f64; 9]) -> CameraPose {
    CameraPose::new(na::Matrix3::from_row_slice(&rows), na::Vector3::zeros()).unwrap()
}

#[test]
fn test_heading_hand_computed() {
    // third row of R is the camera forward axis in world coordinates
    let cases = [
        ([0.0, 0.0, -1.0, 0.0, 1.0, 0.0, 1.0, 0.0, 0.0], 0.0),
        ([1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0], FRAC_PI_2),
        ([0.0, 0.0, 1.0, 0.0, 1.0, 0.0, -1.0, 0.0, 0.0], PI),
        ([-1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, -1.0], -FRAC_PI_2),
    ];
    for (rows, expected) in cases {
        let heading = yaw_pose(rows).heading();
        assert!((heading - expected).abs() < 1e-12, "{} != {}", heading, expected);
    }
}

#[test]
fn test_identity_heading_is_atan2_of_third_row() {
    let pose = CameraPose::new(na::Matrix3::identity(), na::Vector3::new(1.0, 2.0, 3.0)).unwrap();
    assert!((pose.heading() - 1.0f64.atan2(0.0)).abs() < 1e-12);
}

#[test]
fn test_camera_center() {
    let pose = CameraPose::new(na::Matrix3::identity(), na::Vector3::new(1.0, 2.0, 3.0)).unwrap();
    assert_eq!(pose.camera_center(), na::Vector3::new(-1.0, -2.0, -3.0));
    assert_eq!(pose.ground_position(), na::Vector2::new(-1.0, -3.0));

    // camera at (5, 0, 0) looking along +x
    let rotation = na::Matrix3::from_row_slice(&[0.0, 0.0, -1.0, 0.0, 1.0, 0.0, 1.0, 0.0, 0.0]);
    let center = na::Vector3::new(5.0, 0.0, 0.0);
    let pose = CameraPose::new(rotation, -(rotation * center)).unwrap();
    assert!((pose.camera_center() - center).norm() < 1e-12);
}

#[test]
fn test_from_isometry() {
    let iso = na::Isometry3::new(na::Vector3::new(1.0, 0.0, 2.0), na::Vector3::new(0.0, 0.3, 0.0));
    let pose = CameraPose::from_isometry(&iso);
    let expected = -(iso.rotation.inverse() * iso.translation.vector);
    assert!((pose.camera_center() - expected).norm() < 1e-12);
}

#[test]
fn test_invalid_rotation_rejected() {
    let scaled = na::Matrix3::identity() * 2.0;
    let result = CameraPose::new(scaled, na::Vector3::zeros());
    assert!(matches!(result, Err(MonitorError::PoseInvalid { .. })));

    // orthonormal but a reflection
    let reflection = na::Matrix3::from_diagonal(&na::Vector3::new(1.0, 1.0, -1.0));
    match CameraPose::new(reflection, na::Vector3::zeros()) {
        Err(MonitorError::PoseInvalid { determinant, .. }) => assert!((determinant + 1.0).abs() < 1e-12),
        other => panic!("expected PoseInvalid, got {:?}", other),
    }

    let nan = na::Matrix3::from_element(f64::NAN);
    assert!(CameraPose::new(nan, na::Vector3::zeros()).is_err());
}

#[test]
fn test_from_matrix_shapes() {
    let mut m34 = na::DMatrix::<f64>::zeros(3, 4);
    m34.fixed_view_mut::<3, 3>(0, 0).copy_from(&na::Matrix3::identity());
    m34[(0, 3)] = 4.0;
    let pose = CameraPose::from_matrix(&m34).unwrap();
    assert_eq!(pose.translation(), &na::Vector3::new(4.0, 0.0, 0.0));

    let m44 = na::DMatrix::<f64>::identity(4, 4);
    assert!(CameraPose::from_matrix(&m44).is_ok());

    // right shape, sheared rotation block
    let mut sheared = m34.clone();
    sheared[(0, 1)] = 0.5;
    assert!(matches!(
        CameraPose::from_matrix(&sheared),
        Err(MonitorError::PoseInvalid { .. })
    ));

    let m24 = na::DMatrix::<f64>::zeros(2, 4);
    assert!(matches!(
        CameraPose::from_matrix(&m24),
        Err(MonitorError::Shape { .. })
    ));
    let m33 = na::DMatrix::<f64>::identity(3, 3);
    assert!(matches!(
        CameraPose::from_matrix(&m33),
        Err(MonitorError::Shape { .. })
    ));
}

#[test]
fn test_history_recent_window() {
    let mut history = PoseHistory::new();
    assert!(history.is_empty());
    assert!(history.recent(300).is_empty());
    assert!(history.latest().is_none());

    history.extend((0..10).map(|k| {
        CameraPose::new(na::Matrix3::identity(), na::Vector3::new(-(k as f64), 0.0, 0.0)).unwrap()
    }));
    assert_eq!(history.len(), 10);
    assert_eq!(history.recent(300).len(), 10);

    let last3 = history.recent(3);
    assert_eq!(last3.len(), 3);
    assert_eq!(last3[0].camera_center().x, 7.0);
    assert_eq!(history.latest().unwrap().camera_center().x, 9.0);
    assert_eq!(history.iter().count(), 10);
}
