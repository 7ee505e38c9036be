use glam::Vec2;
use image::{DynamicImage, GrayImage, RgbImage};
use nalgebra as na;
use vo_monitor::visualization::Display;
use vo_monitor::{CameraPose, Monitor, MonitorConfig, PoseHistory, TrackSnapshot};

fn quiet_monitor() -> Monitor {
    let config = MonitorConfig {
        refresh_pause_ms: 0,
        ..Default::default()
    };
    Monitor::new(config, Display::disabled())
}

fn gray(w: u32, h: u32) -> DynamicImage {
    DynamicImage::ImageLuma8(GrayImage::new(w, h))
}

fn snapshot(k: u64, n_landmarks: usize) -> TrackSnapshot {
    TrackSnapshot::new(
        vec![Vec2::new(10.0, 20.0); 5],
        vec![Vec2::new(1.0, 2.0); 3],
        (0..n_landmarks)
            .map(|i| na::Vector3::new(i as f64 + 1.0, 0.0, 2.0))
            .collect(),
        k,
    )
}

fn forward_pose(z: f64) -> CameraPose {
    CameraPose::new(na::Matrix3::identity(), na::Vector3::new(0.0, 0.0, -z)).unwrap()
}

#[test]
fn test_update_empty_history() {
    let mut monitor = quiet_monitor();
    let history = PoseHistory::new();
    monitor.update(&snapshot(0, 5), &gray(64, 48), &history);

    let scene = monitor.last_scene().unwrap();
    assert!(scene.trajectory.is_empty());
    assert!(scene.landmarks.is_empty());
    assert_eq!(monitor.time_series().len(), 1);
    monitor.close();
}

#[test]
fn test_time_series_grows_every_frame() {
    let mut monitor = quiet_monitor();
    let mut history = PoseHistory::new();
    for k in 0..10 {
        history.push(forward_pose(k as f64));
        monitor.update(&snapshot(k, 4), &gray(32, 32), &history);
    }
    let series = monitor.time_series();
    assert_eq!(series.time_steps, (0..10).collect::<Vec<u64>>());
    assert_eq!(series.keypoint_counts, vec![5; 10]);
    assert_eq!(series.candidate_counts, vec![3; 10]);
}

#[test]
fn test_window_never_exceeds_300() {
    let mut monitor = quiet_monitor();
    let mut history = PoseHistory::new();
    for k in 0..301 {
        history.push(forward_pose(k as f64 * 0.01));
        monitor.update(&snapshot(k, 2), &gray(8, 8), &history);
        assert!(monitor.last_scene().unwrap().trajectory.len() <= 300);
    }
    assert_eq!(monitor.last_scene().unwrap().trajectory.len(), 300);
    // the series keeps the full run
    assert_eq!(monitor.time_series().len(), 301);
}

#[test]
fn test_image_size_changes() {
    let mut monitor = quiet_monitor();
    let history = PoseHistory::new();

    monitor.update(&snapshot(0, 0), &gray(640, 480), &history);
    let view = monitor.last_frame().unwrap().clone();
    assert_eq!(view.x_limits, (0.0, 640.0));
    assert_eq!(view.y_limits, (480.0, 0.0));
    assert_eq!(view.title, "Frame No. 0 and Keypoints");
    assert_eq!(view.keypoint_count, 5);

    let color = DynamicImage::ImageRgb8(RgbImage::new(1241, 376));
    monitor.update(&snapshot(1, 0), &color, &history);
    let view = monitor.last_frame().unwrap();
    assert_eq!(view.x_limits, (0.0, 1241.0));
    assert_eq!(view.y_limits, (376.0, 0.0));
    assert_eq!(view.title, "Frame No. 1 and Keypoints");

    // a degenerate image is skipped, not fatal
    monitor.update(&snapshot(2, 0), &gray(0, 0), &history);
    assert_eq!(monitor.last_frame().unwrap().x_limits, (0.0, 0.0));
}

#[test]
fn test_scale_carried_over_landmark_gap() {
    let mut monitor = quiet_monitor();
    let mut history = PoseHistory::new();
    history.push(forward_pose(0.0));

    monitor.update(&snapshot(0, 3), &gray(16, 16), &history);
    let scale = monitor.scale().unwrap();
    assert!(monitor.last_scene().unwrap().scale_updated);

    history.push(forward_pose(0.5));
    monitor.update(&snapshot(1, 0), &gray(16, 16), &history);
    let scene = monitor.last_scene().unwrap();
    assert_eq!(monitor.scale(), Some(scale));
    assert!(!scene.scale_updated);
    assert!(scene.landmarks.is_empty());
    assert_eq!(scene.viewport.unwrap().half_width, 3.0 / scale);
}

#[test]
fn test_same_frame_twice_is_identical() {
    let mut monitor = quiet_monitor();
    let mut history = PoseHistory::new();
    history.push(forward_pose(1.0));
    let snap = snapshot(4, 6);
    let img = gray(20, 10);

    monitor.update(&snap, &img, &history);
    let first = monitor.last_scene().unwrap().clone();
    monitor.update(&snap, &img, &history);
    let second = monitor.last_scene().unwrap();
    assert_eq!(first.landmarks, second.landmarks);
    assert_eq!(first.viewport, second.viewport);
}
