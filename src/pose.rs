use nalgebra as na;

use crate::error::{MonitorError, MonitorResult};

const ROTATION_TOLERANCE: f64 = 1e-6;

/// World to camera extrinsics `[R|t]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraPose {
    rotation: na::Matrix3<f64>,
    translation: na::Vector3<f64>,
}

impl CameraPose {
    /// Builds a pose, rejecting rotation blocks that are not orthonormal with det +1.
    pub fn new(rotation: na::Matrix3<f64>, translation: na::Vector3<f64>) -> MonitorResult<Self> {
        let orthogonality_error = (rotation.transpose() * rotation - na::Matrix3::identity()).norm();
        let determinant = rotation.determinant();
        if !(orthogonality_error <= ROTATION_TOLERANCE
            && (determinant - 1.0).abs() <= ROTATION_TOLERANCE)
        {
            return Err(MonitorError::PoseInvalid {
                orthogonality_error,
                determinant,
            });
        }
        Ok(CameraPose {
            rotation,
            translation,
        })
    }

    /// Accepts a 3x4 `[R|t]` or a 4x4 homogeneous matrix.
    pub fn from_matrix(m: &na::DMatrix<f64>) -> MonitorResult<Self> {
        let (rows, cols) = m.shape();
        if !((rows == 3 || rows == 4) && cols == 4) {
            return Err(MonitorError::Shape {
                what: "pose matrix",
                expected: "3x4 or 4x4",
                actual: format!("{}x{}", rows, cols),
            });
        }
        let rotation: na::Matrix3<f64> = m.fixed_view::<3, 3>(0, 0).into_owned();
        let translation: na::Vector3<f64> = m.fixed_view::<3, 1>(0, 3).into_owned();
        Self::new(rotation, translation)
    }

    pub fn from_isometry(iso: &na::Isometry3<f64>) -> Self {
        CameraPose {
            rotation: iso.rotation.to_rotation_matrix().into_inner(),
            translation: iso.translation.vector,
        }
    }

    pub fn rotation(&self) -> &na::Matrix3<f64> {
        &self.rotation
    }

    pub fn translation(&self) -> &na::Vector3<f64> {
        &self.translation
    }

    /// Camera position in world coordinates, `-Rᵀt`.
    pub fn camera_center(&self) -> na::Vector3<f64> {
        -(self.rotation.transpose() * self.translation)
    }

    /// Top-down (x, z) position; the vertical axis is dropped.
    pub fn ground_position(&self) -> na::Vector2<f64> {
        let c = self.camera_center();
        na::Vector2::new(c.x, c.z)
    }

    /// Yaw in the x-z plane taken from the third row of `R`.
    pub fn heading(&self) -> f64 {
        let forward = self.rotation.row(2);
        forward[2].atan2(forward[0])
    }
}

/// Append-only sequence of poses, one per processed frame.
#[derive(Debug, Clone, Default)]
pub struct PoseHistory {
    poses: Vec<CameraPose>,
}

impl PoseHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, pose: CameraPose) {
        self.poses.push(pose);
    }

    pub fn len(&self) -> usize {
        self.poses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.poses.is_empty()
    }

    pub fn latest(&self) -> Option<&CameraPose> {
        self.poses.last()
    }

    /// The last `min(n, len)` poses in insertion order.
    pub fn recent(&self, n: usize) -> &[CameraPose] {
        let start = self.poses.len().saturating_sub(n);
        &self.poses[start..]
    }

    pub fn iter(&self) -> std::slice::Iter<'_, CameraPose> {
        self.poses.iter()
    }
}

impl<'a> IntoIterator for &'a PoseHistory {
    type Item = &'a CameraPose;
    type IntoIter = std::slice::Iter<'a, CameraPose>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl Extend<CameraPose> for PoseHistory {
    fn extend<I: IntoIterator<Item = CameraPose>>(&mut self, iter: I) {
        self.poses.extend(iter);
    }
}
