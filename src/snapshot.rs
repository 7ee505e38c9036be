use glam::Vec2;
use nalgebra as na;

use crate::error::{MonitorError, MonitorResult};

/// Tracker state for one processed frame.
#[derive(Debug, Clone, Default)]
pub struct TrackSnapshot {
    /// Tracked keypoints with an associated landmark, in pixels.
    pub keypoints: Vec<Vec2>,
    /// Observed features not yet triangulated, in pixels.
    pub candidates: Vec<Vec2>,
    /// Current landmark set in world coordinates.
    pub landmarks: Vec<na::Vector3<f64>>,
    pub frame_index: u64,
}

impl TrackSnapshot {
    pub fn new(
        keypoints: Vec<Vec2>,
        candidates: Vec<Vec2>,
        landmarks: Vec<na::Vector3<f64>>,
        frame_index: u64,
    ) -> TrackSnapshot {
        TrackSnapshot {
            keypoints,
            candidates,
            landmarks,
            frame_index,
        }
    }

    /// Builds a snapshot from column-major tracker arrays: `p` and `c` are 2xN,
    /// `x` is 3xK.
    pub fn from_matrices(
        p: &na::DMatrix<f64>,
        c: &na::DMatrix<f64>,
        x: &na::DMatrix<f64>,
        frame_index: u64,
    ) -> MonitorResult<TrackSnapshot> {
        let keypoints = pixel_columns("keypoints P", p)?;
        let candidates = pixel_columns("candidates C", c)?;
        if x.nrows() != 3 {
            return Err(MonitorError::Shape {
                what: "landmarks X",
                expected: "3xK",
                actual: format!("{}x{}", x.nrows(), x.ncols()),
            });
        }
        let landmarks = x
            .column_iter()
            .map(|col| na::Vector3::new(col[0], col[1], col[2]))
            .collect();
        Ok(TrackSnapshot::new(keypoints, candidates, landmarks, frame_index))
    }

    pub fn keypoint_count(&self) -> usize {
        self.keypoints.len()
    }

    pub fn candidate_count(&self) -> usize {
        self.candidates.len()
    }
}

fn pixel_columns(what: &'static str, m: &na::DMatrix<f64>) -> MonitorResult<Vec<Vec2>> {
    if m.nrows() != 2 {
        return Err(MonitorError::Shape {
            what,
            expected: "2xN",
            actual: format!("{}x{}", m.nrows(), m.ncols()),
        });
    }
    Ok(m.column_iter()
        .map(|col| Vec2::new(col[0] as f32, col[1] as f32))
        .collect())
}
