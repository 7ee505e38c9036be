//! Top-down local map: windowed trajectory, landmark cloud and heading marker.
//!
//! The map lives in the world x-z plane. Its zoom follows the landmarks: the
//! scale is the inverse of the mean distance from the latest camera center to
//! the landmarks, and both the visible radius and the marker size are expressed
//! relative to it so the picture keeps a constant on-screen size.

use nalgebra as na;

use crate::config::MonitorConfig;
use crate::pose::{CameraPose, PoseHistory};
use crate::visualization::{
    Display, GREEN, LANDMARK_BLUE, RED, ground_to_view, warn_on_err,
};

pub const MAP_ROOT: &str = "map";

/// Square, axis-aligned view of the map.
///
/// Rerun 2D views fit their own content, so these bounds are not applied to
/// the viewer. The panel only outlines them with a translucent box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub center: na::Vector2<f64>,
    pub half_width: f64,
}

impl Viewport {
    pub fn x_limits(&self) -> (f64, f64) {
        (self.center.x - self.half_width, self.center.x + self.half_width)
    }

    /// Limits of the world z axis, drawn vertically.
    pub fn z_limits(&self) -> (f64, f64) {
        (self.center.y - self.half_width, self.center.y + self.half_width)
    }
}

/// Isosceles triangle with its tip on the camera, opening along the heading.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeadingMarker {
    pub tip: na::Vector2<f64>,
    pub base_left: na::Vector2<f64>,
    pub base_right: na::Vector2<f64>,
}

impl HeadingMarker {
    pub fn new(tip: na::Vector2<f64>, heading: f64, length: f64) -> HeadingMarker {
        let dir = na::Vector2::new(heading.cos(), heading.sin());
        let perp = na::Vector2::new(-dir.y, dir.x);
        let base_center = tip + dir * length;
        HeadingMarker {
            tip,
            base_left: base_center + perp * (length / 2.0),
            base_right: base_center - perp * (length / 2.0),
        }
    }

    /// Closed outline `[tip, left, right, tip]`.
    pub fn outline(&self) -> [na::Vector2<f64>; 4] {
        [self.tip, self.base_left, self.base_right, self.tip]
    }

    pub fn length(&self) -> f64 {
        ((self.base_left + self.base_right) / 2.0 - self.tip).norm()
    }
}

/// Everything the map panel draws for one frame.
#[derive(Debug, Clone, PartialEq)]
pub struct LocalMapScene {
    /// Ground-plane camera centers of the window, oldest first.
    pub trajectory: Vec<na::Vector2<f64>>,
    pub heading: Option<f64>,
    pub marker: Option<HeadingMarker>,
    /// Landmarks inside the visible radius, as full 3D points.
    pub landmarks: Vec<na::Vector3<f64>>,
    pub viewport: Option<Viewport>,
    /// Scale in effect for this frame, possibly carried over.
    pub scale: Option<f64>,
    /// Whether `scale` was computed from this frame's landmarks.
    pub scale_updated: bool,
}

impl LocalMapScene {
    /// Computes the scene from the current inputs and the previously persisted
    /// scale. The returned `scale` is the value to persist.
    pub fn compute(
        history: &PoseHistory,
        landmarks: &[na::Vector3<f64>],
        previous_scale: Option<f64>,
        config: &MonitorConfig,
    ) -> LocalMapScene {
        let window = history.recent(config.window_size);
        let trajectory: Vec<_> = window.iter().map(CameraPose::ground_position).collect();

        let (Some(latest_pose), Some(&latest)) = (window.last(), trajectory.last()) else {
            return LocalMapScene {
                trajectory,
                heading: None,
                marker: None,
                landmarks: Vec::new(),
                viewport: None,
                scale: previous_scale,
                scale_updated: false,
            };
        };

        let distances = ground_distances(&latest, landmarks);
        let fresh_scale = scale_from_distances(&distances);
        let scale = fresh_scale.or(previous_scale);

        let heading = latest_pose.heading();
        let marker_length = match scale {
            Some(s) if s != 0.0 => config.default_marker_size / s,
            _ => config.default_marker_size,
        };
        let marker = HeadingMarker::new(latest, heading, marker_length);

        // With landmarks present the radius always comes from this frame. A zero
        // mean distance gives radius 0 and keeps the landmarks sitting on the camera.
        let frame_mean = mean_distance(&distances).filter(|m| m.is_finite());
        let radius = match (frame_mean, fresh_scale) {
            (Some(_), Some(s)) => visible_radius(config.range_threshold, Some(s)),
            (Some(_), None) => 0.0,
            (None, _) => visible_radius(config.range_threshold, scale),
        };
        let filtered = if frame_mean.is_some() {
            landmarks
                .iter()
                .zip(&distances)
                .filter(|(_, d)| **d <= radius)
                .map(|(l, _)| *l)
                .collect()
        } else {
            Vec::new()
        };

        LocalMapScene {
            trajectory,
            heading: Some(heading),
            marker: Some(marker),
            landmarks: filtered,
            viewport: Some(Viewport {
                center: latest,
                half_width: radius,
            }),
            scale,
            scale_updated: fresh_scale.is_some(),
        }
    }
}

/// Ground-plane (x, z) distance from `center` to each landmark.
pub fn ground_distances(center: &na::Vector2<f64>, landmarks: &[na::Vector3<f64>]) -> Vec<f64> {
    landmarks
        .iter()
        .map(|l| (na::Vector2::new(l.x, l.z) - center).norm())
        .collect()
}

pub fn mean_distance(distances: &[f64]) -> Option<f64> {
    if distances.is_empty() {
        None
    } else {
        Some(distances.iter().sum::<f64>() / distances.len() as f64)
    }
}

/// `1 / mean(distances)`, or `None` when the mean is empty, zero or not finite.
pub fn scale_from_distances(distances: &[f64]) -> Option<f64> {
    mean_distance(distances)
        .filter(|mean| mean.is_finite() && *mean > 0.0)
        .map(|mean| 1.0 / mean)
}

/// `range_threshold / scale`; without a usable scale the threshold is taken in world units.
pub fn visible_radius(range_threshold: f64, scale: Option<f64>) -> f64 {
    match scale {
        Some(s) if s > 0.0 => range_threshold / s,
        _ => range_threshold,
    }
}

/// Map panel state. Only the scale survives between frames.
#[derive(Debug)]
pub struct LocalMapPanel {
    scale: Option<f64>,
}

impl Default for LocalMapPanel {
    fn default() -> Self {
        Self::new()
    }
}

impl LocalMapPanel {
    pub fn new() -> LocalMapPanel {
        LocalMapPanel { scale: None }
    }

    pub fn scale(&self) -> Option<f64> {
        self.scale
    }

    /// Recomputes the scene, persists the scale and redraws the panel.
    pub fn render(
        &mut self,
        display: &Display,
        history: &PoseHistory,
        landmarks: &[na::Vector3<f64>],
        config: &MonitorConfig,
    ) -> LocalMapScene {
        let scene = LocalMapScene::compute(history, landmarks, self.scale, config);
        if !scene.scale_updated && !scene.trajectory.is_empty() {
            log::debug!(
                "cannot rescale the map from this frame, keeping scale {:?}",
                self.scale
            );
        }
        self.scale = scene.scale;
        draw_scene(display, &scene, config.window_size);
        scene
    }
}

pub fn map_title(window_size: usize) -> String {
    format!("Local Trajectory ({} poses) and Landmarks", window_size)
}

fn draw_scene(display: &Display, scene: &LocalMapScene, window_size: usize) {
    warn_on_err("map panel clear", display.clear(MAP_ROOT));
    warn_on_err(
        "map title",
        display.title(
            MAP_ROOT,
            &map_title(window_size),
            Some(("X", "Z")),
        ),
    );
    if scene.trajectory.is_empty() {
        return;
    }

    let strip: Vec<[f32; 2]> = scene.trajectory.iter().map(ground_to_view).collect();
    warn_on_err(
        "trajectory",
        display.log(
            &format!("{}/trajectory", MAP_ROOT),
            &rerun::LineStrips2D::new([strip])
                .with_colors([RED])
                .with_labels(["Camera Trajectory"]),
        ),
    );

    if let Some(marker) = &scene.marker {
        let outline: Vec<[f32; 2]> = marker.outline().iter().map(ground_to_view).collect();
        warn_on_err(
            "heading marker",
            display.log(
                &format!("{}/heading", MAP_ROOT),
                &rerun::LineStrips2D::new([outline]).with_colors([GREEN]),
            ),
        );
    }

    if !scene.landmarks.is_empty() {
        let pts: Vec<[f32; 2]> = scene
            .landmarks
            .iter()
            .map(|l| ground_to_view(&na::Vector2::new(l.x, l.z)))
            .collect();
        warn_on_err(
            "landmarks",
            display.log(
                &format!("{}/landmarks", MAP_ROOT),
                &rerun::Points2D::new(pts)
                    .with_colors([LANDMARK_BLUE])
                    .with_radii([rerun::Radius::new_ui_points(2.0)]),
            ),
        );
    }

    // The 2D view fits its content; this frame pins it to the square window.
    if let Some(viewport) = &scene.viewport {
        let r = viewport.half_width as f32;
        warn_on_err(
            "viewport",
            display.log(
                &format!("{}/viewport", MAP_ROOT),
                &rerun::Boxes2D::from_centers_and_half_sizes(
                    [ground_to_view(&viewport.center)],
                    [[r, r]],
                )
                .with_colors([(128u8, 128, 128, 64)]),
            ),
        );
    }
}
