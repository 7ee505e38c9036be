use image::DynamicImage;

use crate::config::MonitorConfig;
use crate::error::MonitorResult;
use crate::frame_annotator::{FrameAnnotator, FrameView};
use crate::local_map::{LocalMapPanel, LocalMapScene};
use crate::pose::PoseHistory;
use crate::snapshot::TrackSnapshot;
use crate::temporal_counts::{TemporalCountsPanel, TimeSeries};
use crate::visualization::Display;

/// Per-frame entry point tying the three panels to one display.
///
/// `update` takes `&mut self`, so frames are rendered strictly one after the
/// other. Drawing failures are logged and never abort a frame.
pub struct Monitor {
    config: MonitorConfig,
    display: Display,
    frame: FrameAnnotator,
    counts: TemporalCountsPanel,
    map: LocalMapPanel,
    last_frame: Option<FrameView>,
    last_scene: Option<LocalMapScene>,
}

impl Monitor {
    pub fn new(config: MonitorConfig, display: Display) -> Monitor {
        log::debug!(
            "monitor: range threshold {}, window {} poses",
            config.range_threshold,
            config.window_size
        );
        Monitor {
            config,
            display,
            frame: FrameAnnotator::new(),
            counts: TemporalCountsPanel::new(),
            map: LocalMapPanel::new(),
            last_frame: None,
            last_scene: None,
        }
    }

    /// Opens a viewer process named after `config.application_id`.
    pub fn spawn(config: MonitorConfig) -> MonitorResult<Monitor> {
        let display = Display::spawn(&config.application_id)?;
        Ok(Self::new(config, display))
    }

    /// Renders one frame: image panel, counts, local map, then a short flush.
    pub fn update(&mut self, snapshot: &TrackSnapshot, img: &DynamicImage, history: &PoseHistory) {
        let step = self.counts.series().len() as u64;
        self.display.set_frame_time(step, snapshot.frame_index);

        let view = self
            .frame
            .render(&self.display, img, &snapshot.keypoints, snapshot.frame_index);
        self.counts.record(
            &self.display,
            snapshot.keypoint_count(),
            snapshot.candidate_count(),
        );
        let scene = self
            .map
            .render(&self.display, history, &snapshot.landmarks, &self.config);
        log::trace!(
            "frame {}: {} poses in window, {} landmarks shown",
            snapshot.frame_index,
            scene.trajectory.len(),
            scene.landmarks.len()
        );

        self.last_frame = Some(view);
        self.last_scene = Some(scene);
        self.display.refresh(self.config.refresh_pause());
    }

    pub fn config(&self) -> &MonitorConfig {
        &self.config
    }

    pub fn time_series(&self) -> &TimeSeries {
        self.counts.series()
    }

    pub fn scale(&self) -> Option<f64> {
        self.map.scale()
    }

    pub fn last_frame(&self) -> Option<&FrameView> {
        self.last_frame.as_ref()
    }

    pub fn last_scene(&self) -> Option<&LocalMapScene> {
        self.last_scene.as_ref()
    }

    /// Flushes pending data and releases the display.
    pub fn close(self) {
        log::debug!("monitor closed after {} frames", self.counts.series().len());
        self.display.close();
    }
}
