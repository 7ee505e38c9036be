use glam::Vec2;
use rerun::{AsComponents, RecordingStream, RecordingStreamBuilder, RecordingStreamResult};

use crate::error::MonitorResult;

pub const STEP_TIMELINE: &str = "step";
pub const FRAME_TIMELINE: &str = "frame";

pub const YELLOW: (u8, u8, u8, u8) = (255, 255, 0, 255);
pub const GREEN: (u8, u8, u8, u8) = (0, 200, 0, 255);
pub const BLUE: (u8, u8, u8, u8) = (0, 0, 255, 255);
pub const RED: (u8, u8, u8, u8) = (255, 0, 0, 255);
/// Blue at alpha 0.7 for the landmark cloud.
pub const LANDMARK_BLUE: (u8, u8, u8, u8) = (0, 0, 255, 178);

/// Explicitly owned drawing surface shared by all panels.
///
/// Wraps a single recording stream; every panel draws under its own entity
/// root and clears that root before redrawing.
pub struct Display {
    rec: RecordingStream,
}

impl Display {
    /// Launches a viewer process and streams to it.
    pub fn spawn(application_id: &str) -> MonitorResult<Display> {
        let rec = RecordingStreamBuilder::new(application_id).spawn()?;
        log::debug!("spawned viewer for {}", application_id);
        Ok(Display { rec })
    }

    /// Streams to an already running viewer, e.g. `rerun+http://127.0.0.1:9876/proxy`.
    pub fn connect(application_id: &str, url: &str) -> MonitorResult<Display> {
        let rec = RecordingStreamBuilder::new(application_id).connect_grpc_opts(url, None)?;
        log::debug!("connected {} to {}", application_id, url);
        Ok(Display { rec })
    }

    /// A display that drops everything; used when no viewer is wanted.
    pub fn disabled() -> Display {
        Display {
            rec: RecordingStream::disabled(),
        }
    }

    pub fn from_stream(rec: RecordingStream) -> Display {
        Display { rec }
    }

    pub fn stream(&self) -> &RecordingStream {
        &self.rec
    }

    pub fn set_frame_time(&self, step: u64, frame_index: u64) {
        self.rec.set_time_sequence(STEP_TIMELINE, step as i64);
        self.rec.set_time_sequence(FRAME_TIMELINE, frame_index as i64);
    }

    pub fn log<AS: ?Sized + AsComponents>(
        &self,
        entity_path: &str,
        archetype: &AS,
    ) -> RecordingStreamResult<()> {
        self.rec.log(entity_path, archetype)
    }

    pub fn log_static<AS: ?Sized + AsComponents>(
        &self,
        entity_path: &str,
        archetype: &AS,
    ) -> RecordingStreamResult<()> {
        self.rec.log_static(entity_path, archetype)
    }

    /// Drops everything previously drawn under `root`.
    pub fn clear(&self, root: &str) -> RecordingStreamResult<()> {
        self.rec.log(root, &rerun::Clear::recursive())
    }

    /// Panel heading, rendered as markdown next to the panel.
    pub fn title(&self, root: &str, title: &str, labels: Option<(&str, &str)>) -> RecordingStreamResult<()> {
        let mut text = format!("### {}", title);
        if let Some((x_label, y_label)) = labels {
            text += format!("\n\nx: {}, y: {}", x_label, y_label).as_str();
        }
        self.rec.log(
            format!("{}/title", root),
            &rerun::TextDocument::new(text).with_media_type(rerun::MediaType::markdown()),
        )
    }

    /// Hands buffered data to the sink without waiting, then yields briefly.
    pub fn refresh(&self, pause: std::time::Duration) {
        self.rec.flush_async();
        if !pause.is_zero() {
            std::thread::sleep(pause);
        }
    }

    /// Flushes everything and detaches from the viewer.
    pub fn close(self) {
        log::debug!("closing display");
        self.rec.flush_blocking();
        self.rec.disconnect();
    }
}

/// rerun use top left corner as (0, 0)
pub fn rerun_shift(p2ds: &[Vec2]) -> Vec<(f32, f32)> {
    p2ds.iter().map(|p| (p.x + 0.5, p.y + 0.5)).collect()
}

/// Top-down map point to 2D view coordinates; 2D views grow y downwards.
pub fn ground_to_view(p: &nalgebra::Vector2<f64>) -> [f32; 2] {
    [p.x as f32, -p.y as f32]
}

/// Logs a drawing result, keeping the frame going on failure.
pub(crate) fn warn_on_err(what: &str, result: RecordingStreamResult<()>) {
    if let Err(e) = result {
        log::warn!("failed to draw {}: {}", what, e);
    }
}
