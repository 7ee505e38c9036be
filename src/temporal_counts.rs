use crate::visualization::{BLUE, Display, GREEN, warn_on_err};

pub const COUNTS_ROOT: &str = "counts";
const KEYPOINTS_PATH: &str = "counts/keypoints";
const CANDIDATES_PATH: &str = "counts/candidates";

/// Three synchronized, never truncated series.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TimeSeries {
    pub time_steps: Vec<u64>,
    pub keypoint_counts: Vec<usize>,
    pub candidate_counts: Vec<usize>,
}

impl TimeSeries {
    /// Appends one sample and returns its step index.
    pub fn push(&mut self, keypoint_count: usize, candidate_count: usize) -> u64 {
        let step = self.time_steps.len() as u64;
        self.time_steps.push(step);
        self.keypoint_counts.push(keypoint_count);
        self.candidate_counts.push(candidate_count);
        step
    }

    pub fn len(&self) -> usize {
        self.time_steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.time_steps.is_empty()
    }
}

/// Keypoint and candidate counts over the whole run.
#[derive(Debug, Default)]
pub struct TemporalCountsPanel {
    series: TimeSeries,
    styled: bool,
}

impl TemporalCountsPanel {
    pub fn new() -> TemporalCountsPanel {
        Self::default()
    }

    pub fn series(&self) -> &TimeSeries {
        &self.series
    }

    /// Appends the sample and redraws both lines against the step index.
    ///
    /// Samples are logged on the `step` timeline, so the viewer keeps the full
    /// history and the chart shows every recorded step.
    pub fn record(&mut self, display: &Display, keypoint_count: usize, candidate_count: usize) -> u64 {
        let step = self.series.push(keypoint_count, candidate_count);
        if !self.styled {
            self.log_style(display);
            self.styled = true;
        }
        warn_on_err(
            "keypoint count",
            display.log(KEYPOINTS_PATH, &rerun::Scalars::new([keypoint_count as f64])),
        );
        warn_on_err(
            "candidate count",
            display.log(CANDIDATES_PATH, &rerun::Scalars::new([candidate_count as f64])),
        );
        log::trace!(
            "step {}: {} keypoints, {} candidates",
            step,
            keypoint_count,
            candidate_count
        );
        step
    }

    /// Line colors and legend names, logged once.
    fn log_style(&self, display: &Display) {
        warn_on_err(
            "counts title",
            display.title(COUNTS_ROOT, "Keypoints and Candidate Count", Some(("Time (steps)", "Count"))),
        );
        warn_on_err(
            "keypoint series style",
            display.log_static(
                KEYPOINTS_PATH,
                &rerun::SeriesLines::new()
                    .with_colors([GREEN])
                    .with_names(["Keypoints"]),
            ),
        );
        warn_on_err(
            "candidate series style",
            display.log_static(
                CANDIDATES_PATH,
                &rerun::SeriesLines::new()
                    .with_colors([BLUE])
                    .with_names(["Candidates"]),
            ),
        );
    }
}
