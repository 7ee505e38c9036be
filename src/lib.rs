pub mod config;
pub mod error;
pub mod frame_annotator;
pub mod io;
pub mod local_map;
pub mod monitor;
pub mod pose;
pub mod snapshot;
pub mod temporal_counts;
pub mod visualization;

pub use config::MonitorConfig;
pub use error::{MonitorError, MonitorResult};
pub use monitor::Monitor;
pub use pose::{CameraPose, PoseHistory};
pub use snapshot::TrackSnapshot;
