pub use crate::cost::{CostFunction, SpotCostFunction};
pub use crate::graph::TrackGraph;
pub use crate::linker::{AssignmentResult, SparseJaqamanLinker};
pub use crate::logger::{ChannelLogger, LogLogger, Logger, LoggerEvent, NoopLogger};
pub use crate::spot::collection::{FrameSpots, SpotCollection};
pub use crate::spot::{Spot, SpotRef};
pub use crate::trackers::frame_to_frame::settings::{LinkingSettings, SettingValue, Settings};
pub use crate::trackers::frame_to_frame::{link_frame_to_frame, SparseLapFrameToFrameTracker};
pub use crate::Errors;
