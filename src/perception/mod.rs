//! Enemy perception: vision cone, pursuit state machine, registry and the
//! detection aggregate

pub mod agent;
pub mod registry;
pub mod vision;

pub use agent::{PerceptionAgent, PerceptionEvent, PursuitState};
pub use registry::{AgentRegistry, DetectionAggregator};
pub use vision::{TargetView, VisionCone, VisionOutcome};
