pub mod config;
pub mod error;
pub mod types;

pub use config::{
    AffordanceConfig, ConcealmentConfig, InteractionConfig, PerceptionConfig, StealthConfig,
};
pub use error::{Result, StealthError};
pub use types::{AgentId, EntityId, Pose, Seconds, SpotId};
