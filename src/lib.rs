//! Hideout - stealth core for first-person horror
//!
//! Enemy perception and pursuit, player concealment, and the narrow contract
//! between them: an agent never sees a concealed player, and the aggregate
//! of every agent's detection drives the player's affordances.

pub mod affordance;
pub mod concealment;
pub mod core;
pub mod host;
pub mod interaction;
pub mod perception;
pub mod simulation;
pub mod spatial;

pub use crate::concealment::{ConcealState, ConcealmentController, ConcealmentSpot};
pub use crate::core::config::StealthConfig;
pub use crate::core::error::{Result, StealthError};
pub use crate::core::types::{AgentId, EntityId, Pose, SpotId};
pub use crate::perception::{AgentRegistry, DetectionAggregator, PerceptionAgent};
pub use crate::simulation::{StealthWorld, TickInput, TickReport, TickServices};
