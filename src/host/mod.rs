//! Host collaborators - everything the stealth core calls but does not own
//!
//! Locomotion, navigation, audio/VFX/UI and affordances are provided by the
//! hosting engine through these traits. Each trait has a plain in-memory
//! implementation for headless runs and tests.

pub mod avatar;
pub mod events;
pub mod navigation;
pub mod ui;

pub use avatar::{Avatar, KinematicAvatar};
pub use events::{EventSink, StealthEvent, TracingSink};
pub use navigation::{NavigationService, ScriptedNavigator};
pub use ui::{AffordanceLayer, AffordanceState, PromptState, PromptUi};
