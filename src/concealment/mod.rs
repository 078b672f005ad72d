//! Player concealment: hide spots, transits and the controller state machine

pub mod catalogue;
pub mod controller;
pub mod spot;
pub mod transit;

pub use catalogue::SpotCatalogue;
pub use controller::{BoundedLook, ConcealState, ConcealmentController, ConcealmentEvent};
pub use spot::{ConcealmentSpot, SpotKind};
pub use transit::{Transit, TransitKind, TransitStep};
