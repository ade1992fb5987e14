//! Direct manipulation for the bookcase configurator.
//!
//! [`InteractionController`] turns pointer events into drawer edits and
//! model drags. [`Configurator`] ties a configuration, its live scene and the
//! controller into one session with change notifications.

mod configurator;
mod controller;

pub use configurator::Configurator;
pub use controller::{
    Affordance, DragSession, InteractionController, InteractionOutcome, InteractionState,
    PointerEvent,
};
