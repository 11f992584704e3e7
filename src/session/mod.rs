//! Interactive session core.
//!
//! The controller turns semantic events into list operations and storage
//! round trips. Presentation layers feed it events and draw from its state;
//! nothing here knows about terminals.

mod controller;
mod input;

pub use controller::{Session, SessionEvent, SessionOutcome};
pub use input::EditAction;

#[cfg(test)]
mod tests;
