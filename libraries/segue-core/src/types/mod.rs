//! Domain types for Segue
mod signal;
mod transition;

pub use signal::{saturate_i16, SignalBuffer};
pub use transition::{TransitionPair, TransitionPoint};
