//! Ports (trait boundaries) for external dependencies.
//!
//! These traits are owned by the domain: training code talks to learners
//! and observers only through them, and concrete agents or reporting
//! backends are adapters that implement them.

pub mod learner;
pub mod observer;

pub use learner::Learner;
pub use observer::Observer;
