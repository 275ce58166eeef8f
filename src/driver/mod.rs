//! Virtual-time driver for the engine.
//!
//! The engine never schedules anything; it hands back effects. This module
//! owns the clock and the queue that turn those effects into later intents.

pub mod scheduler;
pub mod session;

pub use scheduler::{Event, Scheduler};
pub use session::{Session, TimedEvent};
