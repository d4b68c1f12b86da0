//! Booking lifecycle — status rules and remote-committed transitions.

pub mod lifecycle;
pub mod model;

pub use lifecycle::BookingService;
pub use model::{Booking, BookingStatus};
