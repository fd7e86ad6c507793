//! Core types for docket.

mod message;
mod ticket;

pub use message::*;
pub use ticket::*;
