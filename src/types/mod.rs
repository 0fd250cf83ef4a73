//! Core types for Tachi.

pub mod message;
pub mod response;

pub use message::*;
pub use response::*;
