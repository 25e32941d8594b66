//! The actor that owns the cart snapshot and keeps the durable slot in sync.

pub mod service;

pub use service::*;
