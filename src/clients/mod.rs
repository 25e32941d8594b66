//! Handles to the cart actor and the remote stock service, and the
//! [`CartStore`] that orchestrates them.

#[macro_use]
mod macros;

pub mod cart_client;
pub mod cart_store;
pub mod stock_client;

pub use cart_client::*;
pub use cart_store::*;
pub use stock_client::*;
