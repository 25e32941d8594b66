pub mod cart;
pub mod product;
pub mod stock;

pub use cart::*;
pub use product::*;
pub use stock::*;
