use tokio::sync::oneshot;

use crate::domain::Cart;
use crate::error::CartError;

/// Generic type aliases for service communication
pub type ServiceResult<T, E> = std::result::Result<T, E>;
pub type ServiceResponse<T, E> = oneshot::Sender<ServiceResult<T, E>>;

/// Messages understood by the cart actor. Each variant carries a oneshot
/// channel for the reply.
#[derive(Debug)]
pub enum CartRequest {
    /// Current snapshot.
    Snapshot {
        respond_to: ServiceResponse<Cart, CartError>,
    },
    /// Replace the whole cart with `cart`.
    Commit {
        cart: Cart,
        respond_to: ServiceResponse<(), CartError>,
    },
    Shutdown,
}
