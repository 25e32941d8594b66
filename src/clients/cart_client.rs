use tokio::sync::mpsc;
use tracing::{debug, instrument};

use crate::domain::Cart;
use crate::error::CartError;
use crate::messages::CartRequest;

/// Handle to the cart actor.
#[derive(Clone)]
pub struct CartClient {
    sender: mpsc::Sender<CartRequest>,
}

impl CartClient {
    pub(crate) fn new(sender: mpsc::Sender<CartRequest>) -> Self {
        Self { sender }
    }

    #[instrument(skip(self))]
    pub async fn shutdown(&self) -> Result<(), CartError> {
        debug!("Sending shutdown");
        self.sender
            .send(CartRequest::Shutdown)
            .await
            .map_err(|_| CartError::ActorCommunicationError("Actor closed".to_string()))
    }
}

client_method!(CartClient => fn snapshot() -> Cart as CartRequest::Snapshot);
client_method!(CartClient => fn commit(cart: Cart) -> () as CartRequest::Commit);
