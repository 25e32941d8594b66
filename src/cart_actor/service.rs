use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{debug, info, instrument};

use crate::clients::CartClient;
use crate::domain::Cart;
use crate::error::CartError;
use crate::messages::{CartRequest, ServiceResponse};
use crate::notify::Diagnostics;
use crate::storage::CartStorage;

/// Owns the current cart.
///
/// The snapshot is restored from storage once, when the service is built.
/// Commits replace it wholesale; storage is written after a commit only when
/// the committed snapshot is a different one from the snapshot it replaces.
pub struct CartService {
    receiver: mpsc::Receiver<CartRequest>,
    cart: Cart,
    storage: Box<dyn CartStorage>,
    diagnostics: Arc<dyn Diagnostics>,
}

impl CartService {
    pub fn new(
        buffer_size: usize,
        storage: impl CartStorage,
        diagnostics: Arc<dyn Diagnostics>,
    ) -> (Self, CartClient) {
        let (sender, receiver) = mpsc::channel(buffer_size);
        let cart = restore(&storage, diagnostics.as_ref());
        let service = Self {
            receiver,
            cart,
            storage: Box::new(storage),
            diagnostics,
        };
        (service, CartClient::new(sender))
    }

    #[instrument(name = "cart_service", skip(self))]
    pub async fn run(mut self) {
        info!(items = self.cart.len(), "CartService starting");

        while let Some(msg) = self.receiver.recv().await {
            match msg {
                CartRequest::Snapshot { respond_to } => {
                    self.handle_snapshot(respond_to);
                }
                CartRequest::Commit { cart, respond_to } => {
                    self.handle_commit(cart, respond_to);
                }
                CartRequest::Shutdown => {
                    info!("CartService shutting down");
                    break;
                }
            }
        }

        info!("CartService stopped");
    }

    #[instrument(skip(self, respond_to))]
    fn handle_snapshot(&self, respond_to: ServiceResponse<Cart, CartError>) {
        debug!("Processing snapshot request");
        let _ = respond_to.send(Ok(self.cart.clone()));
    }

    #[instrument(fields(items = cart.len()), skip(self, cart, respond_to))]
    fn handle_commit(&mut self, cart: Cart, respond_to: ServiceResponse<(), CartError>) {
        debug!("Processing commit request");

        if cart.same_snapshot(&self.cart) {
            debug!("Snapshot unchanged, skipping persistence");
        } else if let Err(e) = self.storage.write(&cart) {
            // The cart still moves on; the slot catches up on the next change.
            self.diagnostics.report("persist_cart", &CartError::from(e));
        } else {
            debug!("Cart persisted");
        }

        self.cart = cart;
        let _ = respond_to.send(Ok(()));
    }
}

fn restore(storage: &dyn CartStorage, diagnostics: &dyn Diagnostics) -> Cart {
    match storage.read() {
        Ok(Some(cart)) => {
            info!(items = cart.len(), "Restored stored cart");
            cart
        }
        Ok(None) => Cart::new(),
        Err(e) => {
            diagnostics.report("restore_cart", &CartError::from(e));
            Cart::new()
        }
    }
}

/// Starts a cart service on the current runtime.
pub fn spawn_cart_service(
    storage: impl CartStorage,
    diagnostics: Arc<dyn Diagnostics>,
) -> (CartClient, tokio::task::JoinHandle<()>) {
    let (service, client) = CartService::new(32, storage, diagnostics);
    let handle = tokio::spawn(service.run());
    (client, handle)
}
