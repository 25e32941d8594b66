//! # Mock Framework
//!
//! Utilities for testing code that talks to the cart actor without running it.
//!
//! Use [`create_mock_client`] to get a [`CartClient`] and the receiving end of
//! its channel. Then use [`expect_snapshot`] and [`expect_commit`] to assert
//! what was asked and to script the reply, including dropping it.

use tokio::sync::mpsc;

use crate::clients::CartClient;
use crate::domain::Cart;
use crate::error::CartError;
use crate::messages::{CartRequest, ServiceResponse};

/// Creates a client whose requests land on the returned receiver.
pub fn create_mock_client(buffer_size: usize) -> (CartClient, mpsc::Receiver<CartRequest>) {
    let (sender, receiver) = mpsc::channel(buffer_size);
    (CartClient::new(sender), receiver)
}

/// Helper to verify that the next message is a Snapshot request
pub async fn expect_snapshot(
    receiver: &mut mpsc::Receiver<CartRequest>,
) -> Option<ServiceResponse<Cart, CartError>> {
    match receiver.recv().await {
        Some(CartRequest::Snapshot { respond_to }) => Some(respond_to),
        _ => None,
    }
}

/// Helper to verify that the next message is a Commit request
pub async fn expect_commit(
    receiver: &mut mpsc::Receiver<CartRequest>,
) -> Option<(Cart, ServiceResponse<(), CartError>)> {
    match receiver.recv().await {
        Some(CartRequest::Commit { cart, respond_to }) => Some((cart, respond_to)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Product;

    #[tokio::test]
    async fn test_mock_client() {
        let (client, mut receiver) = create_mock_client(10);

        let commit_task = tokio::spawn(async move {
            let cart = Cart::new().with_product(Product::new(1), 1);
            client.commit(cart).await
        });

        let (cart, responder) = expect_commit(&mut receiver)
            .await
            .expect("Expected Commit request");
        assert_eq!(cart.find(1).map(|item| item.amount), Some(1));
        responder.send(Ok(())).unwrap();

        assert!(commit_task.await.unwrap().is_ok());
    }

    #[tokio::test]
    async fn dropped_reply_is_a_communication_error() {
        let (client, mut receiver) = create_mock_client(10);

        let snapshot_task = tokio::spawn(async move { client.snapshot().await });

        let responder = expect_snapshot(&mut receiver)
            .await
            .expect("Expected Snapshot request");
        drop(responder);

        assert!(matches!(
            snapshot_task.await.unwrap(),
            Err(CartError::ActorCommunicationError(_))
        ));
    }
}
