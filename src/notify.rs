//! User-facing notifications and the diagnostics sink for swallowed failures.

use tokio::sync::mpsc;
use tracing::{error, warn};

use crate::domain::ProductId;
use crate::error::CartError;

/// A message meant for the person using the cart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notification {
    OutOfStock { product_id: ProductId },
    AddFailed { product_id: ProductId },
    RemoveFailed { product_id: ProductId },
    UpdateFailed { product_id: ProductId },
}

impl Notification {
    pub fn message(&self) -> &'static str {
        match self {
            Self::OutOfStock { .. } => "Requested quantity is out of stock",
            Self::AddFailed { .. } => "Error adding product",
            Self::RemoveFailed { .. } => "Error removing product",
            Self::UpdateFailed { .. } => "Error updating product quantity",
        }
    }

    pub fn product_id(&self) -> ProductId {
        match *self {
            Self::OutOfStock { product_id }
            | Self::AddFailed { product_id }
            | Self::RemoveFailed { product_id }
            | Self::UpdateFailed { product_id } => product_id,
        }
    }
}

impl std::fmt::Display for Notification {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.message())
    }
}

/// Fire-and-forget channel to the user.
pub trait Notifier: Send + Sync + 'static {
    fn notify(&self, notification: Notification);
}

/// Where failures that never reach the user end up.
pub trait Diagnostics: Send + Sync + 'static {
    fn report(&self, operation: &'static str, error: &CartError);
}

/// Prints notifications through the log.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, notification: Notification) {
        warn!(product_id = notification.product_id(), "{}", notification.message());
    }
}

/// Forwards notifications to a receiver owned by the UI.
#[derive(Debug, Clone)]
pub struct ChannelNotifier {
    sender: mpsc::UnboundedSender<Notification>,
}

impl ChannelNotifier {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<Notification>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (Self { sender }, receiver)
    }
}

impl Notifier for ChannelNotifier {
    fn notify(&self, notification: Notification) {
        // Nobody listening means nobody to tell.
        let _ = self.sender.send(notification);
    }
}

/// Logs every reported failure at error level.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingDiagnostics;

impl Diagnostics for TracingDiagnostics {
    fn report(&self, operation: &'static str, err: &CartError) {
        error!(operation, error = %err, "Cart operation failure");
    }
}
