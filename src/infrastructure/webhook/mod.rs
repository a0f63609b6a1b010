//! Webhook infrastructure: payload signing and HTTP delivery with bounded
//! retry.

mod dispatcher;
mod signer;

pub use dispatcher::{DeliveryResult, WebhookConfig, WebhookDispatcher, WebhookNotifier};
pub use signer::WebhookSigner;
