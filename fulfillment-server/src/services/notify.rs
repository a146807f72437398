//! Return-approved notification
//!
//! Fire-and-forget signal to the payment/inventory collaborators after a
//! return reaches APPROVED_ADMIN. The contract is notify-after-the-fact: a
//! failed delivery is logged and never rolls back the return state.

use async_trait::async_trait;
use serde::Serialize;

/// Payload for the return-approved notification
#[derive(Debug, Clone, Serialize)]
pub struct ReturnApprovedNotification {
    pub order_id: String,
    pub reversed_amount: f64,
}

/// Outbound notification interface to the payment/inventory collaborators
#[async_trait]
pub trait ReturnNotifier: Send + Sync {
    /// Deliver the notification, best-effort; must not fail the caller
    async fn return_approved(&self, notification: ReturnApprovedNotification);
}

/// HTTP implementation posting to the payments collaborator
pub struct HttpReturnNotifier {
    http: reqwest::Client,
    base_url: String,
    token: String,
}

impl HttpReturnNotifier {
    pub fn new(base_url: String, token: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            token,
        }
    }
}

#[async_trait]
impl ReturnNotifier for HttpReturnNotifier {
    async fn return_approved(&self, notification: ReturnApprovedNotification) {
        let url = format!("{}/api/notifications/return-approved", self.base_url);
        let result = self
            .http
            .post(&url)
            .bearer_auth(&self.token)
            .json(&notification)
            .send()
            .await;

        match result {
            Ok(response) if response.status().is_success() => {
                tracing::info!(
                    order_id = %notification.order_id,
                    reversed_amount = notification.reversed_amount,
                    "Return-approved notification delivered"
                );
            }
            Ok(response) => {
                tracing::warn!(
                    order_id = %notification.order_id,
                    status = %response.status(),
                    "Return-approved notification rejected; return state unchanged"
                );
            }
            Err(e) => {
                tracing::warn!(
                    order_id = %notification.order_id,
                    error = %e,
                    "Return-approved notification failed; return state unchanged"
                );
            }
        }
    }
}
