//! The order API collaborator.
//!
//! [`OrderAheadApi`] is the seam the dashboard task talks through;
//! [`HttpApi`] is the reqwest-backed implementation. Every route is a JSON
//! `POST` bound to the configured company / location.

use std::sync::Arc;

use async_trait::async_trait;
use order_ahead_core::{OrderKey, RawOrder};
use order_ahead_protocol::json_codec::decode_active_orders;
use order_ahead_protocol::wire_types::{ActiveOrdersRequest, OrderActionRequest};
use order_ahead_protocol::ProtocolError;
use reqwest::Client;
use serde::Serialize;
use thiserror::Error;
use tracing::debug;

use crate::config::ServiceConfig;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("{route} returned {status}: {body}")]
    Status {
        route: String,
        status: u16,
        body: String,
    },

    #[error("unexpected response body: {0}")]
    Decode(#[from] ProtocolError),
}

#[async_trait]
pub trait OrderAheadApi: Send + Sync {
    /// Full list of active orders for the session's location.
    async fn fetch_active_orders(&self) -> Result<Vec<RawOrder>, ApiError>;

    /// Tell the backend an order passed its arrival time.
    async fn set_order_expired(&self, key: &OrderKey) -> Result<(), ApiError>;

    /// Start fulfilling an order.
    async fn process_order(&self, key: &OrderKey) -> Result<(), ApiError>;

    /// Take an order off the active list.
    async fn clear_order(&self, key: &OrderKey) -> Result<(), ApiError>;
}

pub type SharedApi = Arc<dyn OrderAheadApi>;

pub struct HttpApi {
    client: Client,
    config: ServiceConfig,
}

impl HttpApi {
    pub fn new(config: ServiceConfig) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(config.request_timeout())
            .build()?;
        Ok(Self { client, config })
    }

    async fn post<B: Serialize + ?Sized>(&self, route: &str, body: &B) -> Result<String, ApiError> {
        let url = self.config.url_for(route);
        debug!(%url, "POST");

        let mut request = self.client.post(&url).json(body);
        if let Some(token) = &self.config.auth_token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;
        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            return Err(ApiError::Status {
                route: route.to_string(),
                status: status.as_u16(),
                body: text,
            });
        }
        Ok(text)
    }

    async fn order_action(&self, route: &str, key: &OrderKey) -> Result<(), ApiError> {
        let body = OrderActionRequest::new(&self.config.company_oid, key);
        self.post(route, &body).await?;
        Ok(())
    }
}

#[async_trait]
impl OrderAheadApi for HttpApi {
    async fn fetch_active_orders(&self) -> Result<Vec<RawOrder>, ApiError> {
        let body = ActiveOrdersRequest {
            location_oid: self.config.location_oid.clone(),
            company_oid: self.config.company_oid.clone(),
        };
        let text = self.post(&self.config.routes.get_active_orders, &body).await?;
        Ok(decode_active_orders(&text)?)
    }

    async fn set_order_expired(&self, key: &OrderKey) -> Result<(), ApiError> {
        self.order_action(&self.config.routes.set_order_expired, key).await
    }

    async fn process_order(&self, key: &OrderKey) -> Result<(), ApiError> {
        self.order_action(&self.config.routes.process_order, key).await
    }

    async fn clear_order(&self, key: &OrderKey) -> Result<(), ApiError> {
        self.order_action(&self.config.routes.clear_order, key).await
    }
}
