//! HTTP gateway — reqwest-backed `ApiClient` implementation.

use std::sync::Arc;

use async_trait::async_trait;
use secrecy::ExposeSecret;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;
use uuid::Uuid;

use crate::api::traits::ApiClient;
use crate::api::types::{
    ApiErrorBody, AuthCredentials, AuthSession, BookingRequest, ProfileUpdate, RegisterRequest,
};
use crate::booking::model::{Booking, BookingStatus};
use crate::config::CoreConfig;
use crate::error::TransportError;
use crate::onboarding::model::ProviderApplication;
use crate::session::model::Identity;
use crate::store::LocalStore;

/// Gateway to the marketplace backend over HTTP.
///
/// The bearer token is read from the local store per request, so the
/// gateway never holds stale credentials across login/logout.
pub struct HttpGateway {
    client: reqwest::Client,
    base_url: String,
    store: Arc<LocalStore>,
}

impl HttpGateway {
    pub fn new(config: &CoreConfig, store: Arc<LocalStore>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            store,
        }
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Attach the bearer token when the store has one.
    async fn authorized(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match self.store.token().await {
            Some(token) => builder.bearer_auth(token.expose_secret()),
            None => builder,
        }
    }

    /// Send a request and decode a JSON body, classifying every failure.
    async fn send_json<T: DeserializeOwned>(
        &self,
        builder: reqwest::RequestBuilder,
    ) -> Result<T, TransportError> {
        let response = builder.send().await.map_err(classify_send_error)?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(server_rejection(status.as_u16(), body));
        }

        // A response arrived; an undecodable body is still a rejection,
        // not a transport drop.
        response
            .json::<T>()
            .await
            .map_err(|e| TransportError::ServerRejected {
                status: status.as_u16(),
                message: format!("unreadable response body: {e}"),
            })
    }

    /// Send a request where only the status matters.
    async fn send_unit(&self, builder: reqwest::RequestBuilder) -> Result<(), TransportError> {
        let response = builder.send().await.map_err(classify_send_error)?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(server_rejection(status.as_u16(), body));
        }
        Ok(())
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, TransportError> {
        let builder = self.client.get(self.endpoint(path));
        self.send_json(self.authorized(builder).await).await
    }

    async fn post_json<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, TransportError> {
        let builder = self.client.post(self.endpoint(path)).json(body);
        self.send_json(self.authorized(builder).await).await
    }

    async fn put_json<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, TransportError> {
        let builder = self.client.put(self.endpoint(path)).json(body);
        self.send_json(self.authorized(builder).await).await
    }
}

/// Classify a reqwest send failure into the transport buckets.
fn classify_send_error(e: reqwest::Error) -> TransportError {
    if e.is_builder() {
        TransportError::SetupFailed(e.to_string())
    } else {
        // Sent (or attempted) but nothing usable came back:
        // connect refusal, timeout, dropped connection.
        TransportError::NoResponse(e.to_string())
    }
}

/// Build a `ServerRejected`, preferring the backend's `{"message": ...}`
/// body over the raw text.
fn server_rejection(status: u16, body: String) -> TransportError {
    let message = serde_json::from_str::<ApiErrorBody>(&body)
        .map(|b| b.message)
        .unwrap_or(body);
    debug!(status, message = %message, "Server rejected request");
    TransportError::ServerRejected { status, message }
}

#[async_trait]
impl ApiClient for HttpGateway {
    async fn login(&self, credentials: &AuthCredentials) -> Result<AuthSession, TransportError> {
        // No token attached: this call establishes one.
        let builder = self.client.post(self.endpoint("auth/login")).json(credentials);
        self.send_json(builder).await
    }

    async fn register(&self, request: &RegisterRequest) -> Result<AuthSession, TransportError> {
        let builder = self.client.post(self.endpoint("auth/register")).json(request);
        self.send_json(builder).await
    }

    async fn logout(&self) -> Result<(), TransportError> {
        let builder = self.client.post(self.endpoint("auth/logout"));
        self.send_unit(self.authorized(builder).await).await
    }

    async fn fetch_profile(&self) -> Result<Identity, TransportError> {
        self.get_json("auth/profile").await
    }

    async fn update_profile(&self, update: &ProfileUpdate) -> Result<Identity, TransportError> {
        self.put_json("auth/profile", update).await
    }

    async fn become_provider(
        &self,
        application: &ProviderApplication,
    ) -> Result<Identity, TransportError> {
        self.post_json("providers", application).await
    }

    async fn create_booking(&self, request: &BookingRequest) -> Result<Booking, TransportError> {
        self.post_json("bookings", request).await
    }

    async fn list_bookings(&self) -> Result<Vec<Booking>, TransportError> {
        self.get_json("bookings").await
    }

    async fn get_booking(&self, id: Uuid) -> Result<Booking, TransportError> {
        self.get_json(&format!("bookings/{id}")).await
    }

    async fn update_booking_status(
        &self,
        id: Uuid,
        status: BookingStatus,
    ) -> Result<Booking, TransportError> {
        self.put_json(
            &format!("bookings/{id}"),
            &serde_json::json!({ "status": status }),
        )
        .await
    }

    async fn cancel_booking(&self, id: Uuid) -> Result<Booking, TransportError> {
        self.post_json(&format!("bookings/{id}/cancel"), &serde_json::json!({}))
            .await
    }
}
