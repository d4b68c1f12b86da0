//! Backend-agnostic gateway trait — single async interface for all
//! remote resources this core consumes.

use async_trait::async_trait;
use uuid::Uuid;

use crate::api::types::{
    AuthCredentials, AuthSession, BookingRequest, ProfileUpdate, RegisterRequest,
};
use crate::booking::model::{Booking, BookingStatus};
use crate::error::TransportError;
use crate::onboarding::model::ProviderApplication;
use crate::session::model::Identity;

/// Resource-oriented gateway to the marketplace backend.
///
/// Implementations attach the bearer token from the local store when one
/// is present (login/register being the exceptions). All failures are
/// classified into the three [`TransportError`] buckets and propagated —
/// callers decide severity.
#[async_trait]
pub trait ApiClient: Send + Sync {
    // ── Auth ────────────────────────────────────────────────────────

    async fn login(&self, credentials: &AuthCredentials) -> Result<AuthSession, TransportError>;

    async fn register(&self, request: &RegisterRequest) -> Result<AuthSession, TransportError>;

    /// Best-effort server-side session teardown.
    async fn logout(&self) -> Result<(), TransportError>;

    // ── Profile ─────────────────────────────────────────────────────

    async fn fetch_profile(&self) -> Result<Identity, TransportError>;

    async fn update_profile(&self, update: &ProfileUpdate) -> Result<Identity, TransportError>;

    /// Promote the account to provider standing.
    async fn become_provider(
        &self,
        application: &ProviderApplication,
    ) -> Result<Identity, TransportError>;

    // ── Bookings ────────────────────────────────────────────────────

    async fn create_booking(&self, request: &BookingRequest) -> Result<Booking, TransportError>;

    async fn list_bookings(&self) -> Result<Vec<Booking>, TransportError>;

    async fn get_booking(&self, id: Uuid) -> Result<Booking, TransportError>;

    /// Commit a status transition; the server is the source of truth.
    async fn update_booking_status(
        &self,
        id: Uuid,
        status: BookingStatus,
    ) -> Result<Booking, TransportError>;

    async fn cancel_booking(&self, id: Uuid) -> Result<Booking, TransportError>;
}
