//! BookingService — commits status transitions through the gateway.
//!
//! The server owns booking state. Local copies are advisory: a caller
//! showing an optimistic transition must roll back (via `refresh`) when
//! the commit fails.

use std::sync::Arc;

use tracing::info;
use uuid::Uuid;

use crate::api::traits::ApiClient;
use crate::api::types::BookingRequest;
use crate::booking::model::{Booking, BookingStatus};
use crate::error::BookingError;
use crate::session::model::Role;

pub struct BookingService {
    api: Arc<dyn ApiClient>,
}

impl BookingService {
    pub fn new(api: Arc<dyn ApiClient>) -> Self {
        Self { api }
    }

    /// Create a booking on behalf of the client side.
    pub async fn request(&self, request: &BookingRequest) -> Result<Booking, BookingError> {
        let booking = self.api.create_booking(request).await?;
        info!(id = %booking.id, service = %booking.service_type, "Booking requested");
        Ok(booking)
    }

    /// All bookings visible to the current account.
    pub async fn list(&self) -> Result<Vec<Booking>, BookingError> {
        Ok(self.api.list_bookings().await?)
    }

    /// Re-fetch the authoritative copy, e.g. after a failed transition.
    pub async fn refresh(&self, id: Uuid) -> Result<Booking, BookingError> {
        Ok(self.api.get_booking(id).await?)
    }

    /// Move a booking one step forward. Provider-only.
    ///
    /// Fails with `InvalidTransition` at a terminal status; commits the
    /// move remotely and returns the server's copy otherwise.
    pub async fn advance(&self, booking: &Booking, actor: Role) -> Result<Booking, BookingError> {
        if actor != Role::Provider {
            return Err(BookingError::NotPermitted {
                actor: actor.to_string(),
            });
        }

        let target = booking
            .status
            .next()
            .ok_or(BookingError::InvalidTransition {
                from: booking.status,
            })?;

        let updated = self.api.update_booking_status(booking.id, target).await?;
        info!(id = %booking.id, from = %booking.status, to = %target, "Booking advanced");
        Ok(updated)
    }

    /// Cancel a booking. Either actor may cancel.
    ///
    /// Fails with `TerminalState` once the booking is completed or
    /// already cancelled.
    pub async fn cancel(&self, booking: &Booking, actor: Role) -> Result<Booking, BookingError> {
        if booking.status.is_terminal() {
            return Err(BookingError::TerminalState {
                status: booking.status,
            });
        }

        let updated = self.api.cancel_booking(booking.id).await?;
        info!(id = %booking.id, by = %actor, "Booking cancelled");
        Ok(updated)
    }
}
