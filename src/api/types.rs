//! Request and response shapes for the remote gateway.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::session::model::Identity;

/// Login request body.
#[derive(Debug, Clone, Serialize)]
pub struct AuthCredentials {
    pub email: String,
    pub password: String,
}

/// Registration request body.
#[derive(Debug, Clone, Serialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub password: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
}

/// Successful login/register response.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthSession {
    pub token: String,
    pub user: Identity,
}

/// Partial profile update; absent fields are left untouched server-side.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ProfileUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile_media_url: Option<String>,
}

/// Client-side booking creation request.
#[derive(Debug, Clone, Serialize)]
pub struct BookingRequest {
    pub provider_id: Uuid,
    pub service_type: String,
    pub scheduled_at: DateTime<Utc>,
    pub address: String,
    pub price: Decimal,
}

/// Error body shape the backend uses for rejections.
#[derive(Debug, Deserialize)]
pub(crate) struct ApiErrorBody {
    pub message: String,
}
