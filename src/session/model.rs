//! Identity and role models.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Which side of the marketplace an account (or session) is on.
///
/// As an account classification this is durable: once an account becomes
/// `Provider` it never reverts. As a session selector it is transient and
/// may flip back and forth, but only within what the account allows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Client,
    Provider,
}

impl Default for Role {
    fn default() -> Self {
        Self::Client
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Client => write!(f, "client"),
            Self::Provider => write!(f, "provider"),
        }
    }
}

/// Geographic area a provider serves.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceArea {
    pub city: String,
    pub radius_km: u32,
}

/// Provider-side profile, present once an account has been promoted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderProfile {
    pub categories: Vec<String>,
    pub hourly_rate: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_area: Option<ServiceArea>,
    /// Hosted URLs of certification documents, in upload order.
    #[serde(default)]
    pub document_urls: Vec<String>,
}

/// A marketplace account as the client sees it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Identity {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub city: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_media_url: Option<String>,
    pub account_role: Role,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider_profile: Option<ProviderProfile>,
}

impl Identity {
    /// Whether this account carries provider standing.
    pub fn is_provider(&self) -> bool {
        self.account_role == Role::Provider
    }

    /// Merge a freshly fetched identity over a cached one.
    ///
    /// Fetched values win, except where the fetch came back empty for a
    /// field the cache still knows — then the cached value is retained.
    /// This repairs server responses that omit previously known fields
    /// (a media URL being the common case). The provider classification
    /// latches: a cached `Provider` never reverts to `Client`.
    pub fn merge(cached: Option<&Identity>, fetched: Identity) -> Identity {
        let Some(cached) = cached else {
            return fetched;
        };

        let account_role = if cached.account_role == Role::Provider {
            Role::Provider
        } else {
            fetched.account_role
        };

        Identity {
            id: fetched.id,
            name: keep_nonempty(fetched.name, &cached.name),
            email: keep_nonempty(fetched.email, &cached.email),
            phone: keep_nonempty(fetched.phone, &cached.phone),
            address: keep_nonempty(fetched.address, &cached.address),
            city: keep_nonempty(fetched.city, &cached.city),
            profile_media_url: fetched
                .profile_media_url
                .filter(|url| !url.trim().is_empty())
                .or_else(|| cached.profile_media_url.clone()),
            account_role,
            provider_profile: fetched
                .provider_profile
                .or_else(|| cached.provider_profile.clone()),
        }
    }
}

/// Prefer the fetched string unless it is blank and the cache is not.
fn keep_nonempty(fetched: String, cached: &str) -> String {
    if fetched.trim().is_empty() && !cached.is_empty() {
        cached.to_string()
    } else {
        fetched
    }
}
