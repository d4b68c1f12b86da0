//! Typed, fail-soft facade over the raw storage backend.
//!
//! Every read falls back to a defined default and every write reports
//! success as a bool — storage trouble never takes down a screen.

use std::sync::Arc;

use secrecy::SecretString;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::warn;
use uuid::Uuid;

use crate::onboarding::model::WeeklyAvailability;
use crate::session::model::{Identity, Role};
use crate::store::traits::StorageBackend;

/// Most recent searches retained per device.
const RECENT_SEARCH_CAP: usize = 20;

/// The closed set of keys this client persists locally.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreKey {
    AuthToken,
    CachedIdentity,
    ActiveRole,
    Settings,
    RecentSearches,
    Favorites,
    ProviderAvailability,
}

impl StoreKey {
    /// Every known key, enumerated for `clear_all`.
    pub const ALL: [StoreKey; 7] = [
        StoreKey::AuthToken,
        StoreKey::CachedIdentity,
        StoreKey::ActiveRole,
        StoreKey::Settings,
        StoreKey::RecentSearches,
        StoreKey::Favorites,
        StoreKey::ProviderAvailability,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AuthToken => "auth_token",
            Self::CachedIdentity => "cached_identity",
            Self::ActiveRole => "active_role",
            Self::Settings => "settings",
            Self::RecentSearches => "recent_searches",
            Self::Favorites => "favorites",
            Self::ProviderAvailability => "provider_availability",
        }
    }
}

/// Device-level settings blob.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppSettings {
    pub notifications_enabled: bool,
    pub preferred_language: String,
    /// Set once provider onboarding has completed on this device.
    pub provider_onboarding_completed: bool,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            notifications_enabled: true,
            preferred_language: "en".to_string(),
            provider_onboarding_completed: false,
        }
    }
}

/// Typed local store over any [`StorageBackend`].
pub struct LocalStore {
    backend: Arc<dyn StorageBackend>,
}

impl LocalStore {
    pub fn new(backend: Arc<dyn StorageBackend>) -> Self {
        Self { backend }
    }

    // ── Raw helpers ─────────────────────────────────────────────────

    async fn get_raw(&self, key: StoreKey) -> Option<String> {
        match self.backend.get(key.as_str()).await {
            Ok(value) => value,
            Err(e) => {
                warn!(key = key.as_str(), error = %e, "Store read failed; using default");
                None
            }
        }
    }

    async fn set_raw(&self, key: StoreKey, value: &str) -> bool {
        match self.backend.set(key.as_str(), value).await {
            Ok(()) => true,
            Err(e) => {
                warn!(key = key.as_str(), error = %e, "Store write failed");
                false
            }
        }
    }

    async fn get_json<T: DeserializeOwned>(&self, key: StoreKey) -> Option<T> {
        let raw = self.get_raw(key).await?;
        match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(e) => {
                warn!(key = key.as_str(), error = %e, "Stored value unreadable; using default");
                None
            }
        }
    }

    async fn set_json<T: Serialize>(&self, key: StoreKey, value: &T) -> bool {
        match serde_json::to_string(value) {
            Ok(raw) => self.set_raw(key, &raw).await,
            Err(e) => {
                warn!(key = key.as_str(), error = %e, "Failed to serialize value for store");
                false
            }
        }
    }

    /// Remove one key. Absent keys count as removed.
    pub async fn remove(&self, key: StoreKey) -> bool {
        match self.backend.remove(key.as_str()).await {
            Ok(()) => true,
            Err(e) => {
                warn!(key = key.as_str(), error = %e, "Store remove failed");
                false
            }
        }
    }

    /// Remove every known key. Used by logout.
    pub async fn clear_all(&self) -> bool {
        let mut all_ok = true;
        for key in StoreKey::ALL {
            all_ok &= self.remove(key).await;
        }
        all_ok
    }

    // ── Auth token ──────────────────────────────────────────────────

    pub async fn token(&self) -> Option<SecretString> {
        self.get_raw(StoreKey::AuthToken)
            .await
            .filter(|t| !t.is_empty())
            .map(SecretString::from)
    }

    pub async fn set_token(&self, token: &str) -> bool {
        self.set_raw(StoreKey::AuthToken, token).await
    }

    // ── Cached identity ─────────────────────────────────────────────

    pub async fn cached_identity(&self) -> Option<Identity> {
        self.get_json(StoreKey::CachedIdentity).await
    }

    pub async fn set_cached_identity(&self, identity: &Identity) -> bool {
        self.set_json(StoreKey::CachedIdentity, identity).await
    }

    // ── Active role ─────────────────────────────────────────────────

    pub async fn active_role(&self) -> Role {
        self.get_json(StoreKey::ActiveRole).await.unwrap_or_default()
    }

    pub async fn set_active_role(&self, role: Role) -> bool {
        self.set_json(StoreKey::ActiveRole, &role).await
    }

    // ── Settings ────────────────────────────────────────────────────

    pub async fn settings(&self) -> AppSettings {
        self.get_json(StoreKey::Settings).await.unwrap_or_default()
    }

    pub async fn set_settings(&self, settings: &AppSettings) -> bool {
        self.set_json(StoreKey::Settings, settings).await
    }

    // ── Recent searches ─────────────────────────────────────────────

    pub async fn recent_searches(&self) -> Vec<String> {
        self.get_json(StoreKey::RecentSearches)
            .await
            .unwrap_or_default()
    }

    pub async fn set_recent_searches(&self, searches: &[String]) -> bool {
        self.set_json(StoreKey::RecentSearches, &searches).await
    }

    /// Prepend a search term, deduplicating and capping the list.
    pub async fn push_recent_search(&self, term: &str) -> bool {
        let term = term.trim();
        if term.is_empty() {
            return true;
        }
        let mut searches = self.recent_searches().await;
        searches.retain(|s| s != term);
        searches.insert(0, term.to_string());
        searches.truncate(RECENT_SEARCH_CAP);
        self.set_recent_searches(&searches).await
    }

    // ── Favorites ───────────────────────────────────────────────────

    pub async fn favorites(&self) -> Vec<Uuid> {
        self.get_json(StoreKey::Favorites).await.unwrap_or_default()
    }

    pub async fn set_favorites(&self, favorites: &[Uuid]) -> bool {
        self.set_json(StoreKey::Favorites, &favorites).await
    }

    // ── Provider availability ───────────────────────────────────────

    pub async fn provider_availability(&self) -> Option<WeeklyAvailability> {
        self.get_json(StoreKey::ProviderAvailability).await
    }

    pub async fn set_provider_availability(&self, availability: &WeeklyAvailability) -> bool {
        self.set_json(StoreKey::ProviderAvailability, availability)
            .await
    }
}
