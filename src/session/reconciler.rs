//! SessionReconciler — owns the session lifecycle: bootstrap merge,
//! active-role switching, the navigation guard, and teardown.

use std::path::Path;
use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::{info, warn};

use crate::api::traits::ApiClient;
use crate::api::types::{AuthCredentials, ProfileUpdate, RegisterRequest};
use crate::error::{SessionError, TransportError};
use crate::media::uploader::Uploader;
use crate::session::model::{Identity, Role};
use crate::store::LocalStore;

/// Destination folder for profile photo uploads.
const AVATAR_FOLDER: &str = "profile_photos";

/// Entry screen the caller should navigate to after a role change.
///
/// This is the explicit completion signal — navigation fires when the
/// role work is actually done, not on a timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Navigation {
    ClientHome,
    ProviderHome,
}

impl Navigation {
    pub fn for_role(role: Role) -> Self {
        match role {
            Role::Client => Self::ClientHome,
            Role::Provider => Self::ProviderHome,
        }
    }
}

/// Decision of the navigation guard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Guard {
    /// The requested area matches the session; proceed.
    Allow,
    /// The session belongs elsewhere; redirect there.
    Redirect(Navigation),
}

/// What `bootstrap` settled on.
#[derive(Debug)]
pub struct BootstrapOutcome {
    pub identity: Option<Identity>,
    pub active_role: Role,
    /// Set when the fresh fetch failed and the cached identity stands.
    pub refresh_error: Option<TransportError>,
}

/// Owns session state with an explicit init (`bootstrap`) and teardown
/// (`logout`) lifecycle. Injected where needed, never ambient.
pub struct SessionReconciler {
    store: Arc<LocalStore>,
    api: Arc<dyn ApiClient>,
    identity: RwLock<Option<Identity>>,
    active_role: RwLock<Role>,
}

impl SessionReconciler {
    pub fn new(store: Arc<LocalStore>, api: Arc<dyn ApiClient>) -> Self {
        Self {
            store,
            api,
            identity: RwLock::new(None),
            active_role: RwLock::new(Role::Client),
        }
    }

    /// Snapshot of the current identity.
    pub async fn identity(&self) -> Option<Identity> {
        self.identity.read().await.clone()
    }

    /// The currently selected side of the marketplace.
    pub async fn active_role(&self) -> Role {
        *self.active_role.read().await
    }

    async fn account_is_provider(&self) -> bool {
        if let Some(identity) = self.identity.read().await.as_ref() {
            return identity.is_provider();
        }
        self.store
            .cached_identity()
            .await
            .map(|i| i.is_provider())
            .unwrap_or(false)
    }

    // ── Lifecycle ───────────────────────────────────────────────────

    /// Establish a session from credentials.
    pub async fn login(&self, credentials: &AuthCredentials) -> Result<Identity, SessionError> {
        let session = self.api.login(credentials).await?;
        self.adopt_session(session.token, session.user.clone()).await;
        Ok(session.user)
    }

    /// Establish a session for a brand-new account.
    pub async fn register(&self, request: &RegisterRequest) -> Result<Identity, SessionError> {
        let session = self.api.register(request).await?;
        self.adopt_session(session.token, session.user.clone()).await;
        Ok(session.user)
    }

    async fn adopt_session(&self, token: String, identity: Identity) {
        self.store.set_token(&token).await;
        self.store.set_cached_identity(&identity).await;
        self.store.set_active_role(Role::Client).await;
        *self.identity.write().await = Some(identity);
        *self.active_role.write().await = Role::Client;
    }

    /// Reconcile cached identity with a fresh fetch.
    ///
    /// Strictly sequential: read the cache, fetch, merge fetched over
    /// cached, persist the merged result. On fetch failure the cached
    /// identity stands and the error is reported in the outcome rather
    /// than thrown — the screen still has something to show.
    pub async fn bootstrap(&self) -> BootstrapOutcome {
        let cached = self.store.cached_identity().await;
        let stored_role = self.store.active_role().await;

        let (identity, refresh_error) = match self.api.fetch_profile().await {
            Ok(fetched) => {
                let merged = Identity::merge(cached.as_ref(), fetched);
                self.store.set_cached_identity(&merged).await;
                (Some(merged), None)
            }
            Err(e) => {
                warn!(error = %e, "Identity refresh failed; keeping cached identity");
                (cached, Some(e))
            }
        };

        // The active role may never outrun the account: a stored
        // provider selection without provider standing resets to client.
        let account_is_provider = identity.as_ref().map(Identity::is_provider).unwrap_or(false);
        let active_role = if stored_role == Role::Provider && !account_is_provider {
            self.store.set_active_role(Role::Client).await;
            Role::Client
        } else {
            stored_role
        };

        *self.identity.write().await = identity.clone();
        *self.active_role.write().await = active_role;

        BootstrapOutcome {
            identity,
            active_role,
            refresh_error,
        }
    }

    /// Tear the session down.
    ///
    /// The remote call is best-effort; local clearing is unconditional.
    pub async fn logout(&self) {
        if let Err(e) = self.api.logout().await {
            warn!(error = %e, "Remote logout failed; clearing local session anyway");
        }

        self.store.clear_all().await;
        *self.identity.write().await = None;
        *self.active_role.write().await = Role::Client;
        info!("Session cleared");
    }

    // ── Role handling ───────────────────────────────────────────────

    /// Select the other side of the marketplace.
    ///
    /// Selecting `Provider` requires provider standing on the account.
    /// On success the new role is persisted and the caller receives the
    /// entry screen to navigate to.
    pub async fn switch_role(&self, target: Role) -> Result<Navigation, SessionError> {
        if target == Role::Provider && !self.account_is_provider().await {
            return Err(SessionError::RoleNotEligible);
        }

        *self.active_role.write().await = target;
        self.store.set_active_role(target).await;
        info!(role = %target, "Active role switched");
        Ok(Navigation::for_role(target))
    }

    /// Navigation guard for role-gated areas.
    ///
    /// Idempotent, and never mutates the account classification. A
    /// session without provider standing is forced back onto the client
    /// side; otherwise a mismatched area redirects to wherever the
    /// active role actually points.
    pub async fn require_role(&self, expected: Role) -> Guard {
        if !self.account_is_provider().await {
            if self.active_role().await != Role::Client {
                *self.active_role.write().await = Role::Client;
                self.store.set_active_role(Role::Client).await;
            }
            return if expected == Role::Client {
                Guard::Allow
            } else {
                Guard::Redirect(Navigation::ClientHome)
            };
        }

        let active = self.active_role().await;
        if active != expected {
            Guard::Redirect(Navigation::for_role(active))
        } else {
            Guard::Allow
        }
    }

    // ── Profile editing ─────────────────────────────────────────────

    /// Replace the profile photo: upload, push the new URL, re-persist.
    ///
    /// Any upload failure is fatal to this edit — the caller owns
    /// rolling back its optimistic preview.
    pub async fn change_profile_photo(
        &self,
        uploader: &dyn Uploader,
        local_ref: &Path,
    ) -> Result<Identity, SessionError> {
        let receipt = uploader.upload(local_ref, AVATAR_FOLDER).await?;

        let update = ProfileUpdate {
            profile_media_url: Some(receipt.secure_url),
            ..Default::default()
        };
        let fetched = self.api.update_profile(&update).await?;

        let cached = self.store.cached_identity().await;
        let merged = Identity::merge(cached.as_ref(), fetched);
        self.store.set_cached_identity(&merged).await;
        *self.identity.write().await = Some(merged.clone());
        Ok(merged)
    }

    /// Adopt a server-confirmed identity (e.g. after provider promotion)
    /// and persist it.
    pub async fn adopt_identity(&self, identity: Identity) {
        self.store.set_cached_identity(&identity).await;
        *self.identity.write().await = Some(identity);
    }
}
