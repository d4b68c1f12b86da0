//! Integration tests for the session, onboarding, and booking core.
//!
//! Each test wires the real store (in-memory libSQL) and the real
//! reconciler/workflow types against a scripted gateway and uploader,
//! and exercises a whole user journey end to end.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use chrono::Utc;
use rust_decimal_macros::dec;
use tokio::time::timeout;
use uuid::Uuid;

use serviq_core::api::traits::ApiClient;
use serviq_core::api::types::{
    AuthCredentials, AuthSession, BookingRequest, ProfileUpdate, RegisterRequest,
};
use serviq_core::booking::{Booking, BookingService, BookingStatus};
use serviq_core::error::{TransportError, UploadError};
use serviq_core::media::{UploadReceipt, Uploader};
use serviq_core::onboarding::model::{DayWindow, PayoutMethod};
use serviq_core::onboarding::{ProviderOnboarding, WeeklyAvailability};
use serviq_core::session::reconciler::Navigation;
use serviq_core::session::{Identity, ProviderProfile, Role, ServiceArea, SessionReconciler};
use serviq_core::store::{LibSqlBackend, LocalStore};

/// Maximum time any test is allowed to run before we consider it hung.
const TEST_TIMEOUT: Duration = Duration::from_secs(5);

/// Opt-in log output: RUST_LOG=debug cargo test -- --nocapture
fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();
}

/// Scripted backend: one account, a booking table, and an online switch.
struct FakeBackend {
    state: Mutex<BackendState>,
}

struct BackendState {
    identity: Identity,
    bookings: Vec<Booking>,
    online: bool,
}

impl FakeBackend {
    fn new(identity: Identity) -> Arc<Self> {
        Arc::new(Self {
            state: Mutex::new(BackendState {
                identity,
                bookings: Vec::new(),
                online: true,
            }),
        })
    }

    fn set_online(&self, online: bool) {
        self.state.lock().unwrap().online = online;
    }

    fn guard_online(&self) -> Result<(), TransportError> {
        if self.state.lock().unwrap().online {
            Ok(())
        } else {
            Err(TransportError::NoResponse("connection reset".to_string()))
        }
    }
}

#[async_trait]
impl ApiClient for FakeBackend {
    async fn login(&self, _credentials: &AuthCredentials) -> Result<AuthSession, TransportError> {
        self.guard_online()?;
        Ok(AuthSession {
            token: "tok-journey".to_string(),
            user: self.state.lock().unwrap().identity.clone(),
        })
    }

    async fn register(&self, request: &RegisterRequest) -> Result<AuthSession, TransportError> {
        self.guard_online()?;
        let mut state = self.state.lock().unwrap();
        state.identity.name = request.name.clone();
        state.identity.email = request.email.clone();
        Ok(AuthSession {
            token: "tok-journey".to_string(),
            user: state.identity.clone(),
        })
    }

    async fn logout(&self) -> Result<(), TransportError> {
        self.guard_online()
    }

    async fn fetch_profile(&self) -> Result<Identity, TransportError> {
        self.guard_online()?;
        Ok(self.state.lock().unwrap().identity.clone())
    }

    async fn update_profile(&self, update: &ProfileUpdate) -> Result<Identity, TransportError> {
        self.guard_online()?;
        let mut state = self.state.lock().unwrap();
        if let Some(ref url) = update.profile_media_url {
            state.identity.profile_media_url = Some(url.clone());
        }
        if let Some(ref name) = update.name {
            state.identity.name = name.clone();
        }
        Ok(state.identity.clone())
    }

    async fn become_provider(
        &self,
        application: &serviq_core::onboarding::ProviderApplication,
    ) -> Result<Identity, TransportError> {
        self.guard_online()?;
        let mut state = self.state.lock().unwrap();
        state.identity.account_role = Role::Provider;
        state.identity.provider_profile = Some(ProviderProfile {
            categories: application.categories.clone(),
            hourly_rate: application.hourly_rate,
            bio: application.bio.clone(),
            service_area: Some(application.service_area.clone()),
            document_urls: application.document_urls.clone(),
        });
        Ok(state.identity.clone())
    }

    async fn create_booking(&self, request: &BookingRequest) -> Result<Booking, TransportError> {
        self.guard_online()?;
        let mut state = self.state.lock().unwrap();
        let booking = Booking {
            id: Uuid::new_v4(),
            client_id: state.identity.id,
            provider_id: request.provider_id,
            service_type: request.service_type.clone(),
            scheduled_at: request.scheduled_at,
            address: request.address.clone(),
            price: request.price,
            status: BookingStatus::Pending,
        };
        state.bookings.push(booking.clone());
        Ok(booking)
    }

    async fn list_bookings(&self) -> Result<Vec<Booking>, TransportError> {
        self.guard_online()?;
        Ok(self.state.lock().unwrap().bookings.clone())
    }

    async fn get_booking(&self, id: Uuid) -> Result<Booking, TransportError> {
        self.guard_online()?;
        self.state
            .lock()
            .unwrap()
            .bookings
            .iter()
            .find(|b| b.id == id)
            .cloned()
            .ok_or(TransportError::ServerRejected {
                status: 404,
                message: "booking not found".to_string(),
            })
    }

    async fn update_booking_status(
        &self,
        id: Uuid,
        status: BookingStatus,
    ) -> Result<Booking, TransportError> {
        self.guard_online()?;
        let mut state = self.state.lock().unwrap();
        let booking = state
            .bookings
            .iter_mut()
            .find(|b| b.id == id)
            .ok_or(TransportError::ServerRejected {
                status: 404,
                message: "booking not found".to_string(),
            })?;
        booking.status = status;
        Ok(booking.clone())
    }

    async fn cancel_booking(&self, id: Uuid) -> Result<Booking, TransportError> {
        self.update_booking_status(id, BookingStatus::Cancelled).await
    }
}

/// Uploader that fails for any path containing "corrupt".
struct FakeUploader;

#[async_trait]
impl Uploader for FakeUploader {
    async fn upload(
        &self,
        local_ref: &Path,
        _destination_folder: &str,
    ) -> Result<UploadReceipt, UploadError> {
        if local_ref.to_string_lossy().contains("corrupt") {
            return Err(UploadError::Rejected {
                message: "unreadable image data".to_string(),
            });
        }
        let name = local_ref.file_name().unwrap().to_string_lossy();
        let url = format!("https://cdn.serviq.app/{name}");
        Ok(UploadReceipt {
            raw: serde_json::json!({ "secure_url": url }),
            secure_url: url,
        })
    }
}

fn client_account(media_url: Option<&str>) -> Identity {
    Identity {
        id: Uuid::new_v4(),
        name: "Amara".to_string(),
        email: "amara@example.com".to_string(),
        phone: "555-0100".to_string(),
        address: "12 Hill Rd".to_string(),
        city: "Accra".to_string(),
        profile_media_url: media_url.map(String::from),
        account_role: Role::Client,
        provider_profile: None,
    }
}

fn complete_wizard_input() -> impl FnOnce(&mut serviq_core::onboarding::OnboardingDraft) {
    |draft| {
        draft.categories = vec!["plumbing".to_string()];
        draft.hourly_rate = Some(dec!(40));
        draft.bio = Some("Licensed plumber".to_string());
        draft.availability = WeeklyAvailability {
            windows: vec![DayWindow {
                day: chrono::Weekday::Mon,
                start: chrono::NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
                end: chrono::NaiveTime::from_hms_opt(17, 0, 0).unwrap(),
            }],
        };
        draft.service_area = Some(ServiceArea {
            city: "Accra".to_string(),
            radius_km: 10,
        });
        draft.payout = Some(PayoutMethod::MobileMoney {
            network: "mtn".to_string(),
            phone: "555-0100".to_string(),
        });
        draft.accepted_terms = true;
        draft.profile_photo = Some(PathBuf::from("/tmp/selfie.jpg"));
        draft.documents = vec![
            PathBuf::from("/tmp/license.pdf"),
            PathBuf::from("/tmp/corrupt-scan.pdf"),
        ];
    }
}

async fn store() -> Arc<LocalStore> {
    let backend = LibSqlBackend::new_memory().await.unwrap();
    Arc::new(LocalStore::new(Arc::new(backend)))
}

#[tokio::test]
async fn client_becomes_provider_end_to_end() -> Result<()> {
    init_tracing();
    timeout(TEST_TIMEOUT, async {
        let backend = FakeBackend::new(client_account(None));
        let store = store().await;
        let session = Arc::new(SessionReconciler::new(store.clone(), backend.clone()));

        // Sign in and land on the client side.
        let credentials = AuthCredentials {
            email: "amara@example.com".to_string(),
            password: "hunter2".to_string(),
        };
        session.login(&credentials).await?;
        assert_eq!(session.active_role().await, Role::Client);

        // Provider mode is gated until the account is promoted.
        assert!(session.switch_role(Role::Provider).await.is_err());

        // Walk the wizard and submit; one document upload fails along
        // the way but the promotion still goes through.
        let onboarding = ProviderOnboarding::new(
            store.clone(),
            backend.clone(),
            Arc::new(FakeUploader),
            session.clone(),
        );
        onboarding.update_draft(complete_wizard_input()).await?;
        let outcome = onboarding.submit().await?;

        assert_eq!(outcome.navigation, Navigation::ProviderHome);
        assert_eq!(outcome.warnings.len(), 1);
        assert_eq!(outcome.identity.account_role, Role::Provider);
        let profile = outcome.identity.provider_profile.as_ref().unwrap();
        assert_eq!(
            profile.document_urls,
            vec!["https://cdn.serviq.app/license.pdf"]
        );

        // The session and device state both reflect provider standing.
        assert_eq!(session.active_role().await, Role::Provider);
        assert_eq!(store.active_role().await, Role::Provider);
        assert!(store.settings().await.provider_onboarding_completed);
        assert!(store.provider_availability().await.is_some());

        // Switching back and forth now works both ways.
        assert_eq!(
            session.switch_role(Role::Client).await?,
            Navigation::ClientHome
        );
        assert_eq!(
            session.switch_role(Role::Provider).await?,
            Navigation::ProviderHome
        );
        Ok(())
    })
    .await?
}

#[tokio::test]
async fn bootstrap_repairs_fields_the_server_dropped() -> Result<()> {
    init_tracing();
    timeout(TEST_TIMEOUT, async {
        // The device remembers a profile photo the server has lost.
        let store = store().await;
        store
            .set_cached_identity(&client_account(Some("https://x/old.jpg")))
            .await;

        let backend = FakeBackend::new(client_account(None));
        let session = SessionReconciler::new(store.clone(), backend);

        let outcome = session.bootstrap().await;
        assert!(outcome.refresh_error.is_none());
        assert_eq!(
            outcome.identity.unwrap().profile_media_url.as_deref(),
            Some("https://x/old.jpg")
        );

        // The repaired record was written back for the next launch.
        assert_eq!(
            store
                .cached_identity()
                .await
                .unwrap()
                .profile_media_url
                .as_deref(),
            Some("https://x/old.jpg")
        );
        Ok(())
    })
    .await?
}

#[tokio::test]
async fn booking_runs_its_full_lifecycle_against_the_backend() -> Result<()> {
    init_tracing();
    timeout(TEST_TIMEOUT, async {
        let backend = FakeBackend::new(client_account(None));
        let service = BookingService::new(backend.clone());

        let request = BookingRequest {
            provider_id: Uuid::new_v4(),
            service_type: "electrical".to_string(),
            scheduled_at: Utc::now(),
            address: "4 Ring Rd, Accra".to_string(),
            price: dec!(80),
        };
        let booking = service.request(&request).await?;
        assert_eq!(booking.status, BookingStatus::Pending);

        // The provider works it forward to completion.
        let accepted = service.advance(&booking, Role::Provider).await?;
        assert_eq!(accepted.status, BookingStatus::Accepted);
        let in_progress = service.advance(&accepted, Role::Provider).await?;
        assert_eq!(in_progress.status, BookingStatus::InProgress);
        let completed = service.advance(&in_progress, Role::Provider).await?;
        assert_eq!(completed.status, BookingStatus::Completed);

        // Nothing moves a completed job.
        assert!(service.advance(&completed, Role::Provider).await.is_err());
        assert!(service.cancel(&completed, Role::Client).await.is_err());

        // A fresh fetch agrees with the last committed state.
        assert_eq!(
            service.refresh(booking.id).await?.status,
            BookingStatus::Completed
        );
        Ok(())
    })
    .await?
}

#[tokio::test]
async fn failed_transition_leaves_the_server_copy_authoritative() -> Result<()> {
    init_tracing();
    timeout(TEST_TIMEOUT, async {
        let backend = FakeBackend::new(client_account(None));
        let service = BookingService::new(backend.clone());

        let booking = service
            .request(&BookingRequest {
                provider_id: Uuid::new_v4(),
                service_type: "cleaning".to_string(),
                scheduled_at: Utc::now(),
                address: "4 Ring Rd".to_string(),
                price: dec!(50),
            })
            .await?;

        backend.set_online(false);
        let err = service.advance(&booking, Role::Provider).await.unwrap_err();
        assert!(matches!(
            err,
            serviq_core::error::BookingError::Transport(TransportError::NoResponse(_))
        ));

        // Reconcile by re-fetching once the network returns.
        backend.set_online(true);
        assert_eq!(
            service.refresh(booking.id).await?.status,
            BookingStatus::Pending
        );
        Ok(())
    })
    .await?
}

#[tokio::test]
async fn logout_clears_the_device_even_when_the_server_is_gone() -> Result<()> {
    init_tracing();
    timeout(TEST_TIMEOUT, async {
        let backend = FakeBackend::new(client_account(Some("https://x/a.jpg")));
        let store = store().await;
        let session = Arc::new(SessionReconciler::new(store.clone(), backend.clone()));

        session
            .login(&AuthCredentials {
                email: "amara@example.com".to_string(),
                password: "hunter2".to_string(),
            })
            .await?;
        store.push_recent_search("plumber").await;
        assert!(store.token().await.is_some());

        // The remote logout call gets no response; local teardown must
        // happen regardless.
        backend.set_online(false);
        session.logout().await;

        assert!(store.token().await.is_none());
        assert!(store.cached_identity().await.is_none());
        assert!(store.recent_searches().await.is_empty());
        assert_eq!(store.active_role().await, Role::Client);
        assert_eq!(session.active_role().await, Role::Client);
        Ok(())
    })
    .await?
}
