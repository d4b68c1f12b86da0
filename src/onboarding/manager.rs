//! ProviderOnboarding — coordinates the wizard, media uploads, and the
//! become-provider submission.

use std::path::PathBuf;
use std::sync::Arc;

use futures::future::join_all;
use tokio::sync::RwLock;
use tracing::{info, warn};

use crate::api::traits::ApiClient;
use crate::error::OnboardingError;
use crate::media::task::UploadTask;
use crate::media::uploader::Uploader;
use crate::onboarding::model::OnboardingDraft;
use crate::onboarding::state::OnboardingStep;
use crate::session::model::{Identity, Role};
use crate::session::reconciler::{Navigation, SessionReconciler};
use crate::store::LocalStore;

/// Destination folder for the onboarding profile photo.
const PHOTO_FOLDER: &str = "profile_photos";
/// Destination folder for certification documents.
const DOCUMENT_FOLDER: &str = "provider_documents";

/// An upload that failed during submission.
///
/// Upload trouble never blocks provider promotion — failed assets are
/// reported back so the UI can offer a re-upload later.
#[derive(Debug, Clone)]
pub struct UploadWarning {
    pub local_ref: PathBuf,
    pub message: String,
}

/// What a successful submission produced.
#[derive(Debug)]
pub struct SubmitOutcome {
    /// The promoted identity, merged and persisted.
    pub identity: Identity,
    /// Where the caller should navigate now that the session is in
    /// provider mode.
    pub navigation: Navigation,
    /// Assets that failed to upload; the promotion went through without
    /// them.
    pub warnings: Vec<UploadWarning>,
}

/// Coordinates the five-step provider onboarding wizard.
///
/// Holds the draft and the step cursor; `submit` turns the validated
/// draft into a provider application and drives the session into
/// provider mode on success. The draft freezes once a submission has
/// gone through.
pub struct ProviderOnboarding {
    store: Arc<LocalStore>,
    api: Arc<dyn ApiClient>,
    uploader: Arc<dyn Uploader>,
    session: Arc<SessionReconciler>,
    draft: RwLock<OnboardingDraft>,
    step: RwLock<OnboardingStep>,
    submitted: RwLock<bool>,
}

impl ProviderOnboarding {
    pub fn new(
        store: Arc<LocalStore>,
        api: Arc<dyn ApiClient>,
        uploader: Arc<dyn Uploader>,
        session: Arc<SessionReconciler>,
    ) -> Self {
        Self {
            store,
            api,
            uploader,
            session,
            draft: RwLock::new(OnboardingDraft::default()),
            step: RwLock::new(OnboardingStep::default()),
            submitted: RwLock::new(false),
        }
    }

    /// Where the wizard currently stands.
    pub async fn current_step(&self) -> OnboardingStep {
        *self.step.read().await
    }

    /// Snapshot of the accumulated draft.
    pub async fn draft(&self) -> OnboardingDraft {
        self.draft.read().await.clone()
    }

    pub async fn is_submitted(&self) -> bool {
        *self.submitted.read().await
    }

    /// Apply an edit to the draft. Rejected once submitted.
    pub async fn update_draft<F>(&self, apply: F) -> Result<(), OnboardingError>
    where
        F: FnOnce(&mut OnboardingDraft),
    {
        if self.is_submitted().await {
            return Err(OnboardingError::AlreadySubmitted);
        }
        let mut draft = self.draft.write().await;
        apply(&mut draft);
        Ok(())
    }

    /// Move one step forward.
    ///
    /// Only proceeds when the current step's fields validate; at the
    /// final step the cursor stays put — `submit` is the way onward.
    pub async fn advance(&self) -> Result<OnboardingStep, OnboardingError> {
        if self.is_submitted().await {
            return Err(OnboardingError::AlreadySubmitted);
        }

        let current = self.current_step().await;
        let errors = self.draft.read().await.validate_step(current);
        if !errors.is_empty() {
            return Err(OnboardingError::Validation(errors));
        }

        match current.next() {
            Some(next) => {
                *self.step.write().await = next;
                Ok(next)
            }
            None => Ok(current),
        }
    }

    /// Move one step back. Not possible from the first step.
    pub async fn go_back(&self) -> Option<OnboardingStep> {
        let previous = self.current_step().await.previous()?;
        *self.step.write().await = previous;
        Some(previous)
    }

    /// Submit the draft as a provider application.
    ///
    /// 1. Re-validate every step.
    /// 2. Upload the profile photo if the draft holds one; failure is a
    ///    warning, not a blocker.
    /// 3. Upload all document references concurrently; failures are
    ///    warnings too.
    /// 4. Assemble the application from validated fields plus whichever
    ///    upload URLs succeeded.
    /// 5. Call become-provider; the server's reply is authoritative.
    /// 6. Persist the promoted identity and availability, mark
    ///    onboarding complete, and switch the session into provider
    ///    mode.
    ///
    /// On any failure before step 6 the draft is retained untouched and
    /// resubmission is allowed.
    pub async fn submit(&self) -> Result<SubmitOutcome, OnboardingError> {
        if self.is_submitted().await {
            return Err(OnboardingError::AlreadySubmitted);
        }

        let draft = self.draft.read().await.clone();
        let errors = draft.validate_all();
        if !errors.is_empty() {
            return Err(OnboardingError::Validation(errors));
        }

        let mut warnings = Vec::new();

        let profile_media_url = match draft.profile_photo.as_ref() {
            Some(photo) => {
                let task = UploadTask::new(photo.clone(), PHOTO_FOLDER)
                    .run(self.uploader.as_ref())
                    .await;
                if let Some(message) = task.error.clone() {
                    warnings.push(UploadWarning {
                        local_ref: task.local_ref.clone(),
                        message,
                    });
                }
                task.result_url
            }
            None => None,
        };

        // Fan-out: documents upload as one unordered batch.
        let uploads = draft
            .documents
            .iter()
            .map(|doc| UploadTask::new(doc.clone(), DOCUMENT_FOLDER).run(self.uploader.as_ref()));
        let mut document_urls = Vec::new();
        for task in join_all(uploads).await {
            match task.result_url {
                Some(url) => document_urls.push(url),
                None => warnings.push(UploadWarning {
                    local_ref: task.local_ref,
                    message: task.error.unwrap_or_else(|| "upload failed".to_string()),
                }),
            }
        }

        if !warnings.is_empty() {
            warn!(
                failed = warnings.len(),
                "Submitting provider application with partial media"
            );
        }

        let application = draft
            .to_application(profile_media_url, document_urls)
            .map_err(OnboardingError::Validation)?;

        let promoted = self.api.become_provider(&application).await?;

        *self.submitted.write().await = true;

        let cached = self.store.cached_identity().await;
        let merged = Identity::merge(cached.as_ref(), promoted);
        self.session.adopt_identity(merged.clone()).await;

        self.store
            .set_provider_availability(&draft.availability)
            .await;
        let mut settings = self.store.settings().await;
        settings.provider_onboarding_completed = true;
        self.store.set_settings(&settings).await;

        let navigation = match self.session.switch_role(Role::Provider).await {
            Ok(navigation) => navigation,
            Err(e) => {
                warn!(error = %e, "Promoted account could not enter provider mode");
                Navigation::ClientHome
            }
        };

        info!(id = %merged.id, "Provider onboarding complete");
        Ok(SubmitOutcome {
            identity: merged,
            navigation,
            warnings,
        })
    }
}
