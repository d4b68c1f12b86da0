//! Onboarding draft, validation rules, and the provider application payload.

use std::path::PathBuf;

use chrono::{NaiveTime, Weekday};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::FieldError;
use crate::onboarding::state::OnboardingStep;
use crate::session::model::ServiceArea;

/// One bookable window in a provider's week.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayWindow {
    pub day: Weekday,
    pub start: NaiveTime,
    pub end: NaiveTime,
}

/// A provider's weekly availability.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeeklyAvailability {
    pub windows: Vec<DayWindow>,
}

impl WeeklyAvailability {
    pub fn is_empty(&self) -> bool {
        self.windows.is_empty()
    }
}

/// How the provider wants to get paid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PayoutMethod {
    BankAccount {
        account_name: String,
        account_number: String,
        bank_name: String,
    },
    MobileMoney {
        network: String,
        phone: String,
    },
}

/// Accumulated, not-yet-submitted provider registration data.
///
/// Filled in step by step; `ProviderOnboarding` freezes it once a
/// submission has gone through.
#[derive(Debug, Clone, Default)]
pub struct OnboardingDraft {
    // Step 1 — details
    pub categories: Vec<String>,
    pub hourly_rate: Option<Decimal>,
    pub bio: Option<String>,
    // Step 2 — availability
    pub availability: WeeklyAvailability,
    // Step 3 — service area
    pub service_area: Option<ServiceArea>,
    // Step 4 — payout
    pub payout: Option<PayoutMethod>,
    // Step 5 — agreement
    pub accepted_terms: bool,
    // Pending local media references, uploaded at submission time.
    pub profile_photo: Option<PathBuf>,
    pub documents: Vec<PathBuf>,
}

impl OnboardingDraft {
    /// Validate the fields belonging to one wizard step.
    pub fn validate_step(&self, step: OnboardingStep) -> Vec<FieldError> {
        let mut errors = Vec::new();
        match step {
            OnboardingStep::Details => {
                if self.categories.iter().all(|c| c.trim().is_empty()) {
                    errors.push(FieldError::new(
                        "categories",
                        "select at least one service category",
                    ));
                }
                match self.hourly_rate {
                    None => errors.push(FieldError::new("hourly_rate", "enter an hourly rate")),
                    Some(rate) if rate <= Decimal::ZERO => {
                        errors.push(FieldError::new("hourly_rate", "rate must be positive"));
                    }
                    Some(_) => {}
                }
            }
            OnboardingStep::Availability => {
                if self.availability.is_empty() {
                    errors.push(FieldError::new(
                        "availability",
                        "add at least one availability window",
                    ));
                }
                for window in &self.availability.windows {
                    if window.start >= window.end {
                        errors.push(FieldError::new(
                            "availability",
                            format!("{:?}: window must start before it ends", window.day),
                        ));
                    }
                }
            }
            OnboardingStep::ServiceArea => match self.service_area {
                None => errors.push(FieldError::new("service_area", "choose a service area")),
                Some(ref area) => {
                    if area.city.trim().is_empty() {
                        errors.push(FieldError::new("service_area.city", "city is required"));
                    }
                    if area.radius_km == 0 {
                        errors.push(FieldError::new(
                            "service_area.radius_km",
                            "radius must be at least 1 km",
                        ));
                    }
                }
            },
            OnboardingStep::Payout => match self.payout {
                None => errors.push(FieldError::new("payout", "choose a payout method")),
                Some(PayoutMethod::BankAccount {
                    ref account_name,
                    ref account_number,
                    ref bank_name,
                }) => {
                    for (field, value) in [
                        ("payout.account_name", account_name),
                        ("payout.account_number", account_number),
                        ("payout.bank_name", bank_name),
                    ] {
                        if value.trim().is_empty() {
                            errors.push(FieldError::new(field, "required"));
                        }
                    }
                }
                Some(PayoutMethod::MobileMoney {
                    ref network,
                    ref phone,
                }) => {
                    if network.trim().is_empty() {
                        errors.push(FieldError::new("payout.network", "required"));
                    }
                    if phone.trim().is_empty() {
                        errors.push(FieldError::new("payout.phone", "required"));
                    }
                }
            },
            OnboardingStep::Agreement => {
                if !self.accepted_terms {
                    errors.push(FieldError::new(
                        "accepted_terms",
                        "the service agreement must be accepted",
                    ));
                }
            }
        }
        errors
    }

    /// Validate every step, in wizard order.
    pub fn validate_all(&self) -> Vec<FieldError> {
        let mut step = Some(OnboardingStep::default());
        let mut errors = Vec::new();
        while let Some(current) = step {
            errors.extend(self.validate_step(current));
            step = current.next();
        }
        errors
    }

    /// Assemble the final application payload from validated fields plus
    /// whichever upload URLs succeeded.
    pub fn to_application(
        &self,
        profile_media_url: Option<String>,
        document_urls: Vec<String>,
    ) -> Result<ProviderApplication, Vec<FieldError>> {
        let errors = self.validate_all();
        if !errors.is_empty() {
            return Err(errors);
        }

        let (Some(hourly_rate), Some(service_area), Some(payout)) = (
            self.hourly_rate,
            self.service_area.clone(),
            self.payout.clone(),
        ) else {
            return Err(self.validate_all());
        };

        Ok(ProviderApplication {
            categories: self
                .categories
                .iter()
                .filter(|c| !c.trim().is_empty())
                .cloned()
                .collect(),
            hourly_rate,
            bio: self.bio.clone(),
            availability: self.availability.clone(),
            service_area,
            payout,
            accepted_terms: self.accepted_terms,
            profile_media_url,
            document_urls,
        })
    }
}

/// The become-provider request body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderApplication {
    pub categories: Vec<String>,
    pub hourly_rate: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    pub availability: WeeklyAvailability,
    pub service_area: ServiceArea,
    pub payout: PayoutMethod,
    pub accepted_terms: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_media_url: Option<String>,
    #[serde(default)]
    pub document_urls: Vec<String>,
}
