//! Onboarding step machine — tracks where the wizard stands.

use serde::{Deserialize, Serialize};

/// The steps of the provider onboarding wizard.
///
/// Progresses linearly: Details → Availability → ServiceArea → Payout →
/// Agreement. Going back is allowed everywhere except the first step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OnboardingStep {
    Details,
    Availability,
    ServiceArea,
    Payout,
    Agreement,
}

impl OnboardingStep {
    /// Get the next step in the linear progression, if any.
    pub fn next(&self) -> Option<OnboardingStep> {
        use OnboardingStep::*;
        match self {
            Details => Some(Availability),
            Availability => Some(ServiceArea),
            ServiceArea => Some(Payout),
            Payout => Some(Agreement),
            Agreement => None,
        }
    }

    /// Get the previous step, if any.
    pub fn previous(&self) -> Option<OnboardingStep> {
        use OnboardingStep::*;
        match self {
            Details => None,
            Availability => Some(Details),
            ServiceArea => Some(Availability),
            Payout => Some(ServiceArea),
            Agreement => Some(Payout),
        }
    }

    /// Check if a transition from `self` to `target` is valid —
    /// one step forward or one step back.
    pub fn can_transition_to(&self, target: OnboardingStep) -> bool {
        self.next() == Some(target) || self.previous() == Some(target)
    }

    /// 1-based position for progress display.
    pub fn position(&self) -> usize {
        use OnboardingStep::*;
        match self {
            Details => 1,
            Availability => 2,
            ServiceArea => 3,
            Payout => 4,
            Agreement => 5,
        }
    }

    pub const COUNT: usize = 5;
}

impl Default for OnboardingStep {
    fn default() -> Self {
        Self::Details
    }
}

impl std::fmt::Display for OnboardingStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Details => "details",
            Self::Availability => "availability",
            Self::ServiceArea => "service_area",
            Self::Payout => "payout",
            Self::Agreement => "agreement",
        };
        write!(f, "{s}")
    }
}
