//! Session layer — identity models and the session/role reconciler.

pub mod model;
pub mod reconciler;

pub use model::{Identity, ProviderProfile, Role, ServiceArea};
pub use reconciler::{BootstrapOutcome, Guard, Navigation, SessionReconciler};
