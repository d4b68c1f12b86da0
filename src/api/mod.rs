//! Remote API gateway — authenticated access to backend resources.

pub mod http_gateway;
pub mod traits;
pub mod types;

pub use http_gateway::HttpGateway;
pub use traits::ApiClient;
pub use types::{AuthCredentials, AuthSession, BookingRequest, ProfileUpdate, RegisterRequest};
