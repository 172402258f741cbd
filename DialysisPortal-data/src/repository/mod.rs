// Repository module structure
pub mod credentials;
pub mod errors;
mod portal;

// Re-export commonly used types
pub use credentials::{clear_on_auth_failure, CredentialProvider, StaticCredentials};
pub use errors::ApiError;
pub use portal::{HttpPortalConnector, PortalApiClient, PortalApiConfig, PortalApiTrait, PortalConnector};

// Re-export test modules for both testing and when mock feature is enabled
#[cfg(any(test, feature = "mock"))]
pub use portal::tests;
