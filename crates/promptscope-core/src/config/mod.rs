#[allow(clippy::module_inception)]
pub mod config;
pub mod credentials;
pub use config::PromptscopeConfig;
pub use credentials::{Credentials, ProviderCredentials};
