//! Domain models for the exchange rate client.

pub mod credential;
pub mod endpoint;
pub mod taxonomy;

pub use credential::Credential;
pub use endpoint::{Endpoint, EndpointKind, build_path};
pub use taxonomy::ErrorKind;
