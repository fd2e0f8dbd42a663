//! Domain ports and supporting types for the hexagonal boundary.

mod macros;
pub(crate) use macros::define_port_error;

mod auth_gateway;
mod gateway_error;
mod session_store;
mod surfaces;
mod workflow_gateway;

#[cfg(test)]
pub use auth_gateway::MockAuthGateway;
pub use auth_gateway::{AuthGateway, AuthReply};
pub use gateway_error::GatewayError;
#[cfg(test)]
pub use session_store::MockSessionStore;
pub use session_store::{SESSION_STORAGE_KEY, SessionStore, SessionStoreError};
pub use surfaces::{AuthView, Navigator, OutputRegion, View};
#[cfg(test)]
pub use workflow_gateway::MockWorkflowGateway;
pub use workflow_gateway::WorkflowGateway;
