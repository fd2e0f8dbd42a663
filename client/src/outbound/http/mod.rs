//! HTTP outbound adapter.
//!
//! This module provides the reqwest implementation of the `AuthGateway` and
//! `WorkflowGateway` ports.

mod dto;
mod http_gateway;

pub use http_gateway::HttpBackendGateway;
