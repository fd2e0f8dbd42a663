//! Outbound adapters implementing domain ports.
//!
//! - **http**: reqwest-backed gateway for the auth and workflow endpoints
//! - **session**: in-memory and file-backed session stores
//! - **terminal**: plain-text surfaces for the command-line client
//!
//! Adapters translate between domain types and their transport. They hold
//! no workflow logic.

pub mod http;
pub mod session;
pub mod terminal;
