//! Shared helpers for the client integration suites.

pub(crate) mod stub_backend;
