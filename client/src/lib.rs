//! Code-lab client library.
//!
//! Signs users up or in against the code-lab backend and drives the
//! compile, analyze and optimize workflow for the signed-in account.
//! Storage, transport and rendering surfaces are driven ports, so the same
//! orchestration runs in the terminal binary and against test doubles.

pub mod config;
pub mod domain;
pub mod outbound;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use config::ClientSettings;
