//! Session store adapters.

mod file;
mod memory;

pub use file::{FileSessionStore, SESSION_FILENAME};
pub use memory::InMemorySessionStore;
