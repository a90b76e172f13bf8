//! Port definitions implemented by adapter crates.

pub mod transport;

pub use transport::{BackendRequest, ServiceTransport};
