#![doc = include_str!("../README.md")]
#![deny(unsafe_code)]
#![deny(unused_crate_dependencies)]

pub mod domain;
pub mod error;
pub mod normalize;
pub mod ports;
pub mod registry;
pub mod session;

// ============================================================================
// Public API
// ============================================================================

pub use domain::{
    ChatMessage, DocumentEntry, HttpMethod, MessageRole, Metadata, NormalizedResponse, ServiceId,
    UploadedFile,
};
pub use error::{ChatError, ChatResult, FAILURE_KIND_KEY};
pub use normalize::normalize;
pub use ports::{BackendRequest, ServiceTransport};
pub use registry::{ServiceDescriptor, ServiceRegistry, StoreCatalog, build_file_request};
pub use session::{ChatSession, SessionConfig, SessionState};
