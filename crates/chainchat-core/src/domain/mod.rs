//! Domain types, independent of any transport or rendering concern.

pub mod chat;
pub mod document;
pub mod service;

pub use chat::{ChatMessage, MessageRole, Metadata, NormalizedResponse};
pub use document::{DocumentEntry, UploadedFile};
pub use service::{HttpMethod, ServiceId};
