#![doc = include_str!("../README.md")]
#![deny(unsafe_code)]
#![deny(unused_crate_dependencies)]

mod config;
mod endpoint;
mod error;
mod http;

// Used by the integration tests only.
#[cfg(test)]
use axum as _;
#[cfg(test)]
use tokio as _;

pub use config::{ClientConfig, DEFAULT_API_BASE};
pub use error::ClientError;
pub use http::ReqwestTransport;
