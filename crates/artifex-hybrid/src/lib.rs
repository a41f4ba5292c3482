//! artifex-hybrid
//!
//! Fusion of the vector and lexical retrieval paths, and the service that
//! drives them: `search`, `similar`, and the write-side index sync.

pub mod fusion;
pub mod service;

pub use fusion::fuse;
pub use service::{synthetic_document, Retriever, RetrieverOptions};
