//! Annotation store client
//!
//! Keeps the in-memory list of a document's annotations in sync with a
//! remote [`AnnotationService`]. The cache changes only after the service
//! confirms a request.

pub mod config;
pub mod error;
pub mod graphql;
pub mod memory;
pub mod notify;
pub mod service;
pub mod store;
pub mod wire;

pub use config::StoreConfig;
pub use error::{Result, StoreError};
pub use graphql::GraphqlService;
pub use memory::MemoryService;
pub use notify::{LogNotifier, Notifier};
pub use service::AnnotationService;
pub use store::AnnotationStore;
