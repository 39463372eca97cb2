//! Annotation service seam
//!
//! The store talks to its backend only through [`AnnotationService`]. Two
//! backends ship with the crate: [`GraphqlService`](crate::GraphqlService)
//! for a real server and [`MemoryService`](crate::MemoryService) for tests
//! and offline tooling.

use crate::error::Result;
use async_trait::async_trait;
use doc_annotator_core::{Annotation, AnnotationId, AnnotationInput, AnnotationPatch, DocumentId};
use std::sync::Arc;

/// Remote CRUD for annotations
#[async_trait]
pub trait AnnotationService: Send + Sync {
    /// All annotations of a document, in creation order
    async fn list(&self, document_id: &DocumentId) -> Result<Vec<Annotation>>;

    /// Persist a new annotation; the returned record carries the assigned
    /// `id` and timestamps
    async fn create(&self, input: &AnnotationInput) -> Result<Annotation>;

    /// Apply a partial update and return the fields the service echoes back
    async fn update(&self, id: &AnnotationId, patch: &AnnotationPatch) -> Result<AnnotationPatch>;

    async fn delete(&self, id: &AnnotationId) -> Result<()>;
}

#[async_trait]
impl<S: AnnotationService + ?Sized> AnnotationService for Arc<S> {
    async fn list(&self, document_id: &DocumentId) -> Result<Vec<Annotation>> {
        (**self).list(document_id).await
    }

    async fn create(&self, input: &AnnotationInput) -> Result<Annotation> {
        (**self).create(input).await
    }

    async fn update(&self, id: &AnnotationId, patch: &AnnotationPatch) -> Result<AnnotationPatch> {
        (**self).update(id, patch).await
    }

    async fn delete(&self, id: &AnnotationId) -> Result<()> {
        (**self).delete(id).await
    }
}
