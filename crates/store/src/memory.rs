//! In-process annotation backend
//!
//! Assigns ids `a1`, `a2`, ... in creation order. Failures can be queued to
//! exercise error paths, and an artificial latency lets requests overlap.

use crate::error::{Result, StoreError};
use crate::service::AnnotationService;
use async_trait::async_trait;
use chrono::Utc;
use doc_annotator_core::{Annotation, AnnotationId, AnnotationInput, AnnotationPatch, DocumentId};
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::time::Duration;

#[derive(Debug, Default)]
struct MemoryState {
    next_id: u64,
    records: Vec<Annotation>,
    failures: VecDeque<StoreError>,
}

#[derive(Debug, Default)]
pub struct MemoryService {
    state: Mutex<MemoryState>,
    latency: Option<Duration>,
}

impl MemoryService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from existing records; new ids continue after the highest `a<N>` seed
    pub fn with_annotations(annotations: Vec<Annotation>) -> Self {
        let service = Self::new();
        {
            let mut state = service.state.lock();
            state.next_id = annotations
                .iter()
                .filter_map(|a| sequence_number(&a.id))
                .max()
                .unwrap_or(0);
            state.records = annotations;
        }
        service
    }

    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// Make the next request fail with `error`
    pub fn fail_next(&self, error: StoreError) {
        self.state.lock().failures.push_back(error);
    }

    /// Everything currently stored, across documents
    pub fn records(&self) -> Vec<Annotation> {
        self.state.lock().records.clone()
    }

    async fn begin(&self) -> Result<()> {
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
        match self.state.lock().failures.pop_front() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }
}

fn sequence_number(id: &AnnotationId) -> Option<u64> {
    id.as_str().strip_prefix('a')?.parse().ok()
}

#[async_trait]
impl AnnotationService for MemoryService {
    async fn list(&self, document_id: &DocumentId) -> Result<Vec<Annotation>> {
        self.begin().await?;
        let state = self.state.lock();
        Ok(state
            .records
            .iter()
            .filter(|a| &a.document_id == document_id)
            .cloned()
            .collect())
    }

    async fn create(&self, input: &AnnotationInput) -> Result<Annotation> {
        self.begin().await?;
        let mut state = self.state.lock();
        let id = loop {
            state.next_id += 1;
            let candidate = AnnotationId::new(format!("a{}", state.next_id));
            if !state.records.iter().any(|a| a.id == candidate) {
                break candidate;
            }
        };
        let now = Utc::now();
        let annotation = Annotation {
            id,
            document_id: input.document_id.clone(),
            user_id: String::new(),
            kind: input.kind,
            page_number: input.page_number,
            position: input.position,
            content: input.content.clone(),
            color: input.color.clone().unwrap_or_default(),
            created_at: now,
            updated_at: now,
        };
        state.records.push(annotation.clone());
        Ok(annotation)
    }

    async fn update(&self, id: &AnnotationId, patch: &AnnotationPatch) -> Result<AnnotationPatch> {
        self.begin().await?;
        let mut state = self.state.lock();
        let record = state
            .records
            .iter_mut()
            .find(|a| &a.id == id)
            .ok_or_else(|| StoreError::NotFound(id.clone()))?;

        let mut applied = patch.clone();
        applied.updated_at = Some(Utc::now());
        record.apply(&applied);

        Ok(AnnotationPatch {
            content: record.content.clone(),
            position: Some(record.position),
            color: Some(record.color.clone()),
            updated_at: Some(record.updated_at),
        })
    }

    async fn delete(&self, id: &AnnotationId) -> Result<()> {
        self.begin().await?;
        let mut state = self.state.lock();
        let before = state.records.len();
        state.records.retain(|a| &a.id != id);
        if state.records.len() == before {
            return Err(StoreError::NotFound(id.clone()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use doc_annotator_core::{AnnotationKind, Rect};

    fn input(document: &str) -> AnnotationInput {
        AnnotationInput {
            document_id: DocumentId::new(document),
            kind: AnnotationKind::Highlight,
            page_number: 1,
            position: Rect::new(0.0, 0.0, 20.0, 20.0),
            content: None,
            color: Some("#FFEB3B".to_string()),
        }
    }

    #[tokio::test]
    async fn test_ids_are_sequential() {
        let service = MemoryService::new();
        let first = service.create(&input("d")).await.unwrap();
        let second = service.create(&input("d")).await.unwrap();
        assert_eq!(first.id.as_str(), "a1");
        assert_eq!(second.id.as_str(), "a2");
        assert_eq!(first.created_at, first.updated_at);
    }

    #[tokio::test]
    async fn test_list_filters_by_document() {
        let service = MemoryService::new();
        service.create(&input("d1")).await.unwrap();
        service.create(&input("d2")).await.unwrap();
        let listed = service.list(&DocumentId::new("d1")).await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].document_id.as_str(), "d1");
    }

    #[tokio::test]
    async fn test_update_echoes_merged_fields() {
        let service = MemoryService::new();
        let created = service.create(&input("d")).await.unwrap();
        let echoed = service
            .update(&created.id, &AnnotationPatch::content("text"))
            .await
            .unwrap();
        assert_eq!(echoed.content.as_deref(), Some("text"));
        assert_eq!(echoed.color.as_deref(), Some("#FFEB3B"));
        assert!(echoed.updated_at.unwrap() >= created.updated_at);
    }

    #[tokio::test]
    async fn test_unknown_id_is_not_found() {
        let service = MemoryService::new();
        let missing = AnnotationId::new("a42");
        assert_eq!(
            service.delete(&missing).await,
            Err(StoreError::NotFound(missing.clone()))
        );
        assert!(matches!(
            service.update(&missing, &AnnotationPatch::content("x")).await,
            Err(StoreError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_queued_failure_applies_once() {
        let service = MemoryService::new();
        service.fail_next(StoreError::Network("offline".to_string()));
        assert!(service.create(&input("d")).await.is_err());
        assert!(service.records().is_empty());
        assert!(service.create(&input("d")).await.is_ok());
    }

    #[tokio::test]
    async fn test_seeded_ids_continue() {
        let seed = MemoryService::new();
        let existing = seed.create(&input("d")).await.unwrap();
        let service = MemoryService::with_annotations(vec![existing]);
        assert_eq!(service.create(&input("d")).await.unwrap().id.as_str(), "a2");
    }

    #[tokio::test]
    async fn test_seeded_ids_are_never_reused() {
        let seed = MemoryService::new();
        let mut gapped = seed.create(&input("d")).await.unwrap();
        gapped.id = AnnotationId::new("a2");
        let mut custom = gapped.clone();
        custom.id = AnnotationId::new("note-7");

        let service = MemoryService::with_annotations(vec![gapped, custom]);
        let created = service.create(&input("d")).await.unwrap();
        assert_eq!(created.id.as_str(), "a3");

        let ids: Vec<_> = service.records().into_iter().map(|a| a.id).collect();
        for (i, id) in ids.iter().enumerate() {
            assert!(!ids[i + 1..].contains(id), "duplicate id {id}");
        }
    }
}
