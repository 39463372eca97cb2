//! Cached view of one document's annotations
//!
//! Wraps an [`AnnotationService`] and keeps the last confirmed list in memory
//! for the overlay to read.

use crate::error::{Result, StoreError};
use crate::notify::{LogNotifier, Notifier};
use crate::service::AnnotationService;
use doc_annotator_core::{
    Annotation, AnnotationCollection, AnnotationId, AnnotationInput, AnnotationPatch,
    AnnotationStats, DocumentId,
};
use parking_lot::RwLock;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

type ErrorHandler = Arc<dyn Fn(&StoreError) + Send + Sync>;

/// Counts a request as in flight until dropped
struct InFlight<'a>(&'a AtomicUsize);

impl<'a> InFlight<'a> {
    fn start(counter: &'a AtomicUsize) -> Self {
        counter.fetch_add(1, Ordering::SeqCst);
        Self(counter)
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

/// Client-side cache of one document's annotations
///
/// All methods take `&self`; requests may overlap. Locks are held only
/// while touching the cache, never across a request.
pub struct AnnotationStore<S> {
    service: S,
    document_id: DocumentId,
    cache: RwLock<AnnotationCollection>,
    in_flight: AtomicUsize,
    last_error: RwLock<Option<StoreError>>,
    notifier: Box<dyn Notifier>,
    on_error: Option<ErrorHandler>,
}

impl<S: AnnotationService> AnnotationStore<S> {
    pub fn new(service: S, document_id: DocumentId) -> Self {
        Self {
            service,
            document_id,
            cache: RwLock::new(AnnotationCollection::new()),
            in_flight: AtomicUsize::new(0),
            last_error: RwLock::new(None),
            notifier: Box::new(LogNotifier),
            on_error: None,
        }
    }

    pub fn with_notifier(mut self, notifier: impl Notifier + 'static) -> Self {
        self.notifier = Box::new(notifier);
        self
    }

    /// Called with every failed request, before the error is returned
    pub fn on_error(mut self, handler: impl Fn(&StoreError) + Send + Sync + 'static) -> Self {
        self.on_error = Some(Arc::new(handler));
        self
    }

    pub fn document_id(&self) -> &DocumentId {
        &self.document_id
    }

    pub fn service(&self) -> &S {
        &self.service
    }

    /// Snapshot of the cached list, in order
    pub fn annotations(&self) -> Vec<Annotation> {
        self.cache.read().to_vec()
    }

    pub fn page(&self, page_number: u32) -> Vec<Annotation> {
        self.cache
            .read()
            .for_page(page_number)
            .into_iter()
            .cloned()
            .collect()
    }

    pub fn get(&self, id: &AnnotationId) -> Option<Annotation> {
        self.cache.read().get(id).cloned()
    }

    pub fn stats(&self) -> AnnotationStats {
        self.cache.read().stats()
    }

    pub fn is_loading(&self) -> bool {
        self.in_flight() > 0
    }

    /// Number of requests still waiting on the service
    pub fn in_flight(&self) -> usize {
        self.in_flight.load(Ordering::SeqCst)
    }

    /// Error of the most recent failed request; cleared when a request starts
    pub fn last_error(&self) -> Option<StoreError> {
        self.last_error.read().clone()
    }

    /// Reload the whole list from the service, replacing the cache
    pub async fn refresh(&self) -> Result<()> {
        let _guard = self.begin();
        match self.service.list(&self.document_id).await {
            Ok(annotations) => {
                tracing::debug!(
                    document = %self.document_id,
                    count = annotations.len(),
                    "annotations loaded"
                );
                self.cache.write().replace_all(annotations);
                Ok(())
            }
            Err(error) => Err(self.fail(error, "Failed to load annotations")),
        }
    }

    /// Persist a new annotation and append the service's record to the cache
    pub async fn create(&self, input: AnnotationInput) -> Result<Annotation> {
        let _guard = self.begin();
        match self.service.create(&input).await {
            Ok(annotation) => {
                tracing::info!(
                    id = %annotation.id,
                    kind = %annotation.kind,
                    page = annotation.page_number,
                    "annotation created"
                );
                self.cache.write().push(annotation.clone());
                self.notifier.success("Annotation created");
                Ok(annotation)
            }
            Err(error) => Err(self.fail(error, "Failed to create annotation")),
        }
    }

    /// Update an annotation and merge the echoed fields into the cache
    ///
    /// Returns the merged record, or `None` if it left the cache meanwhile.
    pub async fn update(
        &self,
        id: &AnnotationId,
        patch: AnnotationPatch,
    ) -> Result<Option<Annotation>> {
        let _guard = self.begin();
        match self.service.update(id, &patch).await {
            Ok(echoed) => {
                tracing::info!(%id, "annotation updated");
                let merged = self.cache.write().merge(id, &echoed);
                self.notifier.success("Annotation updated");
                Ok(merged)
            }
            Err(error) => Err(self.fail(error, "Failed to update annotation")),
        }
    }

    /// Delete an annotation; the cache entry goes only after confirmation
    pub async fn delete(&self, id: &AnnotationId) -> Result<()> {
        let _guard = self.begin();
        match self.service.delete(id).await {
            Ok(()) => {
                tracing::info!(%id, "annotation deleted");
                self.cache.write().remove(id);
                self.notifier.success("Annotation deleted");
                Ok(())
            }
            Err(error) => Err(self.fail(error, "Failed to delete annotation")),
        }
    }

    fn begin(&self) -> InFlight<'_> {
        *self.last_error.write() = None;
        InFlight::start(&self.in_flight)
    }

    fn fail(&self, error: StoreError, message: &str) -> StoreError {
        tracing::warn!(document = %self.document_id, %error, "{message}");
        *self.last_error.write() = Some(error.clone());
        if let Some(handler) = &self.on_error {
            handler(&error);
        }
        self.notifier.failure(message);
        error
    }
}
