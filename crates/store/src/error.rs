use doc_annotator_core::AnnotationId;

/// Failures reported by an annotation service
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum StoreError {
    /// Transport failure: connect, DNS, timeout
    #[error("network error: {0}")]
    Network(String),
    /// The service answered, but not with something usable
    #[error("protocol error: {0}")]
    Protocol(String),
    #[error("annotation {0} not found")]
    NotFound(AnnotationId),
}

pub type Result<T> = std::result::Result<T, StoreError>;
