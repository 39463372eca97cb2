use chrono::{TimeZone, Utc};
use doc_annotator_core::{Annotation, AnnotationId, AnnotationKind, DocumentId, Rect};

pub(crate) fn annotation(
    id: &str,
    kind: AnnotationKind,
    page_number: u32,
    position: Rect,
) -> Annotation {
    let t0 = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
    Annotation {
        id: AnnotationId::new(id),
        document_id: DocumentId::new("doc-1"),
        user_id: String::new(),
        kind,
        page_number,
        position,
        content: None,
        color: "#FFEB3B".to_string(),
        created_at: t0,
        updated_at: t0,
    }
}
