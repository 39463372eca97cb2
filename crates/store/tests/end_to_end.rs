use doc_annotator_core::{AnnotationKind, DocumentId, LayerConfig, Rect, ScreenPoint};
use doc_annotator_store::{AnnotationStore, MemoryService, StoreError};
use doc_annotator_ui::{AnnotationLayer, Effect, LayerEvent, LayerProps, Primitive, ToolSelection};

struct Session {
    layer: AnnotationLayer,
    store: AnnotationStore<MemoryService>,
}

impl Session {
    fn new(tool: Option<AnnotationKind>) -> Self {
        let document_id = DocumentId::new("doc-1");
        let mut props = LayerProps::new(document_id.clone(), 612.0, 792.0);
        props.tool = ToolSelection::new(tool, "#FFEB3B");
        Self {
            layer: AnnotationLayer::new(props, LayerConfig::default()),
            store: AnnotationStore::new(MemoryService::new(), document_id),
        }
    }

    /// Feed an event and carry out the store requests it produced
    async fn send(&mut self, event: LayerEvent) -> Vec<Result<(), StoreError>> {
        let effects = self.layer.handle(&event);
        let mut outcomes = Vec::new();
        for effect in effects {
            let outcome = match effect {
                Effect::Create { input } => self.store.create(input).await.map(|_| ()),
                Effect::Update { id, patch } => self.store.update(&id, patch).await.map(|_| ()),
                Effect::Delete { id } => self.store.delete(&id).await,
                _ => continue,
            };
            outcomes.push(outcome);
        }
        self.layer.set_annotations(self.store.annotations());
        outcomes
    }

    async fn drag(&mut self, from: (f32, f32), to: (f32, f32)) -> Vec<Result<(), StoreError>> {
        self.send(LayerEvent::PointerDown(ScreenPoint::new(from.0, from.1)))
            .await;
        self.send(LayerEvent::PointerMove(ScreenPoint::new(to.0, to.1)))
            .await;
        self.send(LayerEvent::PointerUp(ScreenPoint::new(to.0, to.1)))
            .await
    }
}

#[tokio::test]
async fn highlight_drag_persists_and_paints() {
    let mut session = Session::new(Some(AnnotationKind::Highlight));
    let outcomes = session.drag((100.0, 100.0), (200.0, 150.0)).await;
    assert_eq!(outcomes, vec![Ok(())]);

    let stored = session.store.annotations();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].kind, AnnotationKind::Highlight);
    assert_eq!(stored[0].position, Rect::new(100.0, 100.0, 100.0, 50.0));
    assert_eq!(stored[0].color, "#FFEB3B");

    let fills = session
        .layer
        .scene()
        .primitives()
        .iter()
        .filter(|p| matches!(p, Primitive::FillRect { .. }))
        .count();
    assert_eq!(fills, 1);
}

#[tokio::test]
async fn tiny_drag_never_reaches_the_store() {
    let mut session = Session::new(Some(AnnotationKind::Highlight));
    let outcomes = session.drag((10.0, 10.0), (15.0, 15.0)).await;
    assert!(outcomes.is_empty());
    assert!(session.store.annotations().is_empty());
}

#[tokio::test]
async fn redaction_is_stored_black() {
    let mut session = Session::new(Some(AnnotationKind::Redaction));
    session
        .layer
        .set_tool(ToolSelection::new(Some(AnnotationKind::Redaction), "#2196F3"));
    session.drag((10.0, 10.0), (80.0, 80.0)).await;
    assert_eq!(session.store.annotations()[0].color, "#000000");
}

#[tokio::test]
async fn sticky_note_create_then_edit() {
    let mut session = Session::new(Some(AnnotationKind::StickyNote));
    session
        .send(LayerEvent::PointerDown(ScreenPoint::new(50.0, 50.0)))
        .await;
    session.send(LayerEvent::NoteInput("note text".to_string())).await;
    session.send(LayerEvent::NoteSave).await;

    let note = session.store.annotations().remove(0);
    assert_eq!(note.content.as_deref(), Some("note text"));
    assert_eq!(note.position, Rect::new(50.0, 50.0, 30.0, 30.0));

    // Clicking the icon reopens it for editing.
    session
        .layer
        .set_tool(ToolSelection::select_mode());
    session
        .send(LayerEvent::PointerDown(ScreenPoint::new(60.0, 60.0)))
        .await;
    assert!(session.layer.note_dialog().is_some());
    session.send(LayerEvent::NoteInput("edited".to_string())).await;
    let outcomes = session.send(LayerEvent::NoteSave).await;
    assert_eq!(outcomes, vec![Ok(())]);

    let edited = session.store.get(&note.id).unwrap();
    assert_eq!(edited.content.as_deref(), Some("edited"));
    assert_eq!(edited.position, note.position);
}

#[tokio::test]
async fn select_and_delete() {
    let mut session = Session::new(Some(AnnotationKind::Highlight));
    session.drag((0.0, 0.0), (100.0, 100.0)).await;
    session.layer.set_tool(ToolSelection::select_mode());

    session
        .send(LayerEvent::PointerDown(ScreenPoint::new(50.0, 50.0)))
        .await;
    assert!(session.layer.delete_affordance_visible());

    let outcomes = session.send(LayerEvent::DeleteSelected).await;
    assert_eq!(outcomes, vec![Ok(())]);
    assert!(session.store.annotations().is_empty());
    assert_eq!(session.layer.selected(), None);
    assert_eq!(session.layer.scene().len(), 1);
}

#[tokio::test]
async fn failed_create_leaves_layer_unchanged() {
    let mut session = Session::new(Some(AnnotationKind::Highlight));
    session
        .store
        .service()
        .fail_next(StoreError::Network("connection refused".to_string()));

    let outcomes = session.drag((0.0, 0.0), (100.0, 100.0)).await;
    assert!(matches!(outcomes[..], [Err(StoreError::Network(_))]));
    assert!(session.layer.page_annotations().is_empty());
    assert!(session.store.last_error().is_some());
}
