//! GraphQL wire format
//!
//! Records travel with camelCase keys and RFC 3339 timestamps. `position` is
//! sent as a JSON-encoded string; on receipt it is accepted either encoded
//! or as a plain object.

use crate::error::{Result, StoreError};
use chrono::{DateTime, Utc};
use doc_annotator_core::{
    Annotation, AnnotationId, AnnotationInput, AnnotationKind, AnnotationPatch, DocumentId,
    Position,
};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

pub const LIST_QUERY: &str = r#"
  query GetAnnotations($documentId: ID!) {
    document(id: $documentId) {
      id
      annotations {
        id
        documentId
        userId
        type
        pageNumber
        position
        content
        color
        createdAt
        updatedAt
      }
    }
  }
"#;

pub const CREATE_MUTATION: &str = r#"
  mutation CreateAnnotation($input: AnnotationInput!) {
    createAnnotation(input: $input) {
      id
      documentId
      userId
      type
      pageNumber
      position
      content
      color
      createdAt
      updatedAt
    }
  }
"#;

pub const UPDATE_MUTATION: &str = r#"
  mutation UpdateAnnotation($id: ID!, $input: AnnotationUpdateInput!) {
    updateAnnotation(id: $id, input: $input) {
      id
      content
      position
      color
      updatedAt
    }
  }
"#;

pub const DELETE_MUTATION: &str = r#"
  mutation DeleteAnnotation($id: ID!) {
    deleteAnnotation(id: $id)
  }
"#;

mod encoded_position {
    use doc_annotator_core::Position;
    use serde::{de, ser, Deserialize, Deserializer, Serializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    pub(super) enum Raw {
        Encoded(String),
        Structured(Position),
    }

    impl Raw {
        pub(super) fn decode<E: de::Error>(self) -> Result<Position, E> {
            match self {
                Raw::Structured(position) => Ok(position),
                Raw::Encoded(text) => serde_json::from_str(&text)
                    .map_err(|e| E::custom(format!("malformed position {text:?}: {e}"))),
            }
        }
    }

    pub fn serialize<S: Serializer>(position: &Position, serializer: S) -> Result<S::Ok, S::Error> {
        let encoded = serde_json::to_string(position).map_err(ser::Error::custom)?;
        serializer.serialize_str(&encoded)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Position, D::Error> {
        Raw::deserialize(deserializer)?.decode()
    }

    pub mod option {
        use super::Raw;
        use doc_annotator_core::Position;
        use serde::{Deserialize, Deserializer, Serializer};

        pub fn serialize<S: Serializer>(
            position: &Option<Position>,
            serializer: S,
        ) -> Result<S::Ok, S::Error> {
            match position {
                Some(position) => super::serialize(position, serializer),
                None => serializer.serialize_none(),
            }
        }

        pub fn deserialize<'de, D: Deserializer<'de>>(
            deserializer: D,
        ) -> Result<Option<Position>, D::Error> {
            Option::<Raw>::deserialize(deserializer)?
                .map(|raw| raw.decode())
                .transpose()
        }
    }
}

/// Annotation as it arrives from the service
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireAnnotation {
    id: AnnotationId,
    document_id: DocumentId,
    #[serde(default)]
    user_id: Option<String>,
    #[serde(rename = "type")]
    kind: AnnotationKind,
    page_number: u32,
    #[serde(with = "encoded_position")]
    position: Position,
    #[serde(default)]
    content: Option<String>,
    #[serde(default)]
    color: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<WireAnnotation> for Annotation {
    fn from(wire: WireAnnotation) -> Self {
        Annotation {
            id: wire.id,
            document_id: wire.document_id,
            user_id: wire.user_id.unwrap_or_default(),
            kind: wire.kind,
            page_number: wire.page_number,
            position: wire.position,
            content: wire.content,
            color: wire.color.unwrap_or_default(),
            created_at: wire.created_at,
            updated_at: wire.updated_at,
        }
    }
}

/// Create payload with the position encoded
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WireInput {
    document_id: DocumentId,
    #[serde(rename = "type")]
    kind: AnnotationKind,
    page_number: u32,
    #[serde(with = "encoded_position")]
    position: Position,
    #[serde(skip_serializing_if = "Option::is_none")]
    content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    color: Option<String>,
}

impl From<&AnnotationInput> for WireInput {
    fn from(input: &AnnotationInput) -> Self {
        Self {
            document_id: input.document_id.clone(),
            kind: input.kind,
            page_number: input.page_number,
            position: input.position,
            content: input.content.clone(),
            color: input.color.clone(),
        }
    }
}

/// Update payload; `updatedAt` is assigned by the service and never sent
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WirePatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    content: Option<String>,
    #[serde(
        with = "encoded_position::option",
        skip_serializing_if = "Option::is_none"
    )]
    position: Option<Position>,
    #[serde(skip_serializing_if = "Option::is_none")]
    color: Option<String>,
}

impl From<&AnnotationPatch> for WirePatch {
    fn from(patch: &AnnotationPatch) -> Self {
        Self {
            content: patch.content.clone(),
            position: patch.position,
            color: patch.color.clone(),
        }
    }
}

/// Fields returned by `updateAnnotation`
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireUpdated {
    #[serde(default)]
    content: Option<String>,
    #[serde(default, with = "encoded_position::option")]
    position: Option<Position>,
    #[serde(default)]
    color: Option<String>,
    #[serde(default)]
    updated_at: Option<DateTime<Utc>>,
}

impl From<WireUpdated> for AnnotationPatch {
    fn from(wire: WireUpdated) -> Self {
        AnnotationPatch {
            content: wire.content,
            position: wire.position,
            color: wire.color,
            updated_at: wire.updated_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct Request<'a, V> {
    pub query: &'a str,
    pub variables: V,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListVariables {
    pub document_id: DocumentId,
}

#[derive(Debug, Clone, Serialize)]
pub struct CreateVariables {
    pub input: WireInput,
}

#[derive(Debug, Clone, Serialize)]
pub struct UpdateVariables {
    pub id: AnnotationId,
    pub input: WirePatch,
}

#[derive(Debug, Clone, Serialize)]
pub struct DeleteVariables {
    pub id: AnnotationId,
}

#[derive(Debug, Deserialize)]
pub struct ListData {
    pub document: Option<DocumentAnnotations>,
}

#[derive(Debug, Deserialize)]
pub struct DocumentAnnotations {
    #[serde(default)]
    pub annotations: Vec<WireAnnotation>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateData {
    pub create_annotation: WireAnnotation,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateData {
    pub update_annotation: WireUpdated,
}

#[derive(Debug, Deserialize)]
struct Envelope<T> {
    data: Option<T>,
    #[serde(default)]
    errors: Vec<ErrorItem>,
}

#[derive(Debug, Deserialize)]
struct ErrorItem {
    #[serde(default)]
    message: Option<String>,
}

/// Decode a GraphQL response body into its `data` member
///
/// The first entry of `errors`, if any, wins over `data`.
pub fn decode_response<T: DeserializeOwned>(body: &str) -> Result<T> {
    let envelope: Envelope<T> = serde_json::from_str(body)
        .map_err(|e| StoreError::Protocol(format!("invalid response: {e}")))?;

    if let Some(first) = envelope.errors.into_iter().next() {
        let message = first.message.unwrap_or_else(|| "GraphQL error".to_string());
        return Err(StoreError::Protocol(message));
    }

    envelope
        .data
        .ok_or_else(|| StoreError::Protocol("response carries no data".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use doc_annotator_core::Rect;
    use serde_json::json;

    fn record_json(position: serde_json::Value) -> serde_json::Value {
        json!({
            "id": "a1",
            "documentId": "doc-1",
            "userId": "u1",
            "type": "HIGHLIGHT",
            "pageNumber": 2,
            "position": position,
            "content": null,
            "color": "#FFEB3B",
            "createdAt": "2024-03-01T10:00:00Z",
            "updatedAt": "2024-03-01T10:00:00Z"
        })
    }

    #[test]
    fn test_position_accepted_encoded() {
        let wire: WireAnnotation = serde_json::from_value(record_json(json!(
            "{\"x\":1,\"y\":2,\"width\":3,\"height\":4}"
        )))
        .unwrap();
        let annotation = Annotation::from(wire);
        assert_eq!(annotation.position, Rect::new(1.0, 2.0, 3.0, 4.0));
        assert_eq!(annotation.page_number, 2);
        assert_eq!(annotation.user_id, "u1");
    }

    #[test]
    fn test_position_accepted_structured() {
        let wire: WireAnnotation = serde_json::from_value(record_json(
            json!({"x": 1.5, "y": 2.0, "width": 3.0, "height": 4.0}),
        ))
        .unwrap();
        assert_eq!(Annotation::from(wire).position, Rect::new(1.5, 2.0, 3.0, 4.0));
    }

    #[test]
    fn test_malformed_position_is_rejected() {
        let result = serde_json::from_value::<WireAnnotation>(record_json(json!("{not json")));
        assert!(result.is_err());
    }

    #[test]
    fn test_input_encodes_position_as_string() {
        let input = AnnotationInput {
            document_id: DocumentId::new("doc-1"),
            kind: AnnotationKind::Redaction,
            page_number: 1,
            position: Rect::new(10.0, 20.0, 30.0, 40.0),
            content: None,
            color: Some("#000000".to_string()),
        };
        let value = serde_json::to_value(WireInput::from(&input)).unwrap();
        assert_eq!(value["type"], "REDACTION");
        assert_eq!(value["documentId"], "doc-1");
        assert!(value.get("content").is_none());

        let encoded = value["position"].as_str().expect("position is a string");
        let decoded: Rect = serde_json::from_str(encoded).unwrap();
        assert_eq!(decoded, input.position);
    }

    #[test]
    fn test_patch_sends_only_present_fields() {
        let value = serde_json::to_value(WirePatch::from(&AnnotationPatch::content("hi"))).unwrap();
        assert_eq!(value, json!({"content": "hi"}));
    }

    #[test]
    fn test_update_response_to_patch() {
        let body = json!({
            "data": {
                "updateAnnotation": {
                    "id": "a1",
                    "content": "edited",
                    "position": "{\"x\":0,\"y\":0,\"width\":30,\"height\":30}",
                    "color": "#4CAF50",
                    "updatedAt": "2024-03-02T09:30:00Z"
                }
            }
        })
        .to_string();
        let data: UpdateData = decode_response(&body).unwrap();
        let patch = AnnotationPatch::from(data.update_annotation);
        assert_eq!(patch.content.as_deref(), Some("edited"));
        assert_eq!(patch.position, Some(Rect::new(0.0, 0.0, 30.0, 30.0)));
        assert!(patch.updated_at.is_some());
    }

    #[test]
    fn test_graphql_error_becomes_protocol_error() {
        let body = r#"{"data":null,"errors":[{"message":"Document not found"},{"message":"second"}]}"#;
        let err = decode_response::<ListData>(body).unwrap_err();
        assert_eq!(err, StoreError::Protocol("Document not found".to_string()));
    }

    #[test]
    fn test_error_without_message() {
        let err = decode_response::<ListData>(r#"{"errors":[{}]}"#).unwrap_err();
        assert_eq!(err, StoreError::Protocol("GraphQL error".to_string()));
    }

    #[test]
    fn test_missing_document_is_empty_list() {
        let data: ListData = decode_response(r#"{"data":{"document":null}}"#).unwrap();
        assert!(data.document.is_none());
    }

    #[test]
    fn test_garbage_body_is_protocol_error() {
        assert!(matches!(
            decode_response::<ListData>("<html>"),
            Err(StoreError::Protocol(_))
        ));
    }
}
