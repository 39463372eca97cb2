//! GraphQL-over-HTTP annotation service
//!
//! Each operation is a single POST of `{query, variables}` to the configured
//! endpoint. `ureq` is blocking, so requests run on tokio's blocking pool.

use crate::config::StoreConfig;
use crate::error::{Result, StoreError};
use crate::service::AnnotationService;
use crate::wire::{
    self, CreateData, CreateVariables, DeleteVariables, ListData, ListVariables, Request,
    UpdateData, UpdateVariables, WireInput, WirePatch,
};
use async_trait::async_trait;
use doc_annotator_core::{Annotation, AnnotationId, AnnotationInput, AnnotationPatch, DocumentId};
use serde::de::DeserializeOwned;
use serde::Serialize;

pub struct GraphqlService {
    agent: ureq::Agent,
    endpoint: String,
}

impl GraphqlService {
    pub fn new(config: &StoreConfig) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout(config.timeout())
            .user_agent("doc-annotator")
            .build();
        Self {
            agent,
            endpoint: config.endpoint.clone(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    async fn execute<V, T>(
        &self,
        operation: &'static str,
        query: &'static str,
        variables: V,
    ) -> Result<T>
    where
        V: Serialize + Send + 'static,
        T: DeserializeOwned + Send,
    {
        let agent = self.agent.clone();
        let endpoint = self.endpoint.clone();
        tracing::debug!(operation, endpoint = %endpoint, "graphql request");

        let body = tokio::task::spawn_blocking(move || {
            post(&agent, &endpoint, &Request { query, variables })
        })
        .await
        .map_err(|e| StoreError::Network(format!("request task failed: {e}")))??;

        wire::decode_response(&body)
    }
}

fn post<V: Serialize>(
    agent: &ureq::Agent,
    endpoint: &str,
    request: &Request<'_, V>,
) -> Result<String> {
    let response = agent
        .post(endpoint)
        .set("Content-Type", "application/json")
        .send_json(request)
        .map_err(|e| match e {
            ureq::Error::Status(status, _) => {
                StoreError::Protocol(format!("HTTP error! status: {status}"))
            }
            ureq::Error::Transport(transport) => StoreError::Network(transport.to_string()),
        })?;

    response
        .into_string()
        .map_err(|e| StoreError::Protocol(format!("unreadable response body: {e}")))
}

#[async_trait]
impl AnnotationService for GraphqlService {
    async fn list(&self, document_id: &DocumentId) -> Result<Vec<Annotation>> {
        let variables = ListVariables {
            document_id: document_id.clone(),
        };
        let data: ListData = self.execute("GetAnnotations", wire::LIST_QUERY, variables).await?;
        Ok(data
            .document
            .map(|document| document.annotations.into_iter().map(Annotation::from).collect())
            .unwrap_or_default())
    }

    async fn create(&self, input: &AnnotationInput) -> Result<Annotation> {
        let variables = CreateVariables {
            input: WireInput::from(input),
        };
        let data: CreateData = self
            .execute("CreateAnnotation", wire::CREATE_MUTATION, variables)
            .await?;
        Ok(data.create_annotation.into())
    }

    async fn update(&self, id: &AnnotationId, patch: &AnnotationPatch) -> Result<AnnotationPatch> {
        let variables = UpdateVariables {
            id: id.clone(),
            input: WirePatch::from(patch),
        };
        let data: UpdateData = self
            .execute("UpdateAnnotation", wire::UPDATE_MUTATION, variables)
            .await?;
        Ok(data.update_annotation.into())
    }

    async fn delete(&self, id: &AnnotationId) -> Result<()> {
        let variables = DeleteVariables { id: id.clone() };
        let _: serde_json::Value = self
            .execute("DeleteAnnotation", wire::DELETE_MUTATION, variables)
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_unreachable_endpoint_is_network_error() {
        // Port 9 (discard) on localhost is closed on test machines.
        let config = StoreConfig::default().with_endpoint("http://127.0.0.1:9/graphql");
        let service = GraphqlService::new(&config);
        let result = service.list(&DocumentId::new("doc-1")).await;
        assert!(matches!(result, Err(StoreError::Network(_))), "{result:?}");
    }
}
