//! Document catalog client: lists draftable document topics and fetches the
//! field schema that seeds the drafting form.

use crate::defaults;
use crate::error::{Result, VdraftError};
use serde::Deserialize;
use std::time::Duration;

/// One entry of the catalog listing (`GET /api/documents`).
#[derive(Debug, Clone, Deserialize)]
pub struct DocumentSummary {
    #[serde(rename = "fieldName", default)]
    pub field_name: Option<String>,
}

impl DocumentSummary {
    /// Display label for a listing row; entries with no name fall back to a
    /// positional label rather than disappearing.
    pub fn label(&self, index: usize) -> String {
        match &self.field_name {
            Some(name) if !name.is_empty() => name.clone(),
            _ => format!("Field {}", index + 1),
        }
    }
}

/// One field of a document's seed schema.
#[derive(Debug, Clone, Deserialize)]
pub struct FieldSeed {
    #[serde(rename = "NameOfField")]
    pub name: String,
    #[serde(rename = "ExampleContent", default)]
    pub content: String,
    #[serde(default)]
    pub prompts: Option<String>,
}

/// A document's schema (`GET /api/documents/fieldName/{name}`).
///
/// `field_name` is the document title; `fields` seeds the form's field
/// collection. Either may be absent in a malformed response; the form
/// constructor turns that into the "no form data" state.
#[derive(Debug, Clone, Deserialize)]
pub struct DocumentSchema {
    #[serde(rename = "fieldName", default)]
    pub field_name: Option<String>,
    #[serde(rename = "field1", default)]
    pub fields: Option<Vec<FieldSeed>>,
}

/// HTTP client for the document catalog service.
pub struct CatalogClient {
    client: reqwest::Client,
    base_url: String,
}

impl CatalogClient {
    /// Create a catalog client for the given backend base URL.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| VdraftError::RequestSetup {
                message: format!("Failed to build HTTP client: {}", e),
            })?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// List all draftable document topics.
    pub async fn list_documents(&self) -> Result<Vec<DocumentSummary>> {
        let url = format!("{}{}", self.base_url, defaults::DOCUMENTS_PATH);
        log::debug!("fetching document list from {}", url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(map_send_error)?;

        let response = check_status(response).await?;

        response
            .json::<Vec<DocumentSummary>>()
            .await
            .map_err(|e| VdraftError::DataShape {
                message: format!("Failed to parse document list: {}", e),
            })
    }

    /// Fetch the seed schema for one document topic.
    pub async fn fetch_document(&self, name: &str) -> Result<DocumentSchema> {
        let url = format!(
            "{}{}/fieldName/{}",
            self.base_url,
            defaults::DOCUMENTS_PATH,
            name
        );
        log::debug!("fetching document schema from {}", url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(map_send_error)?;

        let response = check_status(response).await?;

        response
            .json::<DocumentSchema>()
            .await
            .map_err(|e| VdraftError::DataShape {
                message: format!("Failed to parse document schema: {}", e),
            })
    }
}

/// Classify a reqwest send failure as "no response received".
fn map_send_error(e: reqwest::Error) -> VdraftError {
    if e.is_builder() {
        VdraftError::RequestSetup {
            message: e.to_string(),
        }
    } else {
        VdraftError::Network {
            message: e.to_string(),
        }
    }
}

/// Turn a non-success status into a `Service` error, preferring the
/// structured `{ "error": ... }` body when the server sent one.
async fn check_status(response: reqwest::Response) -> Result<reqwest::Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    #[derive(Deserialize)]
    struct ErrorBody {
        error: Option<String>,
    }

    let message = match response.json::<ErrorBody>().await {
        Ok(ErrorBody { error: Some(msg) }) => msg,
        _ => format!("request failed with status {}", status),
    };

    Err(VdraftError::Service { message })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_summary_label_uses_name() {
        let summary: DocumentSummary =
            serde_json::from_str(r#"{"fieldName": "Affidavit"}"#).unwrap();
        assert_eq!(summary.label(0), "Affidavit");
    }

    #[test]
    fn test_document_summary_label_falls_back_to_position() {
        let missing: DocumentSummary = serde_json::from_str("{}").unwrap();
        assert_eq!(missing.label(2), "Field 3");

        let empty: DocumentSummary = serde_json::from_str(r#"{"fieldName": ""}"#).unwrap();
        assert_eq!(empty.label(0), "Field 1");
    }

    #[test]
    fn test_field_seed_deserializes_service_names() {
        let seed: FieldSeed = serde_json::from_str(
            r#"{"NameOfField": "Intro", "ExampleContent": "Example text", "prompts": "Write an intro"}"#,
        )
        .unwrap();

        assert_eq!(seed.name, "Intro");
        assert_eq!(seed.content, "Example text");
        assert_eq!(seed.prompts.as_deref(), Some("Write an intro"));
    }

    #[test]
    fn test_field_seed_content_defaults_to_empty() {
        let seed: FieldSeed = serde_json::from_str(r#"{"NameOfField": "Intro"}"#).unwrap();
        assert_eq!(seed.content, "");
        assert_eq!(seed.prompts, None);
    }

    #[test]
    fn test_document_schema_full() {
        let schema: DocumentSchema = serde_json::from_str(
            r#"{
                "fieldName": "Affidavit",
                "field1": [
                    {"NameOfField": "Intro", "ExampleContent": ""},
                    {"NameOfField": "Body", "ExampleContent": "Some body"}
                ]
            }"#,
        )
        .unwrap();

        assert_eq!(schema.field_name.as_deref(), Some("Affidavit"));
        let fields = schema.fields.unwrap();
        assert_eq!(fields.len(), 2);
        assert_eq!(fields[0].name, "Intro");
        assert_eq!(fields[1].content, "Some body");
    }

    #[test]
    fn test_document_schema_tolerates_missing_parts() {
        // Malformed payloads deserialize; the form constructor decides they
        // are the "no form data" state.
        let schema: DocumentSchema = serde_json::from_str("{}").unwrap();
        assert!(schema.field_name.is_none());
        assert!(schema.fields.is_none());
    }

    #[test]
    fn test_client_strips_trailing_slash() {
        let client =
            CatalogClient::new("http://localhost:3000/", Duration::from_secs(5)).unwrap();
        assert_eq!(client.base_url, "http://localhost:3000");
    }
}
