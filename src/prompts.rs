//! Prompt sync: sanitizes per-field prompt strings from the seed schema and
//! pushes them to the backend before the form opens.

use crate::catalog::FieldSeed;
use crate::defaults;
use crate::error::{Result, VdraftError};
use serde::Serialize;
use std::collections::BTreeMap;
use std::time::Duration;

/// Sanitize a prompt string before sending it to the backend.
///
/// Strips double quotes, single quotes, and backticks, then escapes
/// newlines so the prompt survives being written into an env-style store.
pub fn sanitize_prompt(raw: &str) -> String {
    raw.chars()
        .filter(|c| !matches!(c, '"' | '\'' | '`'))
        .collect::<String>()
        .replace('\n', "\\n")
}

/// Collect the prompts carried by a seed schema, keyed by field name,
/// sanitized. Fields without prompts are skipped.
pub fn collect_prompts(fields: &[FieldSeed]) -> BTreeMap<String, String> {
    fields
        .iter()
        .filter_map(|field| {
            field
                .prompts
                .as_ref()
                .map(|prompt| (field.name.clone(), sanitize_prompt(prompt)))
        })
        .collect()
}

#[derive(Debug, Serialize)]
struct UpdatePromptRequest<'a> {
    prompts: &'a BTreeMap<String, String>,
}

/// HTTP client for the prompt sync service.
pub struct PromptSyncClient {
    client: reqwest::Client,
    endpoint: String,
}

impl PromptSyncClient {
    /// Create a prompt sync client for the given backend base URL.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| VdraftError::RequestSetup {
                message: format!("Failed to build HTTP client: {}", e),
            })?;

        Ok(Self {
            client,
            endpoint: format!(
                "{}{}",
                base_url.trim_end_matches('/'),
                defaults::UPDATE_PROMPT_PATH
            ),
        })
    }

    /// Push sanitized prompts to the backend.
    ///
    /// A failure here blocks opening the form — drafting against stale
    /// prompts produces silently wrong transcriptions, so the error is
    /// surfaced instead of proceeding.
    pub async fn push(&self, prompts: &BTreeMap<String, String>) -> Result<()> {
        if prompts.is_empty() {
            log::warn!("no prompts found in the selected document, skipping sync");
            return Ok(());
        }

        log::debug!("syncing {} prompts to {}", prompts.len(), self.endpoint);

        let response = self
            .client
            .post(&self.endpoint)
            .json(&UpdatePromptRequest { prompts })
            .send()
            .await
            .map_err(|e| {
                if e.is_builder() {
                    VdraftError::RequestSetup {
                        message: e.to_string(),
                    }
                } else {
                    VdraftError::Network {
                        message: e.to_string(),
                    }
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(VdraftError::Service {
                message: format!("prompt sync failed with status {}", status),
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seed(name: &str, prompts: Option<&str>) -> FieldSeed {
        serde_json::from_str(&format!(
            r#"{{"NameOfField": "{}", "ExampleContent": ""{}}}"#,
            name,
            prompts
                .map(|p| format!(r#", "prompts": "{}""#, p))
                .unwrap_or_default()
        ))
        .unwrap()
    }

    #[test]
    fn test_sanitize_strips_quote_characters() {
        assert_eq!(
            sanitize_prompt(r#"Write "formally", don't use `slang`"#),
            "Write formally, dont use slang"
        );
    }

    #[test]
    fn test_sanitize_escapes_newlines() {
        assert_eq!(sanitize_prompt("line one\nline two"), "line one\\nline two");
    }

    #[test]
    fn test_sanitize_plain_text_unchanged() {
        assert_eq!(sanitize_prompt("plain prompt"), "plain prompt");
    }

    #[test]
    fn test_sanitize_empty() {
        assert_eq!(sanitize_prompt(""), "");
    }

    #[test]
    fn test_collect_prompts_skips_fields_without_prompts() {
        let fields = vec![
            seed("Intro", Some("Write an intro")),
            seed("Body", None),
            seed("Closing", Some("Close politely")),
        ];

        let prompts = collect_prompts(&fields);

        assert_eq!(prompts.len(), 2);
        assert_eq!(prompts["Intro"], "Write an intro");
        assert_eq!(prompts["Closing"], "Close politely");
        assert!(!prompts.contains_key("Body"));
    }

    #[test]
    fn test_collect_prompts_sanitizes() {
        let mut field = seed("Intro", None);
        field.prompts = Some("say \"hello\"\nthen stop".to_string());

        let prompts = collect_prompts(&[field]);

        assert_eq!(prompts["Intro"], "say hello\\nthen stop");
    }

    #[test]
    fn test_collect_prompts_empty_schema() {
        assert!(collect_prompts(&[]).is_empty());
    }

    #[test]
    fn test_request_body_shape() {
        let mut prompts = BTreeMap::new();
        prompts.insert("INTRO".to_string(), "p1".to_string());

        let body = serde_json::to_value(UpdatePromptRequest { prompts: &prompts }).unwrap();

        assert_eq!(body["prompts"]["INTRO"], "p1");
    }

    #[test]
    fn test_client_endpoint() {
        let client =
            PromptSyncClient::new("http://localhost:3000", Duration::from_secs(5)).unwrap();
        assert_eq!(
            client.endpoint,
            "http://localhost:3000/updateprompt/update-env"
        );
    }
}
