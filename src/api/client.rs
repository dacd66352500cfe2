//! Async client for the backend's path-based REST convention.
//!
//! Every resource shares the same endpoint layout under `/api/{type}/`:
//! schema discovery, filtered reads, update, create and delete, plus the
//! cross-type quick search and task submission endpoints. The client does
//! not retry and does not deduplicate; each call carries a connect and a
//! total timeout so a hung request cannot pin a view in a loading state
//! forever.

use reqwest::Client;
use serde_json::{json, Map, Value};
use std::time::Duration;

use crate::api::error::ApiError;
use crate::api::types::{
    CreateOutcome, FilterResponse, QuickResponse, SaveOutcome, TaskOutcome, TaskSubmission,
};
use crate::config::ApiConfig;
use crate::query::{Query, View};
use crate::schema::SchemaSet;

#[derive(Debug, Clone)]
pub struct ApiClient {
    http: Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(
        base_url: &str,
        connect_timeout: Duration,
        request_timeout: Duration,
    ) -> Result<Self, ApiError> {
        let base_url = base_url.trim_end_matches('/').to_string();
        if base_url.is_empty() || !base_url.starts_with("http") {
            return Err(ApiError::InvalidBaseUrl {
                url: base_url.clone(),
            });
        }

        let http = Client::builder()
            .connect_timeout(connect_timeout)
            .timeout(request_timeout)
            .build()
            .map_err(|source| ApiError::ClientBuild { source })?;

        Ok(Self { http, base_url })
    }

    pub fn from_config(config: &ApiConfig) -> Result<Self, ApiError> {
        Self::new(
            &config.base_url,
            Duration::from_secs(config.connect_timeout_seconds),
            Duration::from_secs(config.timeout_seconds),
        )
    }

    /// Fetch the schema definitions for an entity type.
    pub async fn schema(&self, type_name: &str) -> Result<SchemaSet, ApiError> {
        let path = format!("/api/{type_name}/schema");
        let body = self.post(&path, &json!({})).await?;
        let definitions = body
            .get("definitions")
            .and_then(Value::as_object)
            .ok_or_else(|| ApiError::Malformed {
                path: path.clone(),
                detail: "missing definitions".to_string(),
            })?;
        Ok(SchemaSet::from_definitions(definitions))
    }

    /// Fetch a page of records matching a query, shaped by a view.
    pub async fn filter(
        &self,
        type_name: &str,
        query: &Query,
        view: &View,
    ) -> Result<FilterResponse, ApiError> {
        let path = format!("/api/{type_name}/filter");
        let body = self
            .post(&path, &json!({ "query": query, "view": view }))
            .await?;
        serde_json::from_value(body).map_err(|err| ApiError::Malformed {
            path,
            detail: err.to_string(),
        })
    }

    /// Send staged edits for the records matching a query.
    pub async fn update(
        &self,
        type_name: &str,
        query: &Query,
        data: &Map<String, Value>,
    ) -> Result<SaveOutcome, ApiError> {
        let path = format!("/api/{type_name}/update");
        let body = self
            .post(&path, &json!({ "query": query, "data": data }))
            .await?;
        Ok(SaveOutcome::from_body(body))
    }

    /// Create a new record.
    pub async fn create(&self, type_name: &str, data: &Value) -> Result<CreateOutcome, ApiError> {
        let path = format!("/api/{type_name}/create");
        let body = self.post(&path, &json!({ "data": data })).await?;
        CreateOutcome::from_body(&body).ok_or_else(|| ApiError::Malformed {
            path,
            detail: "response carried neither id nor errors".to_string(),
        })
    }

    /// Delete the records matching a query.
    pub async fn delete(&self, type_name: &str, query: &Query) -> Result<(), ApiError> {
        let path = format!("/api/{type_name}/delete");
        self.post(&path, &json!({ "query": query })).await?;
        Ok(())
    }

    /// Cross-type text search returning grouped previews.
    pub async fn quick(&self, query: &str, types: &[String]) -> Result<QuickResponse, ApiError> {
        let path = "/api/quick";
        let url = format!("{}{}", self.base_url, path);

        let mut params: Vec<(&str, &str)> = vec![("query", query)];
        for type_name in types {
            params.push(("types", type_name));
        }

        let response = self
            .http
            .get(&url)
            .query(&params)
            .send()
            .await
            .map_err(|err| ApiError::from_reqwest(path, err))?;
        let body = Self::decode(path, response).await?;
        Ok(QuickResponse::from_body(&body))
    }

    /// Submit an extension action as a background task.
    pub async fn submit_task(&self, submission: &TaskSubmission) -> Result<TaskOutcome, ApiError> {
        let path = "/api/tasks";
        let body = self
            .post(path, &serde_json::to_value(submission).unwrap_or(Value::Null))
            .await?;
        TaskOutcome::from_body(&body).ok_or_else(|| ApiError::Malformed {
            path: path.to_string(),
            detail: "response carried neither message_id nor errors".to_string(),
        })
    }

    async fn post(&self, path: &str, payload: &Value) -> Result<Value, ApiError> {
        let url = format!("{}{}", self.base_url, path);
        let response = self
            .http
            .post(&url)
            .json(payload)
            .send()
            .await
            .map_err(|err| ApiError::from_reqwest(path, err))?;
        Self::decode(path, response).await
    }

    async fn decode(path: &str, response: reqwest::Response) -> Result<Value, ApiError> {
        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(ApiError::Status {
                path: path.to_string(),
                status: status.as_u16(),
                message: truncate(&message, 200),
            });
        }

        response.json().await.map_err(|source| ApiError::Decode {
            path: path.to_string(),
            source,
        })
    }
}

fn truncate(text: &str, max: usize) -> String {
    if text.len() <= max {
        text.to_string()
    } else {
        let cut = text
            .char_indices()
            .take_while(|(idx, _)| *idx < max)
            .last()
            .map(|(idx, ch)| idx + ch.len_utf8())
            .unwrap_or(0);
        format!("{}…", &text[..cut])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_empty_base_url() {
        let result = ApiClient::new("", Duration::from_secs(5), Duration::from_secs(30));
        assert!(matches!(result, Err(ApiError::InvalidBaseUrl { .. })));
    }

    #[test]
    fn strips_trailing_slash() {
        let client = ApiClient::new(
            "http://localhost:5000/",
            Duration::from_secs(5),
            Duration::from_secs(30),
        )
        .expect("client builds");
        assert_eq!(client.base_url, "http://localhost:5000");
    }

    #[test]
    fn truncate_respects_char_boundaries() {
        assert_eq!(truncate("short", 200), "short");
        let long = "é".repeat(300);
        let cut = truncate(&long, 10);
        assert!(cut.ends_with('…'));
    }
}
