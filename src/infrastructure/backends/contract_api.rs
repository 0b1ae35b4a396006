#[cfg(test)]
#[path = "contract_api_test.rs"]
mod tests;

use std::time::Duration;

use async_trait::async_trait;
use reqwest::multipart;
use serde::Deserialize;
use serde::Serialize;

use crate::configuration::Config;
use crate::configuration::ConfigKey;
use crate::domain::models::Backend;
use crate::domain::models::ClientError;
use crate::domain::models::QueryRequest;
use crate::domain::models::QueryResult;
use crate::domain::models::SelectedFile;
use crate::domain::models::UploadResponse;
use crate::domain::models::WorkspaceId;

const NAMESPACE_HEADER: &str = "X-Namespace";

#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct ErrorResponse {
    #[serde(default)]
    detail: serde_json::Value,
}

#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct HealthResponse {
    status: String,
    #[serde(default)]
    mode: Option<String>,
}

fn mime_for(filename: &str) -> &'static str {
    if filename.to_lowercase().ends_with(".pdf") {
        return "application/pdf";
    }

    return "application/octet-stream";
}

/// Converts a non-success response into the most specific error available. A
/// `detail` field from the server wins over the bare status code.
async fn error_from_response(res: reqwest::Response) -> ClientError {
    let status = res.status().as_u16();
    let body = res.text().await.unwrap_or_default();

    if let Ok(err) = serde_json::from_str::<ErrorResponse>(&body) {
        match err.detail {
            serde_json::Value::String(detail) if !detail.is_empty() => {
                return ClientError::ServerReportedFailure(detail);
            }
            serde_json::Value::Null => (),
            serde_json::Value::String(_) => (),
            detail => {
                return ClientError::ServerReportedFailure(detail.to_string());
            }
        }
    }

    return ClientError::TransportFailure(format!("Request failed with status {status}"));
}

/// HTTP client for the contract intelligence API.
pub struct ContractApi {
    url: String,
    timeout: String,
    client: reqwest::Client,
}

impl Default for ContractApi {
    fn default() -> ContractApi {
        return ContractApi::new(
            &Config::get(ConfigKey::ApiURL),
            &Config::get(ConfigKey::HealthCheckTimeout),
        );
    }
}

impl ContractApi {
    pub fn new(url: &str, timeout: &str) -> ContractApi {
        return ContractApi {
            url: url.trim_end_matches('/').to_string(),
            timeout: timeout.to_string(),
            client: reqwest::Client::new(),
        };
    }
}

#[async_trait]
impl Backend for ContractApi {
    #[allow(clippy::implicit_return)]
    async fn health_check(&self) -> Result<(), ClientError> {
        let timeout = self.timeout.parse::<u64>().map_err(|_| {
            return ClientError::TransportFailure(format!(
                "Invalid health check timeout: {}",
                self.timeout
            ));
        })?;

        let res = self
            .client
            .get(format!("{url}/health", url = self.url))
            .timeout(Duration::from_millis(timeout))
            .send()
            .await;

        if let Err(err) = res {
            tracing::error!(error = ?err, url = self.url, "API is not reachable");
            return Err(ClientError::TransportFailure(format!(
                "API at {} is not reachable",
                self.url
            )));
        }

        let res = res?;
        if !res.status().is_success() {
            tracing::error!(status = res.status().as_u16(), "API health check failed");
            return Err(error_from_response(res).await);
        }

        let health = res.json::<HealthResponse>().await?;
        tracing::debug!(status = health.status, mode = ?health.mode, "API health check");

        return Ok(());
    }

    #[allow(clippy::implicit_return)]
    async fn upload(
        &self,
        file: &SelectedFile,
        workspace: &WorkspaceId,
    ) -> Result<UploadResponse, ClientError> {
        let part = multipart::Part::bytes(file.bytes.clone())
            .file_name(file.name.to_string())
            .mime_str(mime_for(&file.name))?;
        let form = multipart::Form::new().part("files", part);

        tracing::debug!(
            filename = file.name,
            size = file.bytes.len(),
            workspace = workspace.as_str(),
            "Upload request"
        );

        let res = self
            .client
            .post(format!("{url}/upload-contract", url = self.url))
            .header(NAMESPACE_HEADER, workspace.as_str())
            .multipart(form)
            .send()
            .await?;

        if !res.status().is_success() {
            tracing::error!(
                status = res.status().as_u16(),
                filename = file.name,
                "Upload request failed"
            );
            return Err(error_from_response(res).await);
        }

        let body = res.json::<UploadResponse>().await?;
        tracing::debug!(body = ?body, "Upload response");

        return Ok(body);
    }

    #[allow(clippy::implicit_return)]
    async fn query(&self, request: &QueryRequest) -> Result<QueryResult, ClientError> {
        tracing::debug!(
            namespace = request.namespace,
            top_k = request.top_k,
            "Query request"
        );

        let res = self
            .client
            .post(format!("{url}/query", url = self.url))
            .json(request)
            .send()
            .await?;

        if !res.status().is_success() {
            tracing::error!(status = res.status().as_u16(), "Query request failed");
            return Err(error_from_response(res).await);
        }

        let body = res.json::<QueryResult>().await?;
        tracing::debug!(sources = body.sources.len(), "Query response");

        return Ok(body);
    }
}
