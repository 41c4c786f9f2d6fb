//! Client for the quotation REST API.

use qdesk_core::QuotationRecord;
use reqwest::Url;
use serde::Deserialize;

use crate::error::{CliError, CliResult};

const CREATE_QUOTATION_PATH: &str = "api/quotation/create-quotation";

/// Envelope every API endpoint answers with.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiResponse {
    #[serde(default)]
    pub status: bool,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub result: Option<serde_json::Value>,
}

pub struct ApiClient {
    client: reqwest::Client,
    base_url: Url,
    token: Option<String>,
}

impl ApiClient {
    pub fn new(client: reqwest::Client, base_url: Url, token: Option<String>) -> Self {
        ApiClient {
            client,
            base_url,
            token,
        }
    }

    /// Creates a new quotation from an imported template.
    ///
    /// A response with `status: false` is an error carrying the API's
    /// message.
    pub async fn create_quotation(&self, record: &QuotationRecord) -> CliResult<ApiResponse> {
        let url = join(&self.base_url, CREATE_QUOTATION_PATH)?;
        tracing::info!(%url, customer = %record.customer_name, "Submitting quotation");

        let mut request = self.client.post(url).json(record);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;
        let http_status = response.status();
        let body: ApiResponse = match response.json().await {
            Ok(body) => body,
            Err(_) if !http_status.is_success() => {
                return Err(CliError::Rejected(format!("HTTP {http_status}")));
            }
            Err(err) => return Err(err.into()),
        };

        if !body.status {
            let message = body.message.unwrap_or_else(|| "Unknown error".to_string());
            tracing::warn!(%http_status, %message, "API rejected quotation");
            return Err(CliError::Rejected(message));
        }

        Ok(body)
    }
}

/// Joins `path` under `base`, keeping any path prefix the base carries.
fn join(base: &Url, path: &str) -> CliResult<Url> {
    let mut base = base.clone();
    if !base.path().ends_with('/') {
        let with_slash = format!("{}/", base.path());
        base.set_path(&with_slash);
    }
    base.join(path)
        .map_err(|e| CliError::Rejected(format!("bad server URL: {e}")))
}
