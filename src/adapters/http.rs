use crate::domain::model::{HttpMethod, HttpRequest};
use crate::domain::ports::Transport;
use crate::utils::error::{EtlError, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;

/// reqwest 實作的 Transport。
/// 憑證驗證是逐請求決定的，所以預先建好兩個 client。
pub struct ReqwestTransport {
    client: Client,
    insecure_client: Client,
}

impl ReqwestTransport {
    pub fn new() -> Result<Self> {
        Ok(Self {
            client: Client::builder().build()?,
            insecure_client: Client::builder().danger_accept_invalid_certs(true).build()?,
        })
    }

    fn client_for(&self, request: &HttpRequest) -> &Client {
        if request.skip_tls_verification {
            &self.insecure_client
        } else {
            &self.client
        }
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn request(&self, request: &HttpRequest) -> Result<Value> {
        let method = match request.method {
            HttpMethod::Get => reqwest::Method::GET,
        };

        let mut builder = self
            .client_for(request)
            .request(method, &request.url)
            .query(&request.query);

        if request.json {
            builder = builder.header(reqwest::header::ACCEPT, "application/json");
        }

        let response = builder.send().await?;
        let status = response.status();
        tracing::debug!("API response status: {}", status);

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(EtlError::HttpStatusError {
                status: status.as_u16(),
                url: request.url.clone(),
                body,
            });
        }

        let text = response.text().await?;
        if !request.json {
            return Ok(Value::String(text));
        }

        serde_json::from_str(&text).map_err(|e| EtlError::InvalidResponseError {
            message: format!("expected JSON from {}: {}", request.url, e),
        })
    }
}
