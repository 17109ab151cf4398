use crate::domain::catalog::variable_label;
use crate::domain::model::{HttpRequest, ItemParameters, OutputRecord, QueryRequest, UpstreamResponse};
use crate::domain::node::{DEFAULT_BASE_URL, DEFAULT_NODE_NAME};
use crate::domain::ports::{ParameterResolver, Transport};
use crate::core::normalize::normalize_response;
use crate::utils::error::{EtlError, Result};

/// 逐筆處理 host 傳入的 items，每個 item 失敗時獨立隔離
pub struct BatchProcessor<T: Transport> {
    transport: T,
    base_url: String,
    node_name: String,
    continue_on_fail: bool,
}

impl<T: Transport> BatchProcessor<T> {
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            base_url: DEFAULT_BASE_URL.to_string(),
            node_name: DEFAULT_NODE_NAME.to_string(),
            continue_on_fail: false,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_node_name(mut self, node_name: impl Into<String>) -> Self {
        self.node_name = node_name.into();
        self
    }

    pub fn with_continue_on_fail(mut self, enabled: bool) -> Self {
        self.continue_on_fail = enabled;
        self
    }

    pub fn node_name(&self) -> &str {
        &self.node_name
    }

    pub fn continue_on_fail(&self) -> bool {
        self.continue_on_fail
    }

    pub fn build_request(&self, params: &ItemParameters) -> Result<HttpRequest> {
        let query = QueryRequest::from_parameters(params)?;
        Ok(query.to_http_request(&self.base_url))
    }

    /// 單一 item 的處理：建立查詢、呼叫上游、正規化回應。
    /// 這裡只回傳 Result，要不要中止整批由呼叫端決定。
    pub async fn process_item(
        &self,
        index: usize,
        params: &ItemParameters,
    ) -> Result<Vec<OutputRecord>> {
        let request = self.build_request(params)?;

        tracing::debug!(
            "📡 {}: item {} -> {} {} {:?}",
            self.node_name,
            index,
            request.method.as_str(),
            request.url,
            request.query
        );

        let body = self.transport.request(&request).await?;

        let label = variable_label(params.id_variable);
        let response = UpstreamResponse::from_value(body);
        if let UpstreamResponse::Single(_) = response {
            tracing::debug!(
                "{}: item {} response has no results array, using single-object fallback",
                self.node_name,
                index
            );
        }

        Ok(normalize_response(
            response,
            params.id_variable,
            label,
            index,
        ))
    }

    async fn handle_item<R: ParameterResolver>(
        &self,
        index: usize,
        resolver: &R,
    ) -> Result<Vec<OutputRecord>> {
        let params = resolver.resolve(index)?;
        self.process_item(index, &params).await
    }

    /// 依序執行整批 items，item i+1 一定在 item i 結束後才開始
    pub async fn execute<R: ParameterResolver>(
        &self,
        item_count: usize,
        resolver: &R,
    ) -> Result<Vec<OutputRecord>> {
        let mut output = Vec::new();

        tracing::info!(
            "🚀 {}: processing {} item(s) (continue_on_fail: {})",
            self.node_name,
            item_count,
            self.continue_on_fail
        );

        for index in 0..item_count {
            match self.handle_item(index, resolver).await {
                Ok(records) => {
                    tracing::debug!(
                        "✅ {}: item {} produced {} record(s)",
                        self.node_name,
                        index,
                        records.len()
                    );
                    output.extend(records);
                }
                Err(e) if self.continue_on_fail => {
                    tracing::warn!("⚠️ {}: item {} failed: {}", self.node_name, index, e);
                    output.push(OutputRecord::error(e.to_string(), index));
                }
                Err(e) => {
                    tracing::error!("❌ {}: item {} failed, aborting batch: {}", self.node_name, index, e);
                    return Err(EtlError::NodeApiError {
                        node: self.node_name.clone(),
                        item_index: index,
                        source: Box::new(e),
                        completed: output,
                    });
                }
            }
        }

        tracing::info!(
            "✅ {}: batch finished with {} record(s)",
            self.node_name,
            output.len()
        );

        Ok(output)
    }
}
