use crate::domain::model::{HttpRequest, ItemParameters};
use crate::utils::error::Result;
use async_trait::async_trait;

/// 實際發出 HTTP 請求並回傳解析後的 JSON，非 2xx 必須回傳錯誤
#[async_trait]
pub trait Transport: Send + Sync {
    async fn request(&self, request: &HttpRequest) -> Result<serde_json::Value>;
}

/// 依 item 位置解析節點參數
pub trait ParameterResolver: Send + Sync {
    fn resolve(&self, index: usize) -> Result<ItemParameters>;
}

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn node_name(&self) -> &str;
    fn base_url(&self) -> &str;
    fn continue_on_fail(&self) -> bool;
    fn output_path(&self) -> &str;
    fn output_formats(&self) -> &[String];
}
