use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Host 傳入批次中的一個 item
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InputItem {
    #[serde(default)]
    pub json: Map<String, Value>,
}

impl InputItem {
    pub fn new(json: Map<String, Value>) -> Self {
        Self { json }
    }
}

/// 每個 item 解析後的參數，由 ParameterResolver 產生
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemParameters {
    pub id_variable: i64,
    pub desde: String,
    pub hasta: String,
    pub limit: i64,
    /// None 代表沒有設定 offset，與 Some(0) 不同
    pub offset: Option<i64>,
}

impl Default for ItemParameters {
    fn default() -> Self {
        Self {
            id_variable: 1,
            desde: String::new(),
            hasta: String::new(),
            limit: 100,
            offset: Some(0),
        }
    }
}

/// 對上游實際送出的查詢，日期已正規化為 YYYY-MM-DD
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryRequest {
    pub variable_id: i64,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: String,
    pub query: Vec<(String, String)>,
    pub json: bool,
    pub skip_tls_verification: bool,
}

/// 上游回應的兩種形狀，只能在執行期判斷
#[derive(Debug, Clone, PartialEq)]
pub enum UpstreamResponse {
    Results(Vec<Value>),
    Single(Map<String, Value>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PairedItem {
    pub item: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutputRecord {
    pub json: Map<String, Value>,
    pub paired_item: PairedItem,
}

impl OutputRecord {
    pub fn new(json: Map<String, Value>, item: usize) -> Self {
        Self {
            json,
            paired_item: PairedItem { item },
        }
    }

    pub fn error(message: impl Into<String>, item: usize) -> Self {
        let mut json = Map::new();
        json.insert("error".to_string(), Value::String(message.into()));
        Self::new(json, item)
    }

    pub fn is_error(&self) -> bool {
        self.json.len() == 1 && self.json.contains_key("error")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_record_serializes_with_host_field_names() {
        let mut json = Map::new();
        json.insert("valor".to_string(), Value::from(100));
        let record = OutputRecord::new(json, 2);

        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(
            value,
            serde_json::json!({"json": {"valor": 100}, "pairedItem": {"item": 2}})
        );
    }

    #[test]
    fn test_error_record_shape() {
        let record = OutputRecord::error("boom", 1);
        assert!(record.is_error());
        assert_eq!(record.json.get("error"), Some(&Value::from("boom")));
        assert_eq!(record.paired_item.item, 1);
    }
}
