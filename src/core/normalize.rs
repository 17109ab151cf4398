use crate::domain::model::{OutputRecord, UpstreamResponse};
use serde_json::{Map, Value};

impl UpstreamResponse {
    /// `results` 是陣列時逐筆展開，其餘一律視為單一物件
    pub fn from_value(value: Value) -> Self {
        match value {
            Value::Object(mut obj) => {
                if let Some(Value::Array(items)) = obj.get_mut("results") {
                    return UpstreamResponse::Results(std::mem::take(items));
                }
                UpstreamResponse::Single(obj)
            }
            other => {
                let mut obj = Map::new();
                obj.insert("response".to_string(), other);
                UpstreamResponse::Single(obj)
            }
        }
    }
}

fn annotate(mut fields: Map<String, Value>, variable_id: i64, label: &str) -> Map<String, Value> {
    fields.insert("descripcion".to_string(), Value::String(label.to_string()));
    fields.insert("idVariable".to_string(), Value::from(variable_id));
    fields
}

pub fn normalize_response(
    response: UpstreamResponse,
    variable_id: i64,
    label: &str,
    item_index: usize,
) -> Vec<OutputRecord> {
    match response {
        UpstreamResponse::Results(items) => items
            .into_iter()
            .map(|item| {
                let fields = match item {
                    Value::Object(obj) => obj,
                    other => {
                        let mut obj = Map::new();
                        obj.insert("value".to_string(), other);
                        obj
                    }
                };
                OutputRecord::new(annotate(fields, variable_id, label), item_index)
            })
            .collect(),
        UpstreamResponse::Single(obj) => {
            vec![OutputRecord::new(
                annotate(obj, variable_id, label),
                item_index,
            )]
        }
    }
}
