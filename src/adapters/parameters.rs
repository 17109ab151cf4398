use crate::domain::model::{InputItem, ItemParameters};
use crate::domain::node::{bcra_node_description, NodeDescription};
use crate::domain::ports::ParameterResolver;
use crate::utils::error::{EtlError, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// 每個 item 都使用同一組參數
#[derive(Debug, Clone, Default)]
pub struct StaticParameters(pub ItemParameters);

impl ParameterResolver for StaticParameters {
    fn resolve(&self, _index: usize) -> Result<ItemParameters> {
        Ok(self.0.clone())
    }
}

/// 節點參數的原始值，未設定的欄位使用節點描述中的預設值
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NodeParameters {
    #[serde(rename = "idVariable", default, skip_serializing_if = "Option::is_none")]
    pub id_variable: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub desde: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hasta: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub offset: Option<Value>,
}

impl NodeParameters {
    fn raw(&self, name: &str) -> Option<&Value> {
        match name {
            "idVariable" => self.id_variable.as_ref(),
            "desde" => self.desde.as_ref(),
            "hasta" => self.hasta.as_ref(),
            "limit" => self.limit.as_ref(),
            "offset" => self.offset.as_ref(),
            _ => None,
        }
    }
}

/// 參數字串中的 `{{field}}` 會以對應 item 的 JSON 欄位取代，支援 `a.b` 巢狀路徑
pub struct TemplateParameterResolver {
    parameters: NodeParameters,
    items: Vec<InputItem>,
    description: NodeDescription,
    placeholder: Regex,
}

impl TemplateParameterResolver {
    pub fn new(parameters: NodeParameters, items: Vec<InputItem>) -> Result<Self> {
        let placeholder =
            Regex::new(r"\{\{\s*([A-Za-z0-9_.\-]+)\s*\}\}").map_err(|e| EtlError::ConfigError {
                message: format!("invalid placeholder pattern: {}", e),
            })?;

        Ok(Self {
            parameters,
            items,
            description: bcra_node_description(),
            placeholder,
        })
    }

    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    fn value_for(&self, name: &str, item: &InputItem) -> Result<Value> {
        let raw = self
            .parameters
            .raw(name)
            .or_else(|| self.description.default_for(name))
            .cloned()
            .unwrap_or(Value::Null);

        match raw {
            Value::String(template) => self.substitute(name, &template, item),
            other => Ok(other),
        }
    }

    fn substitute(&self, name: &str, template: &str, item: &InputItem) -> Result<Value> {
        // 整個字串就是一個 placeholder 時保留原本的 JSON 型別
        if let Some(caps) = self.placeholder.captures(template) {
            if caps.get(0).map(|m| m.as_str().len()) == Some(template.len()) {
                return lookup(name, &caps[1], item).cloned();
            }
        }

        let mut missing = None;
        let rendered = self.placeholder.replace_all(template, |caps: &regex::Captures| {
            match lookup(name, &caps[1], item) {
                Ok(value) => render(value),
                Err(e) => {
                    missing.get_or_insert(e);
                    String::new()
                }
            }
        });

        match missing {
            Some(e) => Err(e),
            None => Ok(Value::String(rendered.into_owned())),
        }
    }
}

impl ParameterResolver for TemplateParameterResolver {
    fn resolve(&self, index: usize) -> Result<ItemParameters> {
        let item = self.items.get(index).ok_or_else(|| EtlError::ParameterError {
            parameter: "item".to_string(),
            message: format!("no input item at index {}", index),
        })?;

        let offset = match self.value_for("offset", item)? {
            Value::Null => None,
            value => Some(as_integer("offset", &value)?),
        };

        Ok(ItemParameters {
            id_variable: as_integer("idVariable", &self.value_for("idVariable", item)?)?,
            desde: as_date_string("desde", &self.value_for("desde", item)?)?,
            hasta: as_date_string("hasta", &self.value_for("hasta", item)?)?,
            limit: as_integer("limit", &self.value_for("limit", item)?)?,
            offset,
        })
    }
}

fn lookup<'a>(parameter: &str, path: &str, item: &'a InputItem) -> Result<&'a Value> {
    let mut segments = path.split('.');
    let first = segments.next().unwrap_or_default();
    let mut current = item.json.get(first);

    for segment in segments {
        current = current.and_then(|value| value.get(segment));
    }

    current.ok_or_else(|| EtlError::ParameterError {
        parameter: parameter.to_string(),
        message: format!("field '{}' not found in input item", path),
    })
}

fn render(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

fn as_integer(parameter: &str, value: &Value) -> Result<i64> {
    let parsed = match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.fract() == 0.0).map(|f| f as i64)),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    };

    parsed.ok_or_else(|| EtlError::ParameterError {
        parameter: parameter.to_string(),
        message: format!("expected an integer, got {}", value),
    })
}

fn as_date_string(parameter: &str, value: &Value) -> Result<String> {
    match value {
        Value::String(s) => Ok(s.clone()),
        Value::Null => Ok(String::new()),
        // 數字視為 epoch 毫秒
        Value::Number(n) => n
            .as_i64()
            .and_then(chrono::DateTime::<chrono::Utc>::from_timestamp_millis)
            .map(|dt| dt.to_rfc3339())
            .ok_or_else(|| EtlError::ParameterError {
                parameter: parameter.to_string(),
                message: format!("timestamp out of range: {}", n),
            }),
        other => Err(EtlError::ParameterError {
            parameter: parameter.to_string(),
            message: format!("expected a date string, got {}", other),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn item(value: Value) -> InputItem {
        match value {
            Value::Object(json) => InputItem::new(json),
            _ => panic!("expected object"),
        }
    }

    #[test]
    fn test_defaults_from_node_description() {
        let resolver =
            TemplateParameterResolver::new(NodeParameters::default(), vec![InputItem::default()])
                .unwrap();

        assert_eq!(resolver.resolve(0).unwrap(), ItemParameters::default());
    }

    #[test]
    fn test_placeholders_resolved_per_item() {
        let parameters = NodeParameters {
            id_variable: Some(json!("{{ variable }}")),
            desde: Some(json!("{{rango.desde}}T00:00:00Z")),
            limit: Some(json!("{{limit}}")),
            ..NodeParameters::default()
        };
        let items = vec![
            item(json!({"variable": 4, "rango": {"desde": "2024-01-01"}, "limit": 5})),
            item(json!({"variable": "5", "rango": {"desde": "2024-02-01"}, "limit": "7"})),
        ];
        let resolver = TemplateParameterResolver::new(parameters, items).unwrap();

        let first = resolver.resolve(0).unwrap();
        assert_eq!(first.id_variable, 4);
        assert_eq!(first.desde, "2024-01-01T00:00:00Z");
        assert_eq!(first.limit, 5);

        let second = resolver.resolve(1).unwrap();
        assert_eq!(second.id_variable, 5);
        assert_eq!(second.desde, "2024-02-01T00:00:00Z");
        assert_eq!(second.limit, 7);
    }

    #[test]
    fn test_missing_field_is_parameter_error() {
        let parameters = NodeParameters {
            hasta: Some(json!("{{fin}}")),
            ..NodeParameters::default()
        };
        let resolver =
            TemplateParameterResolver::new(parameters, vec![InputItem::default()]).unwrap();

        let err = resolver.resolve(0).unwrap_err();
        assert!(matches!(
            err,
            EtlError::ParameterError { ref parameter, .. } if parameter == "hasta"
        ));
    }

    #[test]
    fn test_non_numeric_variable_is_parameter_error() {
        let parameters = NodeParameters {
            id_variable: Some(json!("reservas")),
            ..NodeParameters::default()
        };
        let resolver =
            TemplateParameterResolver::new(parameters, vec![InputItem::default()]).unwrap();

        assert!(resolver.resolve(0).is_err());
    }

    #[test]
    fn test_null_offset_means_not_configured() {
        let parameters = NodeParameters {
            offset: Some(Value::Null),
            ..NodeParameters::default()
        };
        let resolver =
            TemplateParameterResolver::new(parameters, vec![InputItem::default()]).unwrap();

        assert_eq!(resolver.resolve(0).unwrap().offset, None);
    }

    #[test]
    fn test_epoch_millis_date() {
        let parameters = NodeParameters {
            desde: Some(json!(1710498600000_i64)),
            ..NodeParameters::default()
        };
        let resolver =
            TemplateParameterResolver::new(parameters, vec![InputItem::default()]).unwrap();

        assert!(resolver.resolve(0).unwrap().desde.starts_with("2024-03-15T10:30:00"));
    }

    #[test]
    fn test_out_of_range_index() {
        let resolver = TemplateParameterResolver::new(NodeParameters::default(), vec![]).unwrap();
        assert_eq!(resolver.item_count(), 0);
        assert!(resolver.resolve(0).is_err());
    }

    #[test]
    fn test_static_parameters_same_for_every_item() {
        let resolver = StaticParameters(ItemParameters {
            id_variable: 6,
            ..ItemParameters::default()
        });

        assert_eq!(resolver.resolve(0).unwrap().id_variable, 6);
        assert_eq!(resolver.resolve(10).unwrap().id_variable, 6);
    }
}
