pub mod toml_config;

use crate::domain::model::InputItem;
use crate::utils::error::{EtlError, Result};
use serde_json::Value;
use std::path::Path;

#[cfg(feature = "cli")]
use clap::Parser;
#[cfg(feature = "cli")]
use toml_config::TomlConfig;

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Default, Parser)]
#[command(name = "bcra-etl")]
#[command(about = "Fetch BCRA monetary statistics into a normalized record stream")]
pub struct CliConfig {
    /// Path to TOML run file
    #[arg(short, long)]
    pub config: Option<String>,

    /// Variable id (see --list-variables)
    #[arg(long)]
    pub variable: Option<i64>,

    /// Start date, any date or RFC 3339 timestamp
    #[arg(long)]
    pub desde: Option<String>,

    /// End date, any date or RFC 3339 timestamp
    #[arg(long)]
    pub hasta: Option<String>,

    #[arg(long)]
    pub limit: Option<i64>,

    #[arg(long)]
    pub offset: Option<i64>,

    /// JSON file with the input items (array of objects)
    #[arg(long)]
    pub input: Option<String>,

    #[arg(long)]
    pub output_path: Option<String>,

    #[arg(long, value_delimiter = ',')]
    pub formats: Vec<String>,

    #[arg(long)]
    pub base_url: Option<String>,

    /// Emit error records instead of aborting the batch
    #[arg(long)]
    pub continue_on_fail: bool,

    #[arg(long, help = "Print the variable catalog and exit")]
    pub list_variables: bool,

    #[arg(long, help = "Print the node description as JSON and exit")]
    pub describe: bool,

    /// Show the requests that would be sent without calling the API
    #[arg(long)]
    pub dry_run: bool,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Log as JSON lines")]
    pub log_json: bool,
}

#[cfg(feature = "cli")]
impl CliConfig {
    /// 載入 TOML 設定（若有）並套用命令列覆蓋
    pub fn resolve_run_config(&self) -> Result<TomlConfig> {
        let mut config = match &self.config {
            Some(path) => TomlConfig::from_file(path)?,
            None => TomlConfig::default(),
        };

        if let Some(variable) = self.variable {
            config.parameters.id_variable = Some(Value::from(variable));
        }
        if let Some(desde) = &self.desde {
            config.parameters.desde = Some(Value::from(desde.as_str()));
        }
        if let Some(hasta) = &self.hasta {
            config.parameters.hasta = Some(Value::from(hasta.as_str()));
        }
        if let Some(limit) = self.limit {
            config.parameters.limit = Some(Value::from(limit));
        }
        if let Some(offset) = self.offset {
            config.parameters.offset = Some(Value::from(offset));
        }
        if let Some(path) = &self.output_path {
            config.output.path = path.clone();
        }
        if !self.formats.is_empty() {
            config.output.formats = self.formats.clone();
        }
        if let Some(base_url) = &self.base_url {
            config.source.base_url = base_url.clone();
        }
        if self.continue_on_fail {
            config.node.continue_on_fail = true;
        }

        Ok(config)
    }
}

/// 讀取 items JSON 檔：接受純物件陣列，或 host 格式的 `{"json": {...}}` 陣列
pub fn load_input_items<P: AsRef<Path>>(path: P) -> Result<Vec<InputItem>> {
    let content = std::fs::read_to_string(&path)?;
    parse_input_items(&content)
}

pub fn parse_input_items(content: &str) -> Result<Vec<InputItem>> {
    let value: Value = serde_json::from_str(content)?;

    let Value::Array(entries) = value else {
        return Err(EtlError::ConfigError {
            message: "input items must be a JSON array".to_string(),
        });
    };

    entries
        .into_iter()
        .enumerate()
        .map(|(index, entry)| match entry {
            Value::Object(mut obj) => {
                let host_shaped = obj.keys().all(|k| k == "json" || k == "pairedItem");
                match obj.get_mut("json") {
                    Some(Value::Object(json)) if host_shaped => {
                        Ok(InputItem::new(std::mem::take(json)))
                    }
                    _ => Ok(InputItem::new(obj)),
                }
            }
            other => Err(EtlError::ConfigError {
                message: format!("input item {} is not an object: {}", index, other),
            }),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_plain_and_host_shaped_items() {
        let items = parse_input_items(
            r#"[{"variable": 1}, {"json": {"variable": 5}, "pairedItem": {"item": 0}}]"#,
        )
        .unwrap();

        assert_eq!(items.len(), 2);
        assert_eq!(items[0].json.get("variable"), Some(&json!(1)));
        assert_eq!(items[1].json.get("variable"), Some(&json!(5)));
    }

    #[test]
    fn test_parse_rejects_non_array() {
        assert!(parse_input_items(r#"{"variable": 1}"#).is_err());
        assert!(parse_input_items(r#"[1, 2]"#).is_err());
    }

    #[cfg(feature = "cli")]
    #[test]
    fn test_cli_overrides_apply_on_defaults() {
        let cli = CliConfig {
            variable: Some(5),
            desde: Some("2024-01-01".to_string()),
            limit: Some(10),
            formats: vec!["csv".to_string()],
            continue_on_fail: true,
            ..CliConfig::default()
        };

        let config = cli.resolve_run_config().unwrap();

        assert_eq!(config.parameters.id_variable, Some(json!(5)));
        assert_eq!(config.parameters.desde, Some(json!("2024-01-01")));
        assert_eq!(config.parameters.limit, Some(json!(10)));
        assert_eq!(config.output.formats, vec!["csv".to_string()]);
        assert!(config.node.continue_on_fail);
    }
}
