use crate::adapters::parameters::NodeParameters;
use crate::domain::model::InputItem;
use crate::domain::node::{bcra_node_description, DEFAULT_BASE_URL, DEFAULT_NODE_NAME};
use crate::domain::ports::ConfigProvider;
use crate::utils::error::{EtlError, Result};
use crate::utils::validation::Validate;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::path::Path;

pub const OUTPUT_FORMATS: &[&str] = &["json", "csv"];

/// 一次執行的 TOML 設定檔
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TomlConfig {
    #[serde(default)]
    pub node: NodeConfig,
    #[serde(default)]
    pub source: SourceConfig,
    #[serde(default)]
    pub parameters: NodeParameters,
    /// 沒有設定時視為單一個空 item
    pub items: Option<Vec<Map<String, Value>>>,
    #[serde(default)]
    pub output: OutputConfig,
    pub logging: Option<LoggingConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeConfig {
    #[serde(default = "default_node_name")]
    pub name: String,
    #[serde(default)]
    pub continue_on_fail: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    #[serde(default = "default_output_path")]
    pub path: String,
    #[serde(default = "default_output_formats")]
    pub formats: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub verbose: Option<bool>,
    pub json: Option<bool>,
}

fn default_node_name() -> String {
    DEFAULT_NODE_NAME.to_string()
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_output_path() -> String {
    "./output".to_string()
}

fn default_output_formats() -> Vec<String> {
    vec!["json".to_string()]
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            name: default_node_name(),
            continue_on_fail: false,
        }
    }
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            path: default_output_path(),
            formats: default_output_formats(),
        }
    }
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(EtlError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| EtlError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${BCRA_BASE_URL})，未設定的保持原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = regex::Regex::new(r"\$\{([^}]+)\}").map_err(|e| EtlError::ConfigError {
            message: format!("invalid env var pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn input_items(&self) -> Vec<InputItem> {
        match &self.items {
            Some(items) => items.iter().cloned().map(InputItem::new).collect(),
            None => vec![InputItem::default()],
        }
    }

    pub fn verbose_logging(&self) -> bool {
        self.logging
            .as_ref()
            .and_then(|l| l.verbose)
            .unwrap_or(false)
    }

    pub fn json_logging(&self) -> bool {
        self.logging.as_ref().and_then(|l| l.json).unwrap_or(false)
    }

    /// 驗證配置的合理性
    pub fn validate_config(&self) -> Result<()> {
        use crate::utils::validation::*;

        validate_non_empty_string("node.name", &self.node.name)?;
        validate_url("source.base_url", &self.source.base_url)?;
        validate_path("output.path", &self.output.path)?;
        validate_one_of("output.formats", &self.output.formats, OUTPUT_FORMATS)?;

        // 只檢查字面數值，模板字串要到執行期才能解析
        let description = bcra_node_description();
        let numeric = [
            ("idVariable", self.parameters.id_variable.as_ref()),
            ("limit", self.parameters.limit.as_ref()),
            ("offset", self.parameters.offset.as_ref()),
        ];
        for (name, value) in numeric {
            let Some(Value::Number(n)) = value else {
                continue;
            };
            let field = format!("parameters.{}", name);
            let int = n.as_i64().ok_or_else(|| EtlError::InvalidConfigValueError {
                field: field.clone(),
                value: n.to_string(),
                reason: "Value must be an integer".to_string(),
            })?;
            if let Some(min) = description.property(name).and_then(|p| p.min_value) {
                validate_min(&field, int, min)?;
            }
        }

        Ok(())
    }
}

impl ConfigProvider for TomlConfig {
    fn node_name(&self) -> &str {
        &self.node.name
    }

    fn base_url(&self) -> &str {
        &self.source.base_url
    }

    fn continue_on_fail(&self) -> bool {
        self.node.continue_on_fail
    }

    fn output_path(&self) -> &str {
        &self.output.path
    }

    fn output_formats(&self) -> &[String] {
        &self.output.formats
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
