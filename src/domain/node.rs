use crate::domain::catalog::{variable_options, VariableCatalogEntry};
use serde::Serialize;
use serde_json::Value;

pub const DEFAULT_NODE_NAME: &str = "BCRA";
pub const DEFAULT_BASE_URL: &str = "https://api.bcra.gob.ar/estadisticas/v4.0";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum PropertyKind {
    Options,
    DateTime,
    Number,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeProperty {
    pub display_name: &'static str,
    pub name: &'static str,
    #[serde(rename = "type")]
    pub kind: PropertyKind,
    pub default: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_value: Option<i64>,
    pub description: &'static str,
    pub required: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<&'static [VariableCatalogEntry]>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeDescription {
    pub display_name: &'static str,
    pub name: &'static str,
    pub group: &'static str,
    pub version: u32,
    pub description: &'static str,
    pub properties: Vec<NodeProperty>,
}

impl NodeDescription {
    pub fn property(&self, name: &str) -> Option<&NodeProperty> {
        self.properties.iter().find(|p| p.name == name)
    }

    pub fn default_for(&self, name: &str) -> Option<&Value> {
        self.property(name).map(|p| &p.default)
    }
}

pub fn bcra_node_description() -> NodeDescription {
    NodeDescription {
        display_name: DEFAULT_NODE_NAME,
        name: "bcra",
        group: "transform",
        version: 1,
        description: "Consume BCRA (Banco Central de la República Argentina) Statistics API v4.0",
        properties: vec![
            NodeProperty {
                display_name: "Variable",
                name: "idVariable",
                kind: PropertyKind::Options,
                default: Value::from(1),
                min_value: None,
                description: "Select the statistical variable to query",
                required: true,
                options: Some(variable_options()),
            },
            NodeProperty {
                display_name: "Start Date",
                name: "desde",
                kind: PropertyKind::DateTime,
                default: Value::from(""),
                min_value: None,
                description: "Start date for the query (YYYY-MM-DD). If empty, returns the last 100 records.",
                required: false,
                options: None,
            },
            NodeProperty {
                display_name: "End Date",
                name: "hasta",
                kind: PropertyKind::DateTime,
                default: Value::from(""),
                min_value: None,
                description: "End date for the query (YYYY-MM-DD)",
                required: false,
                options: None,
            },
            NodeProperty {
                display_name: "Limit",
                name: "limit",
                kind: PropertyKind::Number,
                default: Value::from(100),
                min_value: Some(1),
                description: "Max number of results to return",
                required: false,
                options: None,
            },
            NodeProperty {
                display_name: "Offset",
                name: "offset",
                kind: PropertyKind::Number,
                default: Value::from(0),
                min_value: Some(0),
                description: "Number of results to skip",
                required: false,
                options: None,
            },
        ],
    }
}
