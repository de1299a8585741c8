//! Projection of a raw lineage payload into a node/edge graph for visualisation.
//!
//! The payload is read leniently: absent lists project to empty ones, and a
//! field that is missing or of an unexpected type falls back to its default.
//! Each node and edge carries its source element unchanged in `data`.

use serde::Serialize;
use serde_json::Value;

const UNKNOWN_LABEL: &str = "Unknown";

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct GraphNode {
    pub id: String,
    pub label: String,
    #[serde(rename = "type")]
    pub node_type: String,
    pub data: Value,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct GraphEdge {
    pub id: String,
    pub source: String,
    pub target: String,
    pub label: String,
    pub data: Value,
}

#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct LineageGraph {
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<GraphEdge>,
}

fn str_field<'a>(value: &'a Value, key: &str) -> Option<&'a str> {
    value.get(key).and_then(Value::as_str)
}

fn list<'a>(payload: &'a Value, key: &str) -> &'a [Value] {
    payload
        .get(key)
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default()
}

/// One node per entity and one edge per relation, in payload order.
pub fn project(payload: &Value) -> LineageGraph {
    let nodes = list(payload, "entities")
        .iter()
        .map(|entity| GraphNode {
            id: str_field(entity, "guid").unwrap_or_default().to_owned(),
            label: entity
                .get("attributes")
                .and_then(|attributes| str_field(attributes, "name"))
                .unwrap_or(UNKNOWN_LABEL)
                .to_owned(),
            node_type: str_field(entity, "typeName").unwrap_or_default().to_owned(),
            data: entity.clone(),
        })
        .collect();

    let edges = list(payload, "relations")
        .iter()
        .map(|relation| {
            let source = str_field(relation, "fromEntityGuid").unwrap_or_default();
            let target = str_field(relation, "toEntityGuid").unwrap_or_default();
            GraphEdge {
                id: format!("{source}_{target}"),
                source: source.to_owned(),
                target: target.to_owned(),
                label: str_field(relation, "relationshipType")
                    .unwrap_or(UNKNOWN_LABEL)
                    .to_owned(),
                data: relation.clone(),
            }
        })
        .collect();

    LineageGraph { nodes, edges }
}
