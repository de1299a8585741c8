use std::sync::Arc;

use serde_json::{json, Value};
use tracing::info;

use crate::auth::service::AuthService;
use crate::error::GatewayResult;
use crate::lineage::graph::{project, LineageGraph};

pub const DEFAULT_DIRECTION: &str = "BOTH";
pub const DEFAULT_DEPTH: u32 = 3;

/// Parameters of a lineage lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineageQuery {
    pub guid: String,
    pub direction: String,
    pub depth: u32,
    pub include_process: bool,
}

impl LineageQuery {
    pub fn new(guid: impl Into<String>) -> Self {
        Self {
            guid: guid.into(),
            direction: DEFAULT_DIRECTION.to_owned(),
            depth: DEFAULT_DEPTH,
            include_process: true,
        }
    }

    fn params(&self) -> [(&'static str, String); 4] {
        [
            ("guid", self.guid.clone()),
            ("direction", self.direction.clone()),
            ("depth", self.depth.to_string()),
            ("includeProcess", self.include_process.to_string()),
        ]
    }
}

/// Lineage link between two assets, optionally through a process.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewLineage {
    pub from_guid: String,
    pub to_guid: String,
    pub process_guid: Option<String>,
    pub process_name: Option<String>,
    pub process_type: Option<String>,
}

impl NewLineage {
    /// An existing process wins; otherwise a new process entity is described
    /// when both name and type are known; otherwise the link is direct.
    pub fn payload(&self) -> Value {
        match (&self.process_guid, &self.process_name, &self.process_type) {
            (Some(process_guid), _, _) => json!({
                "fromEntityGuid": self.from_guid,
                "toEntityGuid": self.to_guid,
                "processGuid": process_guid,
            }),
            (None, Some(name), Some(type_name)) => json!({
                "fromEntityGuid": self.from_guid,
                "toEntityGuid": self.to_guid,
                "process": {
                    "typeName": type_name,
                    "attributes": {
                        "name": name,
                        "qualifiedName": format!("{}_{}_{}", name, self.from_guid, self.to_guid),
                    }
                }
            }),
            _ => json!({
                "fromEntityGuid": self.from_guid,
                "toEntityGuid": self.to_guid,
            }),
        }
    }
}

/// Lineage endpoints of the catalog API.
#[derive(Debug, Clone)]
pub struct LineageClient {
    auth: Arc<AuthService>,
}

impl LineageClient {
    pub fn new(auth: Arc<AuthService>) -> Self {
        info!("Lineage service initialized");
        Self { auth }
    }

    fn url(&self, path: &str) -> String {
        self.auth.catalog().config().endpoint(path)
    }

    pub async fn get_lineage(&self, query: &LineageQuery) -> GatewayResult<Value> {
        info!("Getting lineage for asset with GUID: {}", query.guid);
        let headers = self.auth.get_headers().await?;
        let request = self
            .auth
            .catalog()
            .http()
            .get(self.url("/lineage"))
            .headers(headers)
            .query(&query.params());
        self.auth.catalog().execute("get lineage", request).await
    }

    pub async fn create_lineage(&self, lineage: &NewLineage) -> GatewayResult<Value> {
        info!("Creating lineage between assets: {} -> {}", lineage.from_guid, lineage.to_guid);
        let headers = self.auth.get_headers().await?;
        let request = self
            .auth
            .catalog()
            .http()
            .post(self.url("/lineage"))
            .headers(headers)
            .json(&lineage.payload());
        self.auth.catalog().execute("create lineage", request).await
    }

    pub async fn delete_lineage(
        &self,
        from_guid: &str,
        to_guid: &str,
        process_guid: Option<&str>,
    ) -> GatewayResult<Value> {
        info!("Deleting lineage between assets: {} -> {}", from_guid, to_guid);
        let mut params = vec![("fromEntityGuid", from_guid), ("toEntityGuid", to_guid)];
        if let Some(process_guid) = process_guid {
            params.push(("processGuid", process_guid));
        }

        let headers = self.auth.get_headers().await?;
        let request = self
            .auth
            .catalog()
            .http()
            .delete(self.url("/lineage"))
            .headers(headers)
            .query(&params);
        self.auth.catalog().execute("delete lineage", request).await
    }

    pub async fn get_impact_analysis(&self, guid: &str, depth: u32) -> GatewayResult<Value> {
        info!("Getting impact analysis for asset with GUID: {}", guid);
        let headers = self.auth.get_headers().await?;
        let request = self
            .auth
            .catalog()
            .http()
            .get(self.url("/lineage/impact"))
            .headers(headers)
            .query(&[("guid", guid.to_owned()), ("depth", depth.to_string())]);
        self.auth.catalog().execute("get impact analysis", request).await
    }

    pub async fn get_process_details(&self, process_guid: &str) -> GatewayResult<Value> {
        info!("Getting details for process with GUID: {}", process_guid);
        let headers = self.auth.get_headers().await?;
        let request = self
            .auth
            .catalog()
            .http()
            .get(self.url(&format!("/assets/{process_guid}")))
            .headers(headers);
        self.auth.catalog().execute("get process details", request).await
    }

    pub async fn update_process(&self, process_guid: &str, process: &Value) -> GatewayResult<Value> {
        info!("Updating process with GUID: {}", process_guid);
        let headers = self.auth.get_headers().await?;
        let request = self
            .auth
            .catalog()
            .http()
            .put(self.url(&format!("/assets/{process_guid}")))
            .headers(headers)
            .json(process);
        self.auth.catalog().execute("update process", request).await
    }

    /// Raw lineage projected into nodes and edges.
    pub async fn get_lineage_graph(&self, query: &LineageQuery) -> GatewayResult<LineageGraph> {
        info!("Getting lineage graph for asset with GUID: {}", query.guid);
        let raw = self.get_lineage(query).await?;
        Ok(project(&raw))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lineage() -> NewLineage {
        NewLineage {
            from_guid: "a1".into(),
            to_guid: "a2".into(),
            ..Default::default()
        }
    }

    #[test]
    fn direct_lineage_payload() {
        assert_eq!(lineage().payload(), json!({"fromEntityGuid": "a1", "toEntityGuid": "a2"}));
    }

    #[test]
    fn existing_process_wins_over_new_process() {
        let payload = NewLineage {
            process_guid: Some("p1".into()),
            process_name: Some("etl".into()),
            process_type: Some("Process".into()),
            ..lineage()
        }
        .payload();
        assert_eq!(payload, json!({"fromEntityGuid": "a1", "toEntityGuid": "a2", "processGuid": "p1"}));
    }

    #[test]
    fn new_process_gets_qualified_name() {
        let payload = NewLineage {
            process_name: Some("etl".into()),
            process_type: Some("Process".into()),
            ..lineage()
        }
        .payload();
        assert_eq!(payload["process"]["typeName"], "Process");
        assert_eq!(payload["process"]["attributes"]["qualifiedName"], "etl_a1_a2");
    }

    #[test]
    fn process_name_without_type_is_direct() {
        let payload = NewLineage {
            process_name: Some("etl".into()),
            ..lineage()
        }
        .payload();
        assert!(payload.get("process").is_none());
    }

    #[test]
    fn query_defaults() {
        let query = LineageQuery::new("a1");
        assert_eq!(query.direction, "BOTH");
        assert_eq!(query.depth, 3);
        assert!(query.include_process);
    }
}
