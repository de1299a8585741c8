use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::Value;

use crate::lineage::client::{LineageQuery, NewLineage, DEFAULT_DEPTH, DEFAULT_DIRECTION};
use crate::lineage::graph::LineageGraph;
use crate::server::error::ApiError;
use crate::server::extract::{AuthenticatedUser, JsonBody};
use crate::server::server::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/lineage", get(get_lineage).post(create_lineage).delete(delete_lineage))
        .route("/api/lineage/impact", get(get_impact_analysis))
        .route("/api/lineage/process/{guid}", get(get_process_details).put(update_process))
        .route("/api/lineage/graph", get(get_lineage_graph))
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineageParams {
    guid: Option<String>,
    direction: Option<String>,
    depth: Option<String>,
    include_process: Option<String>,
}

impl LineageParams {
    fn into_query(self) -> Result<LineageQuery, ApiError> {
        let guid = required(self.guid)
            .ok_or_else(|| ApiError::bad_request("Missing GUID", "Asset GUID is required"))?;
        Ok(LineageQuery {
            guid,
            direction: self.direction.unwrap_or_else(|| DEFAULT_DIRECTION.to_owned()),
            depth: parse_depth(self.depth.as_deref()),
            include_process: self
                .include_process
                .map_or(true, |flag| flag.eq_ignore_ascii_case("true")),
        })
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteParams {
    from_entity_guid: Option<String>,
    to_entity_guid: Option<String>,
    process_guid: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ImpactParams {
    guid: Option<String>,
    depth: Option<String>,
}

fn required(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

fn parse_depth(depth: Option<&str>) -> u32 {
    depth.and_then(|d| d.trim().parse().ok()).unwrap_or(DEFAULT_DEPTH)
}

async fn get_lineage(
    _user: AuthenticatedUser,
    State(state): State<AppState>,
    Query(params): Query<LineageParams>,
) -> Result<Json<Value>, ApiError> {
    let query = params.into_query()?;
    state
        .lineage
        .get_lineage(&query)
        .await
        .map(Json)
        .map_err(|e| ApiError::upstream("Failed to get lineage", e))
}

async fn create_lineage(
    _user: AuthenticatedUser,
    State(state): State<AppState>,
    body: JsonBody,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    if body.0.is_none() {
        return Err(ApiError::bad_request("Missing request body", "Request body is required"));
    }
    let (Some(from_guid), Some(to_guid)) = (
        body.str_field("fromEntityGuid").filter(|g| !g.is_empty()),
        body.str_field("toEntityGuid").filter(|g| !g.is_empty()),
    ) else {
        return Err(ApiError::bad_request(
            "Missing GUIDs",
            "Source and target entity GUIDs are required",
        ));
    };

    let lineage = NewLineage {
        from_guid: from_guid.to_owned(),
        to_guid: to_guid.to_owned(),
        process_guid: body.str_field("processGuid").map(str::to_owned),
        process_name: body.str_field("processName").map(str::to_owned),
        process_type: body.str_field("processType").map(str::to_owned),
    };

    state
        .lineage
        .create_lineage(&lineage)
        .await
        .map(|created| (StatusCode::CREATED, Json(created)))
        .map_err(|e| ApiError::upstream("Failed to create lineage", e))
}

async fn delete_lineage(
    _user: AuthenticatedUser,
    State(state): State<AppState>,
    Query(params): Query<DeleteParams>,
) -> Result<Json<Value>, ApiError> {
    let (Some(from_guid), Some(to_guid)) = (required(params.from_entity_guid), required(params.to_entity_guid))
    else {
        return Err(ApiError::bad_request(
            "Missing GUIDs",
            "Source and target entity GUIDs are required",
        ));
    };

    state
        .lineage
        .delete_lineage(&from_guid, &to_guid, params.process_guid.as_deref())
        .await
        .map(Json)
        .map_err(|e| ApiError::upstream("Failed to delete lineage", e))
}

async fn get_impact_analysis(
    _user: AuthenticatedUser,
    State(state): State<AppState>,
    Query(params): Query<ImpactParams>,
) -> Result<Json<Value>, ApiError> {
    let guid = required(params.guid)
        .ok_or_else(|| ApiError::bad_request("Missing GUID", "Asset GUID is required"))?;

    state
        .lineage
        .get_impact_analysis(&guid, parse_depth(params.depth.as_deref()))
        .await
        .map(Json)
        .map_err(|e| ApiError::upstream("Failed to get impact analysis", e))
}

async fn get_process_details(
    _user: AuthenticatedUser,
    State(state): State<AppState>,
    Path(guid): Path<String>,
) -> Result<Json<Value>, ApiError> {
    state
        .lineage
        .get_process_details(&guid)
        .await
        .map(Json)
        .map_err(|e| ApiError::upstream("Failed to get process details", e))
}

async fn update_process(
    _user: AuthenticatedUser,
    State(state): State<AppState>,
    Path(guid): Path<String>,
    body: JsonBody,
) -> Result<Json<Value>, ApiError> {
    let Some(process) = body.into_value() else {
        return Err(ApiError::bad_request("Missing request body", "Request body is required"));
    };

    state
        .lineage
        .update_process(&guid, &process)
        .await
        .map(Json)
        .map_err(|e| ApiError::upstream("Failed to update process", e))
}

async fn get_lineage_graph(
    _user: AuthenticatedUser,
    State(state): State<AppState>,
    Query(params): Query<LineageParams>,
) -> Result<Json<LineageGraph>, ApiError> {
    let query = params.into_query()?;
    state
        .lineage
        .get_lineage_graph(&query)
        .await
        .map(Json)
        .map_err(|e| ApiError::upstream("Failed to get lineage graph", e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lineage_params_apply_defaults() {
        let query = LineageParams {
            guid: Some("a1".into()),
            ..Default::default()
        }
        .into_query()
        .unwrap();
        assert_eq!(query, LineageQuery::new("a1"));
    }

    #[test]
    fn unparsable_depth_falls_back_to_default() {
        assert_eq!(parse_depth(Some("deep")), 3);
        assert_eq!(parse_depth(Some("5")), 5);
        assert_eq!(parse_depth(None), 3);
    }

    #[test]
    fn include_process_is_case_insensitive() {
        let params = |flag: &str| LineageParams {
            guid: Some("a1".into()),
            include_process: Some(flag.into()),
            ..Default::default()
        };
        assert!(params("TRUE").into_query().unwrap().include_process);
        assert!(!params("yes").into_query().unwrap().include_process);
    }

    #[test]
    fn empty_guid_is_rejected() {
        let err = LineageParams {
            guid: Some(String::new()),
            ..Default::default()
        }
        .into_query()
        .unwrap_err();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert_eq!(err.message, "Missing GUID");
    }
}
