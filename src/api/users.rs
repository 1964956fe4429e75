use std::collections::HashMap;

use chrono::{DateTime, NaiveDate, Utc};
use rocket::{get, post, serde::json::Json, FromForm, State};
use serde::{Deserialize, Serialize};

use crate::api::stats::ApiResponse;
use crate::database;
use crate::models::Touchpoint;
use crate::server::ServerState;

#[derive(Serialize)]
pub struct UserDistrictsResponse {
    #[serde(rename = "districtIds")]
    pub district_ids: Vec<String>,
}

#[get("/users/<user_id>/leads")]
pub async fn get_user_districts(
    state: &State<ServerState>,
    user_id: &str,
) -> Json<ApiResponse<UserDistrictsResponse>> {
    let conn = match state.db_pool.get().await {
        Ok(conn) => conn,
        Err(e) => return Json(ApiResponse::error(e.to_string())),
    };
    match database::user_district_ids(&conn, user_id) {
        Ok(district_ids) => Json(ApiResponse::success(UserDistrictsResponse { district_ids })),
        Err(e) => Json(ApiResponse::error(e.to_string())),
    }
}

#[derive(Deserialize)]
pub struct AssignmentRequest {
    pub action: String,
    #[serde(rename = "districtIds")]
    pub district_ids: Vec<String>,
}

#[post("/users/<user_id>/leads", format = "json", data = "<body>")]
pub async fn update_user_districts(
    state: &State<ServerState>,
    user_id: &str,
    body: Json<AssignmentRequest>,
) -> Json<ApiResponse<UserDistrictsResponse>> {
    let request = body.into_inner();
    let conn = match state.db_pool.get().await {
        Ok(conn) => conn,
        Err(e) => return Json(ApiResponse::error(e.to_string())),
    };

    let result = match request.action.as_str() {
        "assign" => database::assign_districts(&conn, user_id, &request.district_ids),
        "unassign" => database::unassign_districts(&conn, user_id, &request.district_ids),
        other => {
            return Json(ApiResponse::error(format!(
                "unknown action: {other} (expected assign or unassign)"
            )))
        }
    };
    if let Err(e) = result {
        return Json(ApiResponse::error(e.to_string()));
    }

    match database::user_district_ids(&conn, user_id) {
        Ok(district_ids) => Json(ApiResponse::success(UserDistrictsResponse { district_ids })),
        Err(e) => Json(ApiResponse::error(e.to_string())),
    }
}

#[derive(FromForm)]
pub struct TouchpointReportParams {
    #[field(name = "startDate")]
    pub start_date: Option<String>,
    #[field(name = "endDate")]
    pub end_date: Option<String>,
}

#[derive(Serialize)]
pub struct TouchpointReport {
    pub total: usize,
    pub by_type: HashMap<String, i64>,
    pub touchpoints: Vec<Touchpoint>,
}

// Accepts RFC3339 or bare YYYY-MM-DD.
fn parse_date(s: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
}

/// Completed touchpoints across a user's assigned districts, bucketed by
/// type.
#[get("/users/<user_id>/touchpoints?<params..>")]
pub async fn get_user_touchpoints(
    state: &State<ServerState>,
    user_id: &str,
    params: TouchpointReportParams,
) -> Json<ApiResponse<TouchpointReport>> {
    let start = match params.start_date.as_deref() {
        Some(s) => match parse_date(s) {
            Some(dt) => Some(dt),
            None => return Json(ApiResponse::error(format!("invalid startDate: {s}"))),
        },
        None => None,
    };
    let end = match params.end_date.as_deref() {
        Some(s) => match parse_date(s) {
            Some(dt) => Some(dt),
            None => return Json(ApiResponse::error(format!("invalid endDate: {s}"))),
        },
        None => None,
    };

    let conn = match state.db_pool.get().await {
        Ok(conn) => conn,
        Err(e) => return Json(ApiResponse::error(e.to_string())),
    };
    let touchpoints = match database::user_touchpoints(&conn, user_id, start, end) {
        Ok(touchpoints) => touchpoints,
        Err(e) => return Json(ApiResponse::error(e.to_string())),
    };

    let mut by_type: HashMap<String, i64> = HashMap::new();
    for tp in &touchpoints {
        *by_type.entry(tp.touchpoint_type.as_str().to_string()).or_insert(0) += 1;
    }

    Json(ApiResponse::success(TouchpointReport {
        total: touchpoints.len(),
        by_type,
        touchpoints,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_date_accepts_rfc3339_and_bare_dates() {
        assert!(parse_date("2026-08-27T10:00:00Z").is_some());
        let day = parse_date("2026-08-27").unwrap();
        assert_eq!(day.to_rfc3339(), "2026-08-27T00:00:00+00:00");
        assert!(parse_date("not a date").is_none());
    }
}
