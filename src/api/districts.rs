use rocket::{get, post, serde::json::Json, FromForm, State};
use serde::{Deserialize, Serialize};

use crate::api::stats::ApiResponse;
use crate::database::{self, DistrictQuery, DistrictRow};
use crate::models::{District, LeadStatus};
use crate::server::ServerState;

#[derive(FromForm)]
pub struct DistrictParams {
    pub status: Option<String>,
    pub county: Option<String>,
    pub search: Option<String>,
    #[field(name = "campaignId")]
    pub campaign_id: Option<String>,
    #[field(name = "assignedOnly")]
    pub assigned_only: Option<bool>,
    #[field(name = "userId")]
    pub user_id: Option<String>,
}

#[derive(Serialize)]
pub struct DistrictsResponse {
    pub districts: Vec<DistrictRow>,
    #[serde(rename = "totalCount")]
    pub total_count: usize,
}

#[get("/districts?<params..>")]
pub async fn get_districts(
    state: &State<ServerState>,
    params: DistrictParams,
) -> Json<ApiResponse<DistrictsResponse>> {
    let query = DistrictQuery {
        status: params.status.as_deref().and_then(LeadStatus::parse),
        county: params.county,
        search: params.search,
        campaign_id: params.campaign_id,
        assigned_only: params.assigned_only.unwrap_or(false),
        user_id: params.user_id,
    };

    let conn = match state.db_pool.get().await {
        Ok(conn) => conn,
        Err(e) => return Json(ApiResponse::error(e.to_string())),
    };
    match database::list_districts(&conn, &query) {
        Ok(districts) => {
            let total_count = districts.len();
            Json(ApiResponse::success(DistrictsResponse {
                districts,
                total_count,
            }))
        }
        Err(e) => Json(ApiResponse::error(e.to_string())),
    }
}

#[derive(Deserialize)]
pub struct CreateDistrictRequest {
    pub name: Option<String>,
    pub county: Option<String>,
    pub state: Option<String>,
}

#[post("/districts", format = "json", data = "<body>")]
pub async fn create_district(
    state: &State<ServerState>,
    body: Json<CreateDistrictRequest>,
) -> Json<ApiResponse<District>> {
    let request = body.into_inner();
    let name = match request.name.as_deref().map(str::trim) {
        Some(name) if !name.is_empty() => name.to_string(),
        _ => return Json(ApiResponse::error("name is required".to_string())),
    };
    let county = match request.county.as_deref().map(str::trim) {
        Some(county) if !county.is_empty() => county.to_string(),
        _ => return Json(ApiResponse::error("county is required".to_string())),
    };
    let district_state = request
        .state
        .filter(|s| !s.trim().is_empty())
        .unwrap_or_else(|| "California".to_string());

    let conn = match state.db_pool.get().await {
        Ok(conn) => conn,
        Err(e) => return Json(ApiResponse::error(e.to_string())),
    };
    match database::insert_district(&conn, &name, &county, &district_state) {
        Ok(district) => Json(ApiResponse::success(district)),
        Err(e) => Json(ApiResponse::error(e.to_string())),
    }
}
