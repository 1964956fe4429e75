use rocket::{get, serde::json::Json, State};
use serde::Serialize;

use crate::database::{get_crm_stats, CrmStats};
use crate::server::ServerState;

#[derive(Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn error(message: String) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message),
        }
    }
}

#[get("/stats")]
pub async fn get_stats(state: &State<ServerState>) -> Json<ApiResponse<CrmStats>> {
    match get_crm_stats(&state.db_pool).await {
        Ok(stats) => Json(ApiResponse::success(stats)),
        Err(e) => Json(ApiResponse::error(e.to_string())),
    }
}
