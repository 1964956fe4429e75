use rocket::{get, serde::json::Json, FromForm, State};
use serde::Serialize;

use crate::api::stats::ApiResponse;
use crate::database::fetch_contacts;
use crate::models::{CrmContact, LeadSource, LeadStatus, Tenant};
use crate::server::ServerState;
use crate::workspace::filters::{self, FilterState};

#[derive(FromForm)]
pub struct LeadListParams {
    pub tenant: Option<String>,
    pub search: Option<String>,
    pub status: Option<String>,
    #[field(name = "campaignId")]
    pub campaign_id: Option<String>,
    pub source: Option<String>,
    pub city: Option<String>,
    pub page: Option<usize>,
    pub per_page: Option<usize>,
}

#[derive(Serialize)]
pub struct LeadsResponse {
    pub leads: Vec<CrmContact>,
    pub total_count: usize,
    pub page: usize,
    pub per_page: usize,
}

/// Lead listing over the same pure filter/paginate functions the CLI uses.
#[get("/leads?<params..>")]
pub async fn get_leads(
    state: &State<ServerState>,
    params: LeadListParams,
) -> Json<ApiResponse<LeadsResponse>> {
    let tenant = params
        .tenant
        .as_deref()
        .and_then(Tenant::parse)
        .unwrap_or(Tenant::CraftyCode);

    let contacts = match fetch_contacts(&state.db_pool, tenant).await {
        Ok(contacts) => contacts,
        Err(e) => return Json(ApiResponse::error(e.to_string())),
    };

    let filter_state = FilterState {
        search: params.search.unwrap_or_default(),
        status: params.status.as_deref().and_then(LeadStatus::parse),
        campaign_id: params.campaign_id,
        source: params.source.as_deref().and_then(LeadSource::parse_exact),
        city: params.city,
    };

    let page = params.page.unwrap_or(1).max(1);
    let per_page = params.per_page.unwrap_or(50).min(1000).max(1);

    let filtered = filters::filter_contacts(&contacts, &filter_state);
    let total_count = filtered.len();
    let leads = filters::paginate(&filtered, page, per_page)
        .into_iter()
        .cloned()
        .collect();

    Json(ApiResponse::success(LeadsResponse {
        leads,
        total_count,
        page,
        per_page,
    }))
}
