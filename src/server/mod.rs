use rocket::{routes, Build, Rocket};

use crate::api::*;
use crate::config::Config;
use crate::database::DbPool;

pub mod routes;

pub struct ServerState {
    pub config: Config,
    pub db_pool: DbPool,
}

pub fn build_rocket(config: Config, db_pool: DbPool) -> Rocket<Build> {
    let figment = rocket::Config::figment()
        .merge(("address", config.server.address.clone()))
        .merge(("port", config.server.port));
    let state = ServerState { config, db_pool };

    rocket::custom(figment).manage(state).mount(
        "/api",
        routes![
            // Health and info endpoints
            routes::health::health_check,
            routes::health::index,
            // Stats
            get_stats,
            // Leads
            get_leads,
            // Districts and assignments
            get_districts,
            create_district,
            get_user_districts,
            update_user_districts,
            get_user_touchpoints,
            // Outreach sync
            sync_instantly,
        ],
    )
}
