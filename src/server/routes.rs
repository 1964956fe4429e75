pub mod health {
    use rocket::{get, serde::json::Json};
    use serde_json::{json, Value};

    #[get("/health")]
    pub async fn health_check() -> Json<Value> {
        Json(json!({
            "status": "healthy",
            "timestamp": chrono::Utc::now().to_rfc3339(),
            "service": "lead-crm-api"
        }))
    }

    #[get("/")]
    pub async fn index() -> Json<Value> {
        Json(json!({
            "name": "Lead CRM API",
            "version": "0.1.0",
            "description": "API for leads, districts, touchpoints, and outreach sync",
            "endpoints": {
                "health": "/api/health",
                "stats": "/api/stats",
                "leads": "/api/leads",
                "districts": "/api/districts",
                "user_districts": "/api/users/<id>/leads",
                "user_touchpoints": "/api/users/<id>/touchpoints",
                "sync": "/api/sync-instantly"
            }
        }))
    }
}
