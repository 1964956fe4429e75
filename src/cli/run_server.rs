use tracing::info;

use crate::models::{CliApp, Result};
use crate::server::build_rocket;

impl CliApp {
    /// Runs the Rocket API in the foreground until it shuts down.
    pub async fn run_server(&mut self) -> Result<()> {
        info!(
            "🌐 Starting API server on {}:{}",
            self.config.server.address, self.config.server.port
        );
        println!(
            "🌐 API server listening on http://{}:{}/api (Ctrl+C to stop)",
            self.config.server.address, self.config.server.port
        );

        build_rocket(self.config.clone(), self.db_pool.clone())
            .launch()
            .await?;

        info!("API server stopped");
        Ok(())
    }
}
