use dialoguer::{theme::ColorfulTheme, Confirm};
use tracing::warn;

use crate::models::{CliApp, Result};

impl CliApp {
    pub async fn run_sync_instantly(&mut self) -> Result<()> {
        let selected = self.workspace.selected_ids().len();
        let filtered = self.workspace.filtered().len();

        let target = if selected > 0 {
            format!("{selected} selected contact(s)")
        } else {
            format!("all {filtered} filtered contact(s)")
        };
        if selected == 0 && filtered == 0 {
            println!("❌ Nothing to sync: no contacts match the current filters.");
            return Ok(());
        }

        let proceed = Confirm::with_theme(&ColorfulTheme::default())
            .with_prompt(format!("🚀 Push {target} to Instantly?"))
            .default(false)
            .interact()?;
        if !proceed {
            println!("Sync cancelled.");
            return Ok(());
        }

        println!("⏳ Syncing...");
        let pool = self.db_pool.clone();
        let summary = self.workspace.sync_instantly(&pool, &self.sync_client).await?;

        println!(
            "✅ Sync complete: {}/{} emails pushed.",
            summary.synced_count, summary.total_emails
        );
        if let Some(errors) = &summary.errors {
            for error in errors {
                warn!("Sync issue: {}", error);
                println!("⚠️  {error}");
            }
        }
        Ok(())
    }
}
