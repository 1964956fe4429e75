use dialoguer::{theme::ColorfulTheme, Select};
use tracing::error;

use crate::{
    cli::cli::MenuAction,
    models::{CliApp, Result},
};

impl CliApp {
    pub async fn run(&mut self) -> Result<()> {
        println!("\n🚀 Welcome to Lead CRM!");
        println!("═══════════════════════════════════════");

        self.show_database_stats().await?;

        loop {
            let actions = vec![
                MenuAction::BrowseLeads,
                MenuAction::SwitchTenant,
                MenuAction::ImportCsv,
                MenuAction::ExportCsv,
                MenuAction::EditLead,
                MenuAction::AddTouchpoint,
                MenuAction::SyncInstantly,
                MenuAction::ShowStats,
                MenuAction::StartApiServer,
                MenuAction::Exit,
            ];

            let selection = Select::with_theme(&ColorfulTheme::default())
                .with_prompt(format!("\n[{}] Select an action", self.workspace.tenant()))
                .default(0)
                .items(&actions)
                .interact()?;

            match &actions[selection] {
                MenuAction::BrowseLeads => {
                    if let Err(e) = self.run_browse_leads().await {
                        error!("Browse failed: {}", e);
                    }
                }
                MenuAction::SwitchTenant => {
                    if let Err(e) = self.run_switch_tenant().await {
                        error!("Tenant switch failed: {}", e);
                    }
                }
                MenuAction::ImportCsv => {
                    if let Err(e) = self.run_import_csv().await {
                        error!("CSV import failed: {}", e);
                    }
                }
                MenuAction::ExportCsv => {
                    if let Err(e) = self.run_export_csv().await {
                        error!("CSV export failed: {}", e);
                    }
                }
                MenuAction::EditLead => {
                    if let Err(e) = self.run_edit_lead().await {
                        error!("Lead edit failed: {}", e);
                    }
                }
                MenuAction::AddTouchpoint => {
                    if let Err(e) = self.run_add_touchpoint().await {
                        error!("Touchpoint failed: {}", e);
                    }
                }
                MenuAction::SyncInstantly => {
                    if let Err(e) = self.run_sync_instantly().await {
                        error!("Sync failed: {}", e);
                    }
                }
                MenuAction::ShowStats => {
                    if let Err(e) = self.show_database_stats().await {
                        error!("Failed to show stats: {}", e);
                    }
                }
                MenuAction::StartApiServer => {
                    if let Err(e) = self.run_server().await {
                        error!("API server failed: {}", e);
                    }
                }
                MenuAction::Exit => {
                    println!("👋 Goodbye!");
                    return Ok(());
                }
            }
        }
    }
}
