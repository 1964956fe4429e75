use tracing::info;

use crate::csv_io::{export_filename, export_to_csv};
use crate::models::{CliApp, CrmContact, Lead, Result, Tenant};

impl CliApp {
    pub async fn run_export_csv(&mut self) -> Result<()> {
        if self.workspace.tenant() == Tenant::Avalern {
            println!("📤 CSV export covers the sales-lead collection. Switch to CraftyCode first.");
            return Ok(());
        }

        // Export follows the current filters, same as the list on screen.
        let leads: Vec<Lead> = self
            .workspace
            .filtered()
            .into_iter()
            .filter_map(|c| match c {
                CrmContact::Lead(lead) => Some(lead.clone()),
                CrmContact::District(_) => None,
            })
            .collect();

        if leads.is_empty() {
            println!("❌ No leads match the current filters; nothing to export.");
            return Ok(());
        }

        std::fs::create_dir_all(&self.config.output.directory)?;
        let path = export_filename(&self.config.output.directory);
        export_to_csv(&leads, &path)?;

        info!("✓ Exported {} lead(s) to {}", leads.len(), path.display());
        println!("✅ Exported {} lead(s) to {}", leads.len(), path.display());
        Ok(())
    }
}
