use std::path::Path;

use dialoguer::{theme::ColorfulTheme, Confirm, Input};
use tracing::info;

use crate::csv_io::{convert_to_lead_insert, deduplicate_leads, parse_csv_file, validate_leads};
use crate::database;
use crate::models::{CliApp, Result, Tenant};

impl CliApp {
    pub async fn run_import_csv(&mut self) -> Result<()> {
        if self.workspace.tenant() == Tenant::Avalern {
            println!("📥 CSV import targets the sales-lead collection. Switch to CraftyCode first.");
            return Ok(());
        }
        let company = self.workspace.tenant().company();

        let path: String = Input::with_theme(&ColorfulTheme::default())
            .with_prompt("Path to CSV file")
            .interact_text()?;
        let path = Path::new(path.trim());

        // A malformed row rejects the whole file; nothing is half-imported.
        let rows = parse_csv_file(path)?;
        println!("📄 Parsed {} row(s) from {}", rows.len(), path.display());

        let outcome = validate_leads(rows);
        if !outcome.invalid.is_empty() {
            println!("\n⚠️  {} row(s) failed validation and will be skipped:", outcome.invalid.len());
            for invalid in &outcome.invalid {
                println!(
                    "   Row {}: {} {} — {}",
                    invalid.row_index,
                    invalid.lead.first_name,
                    invalid.lead.last_name,
                    invalid.reasons.join(", ")
                );
            }
        }
        if outcome.valid.is_empty() {
            println!("❌ No valid rows to import.");
            return Ok(());
        }

        let conn = self.db_pool.get().await?;
        let existing = database::existing_lead_emails(&conn, company)?;
        let before = outcome.valid.len();
        let deduped = deduplicate_leads(outcome.valid, &existing);
        let skipped = before - deduped.len();
        if skipped > 0 {
            println!("♻️  {skipped} duplicate email(s) skipped.");
        }
        if deduped.is_empty() {
            println!("❌ Every remaining row already exists.");
            return Ok(());
        }

        let proceed = Confirm::with_theme(&ColorfulTheme::default())
            .with_prompt(format!("Import {} lead(s) into {}?", deduped.len(), company))
            .default(true)
            .interact()?;
        if !proceed {
            println!("Import cancelled.");
            return Ok(());
        }

        let mut inserted = 0;
        for row in &deduped {
            let lead = convert_to_lead_insert(row, company);
            database::insert_lead(&conn, &lead)?;
            inserted += 1;
        }
        drop(conn);

        info!("✓ Imported {} lead(s) into {}", inserted, company);
        println!("✅ Imported {inserted} lead(s).");

        self.workspace.refresh(&self.db_pool).await?;
        Ok(())
    }
}
