use tracing::debug;

use crate::database::get_crm_stats;
use crate::models::{CliApp, LeadStatus, Result};

impl CliApp {
    pub async fn show_database_stats(&self) -> Result<()> {
        debug!("📊 show_database_stats() - Starting...");

        let stats = get_crm_stats(&self.db_pool).await?;

        println!("\n📊 Database Statistics");
        println!("━━━━━━━━━━━━━━━━━━━━━━━━━━");
        println!("👤 Leads: {}", stats.total_leads);
        println!("📣 Leads on a campaign: {}", stats.leads_with_campaign);
        println!("🏫 District contacts: {}", stats.total_district_contacts);
        println!("🏛️  Districts: {}", stats.total_districts);
        println!("📢 Campaigns: {}", stats.total_campaigns);
        println!(
            "📞 Touchpoints: {} ({} completed, {} scheduled)",
            stats.total_touchpoints, stats.completed_touchpoints, stats.scheduled_touchpoints
        );

        if !stats.leads_by_status.is_empty() {
            println!("\n📈 Leads by status:");
            for status in LeadStatus::ALL {
                if let Some(count) = stats.leads_by_status.get(status.as_str()) {
                    println!("   {}: {}", status.label(), count);
                }
            }
        }

        Ok(())
    }
}
