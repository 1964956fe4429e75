use dialoguer::{theme::ColorfulTheme, Select};

use crate::models::{CliApp, Result, Tenant};

impl CliApp {
    pub async fn run_switch_tenant(&mut self) -> Result<()> {
        let tenants = [Tenant::CraftyCode, Tenant::Avalern];
        let current = self.workspace.tenant();

        let labels: Vec<String> = tenants
            .iter()
            .map(|t| {
                let collection = match t {
                    Tenant::CraftyCode => "sales leads",
                    Tenant::Avalern => "school district contacts",
                };
                if *t == current {
                    format!("{t} ({collection}) [current]")
                } else {
                    format!("{t} ({collection})")
                }
            })
            .collect();

        let selection = Select::with_theme(&ColorfulTheme::default())
            .with_prompt("Switch to tenant")
            .default(0)
            .items(&labels)
            .interact()?;

        let tenant = tenants[selection];
        if tenant == current {
            println!("Already on {tenant}.");
            return Ok(());
        }

        self.workspace.set_tenant(&self.db_pool, tenant).await?;
        Ok(())
    }
}
