use dialoguer::{theme::ColorfulTheme, Input, Select};

use crate::models::{CliApp, CrmContact, LeadSource, LeadStatus, LeadUpdate, Result};

fn optional(value: String) -> Option<String> {
    let value = value.trim().to_string();
    if value.is_empty() {
        None
    } else {
        Some(value)
    }
}

impl CliApp {
    pub async fn run_edit_lead(&mut self) -> Result<()> {
        let id = match self.pick_contact_from_page("Edit which contact")? {
            Some(id) => id,
            None => return Ok(()),
        };

        let lead = match self.workspace.contact(&id) {
            Some(CrmContact::Lead(lead)) => lead.clone(),
            Some(CrmContact::District(_)) => {
                println!("✏️  District contacts are read-only here; only leads can be edited.");
                return Ok(());
            }
            None => return Ok(()),
        };

        let theme = ColorfulTheme::default();
        let mut update = LeadUpdate::from_lead(&lead);

        update.first_name = Input::with_theme(&theme)
            .with_prompt("First name")
            .default(lead.first_name.clone())
            .interact_text()?;
        update.last_name = Input::with_theme(&theme)
            .with_prompt("Last name")
            .default(lead.last_name.clone())
            .interact_text()?;
        update.email = Input::with_theme(&theme)
            .with_prompt("Email")
            .default(lead.email.clone())
            .interact_text()?;
        update.phone = optional(
            Input::with_theme(&theme)
                .with_prompt("Phone (empty clears)")
                .default(lead.phone.clone().unwrap_or_default())
                .allow_empty(true)
                .interact_text()?,
        );
        update.city = optional(
            Input::with_theme(&theme)
                .with_prompt("City (empty clears)")
                .default(lead.city.clone().unwrap_or_default())
                .allow_empty(true)
                .interact_text()?,
        );
        update.state = optional(
            Input::with_theme(&theme)
                .with_prompt("State (empty clears)")
                .default(lead.state.clone().unwrap_or_default())
                .allow_empty(true)
                .interact_text()?,
        );

        let status_default = LeadStatus::ALL.iter().position(|s| *s == lead.status).unwrap_or(0);
        let status_labels: Vec<String> = LeadStatus::ALL
            .iter()
            .map(|s| format!("{} — {}", s.label(), s.description()))
            .collect();
        let pick = Select::with_theme(&theme)
            .with_prompt("Status")
            .default(status_default)
            .items(&status_labels)
            .interact()?;
        update.status = LeadStatus::ALL[pick];

        let source_default = LeadSource::ALL.iter().position(|s| *s == lead.source).unwrap_or(0);
        let source_labels: Vec<&str> = LeadSource::ALL.iter().map(|s| s.as_str()).collect();
        let pick = Select::with_theme(&theme)
            .with_prompt("Source")
            .default(source_default)
            .items(&source_labels)
            .interact()?;
        update.source = LeadSource::ALL[pick];

        let campaigns: Vec<(String, String)> = self
            .workspace
            .campaigns()
            .iter()
            .map(|c| (c.id.clone(), c.name.clone()))
            .collect();
        let mut campaign_labels = vec!["No campaign".to_string()];
        campaign_labels.extend(campaigns.iter().map(|(_, name)| name.clone()));
        let campaign_default = lead
            .campaign_id
            .as_deref()
            .and_then(|id| campaigns.iter().position(|(cid, _)| cid == id))
            .map(|i| i + 1)
            .unwrap_or(0);
        let pick = Select::with_theme(&theme)
            .with_prompt("Campaign")
            .default(campaign_default)
            .items(&campaign_labels)
            .interact()?;
        update.campaign_id = if pick == 0 {
            None
        } else {
            Some(campaigns[pick - 1].0.clone())
        };

        update.notes = optional(
            Input::with_theme(&theme)
                .with_prompt("Notes (empty clears)")
                .default(lead.notes.clone().unwrap_or_default())
                .allow_empty(true)
                .interact_text()?,
        );

        match self.workspace.update_lead(&self.db_pool, &id, update).await {
            Ok(()) => {
                let saved = self
                    .workspace
                    .contact(&id)
                    .map(|c| c.status().label())
                    .unwrap_or("?");
                println!("✅ Saved. Status is now {saved}.");
                Ok(())
            }
            Err(e) => {
                // The failed save leaves the stored row untouched; surface it
                // and keep the session going.
                println!("❌ Save failed: {e}");
                Ok(())
            }
        }
    }
}
