use chrono::{NaiveDate, TimeZone, Utc};
use dialoguer::{theme::ColorfulTheme, Input, Select};

use crate::models::{CliApp, NewTouchpoint, Result, TouchpointType};

impl CliApp {
    pub async fn run_add_touchpoint(&mut self) -> Result<()> {
        let id = match self.pick_contact_from_page("Record a touchpoint for")? {
            Some(id) => id,
            None => return Ok(()),
        };
        let parent = match self.workspace.contact(&id) {
            Some(contact) => contact.touchpoint_parent(),
            None => return Ok(()),
        };

        let theme = ColorfulTheme::default();

        let type_labels: Vec<&str> = TouchpointType::ALL.iter().map(|t| t.label()).collect();
        let pick = Select::with_theme(&theme)
            .with_prompt("Touchpoint type")
            .default(0)
            .items(&type_labels)
            .interact()?;
        let touchpoint_type = TouchpointType::ALL[pick];

        let subject: String = Input::with_theme(&theme)
            .with_prompt("Subject")
            .interact_text()?;
        let content: String = Input::with_theme(&theme)
            .with_prompt("Details (optional)")
            .allow_empty(true)
            .interact_text()?;
        let content = {
            let trimmed = content.trim().to_string();
            if trimmed.is_empty() {
                None
            } else {
                Some(trimmed)
            }
        };

        let timing = Select::with_theme(&theme)
            .with_prompt("When")
            .default(0)
            .items(&["✅ Completed just now", "🗓️  Schedule for later"])
            .interact()?;

        let (scheduled_at, completed_at, outcome) = if timing == 0 {
            let outcome: String = Input::with_theme(&theme)
                .with_prompt("Outcome (empty leaves it unrecorded)")
                .allow_empty(true)
                .interact_text()?;
            let outcome = {
                let trimmed = outcome.trim().to_string();
                if trimmed.is_empty() {
                    None
                } else {
                    Some(trimmed)
                }
            };
            (None, Some(Utc::now()), outcome)
        } else {
            let date: String = Input::with_theme(&theme)
                .with_prompt("Scheduled date (YYYY-MM-DD)")
                .interact_text()?;
            let date = NaiveDate::parse_from_str(date.trim(), "%Y-%m-%d")?;
            let scheduled = Utc
                .from_utc_datetime(&date.and_hms_opt(9, 0, 0).ok_or("invalid time of day")?);
            (Some(scheduled), None, None)
        };

        let touchpoint = NewTouchpoint {
            parent,
            touchpoint_type,
            subject,
            content,
            scheduled_at,
            completed_at,
            outcome,
        };

        self.workspace.add_touchpoint(&self.db_pool, touchpoint).await?;

        if let Some(contact) = self.workspace.contact(&id) {
            println!(
                "✅ Touchpoint recorded for {} ({} completed, {} scheduled).",
                contact.full_name(),
                contact.touchpoints_count(),
                contact.scheduled_touchpoints_count()
            );
        }
        Ok(())
    }
}
