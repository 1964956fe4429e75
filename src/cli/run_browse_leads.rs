use dialoguer::{theme::ColorfulTheme, Input, Select};

use crate::models::{CliApp, LeadSource, LeadStatus, Result};

impl CliApp {
    pub async fn run_browse_leads(&mut self) -> Result<()> {
        loop {
            self.print_contact_page();

            let options = [
                "➡️  Next page",
                "⬅️  Previous page",
                "🔎 Search",
                "🎯 Filter by status",
                "📢 Filter by campaign",
                "🌐 Filter by source",
                "🏙️  Filter by city",
                "📄 Change page size",
                "☑️  Toggle selection",
                "✅ Select all (filtered)",
                "🔢 Select first N",
                "🧹 Clear selection",
                "📂 Open contact (touchpoints)",
                "🔄 Refresh from database",
                "↩️  Back to main menu",
            ];

            let choice = Select::with_theme(&ColorfulTheme::default())
                .with_prompt("Browse")
                .default(0)
                .items(&options)
                .interact()?;

            match choice {
                0 => {
                    let page = self.workspace.current_page();
                    if page < self.workspace.total_pages() {
                        self.workspace.set_page(page + 1);
                    } else {
                        println!("Already on the last page.");
                    }
                }
                1 => {
                    let page = self.workspace.current_page();
                    if page > 1 {
                        self.workspace.set_page(page - 1);
                    } else {
                        println!("Already on the first page.");
                    }
                }
                2 => {
                    let search: String = Input::with_theme(&ColorfulTheme::default())
                        .with_prompt("Search (name, email, company/title, district, county; empty clears)")
                        .allow_empty(true)
                        .interact_text()?;
                    self.workspace.set_search(search);
                }
                3 => {
                    let mut labels = vec!["All statuses".to_string()];
                    labels.extend(LeadStatus::ALL.iter().map(|s| s.label().to_string()));
                    let pick = Select::with_theme(&ColorfulTheme::default())
                        .with_prompt("Status filter")
                        .default(0)
                        .items(&labels)
                        .interact()?;
                    let status = if pick == 0 {
                        None
                    } else {
                        Some(LeadStatus::ALL[pick - 1])
                    };
                    self.workspace.set_status_filter(status);
                }
                4 => {
                    let campaigns: Vec<(String, String)> = self
                        .workspace
                        .campaigns()
                        .iter()
                        .map(|c| (c.id.clone(), c.name.clone()))
                        .collect();
                    let mut labels = vec!["All campaigns".to_string()];
                    labels.extend(campaigns.iter().map(|(_, name)| name.clone()));
                    let pick = Select::with_theme(&ColorfulTheme::default())
                        .with_prompt("Campaign filter")
                        .default(0)
                        .items(&labels)
                        .interact()?;
                    let campaign_id = if pick == 0 {
                        None
                    } else {
                        Some(campaigns[pick - 1].0.clone())
                    };
                    self.workspace.set_campaign_filter(campaign_id);
                }
                5 => {
                    let mut labels = vec!["All sources".to_string()];
                    labels.extend(LeadSource::ALL.iter().map(|s| s.as_str().to_string()));
                    let pick = Select::with_theme(&ColorfulTheme::default())
                        .with_prompt("Source filter")
                        .default(0)
                        .items(&labels)
                        .interact()?;
                    let source = if pick == 0 {
                        None
                    } else {
                        Some(LeadSource::ALL[pick - 1])
                    };
                    self.workspace.set_source_filter(source);
                }
                6 => {
                    let city: String = Input::with_theme(&ColorfulTheme::default())
                        .with_prompt("City filter (empty clears)")
                        .allow_empty(true)
                        .interact_text()?;
                    let city = city.trim().to_string();
                    self.workspace
                        .set_city_filter(if city.is_empty() { None } else { Some(city) });
                }
                7 => {
                    let size: usize = Input::with_theme(&ColorfulTheme::default())
                        .with_prompt("Contacts per page")
                        .default(self.workspace.items_per_page())
                        .interact_text()?;
                    self.workspace.set_items_per_page(size);
                }
                8 => {
                    if let Some(id) = self.pick_contact_from_page("Toggle selection for")? {
                        self.workspace.toggle_selected(&id);
                    }
                }
                9 => {
                    self.workspace.select_all();
                    println!("☑️  {} contacts selected.", self.workspace.selected_ids().len());
                }
                10 => {
                    let n: usize = Input::with_theme(&ColorfulTheme::default())
                        .with_prompt("Select the first N filtered contacts (0 clears)")
                        .interact_text()?;
                    self.workspace.select_first_n(n);
                }
                11 => {
                    self.workspace.clear_selection();
                }
                12 => {
                    if let Some(id) = self.pick_contact_from_page("Open")? {
                        self.workspace.open_contact(&self.db_pool, &id).await?;
                        self.print_open_touchpoints(&id);
                    }
                }
                13 => {
                    self.workspace.refresh(&self.db_pool).await?;
                    println!("🔄 Reloaded from database.");
                }
                _ => return Ok(()),
            }
        }
    }

    fn print_contact_page(&self) {
        let ws = &self.workspace;
        let total = ws.filtered().len();
        println!(
            "\n📋 {} — {} contact(s) after filters, page {}/{}",
            ws.tenant(),
            total,
            ws.current_page(),
            ws.total_pages().max(1)
        );

        for contact in ws.paginated() {
            let mark = if ws.is_selected(contact.id()) { "☑" } else { "☐" };
            let place = contact
                .district_name()
                .map(|d| format!("{} ({})", d, contact.county().unwrap_or("?")))
                .or_else(|| contact.city().map(|c| c.to_string()))
                .unwrap_or_default();
            println!(
                "  {} {} <{}> — {} | {} | 📞 {} done / {} scheduled",
                mark,
                contact.full_name(),
                contact.email(),
                contact.status().label(),
                place,
                contact.touchpoints_count(),
                contact.scheduled_touchpoints_count()
            );
        }

        let selected = ws.selected_ids().len();
        if selected > 0 {
            println!("  ── {selected} selected ──");
        }
    }

    /// Picks a contact from the current page, returning its id. Pagination
    /// keeps the pick list short enough for a dialoguer select.
    pub(super) fn pick_contact_from_page(&self, prompt: &str) -> Result<Option<String>> {
        let page = self.workspace.paginated();
        if page.is_empty() {
            println!("No contacts on this page.");
            return Ok(None);
        }

        let labels: Vec<String> = page
            .iter()
            .map(|c| format!("{} <{}>", c.full_name(), c.email()))
            .collect();

        let pick = Select::with_theme(&ColorfulTheme::default())
            .with_prompt(prompt)
            .default(0)
            .items(&labels)
            .interact()?;

        Ok(Some(page[pick].id().to_string()))
    }

    fn print_open_touchpoints(&self, id: &str) {
        let name = self
            .workspace
            .contact(id)
            .map(|c| c.full_name())
            .unwrap_or_else(|| id.to_string());
        let touchpoints = self.workspace.open_touchpoints();

        println!("\n📞 Touchpoints for {name}");
        let past: Vec<_> = touchpoints.iter().filter(|t| t.is_completed()).collect();
        let upcoming: Vec<_> = touchpoints.iter().filter(|t| t.is_scheduled()).collect();

        if past.is_empty() && upcoming.is_empty() {
            println!("  (none yet)");
            return;
        }

        if !past.is_empty() {
            println!("  Completed:");
            for tp in past {
                let when = tp
                    .completed_at
                    .map(|d| d.format("%Y-%m-%d").to_string())
                    .unwrap_or_default();
                let outcome = tp.outcome.as_deref().unwrap_or("no outcome recorded");
                println!("    ✅ [{}] {} — {} ({})", when, tp.touchpoint_type, tp.subject, outcome);
            }
        }
        if !upcoming.is_empty() {
            println!("  Scheduled:");
            for tp in upcoming {
                let when = tp
                    .scheduled_at
                    .map(|d| d.format("%Y-%m-%d").to_string())
                    .unwrap_or_default();
                println!("    🗓️  [{}] {} — {}", when, tp.touchpoint_type, tp.subject);
            }
        }
    }
}
