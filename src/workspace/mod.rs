// The in-memory working set behind both the CLI and the lead listing API:
// fetched contacts and campaigns for one tenant, plus filter, pagination,
// and selection state, with mutation handlers that patch locally after a
// successful write.

use std::collections::HashSet;

use tracing::{debug, info};

use crate::database::{self, DbPool};
use crate::models::{
    Campaign, CrmContact, LeadSource, LeadStatus, LeadUpdate, NewTouchpoint, Result, Tenant,
    Touchpoint, TouchpointParent,
};

pub mod filters;
pub mod status;
pub mod sync;

pub use filters::FilterState;
use sync::{SyncClient, SyncSummary};

pub struct LeadWorkspace {
    tenant: Tenant,
    contacts: Vec<CrmContact>,
    campaigns: Vec<Campaign>,
    pub filters: FilterState,
    current_page: usize,
    items_per_page: usize,
    selected: HashSet<String>,
    open_parent: Option<TouchpointParent>,
    open_touchpoints: Vec<Touchpoint>,
}

impl LeadWorkspace {
    pub fn new(tenant: Tenant, items_per_page: usize) -> Self {
        Self {
            tenant,
            contacts: Vec::new(),
            campaigns: Vec::new(),
            filters: FilterState::default(),
            current_page: 1,
            items_per_page: items_per_page.max(1),
            selected: HashSet::new(),
            open_parent: None,
            open_touchpoints: Vec::new(),
        }
    }

    pub fn tenant(&self) -> Tenant {
        self.tenant
    }

    pub fn campaigns(&self) -> &[Campaign] {
        &self.campaigns
    }

    pub fn contact(&self, id: &str) -> Option<&CrmContact> {
        self.contacts.iter().find(|c| c.id() == id)
    }

    pub fn open_touchpoints(&self) -> &[Touchpoint] {
        &self.open_touchpoints
    }

    /// Reloads campaigns and the tenant collection. Nothing is assigned
    /// until both fetches succeed, so a failure leaves prior state intact.
    /// Overlapping refreshes cannot race: `&mut self` serializes them.
    pub async fn refresh(&mut self, pool: &DbPool) -> Result<()> {
        let campaigns = database::fetch_campaigns(pool, self.tenant.company()).await?;
        let contacts = database::fetch_contacts(pool, self.tenant).await?;
        debug!(
            "Workspace refreshed: {} contacts, {} campaigns ({})",
            contacts.len(),
            campaigns.len(),
            self.tenant
        );
        self.campaigns = campaigns;
        self.contacts = contacts;
        Ok(())
    }

    /// Switches the session collection. Filters, pagination, and selection
    /// are meaningless across tenants, so they reset with the data.
    pub async fn set_tenant(&mut self, pool: &DbPool, tenant: Tenant) -> Result<()> {
        let campaigns = database::fetch_campaigns(pool, tenant.company()).await?;
        let contacts = database::fetch_contacts(pool, tenant).await?;

        self.tenant = tenant;
        self.campaigns = campaigns;
        self.contacts = contacts;
        self.filters = FilterState::default();
        self.current_page = 1;
        self.selected.clear();
        self.open_parent = None;
        self.open_touchpoints.clear();
        info!("✓ Switched tenant to {}", tenant);
        Ok(())
    }

    // --- derived views ---

    pub fn filtered(&self) -> Vec<&CrmContact> {
        filters::filter_contacts(&self.contacts, &self.filters)
    }

    pub fn paginated(&self) -> Vec<&CrmContact> {
        let filtered = self.filtered();
        filters::paginate(&filtered, self.current_page, self.items_per_page)
    }

    pub fn total_pages(&self) -> usize {
        filters::total_pages(self.filtered().len(), self.items_per_page)
    }

    pub fn current_page(&self) -> usize {
        self.current_page
    }

    pub fn items_per_page(&self) -> usize {
        self.items_per_page
    }

    // --- filter setters; every change snaps back to page 1 ---

    pub fn set_search(&mut self, search: String) {
        self.filters.search = search;
        self.current_page = 1;
    }

    pub fn set_status_filter(&mut self, status: Option<LeadStatus>) {
        self.filters.status = status;
        self.current_page = 1;
    }

    pub fn set_campaign_filter(&mut self, campaign_id: Option<String>) {
        self.filters.campaign_id = campaign_id;
        self.current_page = 1;
    }

    pub fn set_source_filter(&mut self, source: Option<LeadSource>) {
        self.filters.source = source;
        self.current_page = 1;
    }

    pub fn set_city_filter(&mut self, city: Option<String>) {
        self.filters.city = city;
        self.current_page = 1;
    }

    pub fn set_page(&mut self, page: usize) {
        self.current_page = page.max(1);
    }

    pub fn set_items_per_page(&mut self, items_per_page: usize) {
        self.items_per_page = items_per_page.max(1);
        self.current_page = 1;
    }

    // --- selection ---

    pub fn selected_ids(&self) -> Vec<String> {
        self.selected.iter().cloned().collect()
    }

    pub fn is_selected(&self, id: &str) -> bool {
        self.selected.contains(id)
    }

    pub fn toggle_selected(&mut self, id: &str) {
        if !self.selected.remove(id) {
            self.selected.insert(id.to_string());
        }
    }

    pub fn select_all(&mut self) {
        self.selected = self.filtered().iter().map(|c| c.id().to_string()).collect();
    }

    pub fn clear_selection(&mut self) {
        self.selected.clear();
    }

    /// Selects the first N of the filtered view; N = 0 clears.
    pub fn select_first_n(&mut self, n: usize) {
        if n == 0 {
            self.selected.clear();
            return;
        }
        self.selected = self
            .filtered()
            .iter()
            .take(n)
            .map(|c| c.id().to_string())
            .collect();
    }

    // --- mutations ---

    /// Saves an edited lead. The stored status is recomputed via the
    /// campaign auto-transition rule before the write, and only the mutated
    /// row is patched locally afterwards.
    pub async fn update_lead(&mut self, pool: &DbPool, id: &str, update: LeadUpdate) -> Result<()> {
        let old = match self.contacts.iter().find(|c| c.id() == id) {
            Some(CrmContact::Lead(lead)) => lead.clone(),
            Some(CrmContact::District(_)) => {
                return Err(format!("contact {id} is a district contact, not a lead").into())
            }
            None => return Err(format!("unknown lead: {id}").into()),
        };

        let next = status::next_status(&old, &update);
        let conn = pool.get().await?;
        database::update_lead(&conn, id, &update, next)?;

        if let Some(CrmContact::Lead(lead)) = self.contacts.iter_mut().find(|c| c.id() == id) {
            lead.first_name = update.first_name;
            lead.last_name = update.last_name;
            lead.email = update.email;
            lead.phone = update.phone;
            lead.city = update.city;
            lead.state = update.state;
            lead.source = update.source;
            lead.status = next;
            lead.campaign_id = update.campaign_id;
            lead.notes = update.notes;
        }
        Ok(())
    }

    /// Loads the touchpoint list for a contact and marks it as the open one.
    pub async fn open_contact(&mut self, pool: &DbPool, id: &str) -> Result<()> {
        let parent = self
            .contacts
            .iter()
            .find(|c| c.id() == id)
            .map(|c| c.touchpoint_parent())
            .ok_or_else(|| format!("unknown contact: {id}"))?;

        let conn = pool.get().await?;
        let touchpoints = database::touchpoints_for_parent(&conn, &parent)?;
        self.open_parent = Some(parent);
        self.open_touchpoints = touchpoints;
        Ok(())
    }

    /// Records a touchpoint. The open contact's touchpoint list is
    /// refetched, last_contacted_at is updated when the touchpoint carries a
    /// completion date, and the local touchpoints_count becomes the
    /// previously-completed-with-outcome tally plus one if the new
    /// touchpoint itself completes with an outcome.
    pub async fn add_touchpoint(&mut self, pool: &DbPool, tp: NewTouchpoint) -> Result<()> {
        let conn = pool.get().await?;
        database::insert_touchpoint(&conn, &tp)?;

        let opened = self.open_parent.as_ref() == Some(&tp.parent);
        let prev_completed = if opened {
            self.open_touchpoints
                .iter()
                .filter(|t| t.counts_toward_completed())
                .count() as i64
        } else {
            0
        };

        if opened {
            self.open_touchpoints = database::touchpoints_for_parent(&conn, &tp.parent)?;
        }

        if let Some(completed_at) = tp.completed_at {
            database::update_last_contacted(&conn, &tp.parent, completed_at)?;
        }

        let new_completed = tp.completed_at.is_some() && tp.outcome.is_some();
        if let Some(contact) = self
            .contacts
            .iter_mut()
            .find(|c| c.id() == tp.parent.id())
        {
            let count = if opened {
                prev_completed + if new_completed { 1 } else { 0 }
            } else {
                contact.touchpoints_count() + if new_completed { 1 } else { 0 }
            };
            match contact {
                CrmContact::Lead(lead) => {
                    lead.touchpoints_count = count;
                    if let Some(at) = tp.completed_at {
                        lead.last_contacted_at = Some(at);
                    }
                }
                CrmContact::District(dc) => {
                    dc.touchpoints_count = count;
                    if let Some(at) = tp.completed_at {
                        dc.last_contacted_at = Some(at);
                    }
                }
            }
        }
        Ok(())
    }

    /// Bulk "Sync Instantly" push. Uses the explicit selection, or the full
    /// filtered set when nothing is selected. On success the collection is
    /// refetched (and the open contact's touchpoints reloaded); on failure
    /// the endpoint's error message propagates to the caller.
    pub async fn sync_instantly(&mut self, pool: &DbPool, client: &SyncClient) -> Result<SyncSummary> {
        let ids: Vec<String> = if self.selected.is_empty() {
            self.filtered().iter().map(|c| c.id().to_string()).collect()
        } else {
            self.selected_ids()
        };

        let summary = client.sync(ids).await?;

        self.refresh(pool).await?;
        if let Some(parent) = self.open_parent.clone() {
            let conn = pool.get().await?;
            self.open_touchpoints = database::touchpoints_for_parent(&conn, &parent)?;
        }
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Lead;
    use chrono::Utc;

    fn lead(id: &str, first: &str, email: &str) -> CrmContact {
        CrmContact::Lead(Lead {
            id: id.to_string(),
            first_name: first.to_string(),
            last_name: "Test".to_string(),
            email: email.to_string(),
            phone: None,
            city: None,
            state: None,
            company: "CraftyCode".to_string(),
            linkedin_url: None,
            website_link: None,
            online_profile: None,
            source: LeadSource::Other,
            status: LeadStatus::NotContacted,
            campaign_id: None,
            notes: None,
            last_contacted_at: None,
            created_at: Utc::now(),
            touchpoints_count: 0,
            scheduled_touchpoints_count: 0,
        })
    }

    fn workspace_with_contacts() -> LeadWorkspace {
        let mut ws = LeadWorkspace::new(Tenant::CraftyCode, 2);
        ws.contacts = vec![
            lead("1", "Ada", "ada@example.com"),
            lead("2", "Grace", "grace@example.com"),
            lead("3", "Linus", "linus@kernel.org"),
        ];
        ws
    }

    #[test]
    fn filter_changes_reset_the_page() {
        let mut ws = workspace_with_contacts();
        ws.set_page(2);
        assert_eq!(ws.current_page(), 2);

        ws.set_search("ada".to_string());
        assert_eq!(ws.current_page(), 1);

        ws.set_page(2);
        ws.set_status_filter(Some(LeadStatus::Won));
        assert_eq!(ws.current_page(), 1);

        ws.set_page(2);
        ws.set_city_filter(None);
        assert_eq!(ws.current_page(), 1);
    }

    #[test]
    fn pagination_over_the_filtered_view() {
        let mut ws = workspace_with_contacts();
        assert_eq!(ws.total_pages(), 2);
        assert_eq!(ws.paginated().len(), 2);

        ws.set_page(2);
        let page = ws.paginated();
        assert_eq!(page.len(), 1);
        assert_eq!(page[0].id(), "3");
    }

    #[test]
    fn selection_toggle_all_clear_and_first_n() {
        let mut ws = workspace_with_contacts();

        ws.toggle_selected("1");
        assert!(ws.is_selected("1"));
        ws.toggle_selected("1");
        assert!(!ws.is_selected("1"));

        ws.select_all();
        assert_eq!(ws.selected_ids().len(), 3);

        ws.select_first_n(2);
        assert_eq!(ws.selected_ids().len(), 2);
        assert!(ws.is_selected("1") && ws.is_selected("2"));

        ws.select_first_n(0);
        assert!(ws.selected_ids().is_empty());

        ws.select_all();
        ws.clear_selection();
        assert!(ws.selected_ids().is_empty());
    }

    #[test]
    fn select_all_respects_the_active_filter() {
        let mut ws = workspace_with_contacts();
        ws.set_search("grace".to_string());
        ws.select_all();
        assert_eq!(ws.selected_ids(), vec!["2".to_string()]);
    }
}
