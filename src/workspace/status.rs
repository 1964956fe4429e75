use crate::models::{Lead, LeadStatus, LeadUpdate};

/// Recomputes the status a save should persist. Assigning a campaign to a
/// not-contacted lead moves it to actively-contacting; removing the campaign
/// while actively-contacting reverts it. Every other status is whatever the
/// user picked and is never auto-reverted.
pub fn next_status(old: &Lead, update: &LeadUpdate) -> LeadStatus {
    let had_campaign = old.campaign_id.is_some();
    let has_campaign = update.campaign_id.is_some();

    match update.status {
        LeadStatus::NotContacted if !had_campaign && has_campaign => LeadStatus::ActivelyContacting,
        LeadStatus::ActivelyContacting if had_campaign && !has_campaign => LeadStatus::NotContacted,
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn lead(status: LeadStatus, campaign_id: Option<&str>) -> Lead {
        Lead {
            id: "l1".to_string(),
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            email: "ada@example.com".to_string(),
            phone: None,
            city: None,
            state: None,
            company: "CraftyCode".to_string(),
            linkedin_url: None,
            website_link: None,
            online_profile: None,
            source: crate::models::LeadSource::Other,
            status,
            campaign_id: campaign_id.map(str::to_string),
            notes: None,
            last_contacted_at: None,
            created_at: Utc::now(),
            touchpoints_count: 0,
            scheduled_touchpoints_count: 0,
        }
    }

    #[test]
    fn assigning_campaign_moves_not_contacted_to_actively_contacting() {
        let old = lead(LeadStatus::NotContacted, None);
        let mut update = LeadUpdate::from_lead(&old);
        update.campaign_id = Some("camp-1".to_string());
        assert_eq!(next_status(&old, &update), LeadStatus::ActivelyContacting);
    }

    #[test]
    fn removing_campaign_reverts_actively_contacting() {
        let old = lead(LeadStatus::ActivelyContacting, Some("camp-1"));
        let mut update = LeadUpdate::from_lead(&old);
        update.campaign_id = None;
        assert_eq!(next_status(&old, &update), LeadStatus::NotContacted);
    }

    #[test]
    fn manual_statuses_are_never_auto_reverted() {
        // Removing a campaign from an engaged lead leaves it engaged.
        let old = lead(LeadStatus::Engaged, Some("camp-1"));
        let mut update = LeadUpdate::from_lead(&old);
        update.campaign_id = None;
        assert_eq!(next_status(&old, &update), LeadStatus::Engaged);

        // Assigning a campaign to a won lead leaves it won.
        let old = lead(LeadStatus::Won, None);
        let mut update = LeadUpdate::from_lead(&old);
        update.campaign_id = Some("camp-2".to_string());
        assert_eq!(next_status(&old, &update), LeadStatus::Won);
    }

    #[test]
    fn manual_selection_wins_over_the_auto_transition() {
        // User sets both a campaign and an explicit status in one save.
        let old = lead(LeadStatus::NotContacted, None);
        let mut update = LeadUpdate::from_lead(&old);
        update.campaign_id = Some("camp-1".to_string());
        update.status = LeadStatus::Engaged;
        assert_eq!(next_status(&old, &update), LeadStatus::Engaged);
    }

    #[test]
    fn unchanged_campaign_does_not_transition() {
        let old = lead(LeadStatus::ActivelyContacting, Some("camp-1"));
        let update = LeadUpdate::from_lead(&old);
        assert_eq!(next_status(&old, &update), LeadStatus::ActivelyContacting);

        let old = lead(LeadStatus::NotContacted, None);
        let update = LeadUpdate::from_lead(&old);
        assert_eq!(next_status(&old, &update), LeadStatus::NotContacted);
    }
}
