use uuid::Uuid;

use super::types::CsvLead;
use crate::models::{LeadSource, LeadStatus, NewLead};

// Free-text city values the import recognizes; anything else maps to
// "Other". The city field has already been cut at the first comma by
// validation.
const KNOWN_CITIES: [&str; 10] = [
    "Los Angeles",
    "San Diego",
    "San Francisco",
    "San Jose",
    "Sacramento",
    "Fresno",
    "Long Beach",
    "Oakland",
    "Bakersfield",
    "Anaheim",
];

fn map_city(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    let mapped = KNOWN_CITIES
        .iter()
        .find(|city| city.eq_ignore_ascii_case(trimmed))
        .copied()
        .unwrap_or("Other");
    Some(mapped.to_string())
}

fn opt(s: &str) -> Option<String> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Maps a validated CSV row into the insertable lead shape for a company.
pub fn convert_to_lead_insert(lead: &CsvLead, company: &str) -> NewLead {
    NewLead {
        id: Uuid::new_v4().to_string(),
        first_name: lead.first_name.trim().to_string(),
        last_name: lead.last_name.trim().to_string(),
        email: lead.email.trim().to_string(),
        phone: opt(&lead.phone),
        city: map_city(&lead.city),
        state: None,
        company: company.to_string(),
        linkedin_url: opt(&lead.linkedin_url),
        website_link: opt(&lead.website_link),
        online_profile: opt(&lead.online_profile),
        source: LeadSource::parse(&lead.source),
        status: convert_to_status(lead),
        notes: opt(&lead.notes),
    }
}

/// Initial status from the import's outreach-history columns: a recorded
/// response means the lead is already engaged, a sent email or a made call
/// means outreach is in flight, otherwise nothing has happened yet.
pub fn convert_to_status(lead: &CsvLead) -> LeadStatus {
    let yes = |s: &str| s.eq_ignore_ascii_case("yes");
    if !lead.response.trim().is_empty() {
        LeadStatus::Engaged
    } else if yes(lead.email_sent.trim()) || yes(lead.call_made.trim()) {
        LeadStatus::ActivelyContacting
    } else {
        LeadStatus::NotContacted
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn csv_lead() -> CsvLead {
        CsvLead {
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            email: "ada@example.com".to_string(),
            phone: "555-123-4567".to_string(),
            city: "San Diego".to_string(),
            source: "Zillow".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn known_city_is_kept_and_unknown_maps_to_other() {
        let lead = convert_to_lead_insert(&csv_lead(), "CraftyCode");
        assert_eq!(lead.city.as_deref(), Some("San Diego"));

        let mut raw = csv_lead();
        raw.city = "Petaluma".to_string();
        let lead = convert_to_lead_insert(&raw, "CraftyCode");
        assert_eq!(lead.city.as_deref(), Some("Other"));

        raw.city = String::new();
        let lead = convert_to_lead_insert(&raw, "CraftyCode");
        assert_eq!(lead.city, None);
    }

    #[test]
    fn unmapped_source_falls_back_to_other() {
        let mut raw = csv_lead();
        raw.source = "Cold Outreach".to_string();
        assert_eq!(convert_to_lead_insert(&raw, "CraftyCode").source, LeadSource::Other);

        raw.source = "Zillow".to_string();
        assert_eq!(convert_to_lead_insert(&raw, "CraftyCode").source, LeadSource::Zillow);
    }

    #[test]
    fn status_derives_from_outreach_history_columns() {
        let mut raw = csv_lead();
        assert_eq!(convert_to_status(&raw), LeadStatus::NotContacted);

        raw.email_sent = "Yes".to_string();
        assert_eq!(convert_to_status(&raw), LeadStatus::ActivelyContacting);

        raw.response = "Interested, call back".to_string();
        assert_eq!(convert_to_status(&raw), LeadStatus::Engaged);
    }

    #[test]
    fn blank_optional_fields_become_none() {
        let mut raw = csv_lead();
        raw.phone = "  ".to_string();
        raw.notes = String::new();
        let lead = convert_to_lead_insert(&raw, "CraftyCode");
        assert_eq!(lead.phone, None);
        assert_eq!(lead.notes, None);
        assert_eq!(lead.company, "CraftyCode");
    }
}
