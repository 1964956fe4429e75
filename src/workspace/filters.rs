use crate::models::{CrmContact, LeadSource, LeadStatus};

/// Explicit filter state, passed into the pure filter/paginate functions.
/// `None` on an exact-match filter means "all".
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterState {
    pub search: String,
    pub status: Option<LeadStatus>,
    pub campaign_id: Option<String>,
    pub source: Option<LeadSource>,
    pub city: Option<String>,
}

impl FilterState {
    pub fn matches(&self, contact: &CrmContact) -> bool {
        let search = self.search.trim().to_lowercase();
        if !search.is_empty() {
            let mut haystacks = vec![contact.full_name(), contact.email().to_string()];
            if let Some(org) = contact.org_field() {
                haystacks.push(org.to_string());
            }
            if let Some(district) = contact.district_name() {
                haystacks.push(district.to_string());
            }
            if let Some(county) = contact.county() {
                haystacks.push(county.to_string());
            }
            if !haystacks.iter().any(|h| h.to_lowercase().contains(&search)) {
                return false;
            }
        }

        if let Some(status) = self.status {
            if contact.status() != status {
                return false;
            }
        }
        if let Some(campaign_id) = &self.campaign_id {
            if contact.campaign_id() != Some(campaign_id.as_str()) {
                return false;
            }
        }
        if let Some(source) = self.source {
            if contact.source() != Some(source) {
                return false;
            }
        }
        if let Some(city) = &self.city {
            if contact.city() != Some(city.as_str()) {
                return false;
            }
        }
        true
    }
}

pub fn filter_contacts<'a>(contacts: &'a [CrmContact], filters: &FilterState) -> Vec<&'a CrmContact> {
    contacts.iter().filter(|c| filters.matches(c)).collect()
}

/// Simple offset slice of the filtered collection. An out-of-range page
/// yields an empty slice rather than an error.
pub fn paginate<'a>(filtered: &[&'a CrmContact], page: usize, per_page: usize) -> Vec<&'a CrmContact> {
    if per_page == 0 {
        return Vec::new();
    }
    let start = page.saturating_sub(1) * per_page;
    filtered
        .iter()
        .skip(start)
        .take(per_page)
        .copied()
        .collect()
}

pub fn total_pages(filtered_len: usize, per_page: usize) -> usize {
    if per_page == 0 {
        return 0;
    }
    filtered_len.div_ceil(per_page)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Lead;
    use chrono::Utc;

    fn lead(id: &str, first: &str, last: &str, email: &str, company: &str) -> CrmContact {
        CrmContact::Lead(Lead {
            id: id.to_string(),
            first_name: first.to_string(),
            last_name: last.to_string(),
            email: email.to_string(),
            phone: None,
            city: None,
            state: None,
            company: company.to_string(),
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

    fn sample_contacts() -> Vec<CrmContact> {
        vec![
            lead("1", "Ada", "Lovelace", "ada@example.com", "Analytica"),
            lead("2", "Grace", "Hopper", "grace@example.com", "Navy"),
            lead("3", "Linus", "Torvalds", "linus@kernel.org", "OSDL"),
            lead("4", "Bjarne", "Stroustrup", "bs@cpp.org", "Bell"),
        ]
    }

    #[test]
    fn search_matches_name_email_or_company_case_insensitively() {
        let contacts = sample_contacts();
        let filters = FilterState {
            search: "a".to_string(),
            ..Default::default()
        };
        let filtered = filter_contacts(&contacts, &filters);

        // Exactly those whose name, email, or company contains "a".
        let expected: Vec<&CrmContact> = contacts
            .iter()
            .filter(|c| {
                c.full_name().to_lowercase().contains('a')
                    || c.email().to_lowercase().contains('a')
                    || c.org_field().unwrap_or("").to_lowercase().contains('a')
            })
            .collect();
        let ids: Vec<&str> = filtered.iter().map(|c| c.id()).collect();
        let expected_ids: Vec<&str> = expected.iter().map(|c| c.id()).collect();
        assert_eq!(ids, expected_ids);

        let filters = FilterState {
            search: "KERNEL".to_string(),
            ..Default::default()
        };
        let filtered = filter_contacts(&contacts, &filters);
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].id(), "3");
    }

    #[test]
    fn exact_filters_with_none_as_the_all_sentinel() {
        let mut contacts = sample_contacts();
        if let CrmContact::Lead(l) = &mut contacts[0] {
            l.status = LeadStatus::Won;
            l.campaign_id = Some("camp-1".to_string());
            l.source = LeadSource::Zillow;
            l.city = Some("San Diego".to_string());
        }

        let all = filter_contacts(&contacts, &FilterState::default());
        assert_eq!(all.len(), contacts.len());

        let filters = FilterState {
            status: Some(LeadStatus::Won),
            campaign_id: Some("camp-1".to_string()),
            source: Some(LeadSource::Zillow),
            city: Some("San Diego".to_string()),
            ..Default::default()
        };
        let filtered = filter_contacts(&contacts, &filters);
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].id(), "1");
    }

    #[test]
    fn pagination_slices_by_offset_and_clamps_the_last_page() {
        let contacts = sample_contacts();
        let filtered = filter_contacts(&contacts, &FilterState::default());

        let page1 = paginate(&filtered, 1, 3);
        assert_eq!(page1.len(), 3);
        assert_eq!(page1[0].id(), "1");

        let page2 = paginate(&filtered, 2, 3);
        assert_eq!(page2.len(), 1);
        assert_eq!(page2[0].id(), "4");

        assert!(paginate(&filtered, 3, 3).is_empty());
        assert_eq!(total_pages(filtered.len(), 3), 2);
        assert_eq!(total_pages(0, 3), 0);
        assert_eq!(total_pages(6, 3), 2);
    }
}
