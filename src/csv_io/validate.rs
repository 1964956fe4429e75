use std::sync::OnceLock;

use regex::Regex;

use super::types::{CsvLead, InvalidLead, ValidationOutcome};

fn email_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap())
}

// Loose North-American phone shape; extensions and country codes beyond +1
// are rejected.
fn phone_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^(\+?1[-.\s]?)?\(?\d{3}\)?[-.\s]?\d{3}[-.\s]?\d{4}$").unwrap())
}

/// Splits rows into valid and invalid. Validation failures are data, not
/// errors: each rejected row carries its file position (1-indexed, counting
/// the header row, so data row N is index N+1) and every reason it failed.
/// Valid rows get their city rewritten to the part before the first comma.
pub fn validate_leads(leads: Vec<CsvLead>) -> ValidationOutcome {
    let mut outcome = ValidationOutcome::default();

    for (i, mut lead) in leads.into_iter().enumerate() {
        let mut reasons = Vec::new();

        if lead.first_name.trim().is_empty() {
            reasons.push("Missing first name".to_string());
        }
        if lead.last_name.trim().is_empty() {
            reasons.push("Missing last name".to_string());
        }
        if lead.email.trim().is_empty() {
            reasons.push("Missing email address".to_string());
        } else if !email_regex().is_match(lead.email.trim()) {
            reasons.push("Invalid email format".to_string());
        }
        if !lead.phone.trim().is_empty() && !phone_regex().is_match(lead.phone.trim()) {
            reasons.push("Invalid phone number format".to_string());
        }

        if reasons.is_empty() {
            lead.city = lead
                .city
                .split(',')
                .next()
                .unwrap_or("")
                .trim()
                .to_string();
            outcome.valid.push(lead);
        } else {
            outcome.invalid.push(InvalidLead {
                lead,
                row_index: i + 2,
                reasons,
            });
        }
    }

    outcome
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_lead() -> CsvLead {
        CsvLead {
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            email: "ada@example.com".to_string(),
            phone: "(555) 123-4567".to_string(),
            city: "San Diego, CA".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn valid_row_gets_city_rewritten_to_pre_comma_part() {
        let outcome = validate_leads(vec![valid_lead()]);
        assert_eq!(outcome.valid.len(), 1);
        assert!(outcome.invalid.is_empty());
        assert_eq!(outcome.valid[0].city, "San Diego");
    }

    #[test]
    fn missing_required_fields_collect_all_reasons() {
        let lead = CsvLead {
            phone: "nonsense".to_string(),
            ..Default::default()
        };
        let outcome = validate_leads(vec![lead]);
        assert_eq!(outcome.invalid.len(), 1);
        let reasons = &outcome.invalid[0].reasons;
        assert!(reasons.contains(&"Missing first name".to_string()));
        assert!(reasons.contains(&"Missing last name".to_string()));
        assert!(reasons.contains(&"Missing email address".to_string()));
        assert!(reasons.contains(&"Invalid phone number format".to_string()));
    }

    #[test]
    fn malformed_email_is_rejected() {
        let mut lead = valid_lead();
        lead.email = "not an email".to_string();
        let outcome = validate_leads(vec![lead]);
        assert_eq!(outcome.invalid.len(), 1);
        assert_eq!(outcome.invalid[0].reasons, vec!["Invalid email format"]);
    }

    #[test]
    fn blank_phone_is_allowed_but_garbage_is_not() {
        let mut lead = valid_lead();
        lead.phone = String::new();
        assert_eq!(validate_leads(vec![lead]).valid.len(), 1);

        let mut lead = valid_lead();
        lead.phone = "12-34".to_string();
        assert_eq!(validate_leads(vec![lead]).invalid.len(), 1);
    }

    #[test]
    fn accepted_phone_shapes() {
        for phone in ["5551234567", "555-123-4567", "(555) 123-4567", "+1 555 123 4567", "1-555-123-4567"] {
            let mut lead = valid_lead();
            lead.phone = phone.to_string();
            let outcome = validate_leads(vec![lead]);
            assert_eq!(outcome.valid.len(), 1, "rejected: {phone}");
        }
    }

    #[test]
    fn row_index_counts_the_header_row() {
        // Three data rows, second has a blank email: rows 1 and 3 pass,
        // the invalid row reports file position 3 (header is row 1).
        let mut second = valid_lead();
        second.email = String::new();
        let outcome = validate_leads(vec![valid_lead(), second, valid_lead()]);

        assert_eq!(outcome.valid.len(), 2);
        assert_eq!(outcome.invalid.len(), 1);
        assert_eq!(outcome.invalid[0].row_index, 3);
        assert_eq!(outcome.invalid[0].reasons, vec!["Missing email address"]);
    }
}
