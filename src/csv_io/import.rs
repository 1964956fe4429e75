use std::collections::{HashMap, HashSet};
use std::path::Path;

use tracing::debug;

use super::types::CsvLead;

pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

const COL_FIRST_NAME: &str = "First Name";
const COL_LAST_NAME: &str = "Last Name";
const COL_EMAIL: &str = "Email";
const COL_PHONE: &str = "Phone Number";
const COL_CITY: &str = "City/State";
const COL_WEBSITE: &str = "Website?";
const COL_COMPANY: &str = "Company";
const COL_LINKEDIN: &str = "Linkedin URL";
const COL_WEBSITE_LINK: &str = "Website Link";
const COL_PROFILE: &str = "Online Profile";
const COL_EMAIL_SENT: &str = "Email Sent?";
const COL_CALL_MADE: &str = "Call Made?";
const COL_RESPONSE: &str = "Response";
const COL_NOTES: &str = "Next Step / Notes";

/// Parses a header-bearing lead CSV. Any row-level parse error rejects the
/// whole file with the parser's first error.
pub fn parse_csv_file(path: &Path) -> Result<Vec<CsvLead>> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(path)?;

    let headers = reader.headers()?.clone();
    let index: HashMap<String, usize> = headers
        .iter()
        .enumerate()
        .map(|(i, h)| (h.to_string(), i))
        .collect();
    let col = |record: &csv::StringRecord, name: &str| -> String {
        index
            .get(name)
            .and_then(|&i| record.get(i))
            .unwrap_or("")
            .to_string()
    };

    let mut leads = Vec::new();
    for record in reader.records() {
        let record = record?;

        let linkedin_url = col(&record, COL_LINKEDIN);
        let online_profile = col(&record, COL_PROFILE);
        let website = col(&record, COL_WEBSITE);

        leads.push(CsvLead {
            first_name: col(&record, COL_FIRST_NAME),
            last_name: col(&record, COL_LAST_NAME),
            email: col(&record, COL_EMAIL),
            phone: col(&record, COL_PHONE),
            city: col(&record, COL_CITY),
            website_quality: if website == "Yes" || website == "yes" {
                "8".to_string()
            } else {
                "0".to_string()
            },
            company: col(&record, COL_COMPANY),
            website_link: col(&record, COL_WEBSITE_LINK),
            email_sent: col(&record, COL_EMAIL_SENT),
            call_made: col(&record, COL_CALL_MADE),
            response: col(&record, COL_RESPONSE),
            notes: col(&record, COL_NOTES),
            source: determine_source(&linkedin_url, &online_profile).to_string(),
            linkedin_url,
            online_profile,
        });
    }

    debug!("Parsed {} rows from {}", leads.len(), path.display());
    Ok(leads)
}

/// Derives the lead source from the profile URLs. Zillow is checked before
/// LinkedIn, LinkedIn before Realtor.com.
pub fn determine_source(linkedin_url: &str, online_profile: &str) -> &'static str {
    let profile = online_profile.to_lowercase();
    let linkedin = linkedin_url.to_lowercase();

    if profile.contains("zillow.com") {
        "Zillow"
    } else if linkedin.contains("linkedin.com") {
        "LinkedIn"
    } else if profile.contains("realtor.com") {
        "Realtor.com"
    } else {
        "Cold Outreach"
    }
}

/// Case-insensitive email dedup against both the already-persisted set and
/// within the batch itself. First occurrence wins.
pub fn deduplicate_leads(leads: Vec<CsvLead>, existing_emails: &HashSet<String>) -> Vec<CsvLead> {
    let mut seen: HashSet<String> = existing_emails.iter().map(|e| e.to_lowercase()).collect();
    leads
        .into_iter()
        .filter(|lead| seen.insert(lead.email.to_lowercase()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn source_derivation_checks_zillow_before_linkedin_before_realtor() {
        assert_eq!(
            determine_source("https://linkedin.com/in/x", "https://www.zillow.com/profile/x"),
            "Zillow"
        );
        assert_eq!(determine_source("https://www.LinkedIn.com/in/x", ""), "LinkedIn");
        assert_eq!(determine_source("", "https://realtor.com/agent/x"), "Realtor.com");
        assert_eq!(determine_source("", "https://example.com"), "Cold Outreach");
        assert_eq!(determine_source("", ""), "Cold Outreach");
    }

    #[test]
    fn dedup_is_case_insensitive_and_first_occurrence_wins() {
        let mk = |email: &str, first: &str| CsvLead {
            first_name: first.to_string(),
            email: email.to_string(),
            ..Default::default()
        };
        let existing: HashSet<String> = ["known@example.com".to_string()].into_iter().collect();

        let result = deduplicate_leads(
            vec![
                mk("New@Example.com", "a"),
                mk("new@example.com", "b"),
                mk("KNOWN@EXAMPLE.COM", "c"),
                mk("other@example.com", "d"),
            ],
            &existing,
        );

        assert_eq!(result.len(), 2);
        assert_eq!(result[0].first_name, "a");
        assert_eq!(result[1].email, "other@example.com");
    }

    #[test]
    fn parse_reads_headers_and_derives_source_and_website_quality() {
        let path = std::env::temp_dir().join(format!("leads-{}.csv", uuid::Uuid::new_v4()));
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(
            file,
            "First Name,Last Name,Email,Phone Number,City/State,Website?,Company,Linkedin URL,Website Link,Online Profile,Email Sent?,Call Made?,Response,Next Step / Notes"
        )
        .unwrap();
        writeln!(
            file,
            "Ada,Lovelace,ada@example.com,555-123-4567,\"San Diego, CA\",Yes,Analytica,https://linkedin.com/in/ada,,https://zillow.com/profile/ada,Yes,No,,Call next week"
        )
        .unwrap();
        writeln!(file, "Grace,Hopper,grace@example.com,,,No,Navy,,,,,,,").unwrap();

        let leads = parse_csv_file(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(leads.len(), 2);
        assert_eq!(leads[0].first_name, "Ada");
        assert_eq!(leads[0].city, "San Diego, CA");
        assert_eq!(leads[0].website_quality, "8");
        assert_eq!(leads[0].source, "Zillow");
        assert_eq!(leads[1].website_quality, "0");
        assert_eq!(leads[1].source, "Cold Outreach");
    }

    #[test]
    fn malformed_row_rejects_the_whole_parse() {
        let path = std::env::temp_dir().join(format!("bad-{}.csv", uuid::Uuid::new_v4()));
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "First Name,Last Name,Email").unwrap();
        writeln!(file, "Ada,Lovelace,ada@example.com").unwrap();
        writeln!(file, "\"unterminated,quote,row").unwrap();

        let result = parse_csv_file(&path);
        std::fs::remove_file(&path).ok();
        assert!(result.is_err());
    }
}
