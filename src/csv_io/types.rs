/// Raw parsed import row, prior to validation and mapping. Every field is
/// kept as the string the file carried.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CsvLead {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub city: String,
    pub website_quality: String,
    pub company: String,
    pub linkedin_url: String,
    pub website_link: String,
    pub online_profile: String,
    pub email_sent: String,
    pub call_made: String,
    pub response: String,
    pub notes: String,
    pub source: String,
}

/// A rejected row with its position in the file (1-indexed, counting the
/// header) and the human-readable reasons it failed.
#[derive(Debug, Clone)]
pub struct InvalidLead {
    pub lead: CsvLead,
    pub row_index: usize,
    pub reasons: Vec<String>,
}

#[derive(Debug, Default)]
pub struct ValidationOutcome {
    pub valid: Vec<CsvLead>,
    pub invalid: Vec<InvalidLead>,
}
