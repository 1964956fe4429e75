use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    config::Config,
    database::DbPool,
    workspace::{sync::SyncClient, LeadWorkspace},
};

pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// Which collection a session operates over. CraftyCode works with plain
/// leads, Avalern works with district contacts. Never both at once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Tenant {
    CraftyCode,
    Avalern,
}

impl Tenant {
    pub fn company(&self) -> &'static str {
        match self {
            Tenant::CraftyCode => "CraftyCode",
            Tenant::Avalern => "Avalern",
        }
    }

    pub fn parse(s: &str) -> Option<Tenant> {
        match s {
            "CraftyCode" => Some(Tenant::CraftyCode),
            "Avalern" => Some(Tenant::Avalern),
            _ => None,
        }
    }
}

impl std::fmt::Display for Tenant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.company())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeadStatus {
    NotContacted,
    ActivelyContacting,
    Engaged,
    Won,
    NotInterested,
}

impl LeadStatus {
    pub const ALL: [LeadStatus; 5] = [
        LeadStatus::NotContacted,
        LeadStatus::ActivelyContacting,
        LeadStatus::Engaged,
        LeadStatus::Won,
        LeadStatus::NotInterested,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            LeadStatus::NotContacted => "not_contacted",
            LeadStatus::ActivelyContacting => "actively_contacting",
            LeadStatus::Engaged => "engaged",
            LeadStatus::Won => "won",
            LeadStatus::NotInterested => "not_interested",
        }
    }

    pub fn parse(s: &str) -> Option<LeadStatus> {
        match s {
            "not_contacted" => Some(LeadStatus::NotContacted),
            "actively_contacting" => Some(LeadStatus::ActivelyContacting),
            "engaged" => Some(LeadStatus::Engaged),
            "won" => Some(LeadStatus::Won),
            "not_interested" => Some(LeadStatus::NotInterested),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            LeadStatus::NotContacted => "Not Contacted",
            LeadStatus::ActivelyContacting => "Actively Contacting",
            LeadStatus::Engaged => "Engaged",
            LeadStatus::Won => "Won",
            LeadStatus::NotInterested => "Not Interested",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            LeadStatus::NotContacted => "No outreach has happened yet",
            LeadStatus::ActivelyContacting => "Assigned to a campaign, outreach in progress",
            LeadStatus::Engaged => "Lead has responded to outreach",
            LeadStatus::Won => "Deal closed",
            LeadStatus::NotInterested => "Lead declined, no further outreach",
        }
    }
}

impl std::fmt::Display for LeadStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LeadSource {
    Zillow,
    LinkedIn,
    RealtorCom,
    Redfin,
    Trulia,
    Other,
}

impl LeadSource {
    pub const ALL: [LeadSource; 6] = [
        LeadSource::Zillow,
        LeadSource::LinkedIn,
        LeadSource::RealtorCom,
        LeadSource::Redfin,
        LeadSource::Trulia,
        LeadSource::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            LeadSource::Zillow => "Zillow",
            LeadSource::LinkedIn => "LinkedIn",
            LeadSource::RealtorCom => "Realtor.com",
            LeadSource::Redfin => "Redfin",
            LeadSource::Trulia => "Trulia",
            LeadSource::Other => "Other",
        }
    }

    /// Unmapped values fall back to Other, matching the import lookup table.
    pub fn parse(s: &str) -> LeadSource {
        match s {
            "Zillow" => LeadSource::Zillow,
            "LinkedIn" => LeadSource::LinkedIn,
            "Realtor.com" => LeadSource::RealtorCom,
            "Redfin" => LeadSource::Redfin,
            "Trulia" => LeadSource::Trulia,
            _ => LeadSource::Other,
        }
    }

    /// Exact-name lookup with no fallback, for query params where an
    /// unrecognized value means "no filter" rather than Other.
    pub fn parse_exact(s: &str) -> Option<LeadSource> {
        LeadSource::ALL.iter().find(|v| v.as_str() == s).copied()
    }
}

impl std::fmt::Display for LeadSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TouchpointType {
    Email,
    Call,
    Meeting,
    LinkedinMessage,
    Note,
}

impl TouchpointType {
    pub const ALL: [TouchpointType; 5] = [
        TouchpointType::Email,
        TouchpointType::Call,
        TouchpointType::Meeting,
        TouchpointType::LinkedinMessage,
        TouchpointType::Note,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TouchpointType::Email => "email",
            TouchpointType::Call => "call",
            TouchpointType::Meeting => "meeting",
            TouchpointType::LinkedinMessage => "linkedin_message",
            TouchpointType::Note => "note",
        }
    }

    pub fn parse(s: &str) -> Option<TouchpointType> {
        match s {
            "email" => Some(TouchpointType::Email),
            "call" => Some(TouchpointType::Call),
            "meeting" => Some(TouchpointType::Meeting),
            "linkedin_message" => Some(TouchpointType::LinkedinMessage),
            "note" => Some(TouchpointType::Note),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            TouchpointType::Email => "Email",
            TouchpointType::Call => "Call",
            TouchpointType::Meeting => "Meeting",
            TouchpointType::LinkedinMessage => "LinkedIn Message",
            TouchpointType::Note => "Note",
        }
    }
}

impl std::fmt::Display for TouchpointType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Lead {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub company: String,
    pub linkedin_url: Option<String>,
    pub website_link: Option<String>,
    pub online_profile: Option<String>,
    pub source: LeadSource,
    pub status: LeadStatus,
    pub campaign_id: Option<String>,
    pub notes: Option<String>,
    pub last_contacted_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    // Derived from touchpoints, never stored on the row.
    #[serde(default)]
    pub touchpoints_count: i64,
    #[serde(default)]
    pub scheduled_touchpoints_count: i64,
}

impl Lead {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DistrictContact {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub title: Option<String>,
    pub district_id: String,
    pub district_name: String,
    pub county: String,
    pub status: LeadStatus,
    pub campaign_id: Option<String>,
    pub notes: Option<String>,
    pub last_contacted_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub touchpoints_count: i64,
    #[serde(default)]
    pub scheduled_touchpoints_count: i64,
}

impl DistrictContact {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct District {
    pub id: String,
    pub name: String,
    pub county: String,
    pub state: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Campaign {
    pub id: String,
    pub name: String,
    pub company: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Touchpoint {
    pub id: String,
    pub lead_id: Option<String>,
    pub district_contact_id: Option<String>,
    pub touchpoint_type: TouchpointType,
    pub subject: String,
    pub content: Option<String>,
    pub scheduled_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
    pub outcome: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Touchpoint {
    pub fn is_completed(&self) -> bool {
        self.completed_at.is_some()
    }

    pub fn is_scheduled(&self) -> bool {
        self.scheduled_at.is_some() && self.completed_at.is_none()
    }

    /// Only touchpoints with both a completion date and an outcome count
    /// toward a contact's touchpoints_count.
    pub fn counts_toward_completed(&self) -> bool {
        self.completed_at.is_some() && self.outcome.is_some()
    }
}

/// Parent of a touchpoint. Exactly one of lead / district contact, enforced
/// here and by a CHECK constraint on the table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TouchpointParent {
    Lead(String),
    DistrictContact(String),
}

impl TouchpointParent {
    pub fn id(&self) -> &str {
        match self {
            TouchpointParent::Lead(id) => id,
            TouchpointParent::DistrictContact(id) => id,
        }
    }
}

#[derive(Debug, Clone)]
pub struct NewTouchpoint {
    pub parent: TouchpointParent,
    pub touchpoint_type: TouchpointType,
    pub subject: String,
    pub content: Option<String>,
    pub scheduled_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
    pub outcome: Option<String>,
}

/// Insertable lead shape produced by the CSV import pipeline.
#[derive(Debug, Clone)]
pub struct NewLead {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub company: String,
    pub linkedin_url: Option<String>,
    pub website_link: Option<String>,
    pub online_profile: Option<String>,
    pub source: LeadSource,
    pub status: LeadStatus,
    pub notes: Option<String>,
}

/// Editable lead fields as submitted from a save action. The stored status
/// is recomputed from this via `workspace::status::next_status` before the
/// write.
#[derive(Debug, Clone)]
pub struct LeadUpdate {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub source: LeadSource,
    pub status: LeadStatus,
    pub campaign_id: Option<String>,
    pub notes: Option<String>,
}

impl LeadUpdate {
    pub fn from_lead(lead: &Lead) -> Self {
        Self {
            first_name: lead.first_name.clone(),
            last_name: lead.last_name.clone(),
            email: lead.email.clone(),
            phone: lead.phone.clone(),
            city: lead.city.clone(),
            state: lead.state.clone(),
            source: lead.source,
            status: lead.status,
            campaign_id: lead.campaign_id.clone(),
            notes: lead.notes.clone(),
        }
    }
}

/// Tagged union produced once at the data-fetch boundary. Everything
/// downstream (filtering, pagination, rendering) works on accessors instead
/// of threading two parallel row shapes through every function.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum CrmContact {
    Lead(Lead),
    District(DistrictContact),
}

impl CrmContact {
    pub fn id(&self) -> &str {
        match self {
            CrmContact::Lead(l) => &l.id,
            CrmContact::District(d) => &d.id,
        }
    }

    pub fn full_name(&self) -> String {
        match self {
            CrmContact::Lead(l) => l.full_name(),
            CrmContact::District(d) => d.full_name(),
        }
    }

    pub fn email(&self) -> &str {
        match self {
            CrmContact::Lead(l) => &l.email,
            CrmContact::District(d) => &d.email,
        }
    }

    /// Company for leads, job title for district contacts. The search box
    /// matches whichever the record carries.
    pub fn org_field(&self) -> Option<&str> {
        match self {
            CrmContact::Lead(l) => Some(l.company.as_str()),
            CrmContact::District(d) => d.title.as_deref(),
        }
    }

    pub fn district_name(&self) -> Option<&str> {
        match self {
            CrmContact::Lead(_) => None,
            CrmContact::District(d) => Some(d.district_name.as_str()),
        }
    }

    pub fn county(&self) -> Option<&str> {
        match self {
            CrmContact::Lead(_) => None,
            CrmContact::District(d) => Some(d.county.as_str()),
        }
    }

    pub fn city(&self) -> Option<&str> {
        match self {
            CrmContact::Lead(l) => l.city.as_deref(),
            CrmContact::District(_) => None,
        }
    }

    pub fn status(&self) -> LeadStatus {
        match self {
            CrmContact::Lead(l) => l.status,
            CrmContact::District(d) => d.status,
        }
    }

    pub fn campaign_id(&self) -> Option<&str> {
        match self {
            CrmContact::Lead(l) => l.campaign_id.as_deref(),
            CrmContact::District(d) => d.campaign_id.as_deref(),
        }
    }

    pub fn source(&self) -> Option<LeadSource> {
        match self {
            CrmContact::Lead(l) => Some(l.source),
            CrmContact::District(_) => None,
        }
    }

    pub fn touchpoints_count(&self) -> i64 {
        match self {
            CrmContact::Lead(l) => l.touchpoints_count,
            CrmContact::District(d) => d.touchpoints_count,
        }
    }

    pub fn scheduled_touchpoints_count(&self) -> i64 {
        match self {
            CrmContact::Lead(l) => l.scheduled_touchpoints_count,
            CrmContact::District(d) => d.scheduled_touchpoints_count,
        }
    }

    pub fn touchpoint_parent(&self) -> TouchpointParent {
        match self {
            CrmContact::Lead(l) => TouchpointParent::Lead(l.id.clone()),
            CrmContact::District(d) => TouchpointParent::DistrictContact(d.id.clone()),
        }
    }
}

pub struct CliApp {
    pub config: Config,
    pub db_pool: DbPool,
    pub workspace: LeadWorkspace,
    pub sync_client: SyncClient,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn source_parse_exact_has_no_other_fallback() {
        assert_eq!(LeadSource::parse_exact("Zillow"), Some(LeadSource::Zillow));
        assert_eq!(LeadSource::parse_exact("Other"), Some(LeadSource::Other));
        assert_eq!(LeadSource::parse_exact("garbage"), None);
        // The import-side parse keeps its Other fallback.
        assert_eq!(LeadSource::parse("garbage"), LeadSource::Other);
    }
}
