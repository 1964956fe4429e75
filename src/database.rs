use std::collections::{HashMap, HashSet};
use std::path::Path;

use chrono::{DateTime, Utc};
use mobc::{Manager, Pool};
use rusqlite::{params, Connection, Result as SqliteResult, Row};
use tracing::{debug, info};

use crate::models::{
    Campaign, CrmContact, District, DistrictContact, Lead, LeadSource, LeadStatus, LeadUpdate,
    NewLead, NewTouchpoint, Tenant, Touchpoint, TouchpointParent, TouchpointType,
};

pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

pub struct SqliteManager {
    db_path: String,
}

impl SqliteManager {
    pub fn new(db_path: String) -> Self {
        debug!("Creating SqliteManager for path: {}", db_path);
        Self { db_path }
    }
}

#[async_trait::async_trait]
impl Manager for SqliteManager {
    type Connection = Connection;
    type Error = rusqlite::Error;

    async fn connect(&self) -> std::result::Result<Self::Connection, Self::Error> {
        let conn = Connection::open(&self.db_path)?;

        // PRAGMA journal_mode returns a row, the rest do not.
        conn.query_row("PRAGMA journal_mode=WAL", [], |_| Ok(()))?;
        conn.execute("PRAGMA synchronous=NORMAL", [])?;
        conn.execute("PRAGMA foreign_keys=ON", [])?;
        conn.execute("PRAGMA temp_store=memory", [])?;

        init_schema(&conn)?;
        Ok(conn)
    }

    async fn check(&self, conn: Self::Connection) -> std::result::Result<Self::Connection, Self::Error> {
        conn.query_row("SELECT 1", [], |_| Ok(()))?;
        Ok(conn)
    }
}

pub type DbPool = Pool<SqliteManager>;

pub async fn create_db_pool(db_path: &str) -> Result<DbPool> {
    if let Some(parent) = Path::new(db_path).parent() {
        tokio::fs::create_dir_all(parent).await?;
    }

    let manager = SqliteManager::new(db_path.to_string());
    let pool = Pool::builder().max_open(10).max_idle(5).build(manager);

    info!("✓ SQLite connection pool created: {}", db_path);
    Ok(pool)
}

pub fn init_schema(conn: &Connection) -> SqliteResult<()> {
    create_campaigns_table(conn)?;
    create_leads_table(conn)?;
    create_districts_table(conn)?;
    create_district_contacts_table(conn)?;
    create_district_leads_table(conn)?;
    create_touchpoints_table(conn)?;
    create_indexes(conn)?;
    Ok(())
}

fn create_campaigns_table(conn: &Connection) -> SqliteResult<()> {
    conn.execute(
        r#"
        CREATE TABLE IF NOT EXISTS campaigns (
            id TEXT PRIMARY KEY,
            name TEXT NOT NULL,
            company TEXT NOT NULL,
            created_at TEXT NOT NULL
        )
        "#,
        [],
    )?;
    Ok(())
}

fn create_leads_table(conn: &Connection) -> SqliteResult<()> {
    conn.execute(
        r#"
        CREATE TABLE IF NOT EXISTS leads (
            id TEXT PRIMARY KEY,
            first_name TEXT NOT NULL,
            last_name TEXT NOT NULL,
            email TEXT NOT NULL COLLATE NOCASE,
            phone TEXT,
            city TEXT,
            state TEXT,
            company TEXT NOT NULL,
            linkedin_url TEXT,
            website_link TEXT,
            online_profile TEXT,
            source TEXT NOT NULL,
            status TEXT NOT NULL,
            campaign_id TEXT REFERENCES campaigns(id),
            notes TEXT,
            last_contacted_at TEXT,
            created_at TEXT NOT NULL,
            UNIQUE(company, email)
        )
        "#,
        [],
    )?;
    Ok(())
}

fn create_districts_table(conn: &Connection) -> SqliteResult<()> {
    conn.execute(
        r#"
        CREATE TABLE IF NOT EXISTS districts (
            id TEXT PRIMARY KEY,
            name TEXT NOT NULL,
            county TEXT NOT NULL,
            state TEXT NOT NULL DEFAULT 'California',
            created_at TEXT NOT NULL
        )
        "#,
        [],
    )?;
    Ok(())
}

fn create_district_contacts_table(conn: &Connection) -> SqliteResult<()> {
    conn.execute(
        r#"
        CREATE TABLE IF NOT EXISTS district_contacts (
            id TEXT PRIMARY KEY,
            district_id TEXT NOT NULL REFERENCES districts(id),
            first_name TEXT NOT NULL,
            last_name TEXT NOT NULL,
            email TEXT NOT NULL COLLATE NOCASE,
            phone TEXT,
            title TEXT,
            status TEXT NOT NULL,
            campaign_id TEXT REFERENCES campaigns(id),
            notes TEXT,
            last_contacted_at TEXT,
            created_at TEXT NOT NULL
        )
        "#,
        [],
    )?;
    Ok(())
}

// Per-user district assignments.
fn create_district_leads_table(conn: &Connection) -> SqliteResult<()> {
    conn.execute(
        r#"
        CREATE TABLE IF NOT EXISTS district_leads (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            user_id TEXT NOT NULL,
            district_id TEXT NOT NULL REFERENCES districts(id),
            assigned_at TEXT NOT NULL,
            UNIQUE(user_id, district_id)
        )
        "#,
        [],
    )?;
    Ok(())
}

fn create_touchpoints_table(conn: &Connection) -> SqliteResult<()> {
    conn.execute(
        r#"
        CREATE TABLE IF NOT EXISTS touchpoints (
            id TEXT PRIMARY KEY,
            lead_id TEXT REFERENCES leads(id),
            district_contact_id TEXT REFERENCES district_contacts(id),
            touchpoint_type TEXT NOT NULL,
            subject TEXT NOT NULL,
            content TEXT,
            scheduled_at TEXT,
            completed_at TEXT,
            outcome TEXT,
            created_at TEXT NOT NULL,
            CHECK ((lead_id IS NULL) <> (district_contact_id IS NULL))
        )
        "#,
        [],
    )?;
    Ok(())
}

fn create_indexes(conn: &Connection) -> SqliteResult<()> {
    let indexes = [
        "CREATE INDEX IF NOT EXISTS idx_leads_company ON leads(company)",
        "CREATE INDEX IF NOT EXISTS idx_leads_status ON leads(status)",
        "CREATE INDEX IF NOT EXISTS idx_leads_campaign ON leads(campaign_id)",
        "CREATE INDEX IF NOT EXISTS idx_leads_email ON leads(email)",
        "CREATE INDEX IF NOT EXISTS idx_district_contacts_district ON district_contacts(district_id)",
        "CREATE INDEX IF NOT EXISTS idx_district_contacts_status ON district_contacts(status)",
        "CREATE INDEX IF NOT EXISTS idx_district_leads_user ON district_leads(user_id)",
        "CREATE INDEX IF NOT EXISTS idx_touchpoints_lead ON touchpoints(lead_id)",
        "CREATE INDEX IF NOT EXISTS idx_touchpoints_contact ON touchpoints(district_contact_id)",
        "CREATE INDEX IF NOT EXISTS idx_touchpoints_completed ON touchpoints(completed_at)",
        "CREATE INDEX IF NOT EXISTS idx_campaigns_company ON campaigns(company)",
    ];

    for index_sql in indexes.iter() {
        conn.execute(index_sql, [])?;
    }
    Ok(())
}

// --- row mapping helpers ---

fn parse_ts(idx: usize, s: String) -> SqliteResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(&s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|_| rusqlite::Error::InvalidColumnType(idx, s, rusqlite::types::Type::Text))
}

fn parse_opt_ts(idx: usize, s: Option<String>) -> SqliteResult<Option<DateTime<Utc>>> {
    match s {
        Some(s) => parse_ts(idx, s).map(Some),
        None => Ok(None),
    }
}

fn parse_status(idx: usize, s: String) -> SqliteResult<LeadStatus> {
    LeadStatus::parse(&s)
        .ok_or_else(|| rusqlite::Error::InvalidColumnType(idx, s, rusqlite::types::Type::Text))
}

fn lead_from_row(row: &Row) -> SqliteResult<Lead> {
    Ok(Lead {
        id: row.get(0)?,
        first_name: row.get(1)?,
        last_name: row.get(2)?,
        email: row.get(3)?,
        phone: row.get(4)?,
        city: row.get(5)?,
        state: row.get(6)?,
        company: row.get(7)?,
        linkedin_url: row.get(8)?,
        website_link: row.get(9)?,
        online_profile: row.get(10)?,
        source: LeadSource::parse(&row.get::<_, String>(11)?),
        status: parse_status(12, row.get(12)?)?,
        campaign_id: row.get(13)?,
        notes: row.get(14)?,
        last_contacted_at: parse_opt_ts(15, row.get(15)?)?,
        created_at: parse_ts(16, row.get(16)?)?,
        touchpoints_count: 0,
        scheduled_touchpoints_count: 0,
    })
}

const LEAD_COLUMNS: &str = "id, first_name, last_name, email, phone, city, state, company, \
     linkedin_url, website_link, online_profile, source, status, campaign_id, notes, \
     last_contacted_at, created_at";

fn district_contact_from_row(row: &Row) -> SqliteResult<DistrictContact> {
    Ok(DistrictContact {
        id: row.get(0)?,
        first_name: row.get(1)?,
        last_name: row.get(2)?,
        email: row.get(3)?,
        phone: row.get(4)?,
        title: row.get(5)?,
        district_id: row.get(6)?,
        district_name: row.get(7)?,
        county: row.get(8)?,
        status: parse_status(9, row.get(9)?)?,
        campaign_id: row.get(10)?,
        notes: row.get(11)?,
        last_contacted_at: parse_opt_ts(12, row.get(12)?)?,
        created_at: parse_ts(13, row.get(13)?)?,
        touchpoints_count: 0,
        scheduled_touchpoints_count: 0,
    })
}

fn touchpoint_from_row(row: &Row) -> SqliteResult<Touchpoint> {
    let type_str: String = row.get(3)?;
    Ok(Touchpoint {
        id: row.get(0)?,
        lead_id: row.get(1)?,
        district_contact_id: row.get(2)?,
        touchpoint_type: TouchpointType::parse(&type_str).ok_or_else(|| {
            rusqlite::Error::InvalidColumnType(3, type_str.clone(), rusqlite::types::Type::Text)
        })?,
        subject: row.get(4)?,
        content: row.get(5)?,
        scheduled_at: parse_opt_ts(6, row.get(6)?)?,
        completed_at: parse_opt_ts(7, row.get(7)?)?,
        outcome: row.get(8)?,
        created_at: parse_ts(9, row.get(9)?)?,
    })
}

const TOUCHPOINT_COLUMNS: &str = "id, lead_id, district_contact_id, touchpoint_type, subject, \
     content, scheduled_at, completed_at, outcome, created_at";

// --- campaigns ---

pub fn list_campaigns(conn: &Connection, company: &str) -> SqliteResult<Vec<Campaign>> {
    let mut stmt = conn.prepare(
        "SELECT id, name, company, created_at FROM campaigns WHERE company = ?1 ORDER BY created_at DESC",
    )?;
    let rows = stmt.query_map([company], |row| {
        Ok(Campaign {
            id: row.get(0)?,
            name: row.get(1)?,
            company: row.get(2)?,
            created_at: parse_ts(3, row.get(3)?)?,
        })
    })?;
    rows.collect()
}

pub fn insert_campaign(conn: &Connection, campaign: &Campaign) -> SqliteResult<()> {
    conn.execute(
        "INSERT INTO campaigns (id, name, company, created_at) VALUES (?1, ?2, ?3, ?4)",
        params![
            campaign.id,
            campaign.name,
            campaign.company,
            campaign.created_at.to_rfc3339()
        ],
    )?;
    Ok(())
}

pub async fn fetch_campaigns(pool: &DbPool, company: &str) -> Result<Vec<Campaign>> {
    let conn = pool.get().await?;
    Ok(list_campaigns(&conn, company)?)
}

// --- derived touchpoint counts ---

/// Batched aggregate over the touchpoints table: one query per collection
/// instead of two count queries per row. Returns parent id ->
/// (completed_with_outcome, scheduled_not_completed).
pub fn touchpoint_counts(
    conn: &Connection,
    parent_column: &str,
) -> SqliteResult<HashMap<String, (i64, i64)>> {
    let sql = format!(
        "SELECT {col}, \
             SUM(CASE WHEN completed_at IS NOT NULL AND outcome IS NOT NULL THEN 1 ELSE 0 END), \
             SUM(CASE WHEN scheduled_at IS NOT NULL AND completed_at IS NULL THEN 1 ELSE 0 END) \
         FROM touchpoints WHERE {col} IS NOT NULL GROUP BY {col}",
        col = parent_column
    );
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map([], |row| {
        Ok((
            row.get::<_, String>(0)?,
            (row.get::<_, i64>(1)?, row.get::<_, i64>(2)?),
        ))
    })?;
    rows.collect()
}

// --- leads ---

pub fn list_leads(conn: &Connection, company: &str) -> SqliteResult<Vec<Lead>> {
    let sql = format!(
        "SELECT {LEAD_COLUMNS} FROM leads WHERE company = ?1 ORDER BY created_at DESC"
    );
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map([company], lead_from_row)?;
    let mut leads: Vec<Lead> = rows.collect::<SqliteResult<_>>()?;

    let counts = touchpoint_counts(conn, "lead_id")?;
    for lead in &mut leads {
        if let Some((completed, scheduled)) = counts.get(&lead.id) {
            lead.touchpoints_count = *completed;
            lead.scheduled_touchpoints_count = *scheduled;
        }
    }
    Ok(leads)
}

pub fn get_lead(conn: &Connection, id: &str) -> SqliteResult<Option<Lead>> {
    let sql = format!("SELECT {LEAD_COLUMNS} FROM leads WHERE id = ?1");
    let mut stmt = conn.prepare(&sql)?;
    let mut rows = stmt.query_map([id], lead_from_row)?;
    rows.next().transpose()
}

pub fn insert_lead(conn: &Connection, lead: &NewLead) -> SqliteResult<()> {
    conn.execute(
        r#"
        INSERT INTO leads (
            id, first_name, last_name, email, phone, city, state, company,
            linkedin_url, website_link, online_profile, source, status, notes, created_at
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15)
        "#,
        params![
            lead.id,
            lead.first_name,
            lead.last_name,
            lead.email,
            lead.phone,
            lead.city,
            lead.state,
            lead.company,
            lead.linkedin_url,
            lead.website_link,
            lead.online_profile,
            lead.source.as_str(),
            lead.status.as_str(),
            lead.notes,
            Utc::now().to_rfc3339(),
        ],
    )?;
    Ok(())
}

/// Lowercased emails already present for a company, for import dedup.
pub fn existing_lead_emails(conn: &Connection, company: &str) -> SqliteResult<HashSet<String>> {
    let mut stmt = conn.prepare("SELECT email FROM leads WHERE company = ?1")?;
    let rows = stmt.query_map([company], |row| row.get::<_, String>(0))?;
    let mut emails = HashSet::new();
    for row in rows {
        emails.insert(row?.to_lowercase());
    }
    Ok(emails)
}

/// Writes an edited lead. `status` is the already-recomputed value from
/// `workspace::status::next_status`, not the raw user selection.
pub fn update_lead(
    conn: &Connection,
    id: &str,
    update: &LeadUpdate,
    status: LeadStatus,
) -> SqliteResult<()> {
    conn.execute(
        r#"
        UPDATE leads SET
            first_name = ?1, last_name = ?2, email = ?3, phone = ?4,
            city = ?5, state = ?6, source = ?7, status = ?8,
            campaign_id = ?9, notes = ?10
        WHERE id = ?11
        "#,
        params![
            update.first_name,
            update.last_name,
            update.email,
            update.phone,
            update.city,
            update.state,
            update.source.as_str(),
            status.as_str(),
            update.campaign_id,
            update.notes,
            id,
        ],
    )?;
    Ok(())
}

pub fn leads_by_ids(conn: &Connection, ids: &[String]) -> SqliteResult<Vec<Lead>> {
    let mut leads = Vec::new();
    for id in ids {
        if let Some(lead) = get_lead(conn, id)? {
            leads.push(lead);
        }
    }
    Ok(leads)
}

// --- district contacts ---

pub fn list_district_contacts(conn: &Connection) -> SqliteResult<Vec<DistrictContact>> {
    let mut stmt = conn.prepare(
        r#"
        SELECT dc.id, dc.first_name, dc.last_name, dc.email, dc.phone, dc.title,
               dc.district_id, d.name, d.county, dc.status, dc.campaign_id, dc.notes,
               dc.last_contacted_at, dc.created_at
        FROM district_contacts dc
        JOIN districts d ON dc.district_id = d.id
        ORDER BY dc.created_at DESC
        "#,
    )?;
    let rows = stmt.query_map([], district_contact_from_row)?;
    let mut contacts: Vec<DistrictContact> = rows.collect::<SqliteResult<_>>()?;

    let counts = touchpoint_counts(conn, "district_contact_id")?;
    for contact in &mut contacts {
        if let Some((completed, scheduled)) = counts.get(&contact.id) {
            contact.touchpoints_count = *completed;
            contact.scheduled_touchpoints_count = *scheduled;
        }
    }
    Ok(contacts)
}

pub fn insert_district_contact(conn: &Connection, contact: &DistrictContact) -> SqliteResult<()> {
    conn.execute(
        r#"
        INSERT INTO district_contacts (
            id, district_id, first_name, last_name, email, phone, title,
            status, campaign_id, notes, created_at
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)
        "#,
        params![
            contact.id,
            contact.district_id,
            contact.first_name,
            contact.last_name,
            contact.email,
            contact.phone,
            contact.title,
            contact.status.as_str(),
            contact.campaign_id,
            contact.notes,
            contact.created_at.to_rfc3339(),
        ],
    )?;
    Ok(())
}

/// The single dispatch point between the two tenant collections. Everything
/// above this returns the tagged `CrmContact` union.
pub async fn fetch_contacts(pool: &DbPool, tenant: Tenant) -> Result<Vec<CrmContact>> {
    let conn = pool.get().await?;
    let contacts = match tenant {
        Tenant::Avalern => list_district_contacts(&conn)?
            .into_iter()
            .map(CrmContact::District)
            .collect(),
        Tenant::CraftyCode => list_leads(&conn, tenant.company())?
            .into_iter()
            .map(CrmContact::Lead)
            .collect(),
    };
    Ok(contacts)
}

// --- touchpoints ---

pub fn insert_touchpoint(conn: &Connection, tp: &NewTouchpoint) -> SqliteResult<String> {
    let id = uuid::Uuid::new_v4().to_string();
    let (lead_id, contact_id) = match &tp.parent {
        TouchpointParent::Lead(id) => (Some(id.as_str()), None),
        TouchpointParent::DistrictContact(id) => (None, Some(id.as_str())),
    };
    conn.execute(
        r#"
        INSERT INTO touchpoints (
            id, lead_id, district_contact_id, touchpoint_type, subject,
            content, scheduled_at, completed_at, outcome, created_at
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
        "#,
        params![
            id,
            lead_id,
            contact_id,
            tp.touchpoint_type.as_str(),
            tp.subject,
            tp.content,
            tp.scheduled_at.map(|t| t.to_rfc3339()),
            tp.completed_at.map(|t| t.to_rfc3339()),
            tp.outcome,
            Utc::now().to_rfc3339(),
        ],
    )?;
    Ok(id)
}

pub fn touchpoints_for_parent(
    conn: &Connection,
    parent: &TouchpointParent,
) -> SqliteResult<Vec<Touchpoint>> {
    let column = match parent {
        TouchpointParent::Lead(_) => "lead_id",
        TouchpointParent::DistrictContact(_) => "district_contact_id",
    };
    let sql = format!(
        "SELECT {TOUCHPOINT_COLUMNS} FROM touchpoints WHERE {column} = ?1 ORDER BY created_at DESC"
    );
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map([parent.id()], touchpoint_from_row)?;
    rows.collect()
}

pub fn update_last_contacted(
    conn: &Connection,
    parent: &TouchpointParent,
    at: DateTime<Utc>,
) -> SqliteResult<()> {
    let (table, id) = match parent {
        TouchpointParent::Lead(id) => ("leads", id),
        TouchpointParent::DistrictContact(id) => ("district_contacts", id),
    };
    let sql = format!("UPDATE {table} SET last_contacted_at = ?1 WHERE id = ?2");
    conn.execute(&sql, params![at.to_rfc3339(), id])?;
    Ok(())
}

// --- districts and assignments ---

#[derive(Debug, Default)]
pub struct DistrictQuery {
    pub status: Option<LeadStatus>,
    pub county: Option<String>,
    pub search: Option<String>,
    pub campaign_id: Option<String>,
    pub assigned_only: bool,
    pub user_id: Option<String>,
}

#[derive(Debug, Clone, serde::Serialize)]
pub struct DistrictRow {
    #[serde(flatten)]
    pub district: District,
    pub contacts_count: i64,
    pub valid_contacts_count: i64,
    pub assigned_to_user: bool,
}

/// District listing with computed contact counts and assignment flags
/// relative to the supplied user. The status/campaign filters narrow which
/// contacts are counted; county/search/assignedOnly narrow the districts.
pub fn list_districts(conn: &Connection, query: &DistrictQuery) -> SqliteResult<Vec<DistrictRow>> {
    let assigned: HashSet<String> = match &query.user_id {
        Some(user_id) => user_district_ids(conn, user_id)?.into_iter().collect(),
        None => HashSet::new(),
    };

    let mut stmt = conn.prepare(
        "SELECT id, name, county, state, created_at FROM districts ORDER BY name ASC",
    )?;
    let districts: Vec<District> = stmt
        .query_map([], |row| {
            Ok(District {
                id: row.get(0)?,
                name: row.get(1)?,
                county: row.get(2)?,
                state: row.get(3)?,
                created_at: parse_ts(4, row.get(4)?)?,
            })
        })?
        .collect::<SqliteResult<_>>()?;

    let mut rows = Vec::new();
    for district in districts {
        if let Some(county) = &query.county {
            if !district.county.eq_ignore_ascii_case(county) {
                continue;
            }
        }
        if let Some(search) = &query.search {
            let needle = search.to_lowercase();
            if !district.name.to_lowercase().contains(&needle)
                && !district.county.to_lowercase().contains(&needle)
            {
                continue;
            }
        }
        let assigned_to_user = assigned.contains(&district.id);
        if query.assigned_only && !assigned_to_user {
            continue;
        }

        let mut conditions = vec!["district_id = ?1".to_string()];
        let mut args: Vec<String> = vec![district.id.clone()];
        if let Some(status) = query.status {
            args.push(status.as_str().to_string());
            conditions.push(format!("status = ?{}", args.len()));
        }
        if let Some(campaign_id) = &query.campaign_id {
            args.push(campaign_id.clone());
            conditions.push(format!("campaign_id = ?{}", args.len()));
        }
        let where_clause = conditions.join(" AND ");

        let sql = format!(
            "SELECT COUNT(*), \
                 SUM(CASE WHEN email IS NOT NULL AND TRIM(email) != '' THEN 1 ELSE 0 END) \
             FROM district_contacts WHERE {where_clause}"
        );
        let (contacts_count, valid_contacts_count) = conn.query_row(
            &sql,
            rusqlite::params_from_iter(args.iter()),
            |row| {
                Ok((
                    row.get::<_, i64>(0)?,
                    row.get::<_, Option<i64>>(1)?.unwrap_or(0),
                ))
            },
        )?;

        rows.push(DistrictRow {
            district,
            contacts_count,
            valid_contacts_count,
            assigned_to_user,
        });
    }
    Ok(rows)
}

pub fn insert_district(conn: &Connection, name: &str, county: &str, state: &str) -> SqliteResult<District> {
    let district = District {
        id: uuid::Uuid::new_v4().to_string(),
        name: name.to_string(),
        county: county.to_string(),
        state: state.to_string(),
        created_at: Utc::now(),
    };
    conn.execute(
        "INSERT INTO districts (id, name, county, state, created_at) VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            district.id,
            district.name,
            district.county,
            district.state,
            district.created_at.to_rfc3339(),
        ],
    )?;
    Ok(district)
}

pub fn user_district_ids(conn: &Connection, user_id: &str) -> SqliteResult<Vec<String>> {
    let mut stmt =
        conn.prepare("SELECT district_id FROM district_leads WHERE user_id = ?1 ORDER BY assigned_at ASC")?;
    let rows = stmt.query_map([user_id], |row| row.get::<_, String>(0))?;
    rows.collect()
}

pub fn assign_districts(conn: &Connection, user_id: &str, district_ids: &[String]) -> SqliteResult<()> {
    let now = Utc::now().to_rfc3339();
    for district_id in district_ids {
        conn.execute(
            "INSERT OR IGNORE INTO district_leads (user_id, district_id, assigned_at) VALUES (?1, ?2, ?3)",
            params![user_id, district_id, now],
        )?;
    }
    Ok(())
}

pub fn unassign_districts(conn: &Connection, user_id: &str, district_ids: &[String]) -> SqliteResult<()> {
    for district_id in district_ids {
        conn.execute(
            "DELETE FROM district_leads WHERE user_id = ?1 AND district_id = ?2",
            params![user_id, district_id],
        )?;
    }
    Ok(())
}

/// Completed touchpoints for the contacts of a user's assigned districts,
/// optionally bounded by completion date.
pub fn user_touchpoints(
    conn: &Connection,
    user_id: &str,
    start: Option<DateTime<Utc>>,
    end: Option<DateTime<Utc>>,
) -> SqliteResult<Vec<Touchpoint>> {
    let mut conditions = vec![
        "t.completed_at IS NOT NULL".to_string(),
        "dl.user_id = ?1".to_string(),
    ];
    let mut args: Vec<String> = vec![user_id.to_string()];
    if let Some(start) = start {
        args.push(start.to_rfc3339());
        conditions.push(format!("t.completed_at >= ?{}", args.len()));
    }
    if let Some(end) = end {
        args.push(end.to_rfc3339());
        conditions.push(format!("t.completed_at <= ?{}", args.len()));
    }
    let sql = format!(
        "SELECT t.id, t.lead_id, t.district_contact_id, t.touchpoint_type, t.subject, \
                t.content, t.scheduled_at, t.completed_at, t.outcome, t.created_at \
         FROM touchpoints t \
         JOIN district_contacts dc ON t.district_contact_id = dc.id \
         JOIN district_leads dl ON dc.district_id = dl.district_id \
         WHERE {} \
         ORDER BY t.completed_at DESC",
        conditions.join(" AND ")
    );
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(rusqlite::params_from_iter(args.iter()), touchpoint_from_row)?;
    rows.collect()
}

// --- stats ---

#[derive(Debug, serde::Serialize)]
pub struct CrmStats {
    pub total_leads: i64,
    pub leads_with_campaign: i64,
    pub total_district_contacts: i64,
    pub total_districts: i64,
    pub total_campaigns: i64,
    pub total_touchpoints: i64,
    pub completed_touchpoints: i64,
    pub scheduled_touchpoints: i64,
    pub leads_by_status: HashMap<String, i64>,
}

pub fn crm_stats(conn: &Connection) -> SqliteResult<CrmStats> {
    let count = |sql: &str| conn.query_row(sql, [], |row| row.get::<_, i64>(0));

    let mut leads_by_status = HashMap::new();
    let mut stmt = conn.prepare("SELECT status, COUNT(*) FROM leads GROUP BY status")?;
    let rows = stmt.query_map([], |row| {
        Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)?))
    })?;
    for row in rows {
        let (status, n) = row?;
        leads_by_status.insert(status, n);
    }

    Ok(CrmStats {
        total_leads: count("SELECT COUNT(*) FROM leads")?,
        leads_with_campaign: count("SELECT COUNT(*) FROM leads WHERE campaign_id IS NOT NULL")?,
        total_district_contacts: count("SELECT COUNT(*) FROM district_contacts")?,
        total_districts: count("SELECT COUNT(*) FROM districts")?,
        total_campaigns: count("SELECT COUNT(*) FROM campaigns")?,
        total_touchpoints: count("SELECT COUNT(*) FROM touchpoints")?,
        completed_touchpoints: count(
            "SELECT COUNT(*) FROM touchpoints WHERE completed_at IS NOT NULL AND outcome IS NOT NULL",
        )?,
        scheduled_touchpoints: count(
            "SELECT COUNT(*) FROM touchpoints WHERE scheduled_at IS NOT NULL AND completed_at IS NULL",
        )?,
        leads_by_status,
    })
}

pub async fn get_crm_stats(pool: &DbPool) -> Result<CrmStats> {
    let conn = pool.get().await?;
    Ok(crm_stats(&conn)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{LeadSource, LeadStatus, TouchpointType};

    fn test_conn() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        init_schema(&conn).unwrap();
        conn
    }

    fn sample_lead(id: &str, email: &str) -> NewLead {
        NewLead {
            id: id.to_string(),
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            email: email.to_string(),
            phone: Some("555-123-4567".to_string()),
            city: Some("San Diego".to_string()),
            state: Some("CA".to_string()),
            company: "CraftyCode".to_string(),
            linkedin_url: None,
            website_link: None,
            online_profile: None,
            source: LeadSource::Zillow,
            status: LeadStatus::NotContacted,
            notes: None,
        }
    }

    #[test]
    fn insert_and_list_leads_roundtrip() {
        let conn = test_conn();
        insert_lead(&conn, &sample_lead("l1", "ada@example.com")).unwrap();

        let leads = list_leads(&conn, "CraftyCode").unwrap();
        assert_eq!(leads.len(), 1);
        assert_eq!(leads[0].email, "ada@example.com");
        assert_eq!(leads[0].status, LeadStatus::NotContacted);
        assert_eq!(leads[0].source, LeadSource::Zillow);
        assert_eq!(leads[0].touchpoints_count, 0);
    }

    #[test]
    fn duplicate_email_within_company_is_rejected_case_insensitively() {
        let conn = test_conn();
        insert_lead(&conn, &sample_lead("l1", "ada@example.com")).unwrap();
        let err = insert_lead(&conn, &sample_lead("l2", "ADA@Example.com"));
        assert!(err.is_err());
    }

    #[test]
    fn touchpoint_requires_exactly_one_parent() {
        let conn = test_conn();
        insert_lead(&conn, &sample_lead("l1", "ada@example.com")).unwrap();

        // Neither parent set fails the CHECK constraint.
        let err = conn.execute(
            "INSERT INTO touchpoints (id, touchpoint_type, subject, created_at) VALUES ('t1', 'email', 'x', ?1)",
            params![Utc::now().to_rfc3339()],
        );
        assert!(err.is_err());

        let tp = NewTouchpoint {
            parent: TouchpointParent::Lead("l1".to_string()),
            touchpoint_type: TouchpointType::Email,
            subject: "Intro".to_string(),
            content: None,
            scheduled_at: None,
            completed_at: None,
            outcome: None,
        };
        insert_touchpoint(&conn, &tp).unwrap();
    }

    #[test]
    fn touchpoint_counts_split_completed_and_scheduled() {
        let conn = test_conn();
        insert_lead(&conn, &sample_lead("l1", "ada@example.com")).unwrap();

        // Completed with outcome: counts toward touchpoints_count.
        insert_touchpoint(
            &conn,
            &NewTouchpoint {
                parent: TouchpointParent::Lead("l1".to_string()),
                touchpoint_type: TouchpointType::Call,
                subject: "Discovery call".to_string(),
                content: None,
                scheduled_at: None,
                completed_at: Some(Utc::now()),
                outcome: Some("connected".to_string()),
            },
        )
        .unwrap();
        // Scheduled, not completed: counts toward scheduled count.
        insert_touchpoint(
            &conn,
            &NewTouchpoint {
                parent: TouchpointParent::Lead("l1".to_string()),
                touchpoint_type: TouchpointType::Meeting,
                subject: "Demo".to_string(),
                content: None,
                scheduled_at: Some(Utc::now()),
                completed_at: None,
                outcome: None,
            },
        )
        .unwrap();
        // Completed without outcome: counts toward neither.
        insert_touchpoint(
            &conn,
            &NewTouchpoint {
                parent: TouchpointParent::Lead("l1".to_string()),
                touchpoint_type: TouchpointType::Email,
                subject: "Follow up".to_string(),
                content: None,
                scheduled_at: None,
                completed_at: Some(Utc::now()),
                outcome: None,
            },
        )
        .unwrap();

        let leads = list_leads(&conn, "CraftyCode").unwrap();
        assert_eq!(leads[0].touchpoints_count, 1);
        assert_eq!(leads[0].scheduled_touchpoints_count, 1);
    }

    #[test]
    fn district_listing_computes_counts_and_assignment_flags() {
        let conn = test_conn();
        let district = insert_district(&conn, "Sweetwater Union", "San Diego", "California").unwrap();

        let mut contact = DistrictContact {
            id: "c1".to_string(),
            first_name: "Grace".to_string(),
            last_name: "Hopper".to_string(),
            email: "grace@district.org".to_string(),
            phone: None,
            title: Some("Superintendent".to_string()),
            district_id: district.id.clone(),
            district_name: String::new(),
            county: String::new(),
            status: LeadStatus::NotContacted,
            campaign_id: None,
            notes: None,
            last_contacted_at: None,
            created_at: Utc::now(),
            touchpoints_count: 0,
            scheduled_touchpoints_count: 0,
        };
        insert_district_contact(&conn, &contact).unwrap();
        contact.id = "c2".to_string();
        contact.email = "  ".to_string();
        insert_district_contact(&conn, &contact).unwrap();

        assign_districts(&conn, "user-1", &[district.id.clone()]).unwrap();

        let rows = list_districts(
            &conn,
            &DistrictQuery {
                user_id: Some("user-1".to_string()),
                ..Default::default()
            },
        )
        .unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].contacts_count, 2);
        assert_eq!(rows[0].valid_contacts_count, 1);
        assert!(rows[0].assigned_to_user);

        // assigned_only hides districts for a user with no assignments.
        let rows = list_districts(
            &conn,
            &DistrictQuery {
                user_id: Some("user-2".to_string()),
                assigned_only: true,
                ..Default::default()
            },
        )
        .unwrap();
        assert!(rows.is_empty());
    }

    #[test]
    fn district_contact_rows_map_status_and_counts() {
        let conn = test_conn();
        let district = insert_district(&conn, "Kern High", "Kern", "California").unwrap();
        insert_district_contact(
            &conn,
            &DistrictContact {
                id: "c1".to_string(),
                first_name: "Grace".to_string(),
                last_name: "Hopper".to_string(),
                email: "grace@district.org".to_string(),
                phone: None,
                title: Some("Superintendent".to_string()),
                district_id: district.id.clone(),
                district_name: String::new(),
                county: String::new(),
                status: LeadStatus::Engaged,
                campaign_id: None,
                notes: None,
                last_contacted_at: None,
                created_at: Utc::now(),
                touchpoints_count: 0,
                scheduled_touchpoints_count: 0,
            },
        )
        .unwrap();
        insert_touchpoint(
            &conn,
            &NewTouchpoint {
                parent: TouchpointParent::DistrictContact("c1".to_string()),
                touchpoint_type: TouchpointType::Call,
                subject: "Intro call".to_string(),
                content: None,
                scheduled_at: None,
                completed_at: Some(Utc::now()),
                outcome: Some("connected".to_string()),
            },
        )
        .unwrap();

        let contacts = list_district_contacts(&conn).unwrap();
        assert_eq!(contacts.len(), 1);
        assert_eq!(contacts[0].status, LeadStatus::Engaged);
        assert_eq!(contacts[0].district_name, "Kern High");
        assert_eq!(contacts[0].county, "Kern");
        assert_eq!(contacts[0].touchpoints_count, 1);
        assert_eq!(contacts[0].scheduled_touchpoints_count, 0);
    }

    #[test]
    fn unassign_removes_only_named_districts() {
        let conn = test_conn();
        let d1 = insert_district(&conn, "North County", "San Diego", "California").unwrap();
        let d2 = insert_district(&conn, "Kern High", "Kern", "California").unwrap();
        assign_districts(&conn, "u1", &[d1.id.clone(), d2.id.clone()]).unwrap();

        unassign_districts(&conn, "u1", &[d1.id.clone()]).unwrap();
        let ids = user_district_ids(&conn, "u1").unwrap();
        assert_eq!(ids, vec![d2.id]);
    }

    #[test]
    fn update_lead_persists_recomputed_status() {
        let conn = test_conn();
        insert_lead(&conn, &sample_lead("l1", "ada@example.com")).unwrap();
        let lead = get_lead(&conn, "l1").unwrap().unwrap();

        let mut update = LeadUpdate::from_lead(&lead);
        update.campaign_id = Some("camp-1".to_string());
        insert_campaign(
            &conn,
            &Campaign {
                id: "camp-1".to_string(),
                name: "Spring push".to_string(),
                company: "CraftyCode".to_string(),
                created_at: Utc::now(),
            },
        )
        .unwrap();
        update_lead(&conn, "l1", &update, LeadStatus::ActivelyContacting).unwrap();

        let lead = get_lead(&conn, "l1").unwrap().unwrap();
        assert_eq!(lead.status, LeadStatus::ActivelyContacting);
        assert_eq!(lead.campaign_id.as_deref(), Some("camp-1"));
    }
}
