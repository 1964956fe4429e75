use std::path::Path;

use tracing::info;

use crate::models::Lead;

pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

const EXPORT_HEADERS: [&str; 11] = [
    "First Name",
    "Last Name",
    "Email",
    "Phone Number",
    "City/State",
    "Company",
    "LinkedIn URL",
    "Website Link",
    "Online Profile",
    "Source",
    "Status",
];

/// Serializes persisted leads back to CSV with the fixed export column set.
pub fn export_to_csv(leads: &[Lead], path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(EXPORT_HEADERS)?;

    for lead in leads {
        let city_state = match (&lead.city, &lead.state) {
            (Some(city), Some(state)) => format!("{city}, {state}"),
            (Some(city), None) => city.clone(),
            (None, Some(state)) => state.clone(),
            (None, None) => String::new(),
        };
        writer.write_record([
            lead.first_name.as_str(),
            lead.last_name.as_str(),
            lead.email.as_str(),
            lead.phone.as_deref().unwrap_or(""),
            city_state.as_str(),
            lead.company.as_str(),
            lead.linkedin_url.as_deref().unwrap_or(""),
            lead.website_link.as_deref().unwrap_or(""),
            lead.online_profile.as_deref().unwrap_or(""),
            lead.source.as_str(),
            lead.status.as_str(),
        ])?;
    }
    writer.flush()?;

    info!("✓ Exported {} leads to {}", leads.len(), path.display());
    Ok(())
}

/// Timestamped filename inside the configured output directory.
pub fn export_filename(directory: &str) -> std::path::PathBuf {
    Path::new(directory).join(format!(
        "leads_export_{}.csv",
        chrono::Utc::now().format("%Y%m%d_%H%M%S")
    ))
}
