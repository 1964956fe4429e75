use tracing::{error, info};

use crate::config::Config;
use crate::database::DbPool;
use crate::models::{CliApp, Result, Tenant};
use crate::workspace::{sync::SyncClient, LeadWorkspace};

#[derive(Debug, Clone)]
pub enum MenuAction {
    BrowseLeads,
    SwitchTenant,
    ImportCsv,
    ExportCsv,
    EditLead,
    AddTouchpoint,
    SyncInstantly,
    ShowStats,
    StartApiServer,
    Exit,
}

impl std::fmt::Display for MenuAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MenuAction::BrowseLeads => write!(f, "🔍 Browse leads (search, filter, paginate)"),
            MenuAction::SwitchTenant => write!(f, "🏢 Switch tenant (CraftyCode / Avalern)"),
            MenuAction::ImportCsv => write!(f, "📥 Import leads from CSV"),
            MenuAction::ExportCsv => write!(f, "📤 Export leads to CSV"),
            MenuAction::EditLead => write!(f, "✏️  Edit a lead"),
            MenuAction::AddTouchpoint => write!(f, "📞 Record a touchpoint"),
            MenuAction::SyncInstantly => write!(f, "🚀 Sync Instantly (bulk outreach push)"),
            MenuAction::ShowStats => write!(f, "📊 Show database statistics"),
            MenuAction::StartApiServer => write!(f, "🌐 Start API server"),
            MenuAction::Exit => write!(f, "🚪 Exit"),
        }
    }
}

impl CliApp {
    pub async fn new(config: Config, db_pool: DbPool) -> Result<Self> {
        let sync_client = SyncClient::new(&config)?;
        let mut workspace =
            LeadWorkspace::new(Tenant::CraftyCode, config.pagination.items_per_page);

        // A failed initial load is not fatal; the workspace just starts
        // empty and the next refresh can pick the data up.
        match workspace.refresh(&db_pool).await {
            Ok(()) => info!("Workspace loaded for {}", workspace.tenant()),
            Err(e) => error!("Initial workspace load failed: {}", e),
        }

        Ok(Self {
            config,
            db_pool,
            workspace,
            sync_client,
        })
    }
}
