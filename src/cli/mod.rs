pub mod cli;
pub mod run;

mod run_add_touchpoint;
mod run_browse_leads;
mod run_edit_lead;
mod run_export_csv;
mod run_import_csv;
mod run_server;
mod run_switch_tenant;
mod run_sync_instantly;
mod show_database_stats;
