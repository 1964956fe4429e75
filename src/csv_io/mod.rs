// CSV import/export pipeline: parse -> validate -> deduplicate -> convert,
// with export mirroring the import column set.

pub mod convert;
pub mod export;
pub mod import;
pub mod types;
pub mod validate;

pub use convert::convert_to_lead_insert;
pub use export::{export_filename, export_to_csv};
pub use import::{deduplicate_leads, parse_csv_file};
pub use validate::validate_leads;
