pub mod districts;
pub mod leads;
pub mod stats;
pub mod sync;
pub mod users;

// Re-export all route functions for mounting.
pub use districts::*;
pub use leads::*;
pub use stats::*;
pub use sync::*;
pub use users::*;
