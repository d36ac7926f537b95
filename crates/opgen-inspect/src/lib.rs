pub mod model;
pub mod report;

// Re-export commonly used types/functions for consumers
pub use model::{load, load_set};
pub use report::{lookup_report, mode_groups, table_rows, LookupOut, ModeGroup, TableRow};
