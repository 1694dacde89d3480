pub mod project;
pub mod time_entry;

pub use project::{ProjectList, ProjectTask};
pub use time_entry::{FromSheetRows, TimeEntry, ToSheetRows};
