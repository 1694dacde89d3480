mod auth;
mod client;
mod storage;

pub use client::SheetsClient;

use crate::error::Result;
use async_trait::async_trait;

/// Raw row access to a spreadsheet. Cells are exchanged as display strings.
#[async_trait]
pub trait SheetOperations {
    async fn read_range(&self, range: &str) -> Result<Vec<Vec<String>>>;

    /// Append rows as user-entered values, returning the rows echoed back by the backend.
    async fn append_range(&self, range: &str, rows: Vec<Vec<String>>) -> Result<Vec<Vec<String>>>;
}
