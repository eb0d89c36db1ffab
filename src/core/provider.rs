//! Rate source abstraction

use crate::core::error::RateError;
use crate::core::rates::RateTable;
use async_trait::async_trait;

#[async_trait]
pub trait RateProvider: Send + Sync {
    fn name(&self) -> &str;

    /// Fetches a complete table from the source.
    async fn fetch(&self) -> Result<RateTable, RateError>;

    /// Table served when `fetch` fails.
    fn fallback(&self) -> RateTable {
        RateTable::fallback()
    }
}
