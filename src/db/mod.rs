//! Portfolio persistence.
//!
//! - [`store`] - the libsql-backed [`PortfolioStore`] (local file or in-memory)
//! - [`seed`] - the sample portfolio written on first start, and owner bootstrap

#![allow(missing_docs)]

pub mod seed;
pub mod store;

pub use store::PortfolioStore;

/// Where the store keeps its data, derived from `database.url`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DatabaseProvider {
    Memory,
    SQLite { path: String },
}

impl DatabaseProvider {
    pub fn from_url(url: &str) -> Self {
        match url.trim() {
            "" | ":memory:" => DatabaseProvider::Memory,
            other => DatabaseProvider::SQLite {
                path: other
                    .strip_prefix("file:")
                    .unwrap_or(other)
                    .to_string(),
            },
        }
    }

    pub async fn connect(&self) -> crate::types::Result<PortfolioStore> {
        match self {
            DatabaseProvider::Memory => PortfolioStore::new_memory().await,
            DatabaseProvider::SQLite { path } => PortfolioStore::new_local(path).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_from_url() {
        assert_eq!(DatabaseProvider::from_url(":memory:"), DatabaseProvider::Memory);
        assert_eq!(DatabaseProvider::from_url(""), DatabaseProvider::Memory);
        assert_eq!(
            DatabaseProvider::from_url("file:./data/folio.db"),
            DatabaseProvider::SQLite {
                path: "./data/folio.db".to_string()
            }
        );
    }
}
