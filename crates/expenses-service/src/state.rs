//! Application state.

use std::sync::Arc;

use expenses_store::RocksStore;

use crate::config::ServiceConfig;
use crate::ledger::BalanceGuard;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// The storage backend, for reads and non-balance writes.
    pub store: Arc<RocksStore>,

    /// Balance guard, the only writer of account balances.
    pub ledger: BalanceGuard<RocksStore>,

    /// Service configuration.
    pub config: ServiceConfig,
}

impl AppState {
    /// Create a new application state.
    #[must_use]
    pub fn new(store: Arc<RocksStore>, config: ServiceConfig) -> Self {
        let ledger = BalanceGuard::new(Arc::clone(&store));

        Self {
            store,
            ledger,
            config,
        }
    }
}
