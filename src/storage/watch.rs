//! Reload-on-change ledger snapshot
//!
//! A [`LedgerView`] keeps an in-memory copy of the aggregate and reloads it
//! whenever the backend reports a change to a ledger or budget key. Changes
//! made elsewhere (another process writing the same files) are surfaced by
//! firing the backend's notifier by hand.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};

use crate::error::{LedgerError, LedgerResult};
use crate::models::{AppData, MonthData, MonthKey};

use super::budgets::BUDGET_KEY_PREFIX;
use super::events::{ChangeEvent, SubscriptionId};
use super::kv::KeyValueStore;
use super::ledger::{LedgerStore, LEDGER_KEY_FAMILY};

/// Whether a change to `key` can affect the ledger view
///
/// A missing key means the whole store was cleared.
pub fn is_relevant_key(key: Option<&str>, ledger_key: &str) -> bool {
    match key {
        None => true,
        Some(key) => {
            key == ledger_key
                || key.contains(LEDGER_KEY_FAMILY)
                || key.starts_with(BUDGET_KEY_PREFIX)
        }
    }
}

struct ViewState {
    snapshot: RwLock<AppData>,
    version: AtomicU64,
}

impl ViewState {
    fn reload(&self, store: &LedgerStore) -> LedgerResult<()> {
        let data = store.load()?;
        let mut snapshot = self
            .snapshot
            .write()
            .map_err(|e| LedgerError::Storage(format!("Failed to acquire write lock: {}", e)))?;
        *snapshot = data;
        self.version.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

/// Live snapshot of the ledger aggregate
pub struct LedgerView {
    store: LedgerStore,
    backend: Arc<dyn KeyValueStore>,
    state: Arc<ViewState>,
    subscription: SubscriptionId,
}

impl LedgerView {
    /// Load the current aggregate and start listening for changes
    pub fn new(backend: Arc<dyn KeyValueStore>, store: LedgerStore) -> LedgerResult<Self> {
        let state = Arc::new(ViewState {
            snapshot: RwLock::new(store.load()?),
            version: AtomicU64::new(0),
        });

        let listener_state = Arc::clone(&state);
        let listener_store = store.clone();
        let subscription = backend.notifier().subscribe(move |event: &ChangeEvent| {
            if !is_relevant_key(event.key.as_deref(), listener_store.key()) {
                return;
            }
            tracing::debug!(key = ?event.key, "reloading ledger view");
            if let Err(e) = listener_state.reload(&listener_store) {
                tracing::warn!(error = %e, "failed to reload ledger view");
            }
        });

        Ok(Self {
            store,
            backend,
            state,
            subscription,
        })
    }

    /// Copy of the current aggregate
    pub fn snapshot(&self) -> AppData {
        self.state
            .snapshot
            .read()
            .map(|data| data.clone())
            .unwrap_or_else(|poisoned| poisoned.into_inner().clone())
    }

    /// One month of the current aggregate
    pub fn month(&self, month: MonthKey) -> MonthData {
        self.snapshot().month(month)
    }

    /// Number of reloads since the view was created
    pub fn version(&self) -> u64 {
        self.state.version.load(Ordering::SeqCst)
    }

    /// Reload unconditionally
    pub fn refresh(&self) -> LedgerResult<()> {
        self.state.reload(&self.store)
    }
}

impl Drop for LedgerView {
    fn drop(&mut self) {
        self.backend.notifier().unsubscribe(self.subscription);
    }
}

impl std::fmt::Debug for LedgerView {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LedgerView")
            .field("key", &self.store.key())
            .field("version", &self.version())
            .finish()
    }
}
