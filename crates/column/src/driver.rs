//! Rows provider contract and the subscription loop.
//!
//! The provider publishes whole ordered snapshots; the column subscribes once
//! and rebuilds its derived collection on every change notification. No
//! incremental diffing.

use std::sync::{Arc, Mutex};

use rowgrid_types::Row;
use tokio::sync::watch;

use crate::state::ActionsColumnState;

/// Publishes ordered row snapshots to subscribed columns.
#[derive(Debug)]
pub struct RowsProvider {
    rows_tx: watch::Sender<Arc<Vec<Row>>>,
}

impl RowsProvider {
    pub fn new() -> Self {
        let (rows_tx, _) = watch::channel(Arc::new(Vec::new()));
        Self { rows_tx }
    }

    /// Replaces the current snapshot and notifies subscribers.
    pub fn publish(&self, rows: Vec<Row>) {
        self.rows_tx.send_replace(Arc::new(rows));
    }

    pub fn subscribe(&self) -> watch::Receiver<Arc<Vec<Row>>> {
        self.rows_tx.subscribe()
    }
}

impl Default for RowsProvider {
    fn default() -> Self {
        Self::new()
    }
}

/// Forwards row changes into the column until the provider goes away.
///
/// Seeds the column from the current snapshot first, so a subscriber that
/// attaches after the provider's initial publish still sees those rows.
pub async fn drive_rows(state: Arc<Mutex<ActionsColumnState>>, mut rows_rx: watch::Receiver<Arc<Vec<Row>>>) {
    let initial = rows_rx.borrow_and_update().clone();
    state.lock().expect("column state lock").apply_rows(initial);

    while rows_rx.changed().await.is_ok() {
        let rows = rows_rx.borrow_and_update().clone();
        state.lock().expect("column state lock").apply_rows(rows);
    }
}
