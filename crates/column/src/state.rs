//! Actions column state: rows snapshot, template catalog, derived actions.
//!
//! The derived collection is rebuilt wholesale on every rows or catalog
//! change and published as one atomic snapshot through a watch channel, so
//! observers only ever see a complete collection.

use std::sync::Arc;

use indexmap::IndexMap;
use rowgrid_types::{ActionTemplate, ActionsCollection, ResolvedAction, Row, RowActions};
use serde_json::Value;
use tokio::sync::watch;
use tracing::debug;

use crate::config::ActionsColumnConfig;
use crate::templates::resolve_action;

#[derive(Debug)]
pub struct ActionsColumnState {
    config: ActionsColumnConfig,
    rows: Arc<Vec<Row>>,
    templates: IndexMap<String, ActionTemplate>,
    actions: Arc<ActionsCollection>,
    actions_tx: watch::Sender<Arc<ActionsCollection>>,
    opened: Option<usize>,
}

impl ActionsColumnState {
    pub fn new(config: ActionsColumnConfig) -> Self {
        let actions = Arc::new(ActionsCollection::new());
        let (actions_tx, _) = watch::channel(Arc::clone(&actions));
        Self {
            config,
            rows: Arc::new(Vec::new()),
            templates: IndexMap::new(),
            actions,
            actions_tx,
            opened: None,
        }
    }

    // Selectors
    pub fn config(&self) -> &ActionsColumnConfig {
        &self.config
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// Current derived collection, one entry per row in row order.
    pub fn actions(&self) -> &ActionsCollection {
        &self.actions
    }

    /// Actions of one row; `None` when the row index is out of range.
    pub fn row_actions(&self, row_index: usize) -> Option<&RowActions> {
        self.actions.get(row_index)
    }

    /// One named action of one row.
    pub fn action(&self, row_index: usize, action_index: &str) -> Option<&ResolvedAction> {
        self.row_actions(row_index)?.get(action_index)
    }

    /// Actions of a row whose `hidden` flag is not set.
    pub fn visible_actions(&self, row_index: usize) -> Vec<&ResolvedAction> {
        self.row_actions(row_index)
            .map(|actions| actions.values().filter(|action| action.is_visible()).collect())
            .unwrap_or_default()
    }

    /// Whether the row has exactly one visible action.
    pub fn is_single(&self, row_index: usize) -> bool {
        self.visible_actions(row_index).len() == 1
    }

    /// Whether the row has more than one visible action.
    pub fn is_multiple(&self, row_index: usize) -> bool {
        self.visible_actions(row_index).len() > 1
    }

    /// Index of the row whose action list is expanded, if any.
    pub fn opened(&self) -> Option<usize> {
        self.opened
    }

    /// Observes derived-collection snapshots. Every published value is a
    /// complete rebuild; readers never see a partially-updated collection.
    pub fn subscribe_actions(&self) -> watch::Receiver<Arc<ActionsCollection>> {
        self.actions_tx.subscribe()
    }

    // Reducers
    /// Replaces the rows snapshot and rebuilds the derived collection.
    pub fn apply_rows(&mut self, rows: Arc<Vec<Row>>) {
        self.rows = rows;
        self.update_actions();
    }

    /// Inserts or overwrites a catalog action template, then rebuilds.
    /// Overwriting is last-write-wins by design of the catalog.
    pub fn add_action(&mut self, index: impl Into<String>, template: ActionTemplate) {
        self.templates.insert(index.into(), template);
        self.update_actions();
    }

    /// Rebuilds the derived collection from scratch and publishes it as one
    /// atomic snapshot.
    pub fn update_actions(&mut self) {
        let actions: ActionsCollection = self
            .rows
            .iter()
            .enumerate()
            .map(|(row_index, row)| self.format_actions(row, row_index))
            .collect();
        debug!(rows = actions.len(), "rebuilt actions collection");
        self.actions = Arc::new(actions);
        self.actions_tx.send_replace(Arc::clone(&self.actions));
    }

    /// Opens the given row's action list, or closes it when it is already
    /// the open one. At most one row is open at any time.
    pub fn toggle_list(&mut self, row_index: usize) {
        self.opened = if self.opened == Some(row_index) {
            None
        } else {
            Some(row_index)
        };
    }

    /// Closes the action list only when the given row is the open one.
    pub fn close_list(&mut self, row_index: usize) {
        if self.opened == Some(row_index) {
            self.opened = None;
        }
    }

    /// Produces the action map of one row: embedded actions first, catalog
    /// actions overlaid by index (catalog wins, position preserved).
    fn format_actions(&self, row: &Row, row_index: usize) -> RowActions {
        let record_id = row.get(&self.config.index_field).cloned().unwrap_or(Value::Null);
        let mut actions = RowActions::new();

        if let Some(Value::Object(embedded)) = row.get(&self.config.index) {
            for (index, value) in embedded {
                match serde_json::from_value::<ActionTemplate>(value.clone()) {
                    Ok(template) => {
                        actions.insert(index.clone(), resolve_action(&template, index, row_index, &record_id, row));
                    }
                    Err(error) => {
                        debug!(%error, index = %index, row_index, "skipping malformed embedded action");
                    }
                }
            }
        }

        for (index, template) in &self.templates {
            actions.insert(index.clone(), resolve_action(template, index, row_index, &record_id, row));
        }

        actions
    }
}

impl Default for ActionsColumnState {
    fn default() -> Self {
        Self::new(ActionsColumnConfig::default())
    }
}
