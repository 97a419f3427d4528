//! Minimal wiring demo: publish rows, overlay a catalog action, dispatch.
//!
//! Run with `cargo run -p rowgrid-column --example grid`.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use rowgrid_column::{
    ActionDispatcher, ActionsColumnConfig, ActionsColumnState, AutoConfirm, ComponentRegistry, GridComponent, Navigate,
    RowsProvider, drive_rows,
};
use rowgrid_types::{ActionTemplate, ResolvedAction, Row};
use serde_json::{Value, json};
use tracing::{Level, info};

struct LoggingNavigator;

impl Navigate for LoggingNavigator {
    fn navigate(&self, href: &str) {
        info!(href, "navigating");
    }
}

struct CrudComponent;

impl GridComponent for CrudComponent {
    fn invoke(&self, target: &str, index: &str, record_id: &Value, _action: &ResolvedAction) {
        info!(target, index, %record_id, "component invoked");
    }
}

fn rows(value: serde_json::Value) -> Vec<Row> {
    value
        .as_array()
        .expect("rows array")
        .iter()
        .map(|row| row.as_object().expect("row object").clone())
        .collect()
}

#[tokio::main(flavor = "multi_thread")]
async fn main() {
    init_tracing();

    let provider = RowsProvider::new();
    let state = Arc::new(Mutex::new(ActionsColumnState::new(ActionsColumnConfig::default())));
    let mut actions_rx = state.lock().expect("state lock").subscribe_actions();
    tokio::spawn(drive_rows(Arc::clone(&state), provider.subscribe()));

    provider.publish(rows(json!([
        {"id": 1, "name": "Ada", "actions": {"edit": {"href": "/people/${id}/edit"}}},
        {"id": 2, "name": "Grace", "actions": {"edit": {"href": "/people/${id}/edit"}}}
    ])));
    while actions_rx.borrow_and_update().len() != 2 {
        actions_rx.changed().await.expect("rebuild");
    }

    let delete: ActionTemplate = serde_json::from_value(json!({
        "label": "Delete",
        "confirm": {"title": "Delete ${name}?", "message": "Record ${id} will be removed."},
        "callback": {"provider": "listing.crud", "target": "remove"}
    }))
    .expect("catalog template");
    state.lock().expect("state lock").add_action("delete", delete);

    let registry = ComponentRegistry::new();
    registry.register("listing.crud", Arc::new(CrudComponent) as Arc<dyn GridComponent>);
    let dispatcher = ActionDispatcher::new(registry, Arc::new(LoggingNavigator), Arc::new(AutoConfirm));

    {
        let state = state.lock().expect("state lock");
        for row_index in 0..state.rows().len() {
            let labels: Vec<String> = state
                .visible_actions(row_index)
                .iter()
                .map(|action| action.label.clone().unwrap_or_else(|| action.index.clone()))
                .collect();
            info!(row_index, ?labels, "row actions");
        }
        dispatcher.apply_action(&state, "edit", 0);
        dispatcher.apply_action(&state, "delete", 1);
    }

    // Give the fire-and-forget invocation a moment to land.
    tokio::time::sleep(Duration::from_millis(100)).await;
}

fn init_tracing() {
    let filter = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into());
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_max_level(Level::INFO)
        .try_init();
}
