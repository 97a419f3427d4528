//! End-to-end flow: rows provider -> derived actions -> confirmed dispatch.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use rowgrid_column::{
    ActionDispatcher, ActionsColumnConfig, ActionsColumnState, ComponentRegistry, ConfirmationDialog, GridComponent,
    Navigate, OnConfirm, RowsProvider, drive_rows,
};
use rowgrid_types::{ActionTemplate, ConfirmationRequest, ResolvedAction, Row};
use serde_json::{Value, json};
use tokio::sync::Notify;

fn rows(value: serde_json::Value) -> Vec<Row> {
    value
        .as_array()
        .expect("rows array")
        .iter()
        .map(|row| row.as_object().expect("row object").clone())
        .collect()
}

#[derive(Default)]
struct RecordingNavigator {
    visited: Mutex<Vec<String>>,
}

impl Navigate for RecordingNavigator {
    fn navigate(&self, href: &str) {
        self.visited.lock().expect("visited lock").push(href.to_string());
    }
}

/// Records the prompt, then accepts.
#[derive(Default)]
struct AcceptingDialog {
    prompted: Mutex<Vec<ConfirmationRequest>>,
}

impl ConfirmationDialog for AcceptingDialog {
    fn confirm(&self, request: ConfirmationRequest, on_confirm: OnConfirm) {
        self.prompted.lock().expect("prompted lock").push(request);
        on_confirm();
    }
}

struct CrudComponent {
    removed: Mutex<Vec<(String, Value)>>,
    notify: Notify,
}

impl CrudComponent {
    fn new() -> Self {
        Self {
            removed: Mutex::new(Vec::new()),
            notify: Notify::new(),
        }
    }
}

impl GridComponent for CrudComponent {
    fn invoke(&self, target: &str, _index: &str, record_id: &Value, _action: &ResolvedAction) {
        assert_eq!(target, "remove");
        self.removed
            .lock()
            .expect("removed lock")
            .push((target.to_string(), record_id.clone()));
        self.notify.notify_one();
    }
}

#[tokio::test(flavor = "multi_thread")]
async fn confirmed_catalog_action_reaches_late_registered_component() {
    let provider = RowsProvider::new();
    let state = Arc::new(Mutex::new(ActionsColumnState::new(ActionsColumnConfig {
        resolve_timeout_ms: 1_000,
        ..ActionsColumnConfig::default()
    })));
    let mut actions_rx = state.lock().expect("state lock").subscribe_actions();
    tokio::spawn(drive_rows(Arc::clone(&state), provider.subscribe()));

    provider.publish(rows(json!([
        {"id": 1, "name": "Ada", "actions": {"edit": {"href": "/e/1"}}},
        {"id": 2, "name": "Grace", "actions": {"edit": {"href": "/e/2"}}}
    ])));

    // Wait for the derived collection to reflect the published rows.
    loop {
        actions_rx.changed().await.expect("rebuild");
        if actions_rx.borrow_and_update().len() == 2 {
            break;
        }
    }

    let delete: ActionTemplate = serde_json::from_value(json!({
        "label": "Delete",
        "confirm": {"title": "Delete ${name}?", "message": "Record ${id} will be removed."},
        "callback": {"provider": "listing.crud", "target": "remove"}
    }))
    .expect("catalog template");
    state.lock().expect("state lock").add_action("delete", delete);

    let navigator = Arc::new(RecordingNavigator::default());
    let dialog = Arc::new(AcceptingDialog::default());
    let registry = ComponentRegistry::new();
    let dispatcher = ActionDispatcher::new(
        registry.clone(),
        Arc::clone(&navigator) as Arc<dyn Navigate>,
        Arc::clone(&dialog) as Arc<dyn ConfirmationDialog>,
    );

    // Register the handler only after the invocation is in flight.
    let component = Arc::new(CrudComponent::new());
    let late = Arc::clone(&component);
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(50)).await;
        registry.register("listing.crud", late as Arc<dyn GridComponent>);
    });

    {
        let state = state.lock().expect("state lock");
        dispatcher.apply_action(&state, "delete", 1);
    }

    tokio::time::timeout(Duration::from_secs(2), component.notify.notified())
        .await
        .expect("component invoked");

    // Prompt was template-resolved against row 1 before the dispatch.
    let prompted = dialog.prompted.lock().expect("prompted").clone();
    assert_eq!(
        prompted,
        vec![ConfirmationRequest {
            title: "Delete Grace?".into(),
            content: "Record 2 will be removed.".into(),
        }]
    );

    let removed = component.removed.lock().expect("removed").clone();
    assert_eq!(removed, vec![("remove".to_string(), json!(2))]);
    // The structured callback path never touches the navigator.
    assert!(navigator.visited.lock().expect("visited").is_empty());
}

#[tokio::test]
async fn republished_rows_replace_the_collection_atomically() {
    let provider = RowsProvider::new();
    let state = Arc::new(Mutex::new(ActionsColumnState::default()));
    let mut actions_rx = state.lock().expect("state lock").subscribe_actions();
    tokio::spawn(drive_rows(Arc::clone(&state), provider.subscribe()));

    provider.publish(rows(json!([{"id": 1}, {"id": 2}, {"id": 3}])));
    loop {
        actions_rx.changed().await.expect("rebuild");
        if actions_rx.borrow_and_update().len() == 3 {
            break;
        }
    }

    provider.publish(rows(json!([{"id": 9, "actions": {"view": {"href": "/v/${id}"}}}])));
    loop {
        actions_rx.changed().await.expect("rebuild");
        let snapshot = actions_rx.borrow_and_update().clone();
        if snapshot.len() == 1 {
            assert_eq!(snapshot[0]["view"].href.as_deref(), Some("/v/9"));
            break;
        }
    }
}
