//! # Rowgrid Actions Column
//!
//! The actions column maintains a derived, observable collection of per-row
//! action descriptors for a data grid: it resolves `${ ... }` template
//! bindings against row data, overlays a shared action catalog onto each
//! row's embedded actions, and dispatches invocations as a navigation, a
//! bound handler, a registry-resolved component method, or a
//! confirmation-gated continuation.
//!
//! ## Key Features
//!
//! - **Derived Collection**: One action map per row, rebuilt wholesale and
//!   published atomically whenever the rows source or the catalog changes
//! - **Template Resolution**: `${ ... }` placeholder substitution against the
//!   owning row, with graceful degradation on unresolvable paths
//! - **Invocation Policy**: Three equally-weighted callback forms behind one
//!   entry point, with optional confirmation gating
//! - **Bounded Resolution**: Structured callbacks wait for late component
//!   registration up to a configured timeout instead of hanging
//!
//! ## Usage
//!
//! ```rust
//! use std::sync::Arc;
//! use rowgrid_column::{ActionsColumnConfig, ActionsColumnState};
//! use rowgrid_types::ActionTemplate;
//! use serde_json::json;
//!
//! let mut column = ActionsColumnState::new(ActionsColumnConfig::default());
//! let rows = json!([{"id": 1, "actions": {"edit": {"href": "/e/${id}"}}}])
//!     .as_array()
//!     .unwrap()
//!     .iter()
//!     .map(|row| row.as_object().unwrap().clone())
//!     .collect::<Vec<_>>();
//! column.apply_rows(Arc::new(rows));
//!
//! let delete: ActionTemplate = serde_json::from_value(
//!     json!({"label": "Delete", "href": "/d/${id}"}),
//! ).unwrap();
//! column.add_action("delete", delete);
//!
//! assert_eq!(column.action(0, "edit").unwrap().href.as_deref(), Some("/e/1"));
//! assert!(column.is_multiple(0));
//! ```
//!
//! ## Architecture
//!
//! - **`state`**: Column state, selectors, and the recompute reducer
//! - **`templates`**: Row-scoped placeholder resolution
//! - **`dispatch`**: Invocation policy over the injected capabilities
//! - **`registry`**: Name-to-component resolution with bounded wait
//! - **`driver`**: Rows provider contract and the subscription loop
//! - **`confirm`**: Confirmation dialog contract
//! - **`config`**: Column configuration with file/env loading

pub mod config;
pub mod confirm;
pub mod dispatch;
pub mod driver;
pub mod registry;
pub mod state;
pub mod templates;

// Re-export commonly used types for convenience
pub use config::ActionsColumnConfig;
pub use confirm::{AutoConfirm, ConfirmationDialog, OnConfirm};
pub use dispatch::{ActionDispatcher, Navigate};
pub use driver::{RowsProvider, drive_rows};
pub use registry::{ComponentRegistry, GridComponent, RegistryError};
pub use state::ActionsColumnState;
