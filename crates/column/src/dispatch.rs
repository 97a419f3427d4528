//! Action invocation policy.
//!
//! An action can be invoked three ways without the caller branching: a
//! structured callback resolved through the component registry, a directly
//! bound handler, or the default navigation to the action's `href`. When the
//! action carries a confirmation descriptor the built invocation is routed
//! through the dialog as its on-confirm continuation instead of running
//! immediately.

use std::sync::Arc;
use std::time::Duration;

use rowgrid_types::{ConfirmationRequest, ResolvedAction};
use tracing::{debug, warn};

use crate::confirm::{ConfirmationDialog, OnConfirm};
use crate::registry::ComponentRegistry;
use crate::state::ActionsColumnState;

/// Page navigation capability; the default invocation path when an action
/// specifies only an `href`.
pub trait Navigate: Send + Sync {
    fn navigate(&self, href: &str);
}

/// Dispatches resolved actions through the injected capabilities.
pub struct ActionDispatcher {
    registry: ComponentRegistry,
    navigator: Arc<dyn Navigate>,
    dialog: Arc<dyn ConfirmationDialog>,
}

impl ActionDispatcher {
    pub fn new(registry: ComponentRegistry, navigator: Arc<dyn Navigate>, dialog: Arc<dyn ConfirmationDialog>) -> Self {
        Self {
            registry,
            navigator,
            dialog,
        }
    }

    pub fn registry(&self) -> &ComponentRegistry {
        &self.registry
    }

    /// Applies one action of one row.
    ///
    /// A missing action, or one with neither `href`, `callback`, nor
    /// `handler`, is a silent no-op; no observable state changes.
    pub fn apply_action(&self, state: &ActionsColumnState, action_index: &str, row_index: usize) {
        let Some(action) = state.action(row_index, action_index) else {
            return;
        };
        if !action.is_invocable() {
            debug!(action_index, row_index, "action has nothing to invoke");
            return;
        }

        let timeout = state.config().resolve_timeout();
        let callback = self.build_callback(action.clone(), timeout);

        match &action.confirm {
            Some(prompt) => self.dialog.confirm(ConfirmationRequest::from_prompt(prompt), callback),
            None => callback(),
        }
    }

    /// Builds the invocation for an action according to its callback form.
    fn build_callback(&self, action: ResolvedAction, timeout: Duration) -> OnConfirm {
        if let Some(callback) = action.callback.clone() {
            let registry = self.registry.clone();
            return Box::new(move || {
                // Fire and forget: the resolved component performs its own
                // side effects; nothing is awaited here.
                let Ok(handle) = tokio::runtime::Handle::try_current() else {
                    warn!(provider = %callback.provider, "no async runtime for structured callback");
                    return;
                };
                handle.spawn(async move {
                    match registry.resolve(&callback.provider, timeout).await {
                        Ok(component) => {
                            component.invoke(&callback.target, &action.index, &action.record_id, &action);
                        }
                        Err(error) => warn!(%error, provider = %callback.provider, "dropping action invocation"),
                    }
                });
            });
        }

        if let Some(handler) = action.handler.clone() {
            return Box::new(move || handler.call(&action.index, &action.record_id, &action));
        }

        let navigator = Arc::clone(&self.navigator);
        Box::new(move || {
            if let Some(href) = action.href.as_deref() {
                navigator.navigate(href);
            }
        })
    }
}
