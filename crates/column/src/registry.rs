//! Name-to-component registry backing structured action callbacks.
//!
//! Structured callbacks reference their handler by logical provider name; the
//! referenced component may not exist yet when the action is invoked.
//! Resolution therefore supports a bounded wait: `resolve` observes
//! registrations until the component appears or the timeout elapses.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use rowgrid_types::ResolvedAction;
use serde_json::Value;
use thiserror::Error;
use tokio::sync::watch;
use tokio::time;
use tracing::{debug, warn};

/// A live component that structured callbacks can target.
pub trait GridComponent: Send + Sync {
    /// Invokes the named method with the action's identifying data.
    fn invoke(&self, target: &str, index: &str, record_id: &Value, action: &ResolvedAction);
}

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("component '{name}' did not register within {waited_ms}ms")]
    Timeout { name: String, waited_ms: u64 },
}

/// Process-local registry of invokable components, keyed by logical name.
#[derive(Clone)]
pub struct ComponentRegistry {
    components: Arc<Mutex<HashMap<String, Arc<dyn GridComponent>>>>,
    version_tx: Arc<watch::Sender<u64>>,
}

impl ComponentRegistry {
    pub fn new() -> Self {
        let (version_tx, _) = watch::channel(0);
        Self {
            components: Arc::new(Mutex::new(HashMap::new())),
            version_tx: Arc::new(version_tx),
        }
    }

    /// Registers a component under a logical name, waking any pending
    /// `resolve` calls. Re-registering a name replaces the component.
    pub fn register(&self, name: impl Into<String>, component: Arc<dyn GridComponent>) {
        let name = name.into();
        debug!(name = %name, "registering component");
        self.components.lock().expect("components lock").insert(name, component);
        self.version_tx.send_modify(|version| *version += 1);
    }

    /// Synchronous lookup; `None` when the component is not registered yet.
    pub fn try_resolve(&self, name: &str) -> Option<Arc<dyn GridComponent>> {
        self.components.lock().expect("components lock").get(name).cloned()
    }

    /// Resolves a component, waiting up to `timeout` for it to register.
    pub async fn resolve(&self, name: &str, timeout: Duration) -> Result<Arc<dyn GridComponent>, RegistryError> {
        // Subscribe before the first lookup so a registration landing in
        // between is not missed.
        let mut versions = self.version_tx.subscribe();
        if let Some(component) = self.try_resolve(name) {
            return Ok(component);
        }

        debug!(name, "component not yet registered; waiting");
        let waited = time::timeout(timeout, async {
            loop {
                if versions.changed().await.is_err() {
                    return None;
                }
                if let Some(component) = self.try_resolve(name) {
                    return Some(component);
                }
            }
        })
        .await;

        match waited {
            Ok(Some(component)) => Ok(component),
            _ => {
                let waited_ms = timeout.as_millis() as u64;
                warn!(name, waited_ms, "component resolution timed out");
                Err(RegistryError::Timeout {
                    name: name.to_string(),
                    waited_ms,
                })
            }
        }
    }
}

impl Default for ComponentRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ComponentRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let count = self.components.lock().expect("components lock").len();
        f.debug_struct("ComponentRegistry").field("components", &count).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingComponent {
        invocations: AtomicUsize,
    }

    impl GridComponent for CountingComponent {
        fn invoke(&self, _target: &str, _index: &str, _record_id: &Value, _action: &ResolvedAction) {
            self.invocations.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[test]
    fn try_resolve_hits_registered_component() {
        let registry = ComponentRegistry::new();
        assert!(registry.try_resolve("listing").is_none());

        registry.register(
            "listing",
            Arc::new(CountingComponent {
                invocations: AtomicUsize::new(0),
            }),
        );
        assert!(registry.try_resolve("listing").is_some());
    }

    #[tokio::test]
    async fn resolve_returns_immediately_when_registered() {
        let registry = ComponentRegistry::new();
        registry.register(
            "listing",
            Arc::new(CountingComponent {
                invocations: AtomicUsize::new(0),
            }),
        );

        let component = registry
            .resolve("listing", Duration::from_millis(10))
            .await
            .expect("resolved");
        component.invoke("edit", "edit", &Value::Null, &ResolvedAction::default());
    }

    #[tokio::test]
    async fn resolve_waits_for_late_registration() {
        let registry = ComponentRegistry::new();
        let registrar = registry.clone();
        let register = tokio::spawn(async move {
            time::sleep(Duration::from_millis(20)).await;
            registrar.register(
                "late",
                Arc::new(CountingComponent {
                    invocations: AtomicUsize::new(0),
                }),
            );
        });

        let resolved = registry.resolve("late", Duration::from_secs(1)).await;
        assert!(resolved.is_ok());
        register.await.expect("registrar task");
    }

    #[tokio::test(start_paused = true)]
    async fn resolve_times_out_when_component_never_appears() {
        let registry = ComponentRegistry::new();
        let resolved = registry.resolve("ghost", Duration::from_millis(50)).await;
        let Err(RegistryError::Timeout { name, waited_ms }) = resolved else {
            panic!("expected timeout");
        };
        assert_eq!(name, "ghost");
        assert_eq!(waited_ms, 50);
    }
}
