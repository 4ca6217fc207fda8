use std::sync::{Arc, RwLock};

use crate::data::InputSource;
use crate::domain::{FieldValue, InputSnapshot};

/// Field values shared between whoever edits them and the engine that
/// snapshots them.
#[derive(Debug, Clone, Default)]
pub struct SharedInputSource {
    // Arc lets us share ownership. RwLock lets us read/write safely.
    inner: Arc<RwLock<InputSnapshot>>,
}

impl SharedInputSource {
    pub fn new(initial: InputSnapshot) -> Self {
        Self {
            inner: Arc::new(RwLock::new(initial)),
        }
    }

    /// Sets one field. The caller is responsible for notifying the engine.
    pub fn set(&self, name: impl Into<String>, value: impl Into<FieldValue>) {
        let mut guard = self.inner.write().unwrap();
        let current = std::mem::take(&mut *guard);
        *guard = current.with(name, value);
    }

    pub fn remove(&self, name: &str) {
        let mut guard = self.inner.write().unwrap();
        let current = std::mem::take(&mut *guard);
        *guard = current.without(name);
    }

    pub fn replace(&self, snapshot: InputSnapshot) {
        *self.inner.write().unwrap() = snapshot;
    }
}

impl InputSource for SharedInputSource {
    fn snapshot(&self) -> InputSnapshot {
        self.inner.read().unwrap().clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn edits_are_visible_to_clones() {
        let source = SharedInputSource::new(InputSnapshot::new().with("Item_MRP", 100.0));
        let engine_side = source.clone();
        source.set("Item_MRP", 150.0);
        source.set("Item_Type", "Dairy");
        let snap = engine_side.snapshot();
        assert_eq!(snap.display_value("Item_MRP"), "150");
        assert_eq!(snap.display_value("Item_Type"), "Dairy");

        source.remove("Item_Type");
        assert!(engine_side.snapshot().get("Item_Type").is_none());
    }

    #[test]
    fn snapshots_are_detached() {
        let source = SharedInputSource::default();
        let before = source.snapshot();
        source.set("Outlet_Type", "Grocery Store");
        assert!(before.is_empty());
    }
}
