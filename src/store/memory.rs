use super::{StoreError, TokenSlot, TokenStore};
use dashmap::DashMap;
use std::sync::Arc;

/// In-process token store. Clones share the same slots.
#[derive(Clone, Default)]
pub struct MemoryTokenStore {
    slots: Arc<DashMap<TokenSlot, String>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl TokenStore for MemoryTokenStore {
    fn get(&self, slot: TokenSlot) -> Result<Option<String>, StoreError> {
        Ok(self.slots.get(&slot).map(|v| v.value().clone()))
    }

    fn set(&self, slot: TokenSlot, value: &str) -> Result<(), StoreError> {
        self.slots.insert(slot, value.to_string());
        Ok(())
    }

    fn remove(&self, slot: TokenSlot) -> Result<(), StoreError> {
        self.slots.remove(&slot);
        Ok(())
    }

    fn is_persistent(&self) -> bool {
        false
    }
}
