use std::collections::HashMap;
use std::sync::Arc;

/// Opaque reference to a registered byte blob, formatted `blob:promoreel/<n>`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, serde::Serialize)]
pub struct BlobHandle(String);

impl BlobHandle {
    /// Handle string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for BlobHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Registry of finished recordings addressed by handle. Revoked handles never resolve again.
#[derive(Debug, Default)]
pub struct BlobRegistry {
    next: u64,
    blobs: HashMap<BlobHandle, Arc<[u8]>>,
}

impl BlobRegistry {
    /// Empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `bytes` under a fresh handle.
    pub fn create(&mut self, bytes: Vec<u8>) -> BlobHandle {
        self.next += 1;
        let handle = BlobHandle(format!("blob:promoreel/{}", self.next));
        self.blobs.insert(handle.clone(), Arc::from(bytes));
        handle
    }

    /// Release a handle. Returns `false` if it was not live.
    pub fn revoke(&mut self, handle: &BlobHandle) -> bool {
        self.blobs.remove(handle).is_some()
    }

    /// Bytes behind a live handle.
    pub fn get(&self, handle: &BlobHandle) -> Option<Arc<[u8]>> {
        self.blobs.get(handle).cloned()
    }

    /// Number of live handles.
    pub fn live_count(&self) -> usize {
        self.blobs.len()
    }
}
