//! Sparse buffers backing `megabuf` and `gmegabuf`.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

/// An address-indexed store of doubles. Unset addresses read as `0.0`.
#[derive(Debug, Clone, Default)]
pub struct SparseBuffer {
    cells: HashMap<i64, f64>,
}

impl SparseBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, index: i64) -> f64 {
        self.cells.get(&index).copied().unwrap_or(0.0)
    }

    pub fn set(&mut self, index: i64, value: f64) {
        self.cells.insert(index, value);
    }

    /// Number of addresses that have been written.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn clear(&mut self) {
        self.cells.clear();
    }
}

/// Handle to the buffer shared by every VM a host creates.
///
/// Clones refer to the same storage. Hosts create one with
/// [`GlobalBuffer::new`] and pass a clone to each VM, so the sharing is an
/// explicit dependency and the storage lives as long as its last holder.
#[derive(Debug, Clone, Default)]
pub struct GlobalBuffer {
    inner: Arc<Mutex<SparseBuffer>>,
}

impl GlobalBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, index: i64) -> f64 {
        self.lock().get(index)
    }

    pub fn set(&self, index: i64, value: f64) {
        self.lock().set(index, value);
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    pub fn clear(&self) {
        self.lock().clear();
    }

    /// Whether two handles refer to the same storage.
    pub fn ptr_eq(&self, other: &GlobalBuffer) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    // Cells are plain values; a poisoned lock still guards consistent data.
    fn lock(&self) -> MutexGuard<'_, SparseBuffer> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }
}
