use spin::Once;

use crate::config::HeapConfig;
use crate::error::AllocError;
use crate::manager::HeapManager;

static GLOBAL_HEAP: Once<HeapManager> = Once::new();

/// Builds the process-wide heap, for applications that want one shared
/// allocator instead of threading a `HeapManager` reference through every
/// call site. Call once from the composition root, before anything
/// allocates; regions are registered afterwards through the returned
/// manager.
pub fn init_global_heap(config: &HeapConfig) -> Result<&'static HeapManager, AllocError> {
    if GLOBAL_HEAP.get().is_some() {
        return Err(AllocError::AlreadyInitialized);
    }
    let manager = HeapManager::new(config)?;
    Ok(GLOBAL_HEAP.call_once(|| manager))
}

pub fn global_heap() -> Option<&'static HeapManager> {
    GLOBAL_HEAP.get()
}
