use spin::Mutex;

use crate::config::HeapConfig;
use crate::error::AllocError;
use crate::heap::{Allocation, HeapCore, HeapStats};
use crate::hprintln;
use crate::platform::{CriticalGuard, Platform};
use crate::region::Region;

/// The public face of the heap. Every operation is bracketed by the
/// scheduler-supplied critical section and the inner lock, so the free list
/// and counters a caller observes after an operation reflect exactly that
/// operation and no partial state from an interleaved one. Interrupt
/// context is rejected outright; the locking discipline assumes a
/// preemptible task.
///
/// Constructed once by whatever composes the application and passed by
/// reference to every caller. There is no teardown: the regions and the
/// blocks carved from them live as long as the process.
pub struct HeapManager {
    core: Mutex<HeapCore>,
    platform: &'static dyn Platform,
    failure_hook: Option<fn()>,
}

impl HeapManager {
    pub fn new(config: &HeapConfig) -> Result<Self, AllocError> {
        Ok(HeapManager {
            core: Mutex::new(HeapCore::new(config.alignment)?),
            platform: config.platform,
            failure_hook: config.failure_hook,
        })
    }

    /// Hands the heap its backing memory. Must be called exactly once,
    /// before the first allocation, with regions sorted by ascending start
    /// address. The caller guarantees the ranges are valid, writable, and
    /// left untouched by anything else for the life of the process.
    pub fn register_regions(&self, regions: &[Region]) -> Result<(), AllocError> {
        self.guarded(|core| core.register_regions(regions))
    }

    pub fn allocate(&self, size: usize) -> Result<Allocation, AllocError> {
        let result = self.guarded(|core| core.allocate(size));
        // The hook runs after the critical section is released: it is
        // application code and must not extend the no-preemption window.
        if matches!(result, Err(AllocError::OutOfMemory)) {
            if let Some(hook) = self.failure_hook {
                hook();
            }
        }
        result
    }

    pub fn free(&self, allocation: Allocation) -> Result<(), AllocError> {
        self.guarded(|core| core.free(allocation))
    }

    /// Bytes currently free across all regions. Read under the same
    /// exclusion as allocate/free; a torn read here would feed stale
    /// numbers into callers' low-memory policy. Task context only.
    pub fn free_bytes_remaining(&self) -> usize {
        let _guard = CriticalGuard::enter(self.platform);
        self.core.lock().free_bytes()
    }

    /// Low-water mark of `free_bytes_remaining` since registration.
    pub fn minimum_ever_free_bytes(&self) -> usize {
        let _guard = CriticalGuard::enter(self.platform);
        self.core.lock().minimum_ever_free_bytes()
    }

    pub fn total_size(&self) -> usize {
        let _guard = CriticalGuard::enter(self.platform);
        self.core.lock().total_size()
    }

    pub fn stats(&self) -> HeapStats {
        let _guard = CriticalGuard::enter(self.platform);
        self.core.lock().stats()
    }

    pub fn print_layout(&self) {
        let _guard = CriticalGuard::enter(self.platform);
        let core = self.core.lock();
        for index in 0..core.region_count() {
            let (start, end, usable) = core.region_span(index);
            hprintln!(
                "[HEAP] Region {}: {:#x}-{:#x} ({} bytes usable)",
                index,
                start,
                end,
                usable
            );
        }
        hprintln!(
            "[HEAP] Total: {} bytes, free: {} bytes, low water: {} bytes",
            core.total_size(),
            core.free_bytes(),
            core.minimum_ever_free_bytes()
        );
    }

    fn guarded<T>(
        &self,
        operation: impl FnOnce(&mut HeapCore) -> Result<T, AllocError>,
    ) -> Result<T, AllocError> {
        if self.platform.in_interrupt_context() {
            return Err(AllocError::WrongContext);
        }
        let _guard = CriticalGuard::enter(self.platform);
        let mut core = self.core.lock();
        operation(&mut core)
    }
}
