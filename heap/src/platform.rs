/// Services the surrounding scheduler must provide so the heap can
/// serialize itself. `enter_critical`/`exit_critical` are expected to
/// suspend preemption for the short, bounded span of one heap operation;
/// the heap never nests them. `in_interrupt_context` lets the heap reject
/// callers running where the critical-section discipline does not hold.
pub trait Platform: Sync {
    fn enter_critical(&self);
    fn exit_critical(&self);
    fn in_interrupt_context(&self) -> bool;
}

/// Scoped critical section. Exit happens on drop, so every return path out
/// of an operation, including early error returns, releases the section.
pub(crate) struct CriticalGuard<'a> {
    platform: &'a dyn Platform,
}

impl<'a> CriticalGuard<'a> {
    pub(crate) fn enter(platform: &'a dyn Platform) -> Self {
        platform.enter_critical();
        CriticalGuard { platform }
    }
}

impl Drop for CriticalGuard<'_> {
    fn drop(&mut self) {
        self.platform.exit_critical();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::sync::atomic::{AtomicUsize, Ordering};

    struct CountingPlatform {
        entered: AtomicUsize,
        exited: AtomicUsize,
    }

    impl CountingPlatform {
        fn new() -> Self {
            CountingPlatform {
                entered: AtomicUsize::new(0),
                exited: AtomicUsize::new(0),
            }
        }
    }

    impl Platform for CountingPlatform {
        fn enter_critical(&self) {
            self.entered.fetch_add(1, Ordering::SeqCst);
        }

        fn exit_critical(&self) {
            self.exited.fetch_add(1, Ordering::SeqCst);
        }

        fn in_interrupt_context(&self) -> bool {
            false
        }
    }

    fn failing_operation(platform: &CountingPlatform) -> Result<(), ()> {
        let _guard = CriticalGuard::enter(platform);
        Err(())
    }

    #[test]
    fn guard_enters_on_creation_and_exits_on_drop() {
        let platform = CountingPlatform::new();
        {
            let _guard = CriticalGuard::enter(&platform);
            assert_eq!(platform.entered.load(Ordering::SeqCst), 1);
            assert_eq!(platform.exited.load(Ordering::SeqCst), 0);
        }
        assert_eq!(platform.exited.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn guard_exits_on_early_error_return() {
        let platform = CountingPlatform::new();
        assert!(failing_operation(&platform).is_err());
        assert_eq!(platform.entered.load(Ordering::SeqCst), 1);
        assert_eq!(platform.exited.load(Ordering::SeqCst), 1);
    }
}
