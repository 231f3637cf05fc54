use crate::platform::Platform;

pub const DEFAULT_ALIGNMENT: usize = 8;

/// Startup configuration, supplied once by whatever composes the
/// application. `failure_hook` runs exactly once for every allocation that
/// fails with `OutOfMemory`; it must not allocate.
pub struct HeapConfig {
    pub platform: &'static dyn Platform,
    pub alignment: usize,
    pub failure_hook: Option<fn()>,
}

impl HeapConfig {
    pub const fn new(platform: &'static dyn Platform) -> Self {
        HeapConfig {
            platform,
            alignment: DEFAULT_ALIGNMENT,
            failure_hook: None,
        }
    }
}
