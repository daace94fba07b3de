use std::sync::atomic::{AtomicBool, Ordering};

/// Advisory logged on the first use of an `_async` alias.
pub const DEPRECATION_ADVISORY: &str = "'*_async' method names will be deprecated on 2/4/2013. \
     Please use the methods without the '_async' suffix.";

/// One-shot advisory state of a single client.
#[derive(Debug, Default)]
pub struct DeprecationNotice {
    warned: AtomicBool,
}

impl DeprecationNotice {
    pub fn new() -> Self {
        Self::default()
    }

    /// Log the advisory unless it was already logged. Returns whether this
    /// call logged it.
    pub fn warn_once(&self) -> bool {
        if self.warned.swap(true, Ordering::AcqRel) {
            return false;
        }
        tracing::warn!("{DEPRECATION_ADVISORY}");
        true
    }

    pub fn has_warned(&self) -> bool {
        self.warned.load(Ordering::Acquire)
    }
}
