//! Shared redirect flag.
//!
//! Selects, per request, whether root traffic is served from the static
//! directory or forwarded to the dev server. One writer (the config reload
//! task), any number of readers. Nothing else is published through it.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

#[derive(Debug, Clone, Default)]
pub struct RedirectFlag(Arc<AtomicBool>);

impl RedirectFlag {
    pub fn new(redirect: bool) -> Self {
        Self(Arc::new(AtomicBool::new(redirect)))
    }

    /// Whether root requests currently go to the dev server.
    pub fn is_redirecting(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }

    /// Store a new value, returning the previous one.
    pub fn set(&self, redirect: bool) -> bool {
        self.0.swap(redirect, Ordering::Relaxed)
    }
}
