//! Engine warnings with colored terminal output.
//!
//! Stylesheets tend to repeat the same construct many times, so every warning
//! is keyed by component and message and printed at most once.

use std::collections::HashSet;
use std::sync::{Mutex, PoisonError};

use owo_colors::OwoColorize;

/// Warnings already printed, keyed by `"[component] message"`.
static WARNED: Mutex<Option<HashSet<String>>> = Mutex::new(None);

/// Warn about an inert or unsupported feature (prints once per unique message).
///
/// Returns `true` if this call printed the warning and `false` if the same
/// component/message pair had already been reported.
///
/// # Example
/// ```
/// use sift_common::warning::warn_once;
///
/// assert!(warn_once("Selectors", "doc example"));
/// assert!(!warn_once("Selectors", "doc example"));
/// ```
pub fn warn_once(component: &str, message: &str) -> bool {
    let key = format!("[{component}] {message}");
    let first_time = WARNED
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .get_or_insert_with(HashSet::new)
        .insert(key);

    if first_time {
        eprintln!("{}", format!("[Sift {component}] ⚠ {message}").yellow());
    }
    first_time
}

/// Forget every recorded warning (call when starting on a new stylesheet).
pub fn clear_warnings() {
    let mut guard = WARNED.lock().unwrap_or_else(PoisonError::into_inner);
    if let Some(set) = guard.as_mut() {
        set.clear();
    }
}
