// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Compatibility warnings.
//!
//! A warning never aborts the call that raised it unless the active
//! [`WarningAction`] is [`WarningAction::Error`]. Outside a capture scope the
//! warning goes to the `log` facade; inside [`catch_warnings`] it is recorded
//! for the caller instead.
//!
//! ```rust
//! use frameguard::{catch_warnings, DataType, NativeType};
//!
//! let (wrapped, warnings) = catch_warnings(|| DataType::from_native(&NativeType::Long));
//! assert!(wrapped.is_ok());
//! assert_eq!(warnings.len(), 1);
//! ```

use std::cell::RefCell;
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use serde::{Deserialize, Serialize};

use crate::config::ENV_WARNINGS;
use crate::error::EngineError;

/// What happens when a compatibility warning is raised.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WarningAction {
    /// Log (or record, inside a capture scope) and continue.
    #[default]
    Warn,
    /// Drop the warning silently.
    Ignore,
    /// Fail the call with [`EngineError::CompatibilityWarning`].
    Error,
}

impl FromStr for WarningAction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "warn" | "default" => Ok(WarningAction::Warn),
            "ignore" | "off" => Ok(WarningAction::Ignore),
            "error" => Ok(WarningAction::Error),
            other => Err(format!("unknown warning action '{}'", other)),
        }
    }
}

/// A non-fatal notice that a deprecated construction path was used.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompatWarning {
    /// Rendering of the native type that was wrapped.
    pub native: String,
    /// Human-readable guidance.
    pub message: String,
}

impl CompatWarning {
    pub(crate) fn direct_construction(native: &str) -> Self {
        Self {
            native: native.to_string(),
            message: format!(
                "'{}' support is not guaranteed when wrapped directly; \
                 use Engine::dtype() to resolve it to a registered data type",
                native
            ),
        }
    }
}

impl fmt::Display for CompatWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

// ---------------------------------------------------------------------------
// Process default + thread-local scopes
// ---------------------------------------------------------------------------

static DEFAULT_ACTION: OnceLock<WarningAction> = OnceLock::new();

/// Set the process-wide warning action.
///
/// Only the first call wins; returns `false` if an action was already set
/// (explicitly or by a previous warning falling back to the default).
pub fn set_default_action(action: WarningAction) -> bool {
    DEFAULT_ACTION.set(action).is_ok()
}

/// The process-wide warning action.
///
/// When nothing was set explicitly, the first call reads
/// `FRAMEGUARD_WARNINGS` and falls back to [`WarningAction::Warn`].
pub fn default_action() -> WarningAction {
    *DEFAULT_ACTION.get_or_init(|| action_from(|key| std::env::var(key).ok()))
}

fn action_from(lookup: impl Fn(&str) -> Option<String>) -> WarningAction {
    let Some(value) = lookup(ENV_WARNINGS) else {
        return WarningAction::default();
    };
    value.parse().unwrap_or_else(|e| {
        log::warn!("[COMPAT] ignoring {}: {}", ENV_WARNINGS, e);
        WarningAction::default()
    })
}

struct Scope {
    action: Option<WarningAction>,
    caught: Vec<CompatWarning>,
}

thread_local! {
    static SCOPES: RefCell<Vec<Scope>> = const { RefCell::new(Vec::new()) };
}

/// Pops the scope even if the closure panics.
struct ScopeGuard;

impl Drop for ScopeGuard {
    fn drop(&mut self) {
        SCOPES.with(|scopes| {
            scopes.borrow_mut().pop();
        });
    }
}

fn run_scoped<T>(
    action: Option<WarningAction>,
    f: impl FnOnce() -> T,
) -> (T, Vec<CompatWarning>) {
    SCOPES.with(|scopes| {
        scopes.borrow_mut().push(Scope {
            action,
            caught: Vec::new(),
        });
    });
    let guard = ScopeGuard;
    let value = f();
    let caught = SCOPES.with(|scopes| {
        scopes
            .borrow_mut()
            .last_mut()
            .map(|scope| std::mem::take(&mut scope.caught))
            .unwrap_or_default()
    });
    drop(guard);
    (value, caught)
}

/// Run `f`, recording every warning it raises on this thread.
///
/// Recorded warnings are returned instead of being logged. An `Error`
/// process default still escalates.
pub fn catch_warnings<T>(f: impl FnOnce() -> T) -> (T, Vec<CompatWarning>) {
    run_scoped(None, f)
}

/// Like [`catch_warnings`] but overrides the warning action for the scope.
pub fn catch_warnings_with<T>(
    action: WarningAction,
    f: impl FnOnce() -> T,
) -> (T, Vec<CompatWarning>) {
    run_scoped(Some(action), f)
}

/// Raise a compatibility warning according to the active action.
pub(crate) fn warn(warning: CompatWarning) -> Result<(), EngineError> {
    let scoped = SCOPES.with(|scopes| {
        let scopes = scopes.borrow();
        if scopes.is_empty() {
            return None;
        }
        let action = scopes
            .iter()
            .rev()
            .find_map(|scope| scope.action)
            .unwrap_or_else(default_action);
        Some(action)
    });

    let action = scoped.unwrap_or_else(default_action);
    match action {
        WarningAction::Ignore => Ok(()),
        WarningAction::Error => Err(EngineError::CompatibilityWarning(warning)),
        WarningAction::Warn => {
            if scoped.is_some() {
                SCOPES.with(|scopes| {
                    if let Some(scope) = scopes.borrow_mut().last_mut() {
                        scope.caught.push(warning);
                    }
                });
            } else {
                log::warn!("[COMPAT] {}", warning);
            }
            Ok(())
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> CompatWarning {
        CompatWarning::direct_construction("StringType()")
    }

    #[test]
    fn fallback_action_reads_environment_key() {
        let lookup = |value: &'static str| {
            move |key: &str| (key == ENV_WARNINGS).then(|| value.to_string())
        };
        assert_eq!(action_from(lookup("error")), WarningAction::Error);
        assert_eq!(action_from(lookup(" Ignore ")), WarningAction::Ignore);
        assert_eq!(action_from(lookup("loud")), WarningAction::Warn);
        assert_eq!(action_from(|_| None), WarningAction::Warn);
    }

    #[test]
    fn catch_records_warning() {
        let (res, caught) = catch_warnings(|| warn(sample()));
        assert!(res.is_ok());
        assert_eq!(caught, vec![sample()]);
    }

    #[test]
    fn nested_scopes_record_innermost_only() {
        let ((_, inner), outer) = catch_warnings(|| catch_warnings(|| warn(sample())));
        assert_eq!(inner.len(), 1);
        assert!(outer.is_empty());
    }

    #[test]
    fn ignore_action_drops_warning() {
        let (res, caught) = catch_warnings_with(WarningAction::Ignore, || warn(sample()));
        assert!(res.is_ok());
        assert!(caught.is_empty());
    }

    #[test]
    fn error_action_escalates() {
        let (res, caught) = catch_warnings_with(WarningAction::Error, || warn(sample()));
        assert_eq!(res, Err(EngineError::CompatibilityWarning(sample())));
        assert!(caught.is_empty());
    }

    #[test]
    fn inner_scope_inherits_outer_action() {
        let ((res, _), _) =
            catch_warnings_with(WarningAction::Error, || catch_warnings(|| warn(sample())));
        assert!(res.is_err());
    }

    #[test]
    fn scope_is_popped_after_panic() {
        let outcome = std::panic::catch_unwind(|| {
            catch_warnings(|| panic!("boom"));
        });
        assert!(outcome.is_err());
        SCOPES.with(|scopes| assert!(scopes.borrow().is_empty()));
    }

    #[test]
    fn parse_warning_action() {
        assert_eq!("warn".parse::<WarningAction>(), Ok(WarningAction::Warn));
        assert_eq!(" ERROR ".parse::<WarningAction>(), Ok(WarningAction::Error));
        assert_eq!("off".parse::<WarningAction>(), Ok(WarningAction::Ignore));
        assert!("loud".parse::<WarningAction>().is_err());
    }
}
