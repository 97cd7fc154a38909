//! Execution-scoped authorization bypass.

use std::cell::Cell;

thread_local! {
    static IGNORE_AUTHORIZATION: Cell<bool> = const { Cell::new(false) };
}

/// Bypass flag covering the dynamic extent of a call on the current thread.
///
/// The flag is deliberately not inherited by threads spawned inside a
/// bypassed block; if a child task needs the bypass it must re-establish it
/// itself. Exiting a scope restores the previous value, so nested scopes
/// compose instead of an inner scope clearing an outer one.
pub struct AuthorizationContext;

impl AuthorizationContext {
    /// Whether enforcement is currently disabled on this thread.
    pub fn is_ignoring_authorization() -> bool {
        IGNORE_AUTHORIZATION.get()
    }

    /// Run `f` with enforcement disabled.
    pub fn run_without_authorization(f: impl FnOnce()) {
        Self::get_without_authorization(f)
    }

    /// Run `f` with enforcement disabled and return its value.
    pub fn get_without_authorization<T>(f: impl FnOnce() -> T) -> T {
        let _scope = BypassScope::enter();
        f()
    }
}

/// Restores the previous flag value on drop, including on unwind.
struct BypassScope {
    previous: bool,
}

impl BypassScope {
    fn enter() -> Self {
        Self {
            previous: IGNORE_AUTHORIZATION.replace(true),
        }
    }
}

impl Drop for BypassScope {
    fn drop(&mut self) {
        IGNORE_AUTHORIZATION.set(self.previous);
    }
}
