//! Route guard decisions.
//!
//! Pure functions of `(is_authenticated, is_loading)`; a view layer
//! re-evaluates them on every session change.

/// What a guarded view should do with the current session.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GuardDecision {
    /// Authentication is still being resolved; render nothing conclusive.
    Defer,
    /// Send the viewer to the login screen.
    RedirectToLogin,
    /// Send the viewer to the landing/search screen.
    RedirectToSearch,
    /// Render the wrapped view unchanged.
    Render,
}

/// Guard for views that require an authenticated session.
pub fn protected(is_authenticated: bool, is_loading: bool) -> GuardDecision {
    if is_loading {
        GuardDecision::Defer
    } else if !is_authenticated {
        GuardDecision::RedirectToLogin
    } else {
        GuardDecision::Render
    }
}

/// Guard for the login view itself: authenticated viewers are sent away.
pub fn guest_only(is_authenticated: bool, is_loading: bool) -> GuardDecision {
    if is_loading {
        GuardDecision::Defer
    } else if is_authenticated {
        GuardDecision::RedirectToSearch
    } else {
        GuardDecision::Render
    }
}
