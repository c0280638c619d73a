// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Page access rules.
//!
//! Every page applies one of three rules, and all of them wait until the
//! session has settled before redirecting anyone.

use crate::services::navigation::routes;
use crate::services::session::{SessionPhase, SessionSnapshot, SessionStore};
use crate::services::AuthGateway;

/// Which visitors a page accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageAccess {
    /// Dashboard, checkout: signed-in users only.
    Protected,
    /// Admin console: admins and superadmins only.
    AdminOnly,
    /// Login and sign-up: signed-out visitors only.
    GuestOnly,
}

/// Outcome of applying a rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardDecision {
    /// Session still loading; render a spinner.
    Pending,
    Allow,
    Redirect(&'static str),
}

/// Decide what a page with the given rule should do right now.
pub fn evaluate(access: PageAccess, session: &SessionSnapshot) -> GuardDecision {
    let settled = !session.is_loading
        && !matches!(session.phase, SessionPhase::Unknown | SessionPhase::Verifying);

    match access {
        PageAccess::GuestOnly if session.is_authenticated() => {
            GuardDecision::Redirect(routes::DASHBOARD)
        }
        PageAccess::GuestOnly => GuardDecision::Allow,
        _ if !settled => GuardDecision::Pending,
        _ if !session.is_authenticated() => GuardDecision::Redirect(routes::LOGIN),
        PageAccess::AdminOnly if !session.user.as_ref().is_some_and(|u| u.is_admin()) => {
            GuardDecision::Redirect(routes::DASHBOARD)
        }
        _ => GuardDecision::Allow,
    }
}

/// Dashboard and checkout pages.
pub fn require_authenticated<G: AuthGateway>(session: &SessionStore<G>) -> GuardDecision {
    session.enforce(PageAccess::Protected)
}

/// Admin console.
pub fn require_admin<G: AuthGateway>(session: &SessionStore<G>) -> GuardDecision {
    session.enforce(PageAccess::AdminOnly)
}

/// Login and sign-up pages.
pub fn redirect_if_authenticated<G: AuthGateway>(session: &SessionStore<G>) -> GuardDecision {
    session.enforce(PageAccess::GuestOnly)
}
