//! Pending operations and their resolution outcomes.
//!
//! Every public mutating call on the router becomes a [`PendingOperation`]
//! in the queue. The orchestrator consumes each operation exactly once,
//! collapsing it into one of three outcomes:
//!
//! | Outcome   | Effect |
//! |-----------|--------|
//! | success   | State mutated, delegate effect invoked, operation removed |
//! | drop      | Operation removed without effect (duplicate, vetoed, or targeting nothing) |
//! | blocked   | Operation stays queued; its group is skipped for the rest of the pass |
//!
//! Blocked is a deferral, not an error: the operation retries whenever its
//! group may have become free.

use crate::route::AppRoute;
use std::fmt;

/// Queue-unique identifier for a pending operation.
///
/// Completions carry the id of the operation they belong to, so a late
/// completion resolves exactly its own operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct OperationId(pub(crate) u64);

// ============================================================================
// RouteOperation / DismissMatch
// ============================================================================

/// A requested change to the presentation state.
pub(crate) enum RouteOperation<R: AppRoute> {
    /// Present a route, optionally carrying an opaque payload for the
    /// delegate. The payload is taken out of the queue when the present
    /// effect starts.
    Present {
        route: R,
        metadata: Option<R::Metadata>,
    },

    /// Dismiss a single route instance or a whole group.
    Dismiss(DismissMatch<R>),
}

impl<R: AppRoute> RouteOperation<R> {
    /// The group affected by this operation, for skip-set bookkeeping.
    pub(crate) fn route_group(&self) -> R::Group {
        match self {
            Self::Present { route, .. } => route.group(),
            Self::Dismiss(dismiss_match) => dismiss_match.route_group(),
        }
    }
}

impl<R: AppRoute> fmt::Debug for RouteOperation<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Present { route, .. } => f
                .debug_struct("Present")
                .field("route", route)
                .finish_non_exhaustive(),
            Self::Dismiss(dismiss_match) => f.debug_tuple("Dismiss").field(dismiss_match).finish(),
        }
    }
}

/// A single route or a whole group requested for dismissal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum DismissMatch<R: AppRoute> {
    Group(R::Group),
    SingleRoute(R),
}

impl<R: AppRoute> DismissMatch<R> {
    /// The group affected by the dismissal.
    pub(crate) fn route_group(&self) -> R::Group {
        match self {
            Self::Group(group) => group.clone(),
            Self::SingleRoute(route) => route.group(),
        }
    }
}

// ============================================================================
// PendingOperation
// ============================================================================

/// An outstanding present/dismiss request not yet resolved.
pub(crate) struct PendingOperation<R: AppRoute> {
    pub(crate) id: OperationId,
    pub(crate) operation: RouteOperation<R>,
    pub(crate) animated: bool,
}

impl<R: AppRoute> PendingOperation<R> {
    pub(crate) fn route_group(&self) -> R::Group {
        self.operation.route_group()
    }
}

impl<R: AppRoute> fmt::Debug for PendingOperation<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PendingOperation")
            .field("id", &self.id)
            .field("operation", &self.operation)
            .field("animated", &self.animated)
            .finish()
    }
}

// ============================================================================
// Resolution outcomes
// ============================================================================

/// Outcome of one attempt to fulfill a presentation request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum PresentationOutcome {
    /// The route was presented (or handed to sub-navigation).
    Success,

    /// The request should be removed from the queue without effect.
    Drop,

    /// The modal context does not allow the presentation right now. The
    /// router attempts other requests first, in hope the stack unwinds
    /// before getting back to this one.
    BlockedByModalContext,
}

/// Outcome of one attempt to fulfill a dismissal request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum DismissalOutcome {
    /// The route or group was dismissed.
    Success,

    /// The request should be removed from the queue without effect.
    Drop,

    /// Another modal presented above blocks the dismissal. The router
    /// attempts other requests first; one of them may unblock this group.
    BlockedByModalAbove,
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::route::RouteGroup;

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    enum Group {
        Primary,
        Sheet,
    }

    impl RouteGroup for Group {
        fn modal_level(&self) -> i32 {
            match self {
                Group::Primary => 0,
                Group::Sheet => 1,
            }
        }

        fn is_modal(&self) -> bool {
            matches!(self, Group::Sheet)
        }
    }

    #[derive(Debug, Clone, PartialEq, Eq)]
    enum Route {
        Main,
        Sheet,
    }

    impl AppRoute for Route {
        type Group = Group;
        type Metadata = ();

        fn group(&self) -> Group {
            match self {
                Route::Main => Group::Primary,
                Route::Sheet => Group::Sheet,
            }
        }
    }

    #[test]
    fn test_present_route_group() {
        let operation = RouteOperation::Present {
            route: Route::Sheet,
            metadata: None,
        };
        assert_eq!(operation.route_group(), Group::Sheet);
    }

    #[test]
    fn test_dismiss_match_route_group() {
        let by_group: DismissMatch<Route> = DismissMatch::Group(Group::Primary);
        assert_eq!(by_group.route_group(), Group::Primary);

        let by_route = DismissMatch::SingleRoute(Route::Main);
        assert_eq!(by_route.route_group(), Group::Primary);
    }

    #[test]
    fn test_operation_debug_skips_metadata() {
        let operation: RouteOperation<Route> = RouteOperation::Present {
            route: Route::Main,
            metadata: None,
        };
        let rendered = format!("{operation:?}");
        assert!(rendered.contains("Present"));
        assert!(rendered.contains("Main"));
    }
}
