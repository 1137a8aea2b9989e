//! Route and route-group model.
//!
//! Routes are application-defined value types. The crate stays generic over
//! them through two traits:
//!
//! - [`RouteGroup`] — a named layer of the navigation hierarchy with a modal
//!   level and a modal flag. Groups form the modal stack.
//! - [`AppRoute`] — a single navigable destination: the group it belongs to,
//!   whether it is exclusive within that group, and whether it supports
//!   in-place sub-navigation.
//!
//! Both are typically implemented on small `enum`s:
//!
//! ```
//! use application_router::{AppRoute, RouteGroup};
//!
//! #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
//! enum Group {
//!     Primary,
//!     Settings,
//! }
//!
//! impl RouteGroup for Group {
//!     fn modal_level(&self) -> i32 {
//!         match self {
//!             Group::Primary => 0,
//!             Group::Settings => 1,
//!         }
//!     }
//!
//!     fn is_modal(&self) -> bool {
//!         matches!(self, Group::Settings)
//!     }
//! }
//!
//! #[derive(Debug, Clone, PartialEq, Eq)]
//! enum Route {
//!     Main,
//!     Settings,
//! }
//!
//! impl AppRoute for Route {
//!     type Group = Group;
//!     type Metadata = ();
//!
//!     fn group(&self) -> Group {
//!         match self {
//!             Route::Main => Group::Primary,
//!             Route::Settings => Group::Settings,
//!         }
//!     }
//!
//!     fn is_exclusive(&self) -> bool {
//!         matches!(self, Route::Settings)
//!     }
//! }
//! ```
//!
//! The mapping route → group → (level, modal flag) must stay fixed for the
//! lifetime of the process.

use std::fmt;
use std::hash::Hash;
use std::sync::atomic::{AtomicU64, Ordering};

// ============================================================================
// RouteGroup trait
// ============================================================================

/// A group of routes: one layer of the navigation hierarchy.
///
/// Each group is a modal layer with horizontal navigation inside, except for
/// the primary group which is part of the root view. A group with a higher
/// [`modal_level`](Self::modal_level) can be presented above a group with a
/// lower level but not the other way around. An alert-style layer that must
/// never be covered gets the highest level in the application.
///
/// The conventional layout is the primary (non-modal) group at level `0` and
/// modal groups at `1` and above; the crate imposes no specific table.
pub trait RouteGroup: Clone + Eq + Hash + fmt::Debug + Send + Sync + 'static {
    /// Modal level used for restricting modal presentation.
    ///
    /// Levels define the total order among groups: presenting a modal group
    /// below the current topmost level is deferred until the stack unwinds.
    fn modal_level(&self) -> i32;

    /// Whether the group is presented modally, as opposed to being part of
    /// the root view.
    fn is_modal(&self) -> bool;
}

// ============================================================================
// AppRoute trait
// ============================================================================

/// A single navigable destination.
///
/// Routes are immutable, equatable values. Static properties of a route
/// (its group, exclusivity, sub-navigation support) must not change over
/// the lifetime of the process.
pub trait AppRoute: Clone + Eq + fmt::Debug + Send + Sync + 'static {
    /// The group this route family is organized into.
    type Group: RouteGroup;

    /// Opaque payload forwarded to the delegate alongside a presentation
    /// request. Use `()` when no payload is needed.
    type Metadata: Send + 'static;

    /// The navigation group this route belongs to.
    fn group(&self) -> Self::Group;

    /// Whether at most one live instance of this route's group may exist at
    /// a time. Presenting into an already-active exclusive group is a no-op.
    fn is_exclusive(&self) -> bool {
        false
    }

    /// Whether the route supports in-place sub-navigation: updating the
    /// displayed route within an already-topmost group without a full
    /// present/dismiss cycle.
    fn supports_sub_navigation(&self) -> bool {
        false
    }
}

// ============================================================================
// PresentationHandle
// ============================================================================

/// Opaque token identifying one live presentation instance.
///
/// The delegate obtains a handle (typically via [`unique`](Self::unique))
/// when it completes a presentation, and hands the same token back on
/// [`report_interactive_dismissal`](crate::ApplicationRouter::report_interactive_dismissal)
/// so the router can reconcile its state. Handles must not be reused across
/// distinct presentations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PresentationHandle(u64);

impl PresentationHandle {
    /// Produce a handle no other call to `unique` in this process returns.
    #[must_use]
    pub fn unique() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(0);
        Self(NEXT.fetch_add(1, Ordering::Relaxed))
    }
}

// ============================================================================
// PresentedRoute
// ============================================================================

/// A live instance of a route bound to its presentation handle.
///
/// Created when a presentation resolves successfully; destroyed when the
/// owning group or the specific instance is dismissed, explicitly or
/// interactively.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PresentedRoute<R: AppRoute> {
    /// The route being displayed. Sub-navigation swaps this in place while
    /// the handle stays the same.
    pub route: R,

    /// Token identifying the live presentation instance.
    pub handle: PresentationHandle,
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    struct TestGroup;

    impl RouteGroup for TestGroup {
        fn modal_level(&self) -> i32 {
            1
        }

        fn is_modal(&self) -> bool {
            true
        }
    }

    #[derive(Debug, Clone, PartialEq, Eq)]
    struct TestRoute;

    impl AppRoute for TestRoute {
        type Group = TestGroup;
        type Metadata = ();

        fn group(&self) -> TestGroup {
            TestGroup
        }
    }

    #[test]
    fn test_route_defaults() {
        let route = TestRoute;
        assert!(!route.is_exclusive());
        assert!(!route.supports_sub_navigation());
    }

    #[test]
    fn test_handles_are_unique() {
        let a = PresentationHandle::unique();
        let b = PresentationHandle::unique();
        assert_ne!(a, b);
    }

    #[test]
    fn test_presented_route_equality() {
        let handle = PresentationHandle::unique();
        let first = PresentedRoute {
            route: TestRoute,
            handle,
        };
        let second = PresentedRoute {
            route: TestRoute,
            handle,
        };
        assert_eq!(first, second);

        let other = PresentedRoute {
            route: TestRoute,
            handle: PresentationHandle::unique(),
        };
        assert_ne!(first, other);
    }
}
