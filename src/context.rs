//! Context payloads handed to the delegate.
//!
//! Each delegate callback receives a context struct describing the change in
//! subject:
//!
//! - [`RoutePresentationContext`] — what to present, with the opaque
//!   application payload attached to the request.
//! - [`RouteDismissalContext`] — which live instances are going away and
//!   whether the whole group is closing.
//! - [`RouteSubnavigationContext`] — the live instance to update in place
//!   and the route to show in it.

use crate::route::{AppRoute, PresentedRoute};
use std::fmt;

// ============================================================================
// RoutePresentationContext
// ============================================================================

/// Information used by the delegate to present a route.
pub struct RoutePresentationContext<R: AppRoute> {
    /// The route to present.
    pub route: R,

    /// Whether the transition is animated.
    pub is_animated: bool,

    /// Opaque payload passed to [`present`](crate::ApplicationRouter::present)
    /// by the caller, if any.
    pub metadata: Option<R::Metadata>,
}

impl<R: AppRoute> fmt::Debug for RoutePresentationContext<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RoutePresentationContext")
            .field("route", &self.route)
            .field("is_animated", &self.is_animated)
            .finish_non_exhaustive()
    }
}

// ============================================================================
// RouteDismissalContext
// ============================================================================

/// Information used by the delegate to perform dismissal of the route(s) in
/// subject.
///
/// The same context is given to the [`should_dismiss`](crate::RouterDelegate::should_dismiss)
/// veto hook and, if the veto passes, to the dismiss effect.
#[derive(Debug, Clone)]
pub struct RouteDismissalContext<R: AppRoute> {
    /// Specific live instances that are being dismissed.
    pub dismissed_routes: Vec<PresentedRoute<R>>,

    /// Whether the entire group is being dismissed.
    pub is_closing: bool,

    /// Whether the transition is animated.
    pub is_animated: bool,
}

// ============================================================================
// RouteSubnavigationContext
// ============================================================================

/// Information used by the delegate to perform sub-navigation of the route
/// in subject.
#[derive(Debug, Clone)]
pub struct RouteSubnavigationContext<R: AppRoute> {
    /// The live instance being updated, still carrying the route it showed
    /// before this request.
    pub presented_route: PresentedRoute<R>,

    /// The route to show in its place.
    pub route: R,

    /// Whether the transition is animated.
    pub is_animated: bool,
}
