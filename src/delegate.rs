//! Delegate contract and completion tokens.
//!
//! The router decides *whether, when, and in what order* a navigation change
//! takes effect; the delegate performs the actual presentation and dismissal
//! side effects and supplies two veto hooks. Effects are asynchronous: the
//! delegate returns immediately and signals completion later through the
//! move-once completion token it was handed.
//!
//! | Callback | Purpose |
//! |----------|---------|
//! | [`present`](RouterDelegate::present) | Display the route, then `completion.finish(handle)` |
//! | [`dismiss`](RouterDelegate::dismiss) | Tear the route(s) down, then `completion.finish()` |
//! | [`should_present`](RouterDelegate::should_present) | Last-moment veto before a presentation |
//! | [`should_dismiss`](RouterDelegate::should_dismiss) | Last-moment veto before a dismissal |
//! | [`handle_sub_navigation`](RouterDelegate::handle_sub_navigation) | Update a topmost group in place |
//!
//! The router holds its delegate weakly; the application owning both must
//! keep the delegate alive for as long as the router is in use. Operations
//! resolving after the delegate is gone are dropped with a warning.

use crate::context::{RouteDismissalContext, RoutePresentationContext, RouteSubnavigationContext};
use crate::operation::OperationId;
use crate::route::{AppRoute, PresentationHandle};
use crate::router::ApplicationRouter;
use crate::warn_log;

// ============================================================================
// RouterDelegate trait
// ============================================================================

/// The external collaborator performing presentation and dismissal effects.
///
/// # Example
///
/// ```
/// use application_router::{
///     OperationCompletion, PresentCompletion, PresentationHandle,
///     RouterDelegate, RoutePresentationContext, RouteDismissalContext,
/// };
/// # use application_router::{AppRoute, RouteGroup};
/// # #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
/// # struct Group;
/// # impl RouteGroup for Group {
/// #     fn modal_level(&self) -> i32 { 0 }
/// #     fn is_modal(&self) -> bool { false }
/// # }
/// # #[derive(Debug, Clone, PartialEq, Eq)]
/// # struct Route;
/// # impl AppRoute for Route {
/// #     type Group = Group;
/// #     type Metadata = ();
/// #     fn group(&self) -> Group { Group }
/// # }
///
/// struct WindowDelegate;
///
/// impl RouterDelegate<Route> for WindowDelegate {
///     fn present(&self, context: RoutePresentationContext<Route>, completion: PresentCompletion<Route>) {
///         // ... attach the screen for `context.route` ...
///         completion.finish(PresentationHandle::unique());
///     }
///
///     fn dismiss(&self, context: RouteDismissalContext<Route>, completion: OperationCompletion<Route>) {
///         // ... tear the screens in `context.dismissed_routes` down ...
///         completion.finish();
///     }
/// }
/// ```
pub trait RouterDelegate<R: AppRoute>: Send + Sync + 'static {
    /// Present the route, then finish the completion with the handle that
    /// identifies the new presentation instance.
    ///
    /// The router records the presentation only when the completion fires;
    /// until then the owning operation stays queued and no other operation
    /// resolves.
    fn present(&self, context: RoutePresentationContext<R>, completion: PresentCompletion<R>);

    /// Dismiss the route(s) described by the context, then finish the
    /// completion. The router has already removed the entries from its
    /// registry when this is called.
    fn dismiss(&self, context: RouteDismissalContext<R>, completion: OperationCompletion<R>);

    /// Reconsider whether the route presentation is still needed.
    ///
    /// Return `true` to proceed, `false` to drop the request silently.
    fn should_present(&self, route: &R) -> bool {
        let _ = route;
        true
    }

    /// Reconsider whether the dismissal should be done.
    ///
    /// Return `true` to proceed, `false` to drop the request silently.
    fn should_dismiss(&self, context: &RouteDismissalContext<R>) -> bool {
        let _ = context;
        true
    }

    /// Handle sub-navigation for routes supporting it, then finish the
    /// completion to tell the router it is done.
    ///
    /// The default finishes immediately, for route families that never set
    /// [`supports_sub_navigation`](AppRoute::supports_sub_navigation).
    fn handle_sub_navigation(
        &self,
        context: RouteSubnavigationContext<R>,
        completion: OperationCompletion<R>,
    ) {
        let _ = context;
        completion.finish();
    }
}

// ============================================================================
// Completion tokens
// ============================================================================

/// Completion token for a presentation effect.
///
/// Consumed by [`finish`](Self::finish). Dropping it unfinished stalls the
/// queue for the affected group and everything behind it, exactly as a
/// presentation that never completes would; the router logs a warning when
/// that happens.
#[must_use = "dropping a completion without finishing it stalls the router"]
pub struct PresentCompletion<R: AppRoute> {
    router: ApplicationRouter<R>,
    operation_id: OperationId,
    route: Option<R>,
}

impl<R: AppRoute> PresentCompletion<R> {
    pub(crate) fn new(router: ApplicationRouter<R>, operation_id: OperationId, route: R) -> Self {
        Self {
            router,
            operation_id,
            route: Some(route),
        }
    }

    /// Record the presentation under `handle` and let the router resume
    /// draining its queue.
    pub fn finish(mut self, handle: PresentationHandle) {
        if let Some(route) = self.route.take() {
            self.router
                .complete_presentation(self.operation_id, route, handle);
        }
    }
}

impl<R: AppRoute> Drop for PresentCompletion<R> {
    fn drop(&mut self) {
        if let Some(route) = &self.route {
            warn_log!(
                "Present completion for {route:?} dropped without finishing; router stalled."
            );
        }
    }
}

/// Completion token for a dismissal or sub-navigation effect.
///
/// Consumed by [`finish`](Self::finish). Dropping it unfinished stalls the
/// queue; the router logs a warning when that happens.
#[must_use = "dropping a completion without finishing it stalls the router"]
pub struct OperationCompletion<R: AppRoute> {
    router: ApplicationRouter<R>,
    operation_id: Option<OperationId>,
}

impl<R: AppRoute> OperationCompletion<R> {
    pub(crate) fn new(router: ApplicationRouter<R>, operation_id: OperationId) -> Self {
        Self {
            router,
            operation_id: Some(operation_id),
        }
    }

    /// Mark the effect as done and let the router resume draining its queue.
    pub fn finish(mut self) {
        if let Some(operation_id) = self.operation_id.take() {
            self.router.complete_operation(operation_id);
        }
    }
}

impl<R: AppRoute> Drop for OperationCompletion<R> {
    fn drop(&mut self) {
        if self.operation_id.is_some() {
            warn_log!("Operation completion dropped without finishing; router stalled.");
        }
    }
}
