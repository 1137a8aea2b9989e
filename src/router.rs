//! The application router: public API, pending queue, and the resolution
//! loop.
//!
//! [`ApplicationRouter`] is the only owner of mutable navigation state. Every
//! mutating call enqueues a pending operation and returns immediately; the
//! router drains the queue by attempting to resolve the earliest operation
//! whose group is not known to be blocked in the current pass.
//!
//! # Draining
//!
//! A pass keeps a *skip set* of groups found blocked:
//!
//! 1. Scan the queue for the earliest operation whose group is not skipped;
//!    stop when none exists.
//! 2. Attempt to resolve it. **Success** applies the effect and removes the
//!    operation; **drop** removes it without effect; both reset the skip set
//!    and restart the scan. **Blocked** leaves the operation queued, adds its
//!    group to the skip set, and continues scanning.
//!
//! The result is approximate-FIFO with skip-ahead: operations on the same
//! group resolve in order, while an operation blocked on one group never
//! starves operations on another. Draining re-triggers on every enqueue, on
//! every effect completion, and on every reported interactive dismissal.
//!
//! Delegate effects are asynchronous: while one is in flight the pass parks
//! itself and the completion token resumes it. The loop is explicitly
//! iterative, so a long queue of immediately-completing operations consumes
//! no stack.
//!
//! # Concurrency
//!
//! All resolution happens on one logical execution context. External calls
//! are serialized by a mutex at the boundary; veto hooks and effects are
//! invoked with that lock released, so a delegate may re-enter the public
//! API from inside any callback.

use crate::context::{RouteDismissalContext, RoutePresentationContext, RouteSubnavigationContext};
use crate::delegate::{OperationCompletion, PresentCompletion, RouterDelegate};
use crate::operation::{
    DismissMatch, DismissalOutcome, OperationId, PendingOperation, PresentationOutcome,
    RouteOperation,
};
use crate::route::{AppRoute, PresentationHandle, PresentedRoute, RouteGroup};
use crate::state::PresentationState;
use crate::{debug_log, trace_log, warn_log};
use parking_lot::Mutex;
use std::collections::HashSet;
use std::sync::{Arc, Weak};

// ============================================================================
// ApplicationRouter
// ============================================================================

/// Serializes and arbitrates requests to present and dismiss routes.
///
/// The router is a cheap handle over shared core state; clones address the
/// same queue and registry. The delegate is held weakly — the application
/// object that owns both must keep the delegate alive for as long as the
/// router is in use.
///
/// ```
/// # use application_router::*;
/// # use std::sync::Arc;
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
/// # struct Delegate;
/// # impl RouterDelegate<Route> for Delegate {
/// #     fn present(&self, _: RoutePresentationContext<Route>, completion: PresentCompletion<Route>) {
/// #         completion.finish(PresentationHandle::unique());
/// #     }
/// #     fn dismiss(&self, _: RouteDismissalContext<Route>, completion: OperationCompletion<Route>) {
/// #         completion.finish();
/// #     }
/// # }
/// let delegate = Arc::new(Delegate);
/// let router = ApplicationRouter::new(&delegate);
///
/// router.present(Route, true, None);
/// assert!(router.is_presenting_route(&Route));
/// ```
pub struct ApplicationRouter<R: AppRoute> {
    core: Arc<Mutex<RouterCore<R>>>,
    delegate: Weak<dyn RouterDelegate<R>>,
}

impl<R: AppRoute> Clone for ApplicationRouter<R> {
    fn clone(&self) -> Self {
        Self {
            core: Arc::clone(&self.core),
            delegate: Weak::clone(&self.delegate),
        }
    }
}

impl<R: AppRoute> ApplicationRouter<R> {
    /// Create a router driving `delegate`.
    ///
    /// The delegate is downgraded to a weak reference; the router must not
    /// outlive it.
    pub fn new<D>(delegate: &Arc<D>) -> Self
    where
        D: RouterDelegate<R>,
    {
        let delegate_dyn: Arc<dyn RouterDelegate<R>> = delegate.clone();
        let delegate: Weak<dyn RouterDelegate<R>> = Arc::downgrade(&delegate_dyn);
        Self {
            core: Arc::new(Mutex::new(RouterCore::new())),
            delegate,
        }
    }

    // ------------------------------------------------------------------
    // Public API
    // ------------------------------------------------------------------

    /// Enqueue `route` for presentation. Never blocks; resolution is
    /// asynchronous relative to the call.
    ///
    /// `metadata` is an opaque payload forwarded to the delegate's present
    /// effect. It is consumed by the presentation and never cloned.
    pub fn present(&self, route: R, animated: bool, metadata: Option<R::Metadata>) {
        self.enqueue(RouteOperation::Present { route, metadata }, animated);
    }

    /// Enqueue dismissal of one specific route instance.
    pub fn dismiss(&self, route: R, animated: bool) {
        self.enqueue(
            RouteOperation::Dismiss(DismissMatch::SingleRoute(route)),
            animated,
        );
    }

    /// Enqueue dismissal of every route in `group`.
    pub fn dismiss_all(&self, group: R::Group, animated: bool) {
        self.enqueue(RouteOperation::Dismiss(DismissMatch::Group(group)), animated);
    }

    /// Whether `route` is currently presented. Reads resolved state only;
    /// pending operations are not considered.
    #[must_use]
    pub fn is_presenting_route(&self, route: &R) -> bool {
        self.core.lock().state.is_route_presented(route)
    }

    /// Whether `group` currently has any presented route.
    #[must_use]
    pub fn is_presenting_group(&self, group: &R::Group) -> bool {
        self.core.lock().state.is_group_presented(group)
    }

    /// Snapshot of the currently active groups, bottom to top.
    #[must_use]
    pub fn modal_stack(&self) -> Vec<R::Group> {
        self.core.lock().state.modal_stack().to_vec()
    }

    /// Snapshot of the presented routes of `group`, in presentation order.
    #[must_use]
    pub fn presented_routes(&self, group: &R::Group) -> Vec<PresentedRoute<R>> {
        self.core.lock().state.routes_in(group).to_vec()
    }

    /// Reconcile a dismissal that happened outside router control (for
    /// example a user gesture), identified by the handle issued at
    /// presentation time.
    ///
    /// The matching entry is removed as a dismissal would remove it, but
    /// without the veto hook and without the dismiss effect — the dismissal
    /// already happened. Draining re-triggers in case queued operations were
    /// waiting on the group becoming free.
    pub fn report_interactive_dismissal(&self, handle: PresentationHandle) {
        let removed = self.core.lock().state.remove_handle(handle);

        match removed {
            Some(presented) => {
                debug_log!(
                    "Reconciled interactive dismissal of {:?}.",
                    presented.route
                );
                self.resume();
            }
            None => {
                warn_log!("Interactive dismissal reported for unknown handle {handle:?}.");
            }
        }
    }

    // ------------------------------------------------------------------
    // Queue management
    // ------------------------------------------------------------------

    fn enqueue(&self, operation: RouteOperation<R>, animated: bool) {
        let start = {
            let mut core = self.core.lock();
            debug_log!("Enqueue {operation:?}.");

            let id = OperationId(core.next_operation_id);
            core.next_operation_id += 1;
            core.pending.push(PendingOperation {
                id,
                operation,
                animated,
            });

            !core.is_processing
        };

        if start {
            self.resume();
        }
    }

    /// Start a drain pass, or ask the already-running one to rescan.
    fn resume(&self) {
        {
            let mut core = self.core.lock();
            core.is_processing = true;
            if core.frame_active {
                core.resume_requested = true;
                return;
            }
            core.frame_active = true;
        }
        self.drain();
    }

    fn drain(&self) {
        let mut skip: HashSet<R::Group> = HashSet::new();

        loop {
            let Some(selected) = self.next_operation(&mut skip) else {
                return;
            };

            match selected.kind {
                OperationKind::Present(route) => {
                    let group = route.group();
                    match self.resolve_present(selected.id, route, selected.animated) {
                        PresentationOutcome::Success => {}
                        PresentationOutcome::Drop => self.finish_operation(selected.id, &mut skip),
                        PresentationOutcome::BlockedByModalContext => {
                            skip.insert(group);
                        }
                    }
                }
                OperationKind::Dismiss(dismiss_match) => {
                    let group = dismiss_match.route_group();
                    match self.resolve_dismiss(selected.id, dismiss_match, selected.animated) {
                        DismissalOutcome::Success => {}
                        DismissalOutcome::Drop => self.finish_operation(selected.id, &mut skip),
                        DismissalOutcome::BlockedByModalAbove => {
                            skip.insert(group);
                        }
                    }
                }
            }
        }
    }

    /// Select the earliest pending operation whose group is not skipped.
    ///
    /// Returns `None` when the pass is over: either an effect is in flight
    /// (the completion resumes draining) or every remaining operation is
    /// blocked and the chain goes idle until the next external trigger.
    fn next_operation(&self, skip: &mut HashSet<R::Group>) -> Option<SelectedOperation<R>> {
        let mut core = self.core.lock();

        if core.resume_requested {
            core.resume_requested = false;
            skip.clear();
        }

        if core.effect_in_flight {
            core.frame_active = false;
            return None;
        }

        let index = core
            .pending
            .iter()
            .position(|pending| !skip.contains(&pending.route_group()));

        let Some(index) = index else {
            trace_log!("No resolvable pending operation; going idle.");
            core.frame_active = false;
            core.is_processing = false;
            return None;
        };

        let pending = &core.pending[index];
        let kind = match &pending.operation {
            RouteOperation::Present { route, .. } => OperationKind::Present(route.clone()),
            RouteOperation::Dismiss(dismiss_match) => {
                OperationKind::Dismiss(dismiss_match.clone())
            }
        };

        Some(SelectedOperation {
            id: pending.id,
            kind,
            animated: pending.animated,
        })
    }

    /// Remove a resolved operation and restart the scan from the top.
    fn finish_operation(&self, id: OperationId, skip: &mut HashSet<R::Group>) {
        self.core.lock().remove_pending(id);
        skip.clear();
    }

    // ------------------------------------------------------------------
    // Presentation resolution
    // ------------------------------------------------------------------

    fn resolve_present(
        &self,
        operation_id: OperationId,
        route: R,
        animated: bool,
    ) -> PresentationOutcome {
        let precheck = {
            let mut core = self.core.lock();
            let group = route.group();

            // Pass sub-routes to the topmost group in place when supported.
            if route.supports_sub_navigation()
                && core.state.topmost_group() == Some(&group)
                && !core.state.routes_in(&group).is_empty()
            {
                match core.state.swap_route_in_place(&group, route.clone()) {
                    Some(previous) => {
                        core.effect_in_flight = true;
                        Precheck::SubNavigate(RouteSubnavigationContext {
                            presented_route: previous,
                            route: route.clone(),
                            is_animated: animated,
                        })
                    }
                    None => Precheck::Drop,
                }
            }
            // Drop duplicate routes of an already-active exclusive group.
            else if route.is_exclusive() && core.state.is_group_presented(&group) {
                debug_log!("Dropping duplicate exclusive {route:?}.");
                Precheck::Drop
            }
            // Drop if the last presented route within the group is the same.
            else if !route.is_exclusive()
                && core
                    .state
                    .routes_in(&group)
                    .last()
                    .is_some_and(|presented| presented.route == route)
            {
                debug_log!("Dropping trailing duplicate {route:?}.");
                Precheck::Drop
            }
            // Check if the route can be presented above the topmost group.
            else if core.state.topmost_group().is_some_and(|top| {
                group.is_modal()
                    && (top.modal_level() > group.modal_level()
                        || (top.modal_level() == group.modal_level() && route.is_exclusive()))
            }) {
                trace_log!("Presentation of {route:?} blocked by modal context.");
                Precheck::Blocked
            } else {
                Precheck::Proceed(core.take_metadata(operation_id))
            }
        };

        match precheck {
            Precheck::Drop => PresentationOutcome::Drop,
            Precheck::Blocked => PresentationOutcome::BlockedByModalContext,
            Precheck::SubNavigate(context) => {
                let Some(delegate) = self.delegate.upgrade() else {
                    self.core.lock().effect_in_flight = false;
                    warn_log!("Delegate is gone; dropping pending sub-navigation.");
                    return PresentationOutcome::Drop;
                };
                debug_log!(
                    "Sub-navigating {:?} to {:?}.",
                    context.presented_route.route,
                    context.route
                );
                delegate.handle_sub_navigation(
                    context,
                    OperationCompletion::new(self.clone(), operation_id),
                );
                PresentationOutcome::Success
            }
            Precheck::Proceed(metadata) => {
                let Some(delegate) = self.delegate.upgrade() else {
                    warn_log!("Delegate is gone; dropping pending presentation.");
                    return PresentationOutcome::Drop;
                };

                // Consult the delegate whether the route should still be
                // presented.
                if !delegate.should_present(&route) {
                    debug_log!("Presentation of {route:?} vetoed by delegate.");
                    return PresentationOutcome::Drop;
                }

                self.core.lock().effect_in_flight = true;
                let context = RoutePresentationContext {
                    route: route.clone(),
                    is_animated: animated,
                    metadata,
                };
                delegate.present(context, PresentCompletion::new(self.clone(), operation_id, route));
                PresentationOutcome::Success
            }
        }
    }

    // ------------------------------------------------------------------
    // Dismissal resolution
    // ------------------------------------------------------------------

    fn resolve_dismiss(
        &self,
        operation_id: OperationId,
        dismiss_match: DismissMatch<R>,
        animated: bool,
    ) -> DismissalOutcome {
        match dismiss_match {
            DismissMatch::Group(group) => self.dismiss_group(operation_id, group, animated),
            DismissMatch::SingleRoute(route) => self.dismiss_route(operation_id, route, animated),
        }
    }

    fn dismiss_group(
        &self,
        operation_id: OperationId,
        group: R::Group,
        animated: bool,
    ) -> DismissalOutcome {
        let context = {
            let core = self.core.lock();

            if !core.state.is_group_presented(&group) {
                debug_log!("Dropping dismissal of inactive group {group:?}.");
                return DismissalOutcome::Drop;
            }

            // A modal group cannot be dismissed from under another one.
            if group.is_modal() && core.state.topmost_group() != Some(&group) {
                trace_log!("Dismissal of {group:?} blocked by modal above.");
                return DismissalOutcome::BlockedByModalAbove;
            }

            let dismissed_routes = core.state.routes_in(&group).to_vec();
            debug_assert!(
                !dismissed_routes.is_empty(),
                "group {group:?} on the modal stack with no presented routes"
            );

            RouteDismissalContext {
                dismissed_routes,
                is_closing: true,
                is_animated: animated,
            }
        };

        let Some(delegate) = self.delegate.upgrade() else {
            warn_log!("Delegate is gone; dropping pending dismissal.");
            return DismissalOutcome::Drop;
        };

        // Consult the delegate whether the routes should still be dismissed.
        if !delegate.should_dismiss(&context) {
            debug_log!("Dismissal of {group:?} vetoed by delegate.");
            return DismissalOutcome::Drop;
        }

        {
            let mut core = self.core.lock();
            core.state.remove_group(&group);
            core.effect_in_flight = true;
        }

        delegate.dismiss(context, OperationCompletion::new(self.clone(), operation_id));
        DismissalOutcome::Success
    }

    fn dismiss_route(
        &self,
        operation_id: OperationId,
        route: R,
        animated: bool,
    ) -> DismissalOutcome {
        let context = {
            let core = self.core.lock();
            let group = route.group();
            let routes = core.state.routes_in(&group);

            let Some(index) = routes.iter().rposition(|presented| presented.route == route)
            else {
                debug_log!("Dropping dismissal of unpresented {route:?}.");
                return DismissalOutcome::Drop;
            };

            // Dismissing the only entry closes the whole group, which obeys
            // the same rule as a group dismissal. Removing a non-last entry
            // reorders nothing and is never blocked.
            let is_closing = routes.len() == 1;
            if is_closing && group.is_modal() && core.state.topmost_group() != Some(&group) {
                trace_log!("Dismissal of {route:?} blocked by modal above.");
                return DismissalOutcome::BlockedByModalAbove;
            }

            RouteDismissalContext {
                dismissed_routes: vec![routes[index].clone()],
                is_closing,
                is_animated: animated,
            }
        };

        let Some(delegate) = self.delegate.upgrade() else {
            warn_log!("Delegate is gone; dropping pending dismissal.");
            return DismissalOutcome::Drop;
        };

        if !delegate.should_dismiss(&context) {
            debug_log!("Dismissal of {route:?} vetoed by delegate.");
            return DismissalOutcome::Drop;
        }

        {
            let mut core = self.core.lock();
            core.state.remove_route(&route);
            core.effect_in_flight = true;
        }

        delegate.dismiss(context, OperationCompletion::new(self.clone(), operation_id));
        DismissalOutcome::Success
    }

    // ------------------------------------------------------------------
    // Completion entry points
    // ------------------------------------------------------------------

    /// Record a completed presentation and resume draining. Called by
    /// [`PresentCompletion::finish`].
    pub(crate) fn complete_presentation(
        &self,
        operation_id: OperationId,
        route: R,
        handle: PresentationHandle,
    ) {
        {
            let mut core = self.core.lock();
            debug_log!("Presented {route:?} as {handle:?}.");
            core.state.add_presented(PresentedRoute { route, handle });
            core.remove_pending(operation_id);
            core.effect_in_flight = false;
        }
        self.resume();
    }

    /// Mark a completed dismissal or sub-navigation and resume draining.
    /// Called by [`OperationCompletion::finish`].
    pub(crate) fn complete_operation(&self, operation_id: OperationId) {
        {
            let mut core = self.core.lock();
            core.remove_pending(operation_id);
            core.effect_in_flight = false;
        }
        self.resume();
    }
}

// ============================================================================
// RouterCore
// ============================================================================

struct RouterCore<R: AppRoute> {
    state: PresentationState<R>,
    pending: Vec<PendingOperation<R>>,
    next_operation_id: u64,
    /// A drain chain is active: a pass is running or an effect is in flight.
    /// Enqueues while set only append; the chain picks new work up itself.
    is_processing: bool,
    /// A drain loop frame is on some call stack right now.
    frame_active: bool,
    /// A delegate effect has been started and its completion has not fired.
    effect_in_flight: bool,
    /// A completion fired while a frame was active; the frame must reset its
    /// skip set and rescan instead of going idle.
    resume_requested: bool,
}

impl<R: AppRoute> RouterCore<R> {
    fn new() -> Self {
        Self {
            state: PresentationState::new(),
            pending: Vec::new(),
            next_operation_id: 0,
            is_processing: false,
            frame_active: false,
            effect_in_flight: false,
            resume_requested: false,
        }
    }

    fn remove_pending(&mut self, id: OperationId) {
        if let Some(index) = self.pending.iter().position(|pending| pending.id == id) {
            self.pending.remove(index);
        }
    }

    /// Take the metadata out of a queued present operation. The payload is
    /// consumed by the presentation exactly once.
    fn take_metadata(&mut self, id: OperationId) -> Option<R::Metadata> {
        let pending = self.pending.iter_mut().find(|pending| pending.id == id)?;
        match &mut pending.operation {
            RouteOperation::Present { metadata, .. } => metadata.take(),
            RouteOperation::Dismiss(_) => None,
        }
    }
}

// ============================================================================
// Drain bookkeeping types
// ============================================================================

struct SelectedOperation<R: AppRoute> {
    id: OperationId,
    kind: OperationKind<R>,
    animated: bool,
}

enum OperationKind<R: AppRoute> {
    Present(R),
    Dismiss(DismissMatch<R>),
}

/// Lock-held portion of presentation resolution; the veto hook and the
/// effect run with the lock released.
enum Precheck<R: AppRoute> {
    SubNavigate(RouteSubnavigationContext<R>),
    Drop,
    Blocked,
    Proceed(Option<<R as AppRoute>::Metadata>),
}
