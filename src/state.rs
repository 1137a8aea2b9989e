//! Presentation state: the modal stack and the presented-routes registry.
//!
//! [`PresentationState`] is owned exclusively by the router and kept in
//! lock-step:
//!
//! - the modal stack never contains a duplicate group;
//! - non-modal groups sit at the bottom of the stack, modal groups are
//!   appended on top; the last element is the topmost group;
//! - a group has registry entries iff it is on the modal stack;
//! - a group whose routes are exclusive holds at most one entry.
//!
//! Violations are programmer errors, defended with debug assertions.

use crate::route::{AppRoute, PresentationHandle, PresentedRoute, RouteGroup};
use std::collections::HashMap;

/// Modal stack plus per-group presented-route lists.
#[derive(Debug, Clone)]
pub(crate) struct PresentationState<R: AppRoute> {
    /// Ordered active groups; the last element is topmost.
    modal_stack: Vec<R::Group>,
    /// Per-group ordered presented routes.
    presented: HashMap<R::Group, Vec<PresentedRoute<R>>>,
}

impl<R: AppRoute> PresentationState<R> {
    pub(crate) fn new() -> Self {
        Self {
            modal_stack: Vec::new(),
            presented: HashMap::new(),
        }
    }

    pub(crate) fn modal_stack(&self) -> &[R::Group] {
        &self.modal_stack
    }

    pub(crate) fn topmost_group(&self) -> Option<&R::Group> {
        self.modal_stack.last()
    }

    pub(crate) fn is_group_presented(&self, group: &R::Group) -> bool {
        self.modal_stack.contains(group)
    }

    pub(crate) fn is_route_presented(&self, route: &R) -> bool {
        self.routes_in(&route.group())
            .iter()
            .any(|presented| presented.route == *route)
    }

    /// Presented routes of `group`, in presentation order. Empty when the
    /// group is not active.
    pub(crate) fn routes_in(&self, group: &R::Group) -> &[PresentedRoute<R>] {
        self.presented.get(group).map_or(&[], Vec::as_slice)
    }

    /// Record a successfully presented route.
    ///
    /// Exclusive routes replace the sole entry of their group; others are
    /// appended. The group joins the modal stack if absent: at the bottom
    /// when non-modal, on top when modal.
    pub(crate) fn add_presented(&mut self, presented: PresentedRoute<R>) {
        let group = presented.route.group();
        let exclusive = presented.route.is_exclusive();
        let routes = self.presented.entry(group.clone()).or_default();

        if exclusive {
            routes.clear();
        }
        routes.push(presented);

        if !self.modal_stack.contains(&group) {
            if group.is_modal() {
                self.modal_stack.push(group);
            } else {
                self.modal_stack.insert(0, group);
            }
        }

        self.debug_assert_invariants();
    }

    /// Swap the route shown by the most recent entry of `group` in place,
    /// keeping its handle and the entry count. Returns the entry as it was
    /// before the swap, or `None` when the group has no entries.
    pub(crate) fn swap_route_in_place(
        &mut self,
        group: &R::Group,
        new_route: R,
    ) -> Option<PresentedRoute<R>> {
        let entry = self.presented.get_mut(group)?.last_mut()?;
        let previous = entry.clone();
        entry.route = new_route;

        self.debug_assert_invariants();
        Some(previous)
    }

    /// Remove every entry of `group` and take it off the modal stack.
    /// Returns the removed entries in presentation order.
    pub(crate) fn remove_group(&mut self, group: &R::Group) -> Vec<PresentedRoute<R>> {
        let removed = self.presented.remove(group).unwrap_or_default();
        self.modal_stack.retain(|presented| presented != group);

        self.debug_assert_invariants();
        removed
    }

    /// Remove the most recent entry matching `route`. When it was the last
    /// entry of its group, the group leaves the modal stack too.
    pub(crate) fn remove_route(&mut self, route: &R) -> Option<PresentedRoute<R>> {
        let group = route.group();
        let routes = self.presented.get_mut(&group)?;
        let index = routes.iter().rposition(|presented| presented.route == *route)?;
        let removed = routes.remove(index);

        if routes.is_empty() {
            self.presented.remove(&group);
            self.modal_stack.retain(|presented| presented != &group);
        }

        self.debug_assert_invariants();
        Some(removed)
    }

    /// Remove the entry identified by `handle`, wherever it lives.
    ///
    /// Used to reconcile dismissals that happened outside router control;
    /// the handle is the only identity an interactive dismissal reports.
    pub(crate) fn remove_handle(&mut self, handle: PresentationHandle) -> Option<PresentedRoute<R>> {
        let (group, index) = self.presented.iter().find_map(|(group, routes)| {
            routes
                .iter()
                .position(|presented| presented.handle == handle)
                .map(|index| (group.clone(), index))
        })?;

        let routes = self.presented.get_mut(&group)?;
        let removed = routes.remove(index);

        if routes.is_empty() {
            self.presented.remove(&group);
            self.modal_stack.retain(|presented| presented != &group);
        }

        self.debug_assert_invariants();
        Some(removed)
    }

    #[cfg(debug_assertions)]
    fn debug_assert_invariants(&self) {
        for (index, group) in self.modal_stack.iter().enumerate() {
            debug_assert!(
                !self.modal_stack[index + 1..].contains(group),
                "modal stack holds duplicate group {group:?}"
            );
            debug_assert!(
                self.presented.get(group).is_some_and(|routes| !routes.is_empty()),
                "group {group:?} on the modal stack has no presented routes"
            );
        }
        for (group, routes) in &self.presented {
            debug_assert!(
                self.modal_stack.contains(group),
                "group {group:?} has presented routes but is not on the modal stack"
            );
            debug_assert!(
                !routes.iter().any(|presented| presented.route.is_exclusive())
                    || routes.len() == 1,
                "exclusive group {group:?} holds {} entries",
                routes.len()
            );
        }
    }

    #[cfg(not(debug_assertions))]
    fn debug_assert_invariants(&self) {}
}

// ============================================================================
// Tests
// ============================================================================
