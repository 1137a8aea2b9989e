//! Queue-based application router with modal stacking, deduplication, and
//! interactive dismissal reconciliation.
//!
//! The router decides *whether, when, and in what order* a requested
//! navigation change may take effect, and records the resulting presentation
//! state. What a screen shows, how transitions animate, and everything else
//! behind a route stays with the application, reached through the
//! [`RouterDelegate`] seam.
//!
//! # Model
//!
//! | Concept | Type |
//! |---------|------|
//! | A navigable destination | [`AppRoute`] (application-defined value type) |
//! | A layer of the hierarchy | [`RouteGroup`] with a modal level and modal flag |
//! | The active layers, bottom to top | modal stack, owned by the router |
//! | A live presentation instance | [`PresentedRoute`] bound to a [`PresentationHandle`] |
//! | An outstanding request | pending operation in the router's queue |
//!
//! # Pipeline
//!
//! When a presentation request is made, the router resolves it in this
//! order:
//!
//! 1. **Sub-navigation** — a route supporting it that targets the topmost
//!    group updates the existing presentation in place.
//! 2. **Deduplication** — presenting into an active exclusive group, or
//!    repeating the group's most recent route, is dropped.
//! 3. **Stacking** — a modal group never lands below the current topmost
//!    level; the request waits until the stack unwinds.
//! 4. **Veto** — [`should_present`](RouterDelegate::should_present) may drop
//!    the request at the last moment.
//! 5. **Effect** — the delegate presents and completes with a handle.
//!
//! Dismissals run the mirror pipeline with
//! [`should_dismiss`](RouterDelegate::should_dismiss), and dismissals
//! performed outside the router (a swipe, a system gesture) are reconciled
//! through [`report_interactive_dismissal`](ApplicationRouter::report_interactive_dismissal).
//!
//! Operations on the same group resolve in FIFO order; an operation blocked
//! on one group never starves operations on another (skip-ahead). Blocked
//! requests stay queued indefinitely — there is no expiry.
//!
//! # Example
//!
//! ```
//! use application_router::{
//!     AppRoute, ApplicationRouter, OperationCompletion, PresentCompletion,
//!     PresentationHandle, RouteDismissalContext, RouteGroup,
//!     RoutePresentationContext, RouterDelegate,
//! };
//! use std::sync::Arc;
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
//!
//! struct Window;
//!
//! impl RouterDelegate<Route> for Window {
//!     fn present(&self, context: RoutePresentationContext<Route>, completion: PresentCompletion<Route>) {
//!         // attach the screen for `context.route`, then:
//!         completion.finish(PresentationHandle::unique());
//!     }
//!
//!     fn dismiss(&self, context: RouteDismissalContext<Route>, completion: OperationCompletion<Route>) {
//!         // tear down `context.dismissed_routes`, then:
//!         completion.finish();
//!     }
//! }
//!
//! let window = Arc::new(Window);
//! let router = ApplicationRouter::new(&window);
//!
//! router.present(Route::Main, false, None);
//! router.present(Route::Settings, true, None);
//!
//! assert_eq!(router.modal_stack(), vec![Group::Primary, Group::Settings]);
//!
//! router.dismiss_all(Group::Settings, true);
//! assert!(!router.is_presenting_route(&Route::Settings));
//! ```
//!
//! # Concurrency
//!
//! The router is single-threaded in spirit: all resolution happens on one
//! logical execution context, serialized by a mutex at the API boundary.
//! Delegate effects are asynchronous — they receive a move-once completion
//! token and may finish it immediately or later; the router never blocks
//! waiting for one.
//!
//! # Features
//!
//! | Feature   | Effect |
//! |-----------|--------|
//! | `log`     | Route logging through the `log` crate (default) |
//! | `tracing` | Route logging through the `tracing` crate instead |

pub mod context;
pub mod delegate;
pub mod logging;
mod operation;
pub mod route;
pub mod router;
mod state;

pub use context::{RouteDismissalContext, RoutePresentationContext, RouteSubnavigationContext};
pub use delegate::{OperationCompletion, PresentCompletion, RouterDelegate};
pub use route::{AppRoute, PresentationHandle, PresentedRoute, RouteGroup};
pub use router::ApplicationRouter;
