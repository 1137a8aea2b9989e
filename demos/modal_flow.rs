//! End-to-end walkthrough: queueing, modal stacking, sub-navigation, and
//! interactive dismissal reconciliation with a console delegate.
//!
//! Run with logging enabled to watch the router's decisions:
//!
//! ```sh
//! RUST_LOG=debug cargo run --example modal_flow
//! ```

use application_router::{
    AppRoute, ApplicationRouter, OperationCompletion, PresentCompletion, PresentationHandle,
    RouteDismissalContext, RouteGroup, RoutePresentationContext, RouteSubnavigationContext,
    RouterDelegate,
};
use std::sync::{Arc, Mutex};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum DemoGroup {
    Primary,
    Settings,
    Alert,
}

impl RouteGroup for DemoGroup {
    fn modal_level(&self) -> i32 {
        match self {
            DemoGroup::Primary => 0,
            DemoGroup::Settings => 1,
            DemoGroup::Alert => 2,
        }
    }

    fn is_modal(&self) -> bool {
        !matches!(self, DemoGroup::Primary)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SettingsSection {
    Root,
    Privacy,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum DemoRoute {
    Login,
    Main,
    Settings(SettingsSection),
    Alert(&'static str),
}

impl AppRoute for DemoRoute {
    type Group = DemoGroup;
    type Metadata = &'static str;

    fn group(&self) -> DemoGroup {
        match self {
            DemoRoute::Login | DemoRoute::Main => DemoGroup::Primary,
            DemoRoute::Settings(_) => DemoGroup::Settings,
            DemoRoute::Alert(_) => DemoGroup::Alert,
        }
    }

    fn is_exclusive(&self) -> bool {
        matches!(self, DemoRoute::Settings(_))
    }

    fn supports_sub_navigation(&self) -> bool {
        matches!(self, DemoRoute::Settings(_))
    }
}

/// Prints every effect and remembers issued handles so the demo can fake a
/// swipe-to-dismiss gesture later.
#[derive(Default)]
struct ConsoleDelegate {
    handles: Mutex<Vec<(DemoRoute, PresentationHandle)>>,
}

impl ConsoleDelegate {
    fn handle_for(&self, route: &DemoRoute) -> Option<PresentationHandle> {
        self.handles
            .lock()
            .unwrap()
            .iter()
            .rev()
            .find(|(presented, _)| presented == route)
            .map(|(_, handle)| *handle)
    }
}

impl RouterDelegate<DemoRoute> for ConsoleDelegate {
    fn present(
        &self,
        context: RoutePresentationContext<DemoRoute>,
        completion: PresentCompletion<DemoRoute>,
    ) {
        println!(
            "present {:?} (animated: {}, metadata: {:?})",
            context.route, context.is_animated, context.metadata
        );
        let handle = PresentationHandle::unique();
        self.handles
            .lock()
            .unwrap()
            .push((context.route, handle));
        completion.finish(handle);
    }

    fn dismiss(
        &self,
        context: RouteDismissalContext<DemoRoute>,
        completion: OperationCompletion<DemoRoute>,
    ) {
        let routes: Vec<_> = context
            .dismissed_routes
            .iter()
            .map(|presented| &presented.route)
            .collect();
        println!("dismiss {routes:?} (closing: {})", context.is_closing);
        completion.finish();
    }

    fn handle_sub_navigation(
        &self,
        context: RouteSubnavigationContext<DemoRoute>,
        completion: OperationCompletion<DemoRoute>,
    ) {
        println!(
            "sub-navigate {:?} -> {:?}",
            context.presented_route.route, context.route
        );
        completion.finish();
    }
}

fn main() {
    env_logger::init();

    let delegate = Arc::new(ConsoleDelegate::default());
    let router = ApplicationRouter::new(&delegate);

    router.present(DemoRoute::Login, false, None);
    router.present(DemoRoute::Main, true, None);
    router.present(
        DemoRoute::Settings(SettingsSection::Root),
        true,
        Some("from-menu"),
    );

    // Settings is topmost and supports sub-navigation: updated in place.
    router.present(DemoRoute::Settings(SettingsSection::Privacy), true, None);

    // The alert layer outranks settings and goes on top.
    router.present(DemoRoute::Alert("update available"), true, None);
    println!("modal stack: {:?}", router.modal_stack());

    // Settings cannot be dismissed from under the alert; the request waits.
    router.dismiss_all(DemoGroup::Settings, true);
    println!(
        "settings still presented: {}",
        router.is_presenting_group(&DemoGroup::Settings)
    );

    // The user swipes the alert away; the router reconciles and the queued
    // settings dismissal resolves.
    let swiped = delegate
        .handle_for(&DemoRoute::Alert("update available"))
        .expect("alert was presented");
    router.report_interactive_dismissal(swiped);

    println!("modal stack: {:?}", router.modal_stack());
}
