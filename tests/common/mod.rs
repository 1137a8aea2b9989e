//! Test utilities for router integration tests.
//!
//! Provides a fixture route taxonomy and a recording mock delegate with
//! immediate and deferred completion modes.

#![allow(dead_code)]

use application_router::{
    AppRoute, OperationCompletion, PresentCompletion, PresentationHandle, RouteDismissalContext,
    RouteGroup, RoutePresentationContext, RouteSubnavigationContext, RouterDelegate,
};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

/// Initialize logging once per test binary. Safe to call from every test.
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

// ============================================================================
// Fixture routes
// ============================================================================

/// Route groups used by the tests: a non-modal primary layer at level 0,
/// exclusive modal layers at level 1, a non-exclusive modal wizard at
/// level 1, and an alert layer above everything.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TestGroup {
    Primary,
    Picker,
    Account,
    Settings,
    Wizard,
    Alert,
}

impl RouteGroup for TestGroup {
    fn modal_level(&self) -> i32 {
        match self {
            TestGroup::Primary => 0,
            TestGroup::Picker | TestGroup::Account | TestGroup::Settings | TestGroup::Wizard => 1,
            TestGroup::Alert => 2,
        }
    }

    fn is_modal(&self) -> bool {
        !matches!(self, TestGroup::Primary)
    }
}

/// Sections reachable inside the settings group via sub-navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingsSection {
    Root,
    Appearance,
    Privacy,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TestRoute {
    /// Primary horizontal navigation, non-exclusive.
    Welcome,
    Login,
    Main,
    /// Exclusive modal layers.
    Picker,
    Account,
    /// Exclusive modal layer supporting sub-navigation.
    Settings(SettingsSection),
    /// Non-exclusive modal wizard steps.
    WizardStep(u8),
    /// Non-exclusive alerts on the topmost layer.
    Alert(u32),
}

impl AppRoute for TestRoute {
    type Group = TestGroup;
    type Metadata = &'static str;

    fn group(&self) -> TestGroup {
        match self {
            TestRoute::Welcome | TestRoute::Login | TestRoute::Main => TestGroup::Primary,
            TestRoute::Picker => TestGroup::Picker,
            TestRoute::Account => TestGroup::Account,
            TestRoute::Settings(_) => TestGroup::Settings,
            TestRoute::WizardStep(_) => TestGroup::Wizard,
            TestRoute::Alert(_) => TestGroup::Alert,
        }
    }

    fn is_exclusive(&self) -> bool {
        matches!(
            self,
            TestRoute::Picker | TestRoute::Account | TestRoute::Settings(_)
        )
    }

    fn supports_sub_navigation(&self) -> bool {
        matches!(self, TestRoute::Settings(_))
    }
}

// ============================================================================
// Recording mock delegate
// ============================================================================

/// One recorded delegate callback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DelegateCall {
    Present {
        route: TestRoute,
        animated: bool,
        metadata: Option<&'static str>,
    },
    Dismiss {
        routes: Vec<TestRoute>,
        is_closing: bool,
        animated: bool,
    },
    SubNavigation {
        from: TestRoute,
        to: TestRoute,
        animated: bool,
    },
}

enum HeldCompletion {
    Present(TestRoute, PresentCompletion<TestRoute>),
    Operation(OperationCompletion<TestRoute>),
}

/// Delegate that records every callback.
///
/// In immediate mode (the default) every effect completes synchronously.
/// In deferred mode completions are held until the test releases them with
/// [`release_next`](Self::release_next), modeling animated transitions that
/// finish later.
pub struct MockDelegate {
    calls: Mutex<Vec<DelegateCall>>,
    defer_completions: AtomicBool,
    held: Mutex<Vec<HeldCompletion>>,
    deny_present: Mutex<Vec<TestRoute>>,
    deny_dismiss: AtomicBool,
    issued: Mutex<Vec<(TestRoute, PresentationHandle)>>,
}

impl MockDelegate {
    /// Delegate completing every effect synchronously.
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            calls: Mutex::new(Vec::new()),
            defer_completions: AtomicBool::new(false),
            held: Mutex::new(Vec::new()),
            deny_present: Mutex::new(Vec::new()),
            deny_dismiss: AtomicBool::new(false),
            issued: Mutex::new(Vec::new()),
        })
    }

    /// Delegate holding every completion until released.
    pub fn deferring() -> Arc<Self> {
        let delegate = Self::new();
        delegate.defer_completions.store(true, Ordering::SeqCst);
        delegate
    }

    /// All recorded callbacks, in invocation order.
    pub fn calls(&self) -> Vec<DelegateCall> {
        self.calls.lock().unwrap().clone()
    }

    /// Routes given to the present effect, in invocation order.
    pub fn presented(&self) -> Vec<TestRoute> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                DelegateCall::Present { route, .. } => Some(route),
                _ => None,
            })
            .collect()
    }

    /// Dismissal contexts given to the dismiss effect, in invocation order.
    pub fn dismissed(&self) -> Vec<(Vec<TestRoute>, bool)> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                DelegateCall::Dismiss {
                    routes, is_closing, ..
                } => Some((routes, is_closing)),
                _ => None,
            })
            .collect()
    }

    /// The handle issued for the most recent presentation of `route`.
    pub fn handle_for(&self, route: &TestRoute) -> Option<PresentationHandle> {
        self.issued
            .lock()
            .unwrap()
            .iter()
            .rev()
            .find(|(presented, _)| presented == route)
            .map(|(_, handle)| *handle)
    }

    /// Veto any future presentation of `route`.
    pub fn deny_present(&self, route: TestRoute) {
        self.deny_present.lock().unwrap().push(route);
    }

    /// Veto all future dismissals.
    pub fn deny_dismiss(&self) {
        self.deny_dismiss.store(true, Ordering::SeqCst);
    }

    /// Number of completions currently held in deferred mode.
    pub fn held_count(&self) -> usize {
        self.held.lock().unwrap().len()
    }

    /// Finish the oldest held completion. Returns `false` when none is held.
    pub fn release_next(&self) -> bool {
        let next = {
            let mut held = self.held.lock().unwrap();
            if held.is_empty() {
                return false;
            }
            held.remove(0)
        };

        match next {
            HeldCompletion::Present(route, completion) => {
                let handle = PresentationHandle::unique();
                self.issued.lock().unwrap().push((route, handle));
                completion.finish(handle);
            }
            HeldCompletion::Operation(completion) => completion.finish(),
        }
        true
    }

    /// Finish every held completion, including ones created while draining.
    pub fn release_all(&self) {
        while self.release_next() {}
    }
}

impl RouterDelegate<TestRoute> for MockDelegate {
    fn present(
        &self,
        context: RoutePresentationContext<TestRoute>,
        completion: PresentCompletion<TestRoute>,
    ) {
        self.calls.lock().unwrap().push(DelegateCall::Present {
            route: context.route.clone(),
            animated: context.is_animated,
            metadata: context.metadata,
        });

        if self.defer_completions.load(Ordering::SeqCst) {
            self.held
                .lock()
                .unwrap()
                .push(HeldCompletion::Present(context.route, completion));
        } else {
            let handle = PresentationHandle::unique();
            self.issued.lock().unwrap().push((context.route, handle));
            completion.finish(handle);
        }
    }

    fn dismiss(
        &self,
        context: RouteDismissalContext<TestRoute>,
        completion: OperationCompletion<TestRoute>,
    ) {
        self.calls.lock().unwrap().push(DelegateCall::Dismiss {
            routes: context
                .dismissed_routes
                .iter()
                .map(|presented| presented.route.clone())
                .collect(),
            is_closing: context.is_closing,
            animated: context.is_animated,
        });

        if self.defer_completions.load(Ordering::SeqCst) {
            self.held
                .lock()
                .unwrap()
                .push(HeldCompletion::Operation(completion));
        } else {
            completion.finish();
        }
    }

    fn should_present(&self, route: &TestRoute) -> bool {
        !self.deny_present.lock().unwrap().contains(route)
    }

    fn should_dismiss(&self, _context: &RouteDismissalContext<TestRoute>) -> bool {
        !self.deny_dismiss.load(Ordering::SeqCst)
    }

    fn handle_sub_navigation(
        &self,
        context: RouteSubnavigationContext<TestRoute>,
        completion: OperationCompletion<TestRoute>,
    ) {
        self.calls.lock().unwrap().push(DelegateCall::SubNavigation {
            from: context.presented_route.route.clone(),
            to: context.route.clone(),
            animated: context.is_animated,
        });

        if self.defer_completions.load(Ordering::SeqCst) {
            self.held
                .lock()
                .unwrap()
                .push(HeldCompletion::Operation(completion));
        } else {
            completion.finish();
        }
    }
}
