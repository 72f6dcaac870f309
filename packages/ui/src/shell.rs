//! Dioxus context for the recipe screen.
//!
//! [`RecipeProvider`] puts a [`Shell`] into context. Components call
//! [`use_shell`] and hand actions to [`Shell::run`], which awaits the action on
//! the Dioxus executor and then copies the shell's state and notices into the
//! screen signals.

use std::future::Future;
use std::ops::Deref;
use std::rc::Rc;

use api::{LocalAuth, MemoryBlobStore};
use dioxus::prelude::*;
use store::FileStore;

use crate::activity_log::{absorb_notices, use_activity_log, ActivityLog};
use crate::app::{AppState, RecipeApp};

/// The backends the desktop build runs on.
pub type LocalRecipeApp = RecipeApp<FileStore, LocalAuth, MemoryBlobStore>;

/// Shared handle to the application shell.
#[derive(Clone)]
pub struct AppHandle(Rc<LocalRecipeApp>);

impl AppHandle {
    pub fn new(app: LocalRecipeApp) -> Self {
        Self(Rc::new(app))
    }
}

impl Deref for AppHandle {
    type Target = LocalRecipeApp;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl PartialEq for AppHandle {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

/// Copyable view of the shell for event handlers.
#[derive(Clone, Copy, PartialEq)]
pub struct Shell {
    app: Signal<AppHandle>,
    pub state: Signal<AppState>,
    pub log: Signal<ActivityLog>,
}

impl Shell {
    pub fn app(&self) -> AppHandle {
        self.app.cloned()
    }

    /// Run `action` in the background, then publish what it changed.
    pub fn run<F, Fut>(self, action: F)
    where
        F: FnOnce(AppHandle) -> Fut + 'static,
        Fut: Future<Output = ()> + 'static,
    {
        let app = self.app();
        spawn(async move {
            action(app.clone()).await;
            self.publish(&app);
        });
    }

    /// Copy the latest state snapshot and pending notices into the signals.
    pub fn publish(self, app: &LocalRecipeApp) {
        let mut state = self.state;
        let mut log = self.log;
        state.set(app.state());
        absorb_notices(&mut log, app.drain_notices());
    }
}

pub fn use_shell() -> Shell {
    use_context::<Shell>()
}

/// Provides the [`Shell`] to `children`, loads the first page, and follows
/// session changes for as long as the provider is mounted.
///
/// Expects a `Signal<ActivityLog>` in context.
#[component]
pub fn RecipeProvider(app: AppHandle, children: Element) -> Element {
    let log = use_activity_log();
    let state = use_signal(|| app.state());
    let handle = use_signal(|| app.clone());
    let shell = use_context_provider(|| Shell {
        app: handle,
        state,
        log,
    });

    use_hook(move || {
        spawn(async move {
            let app = shell.app();
            let _ = app.refresh().await;
            shell.publish(&app);
            app.watch_sessions(|| shell.publish(&app)).await;
        });
    });

    rsx! {
        {children}
    }
}
