//! Application shell and Dioxus components for the recipe screen.
//!
//! [`RecipeApp`] holds the list state and runs every user action against the
//! backend clients from the `api` crate. [`view::render`] turns a state snapshot
//! into the data a front end draws, and the components below draw it.
//! User-facing notices go through [`ActivityLog`].

pub mod activity_log;
pub use activity_log::{absorb_notices, log_activity, use_activity_log, ActivityLog, LogEntry, LogLevel};

mod activity_log_panel;
pub use activity_log_panel::{ActivityLogPanel, ActivityLogToggle};

mod app;
pub use app::{AppState, FetchOutcome, RecipeApp, DELETE_PROMPT};

mod confirm;
pub use confirm::Confirm;

mod login_form;
pub use login_form::LoginForm;

mod recipe_form;
pub use recipe_form::RecipeEditor;

mod recipe_list;
pub use recipe_list::RecipeList;

mod screen;
pub use screen::RecipeScreen;

mod shell;
pub use shell::{use_shell, AppHandle, LocalRecipeApp, RecipeProvider, Shell};

pub mod view;
pub use view::{render, RecipeCard, RecipeListView};
