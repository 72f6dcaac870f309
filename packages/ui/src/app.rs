//! # Application shell
//!
//! [`RecipeApp`] owns the list state a recipe screen needs and drives the three
//! backend clients through [`RecipeCatalog`]. It renders nothing itself; a
//! front end reads [`RecipeApp::state`] (or [`crate::view::render`]) and calls
//! the action methods.
//!
//! ## Fetch sequencing
//!
//! Every fetch takes a number from a monotonic epoch counter before it awaits the
//! store. When the response comes back it is applied only if no newer fetch has
//! started in the meantime; otherwise it is dropped and the caller gets
//! [`FetchOutcome::Superseded`]. A slow first page can therefore never overwrite
//! the list produced by a later filter change.
//!
//! "Load more" is refused with [`FetchOutcome::Skipped`] while a fresh fetch has
//! not yet replaced the list, since its cursor would come from a list that
//! belongs to the previous filter. A fresh fetch that fails keeps the refusal in
//! place until a later one succeeds.
//!
//! ## Reconciliation
//!
//! Create, update, and delete do not touch the local list. Each is followed by a
//! fresh fetch of the first page.
//!
//! ## Failures
//!
//! Every failed action is recorded as an error notice and returned to the caller.
//! A failed fetch leaves the displayed list as it was.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use api::blob::image_path;
use api::{
    merge_page, ApiError, AuthError, AuthProvider, BlobStore, Category, Recipe, RecipeCatalog,
    RecipeDraft, RecipeQuery, RecipesConfig, Result, SortOrder, UserSession,
};
use store::DocumentStore;
use tokio::sync::watch;
use tracing::{debug, error, info};

use crate::activity_log::{ActivityLog, LogEntry, LogLevel};
use crate::confirm::Confirm;
use crate::view::{render, RecipeListView};

pub const DELETE_PROMPT: &str = "Delete this recipe?";

/// Snapshot of everything the recipe screen shows.
#[derive(Clone, Debug, PartialEq)]
pub struct AppState {
    pub user: Option<UserSession>,
    pub category: Option<Category>,
    pub sort: SortOrder,
    pub page_size: usize,
    pub recipes: Vec<Recipe>,
    pub loading: bool,
    /// Recipe loaded into the edit form
    pub current_recipe: Option<Recipe>,
    /// Percent of the image upload in progress
    pub upload_progress: Option<u8>,
}

impl AppState {
    pub fn new(page_size: usize) -> Self {
        Self {
            user: None,
            category: None,
            sort: SortOrder::default(),
            page_size,
            recipes: Vec::new(),
            loading: false,
            current_recipe: None,
            upload_progress: None,
        }
    }
}

/// What happened to a fetch.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FetchOutcome {
    /// The page was merged into the list
    Applied { count: usize },
    /// A newer fetch started first; this response was dropped
    Superseded,
    /// Nothing to do, e.g. "load more" on an empty list
    Skipped,
}

pub struct RecipeApp<S: DocumentStore, A: AuthProvider, B: BlobStore> {
    catalog: RecipeCatalog<S>,
    auth: A,
    blobs: B,
    config: RecipesConfig,
    state: Mutex<AppState>,
    epoch: AtomicU64,
    /// Epoch of the fresh fetch whose page has not replaced the list yet; 0 if none
    pending_fresh: AtomicU64,
    sessions: tokio::sync::Mutex<watch::Receiver<Option<UserSession>>>,
    log: Mutex<ActivityLog>,
}

impl<S: DocumentStore, A: AuthProvider, B: BlobStore> RecipeApp<S, A, B> {
    pub fn new(store: S, auth: A, blobs: B, config: RecipesConfig) -> Self {
        let mut sessions = auth.sessions().watch();
        let user = sessions.borrow_and_update().clone();
        let mut state = AppState::new(config.catalog.default_page_size);
        state.user = user;

        Self {
            catalog: RecipeCatalog::new(store, config.catalog.collection.clone()),
            auth,
            blobs,
            config,
            state: Mutex::new(state),
            epoch: AtomicU64::new(0),
            pending_fresh: AtomicU64::new(0),
            sessions: tokio::sync::Mutex::new(sessions),
            log: Mutex::new(ActivityLog::default()),
        }
    }

    pub fn catalog(&self) -> &RecipeCatalog<S> {
        &self.catalog
    }

    pub fn auth(&self) -> &A {
        &self.auth
    }

    pub fn blobs(&self) -> &B {
        &self.blobs
    }

    pub fn config(&self) -> &RecipesConfig {
        &self.config
    }

    pub fn state(&self) -> AppState {
        self.lock_state().clone()
    }

    pub fn view(&self) -> RecipeListView {
        render(&self.lock_state())
    }

    /// Take the pending notices, oldest first.
    pub fn drain_notices(&self) -> Vec<LogEntry> {
        self.lock_log().drain()
    }

    fn lock_state(&self) -> MutexGuard<'_, AppState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn lock_log(&self) -> MutexGuard<'_, ActivityLog> {
        self.log.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn notify(&self, level: LogLevel, message: &str) {
        self.lock_log().log(level, message);
    }

    /// Record a failure as an error notice and hand it back.
    fn fail<T>(&self, action: &str, err: impl Into<ApiError>) -> Result<T> {
        let err = err.into();
        error!(action, error = %err, "action failed");
        self.notify(LogLevel::Error, &err.to_string());
        Err(err)
    }

    /// Fetch the first page, replacing the list.
    pub async fn refresh(&self) -> Result<FetchOutcome> {
        self.fetch(false).await
    }

    /// Fetch the page after the last displayed recipe and append it.
    pub async fn load_more(&self) -> Result<FetchOutcome> {
        self.fetch(true).await
    }

    async fn fetch(&self, continued: bool) -> Result<FetchOutcome> {
        let (query, epoch) = {
            let mut state = self.lock_state();
            let mut query = RecipeQuery::for_viewer(state.user.as_ref(), state.page_size)
                .category(state.category)
                .sort(state.sort);
            if continued {
                let pending = self.pending_fresh.load(Ordering::SeqCst);
                if pending != 0 {
                    debug!(pending, "list is about to be replaced; not loading more");
                    return Ok(FetchOutcome::Skipped);
                }
                match state.recipes.last() {
                    Some(last) => query = query.after(last.id.clone()),
                    None => return Ok(FetchOutcome::Skipped),
                }
            }
            state.loading = true;
            let epoch = self.epoch.fetch_add(1, Ordering::SeqCst) + 1;
            if !continued {
                self.pending_fresh.store(epoch, Ordering::SeqCst);
            }
            (query, epoch)
        };

        let result = self.catalog.fetch(&query).await;

        let mut state = self.lock_state();
        let latest = self.epoch.load(Ordering::SeqCst);
        if latest != epoch {
            debug!(epoch, latest, "discarding stale recipe page");
            return Ok(FetchOutcome::Superseded);
        }
        state.loading = false;

        match result {
            Ok(page) => {
                if !continued {
                    self.pending_fresh.store(0, Ordering::SeqCst);
                }
                let count = page.len();
                let existing = std::mem::take(&mut state.recipes);
                state.recipes = merge_page(existing, page, continued);
                debug!(count, total = state.recipes.len(), continued, "applied recipe page");
                Ok(FetchOutcome::Applied { count })
            }
            Err(err) => {
                drop(state);
                self.fail("fetch", err)
            }
        }
    }

    pub async fn set_category(&self, category: Option<Category>) -> Result<FetchOutcome> {
        self.lock_state().category = category;
        self.refresh().await
    }

    pub async fn set_sort(&self, sort: SortOrder) -> Result<FetchOutcome> {
        self.lock_state().sort = sort;
        self.refresh().await
    }

    /// Only sizes listed in the catalog config are accepted.
    pub async fn set_page_size(&self, page_size: usize) -> Result<FetchOutcome> {
        if !self.config.is_allowed_page_size(page_size) {
            return self.fail("set_page_size", ApiError::InvalidPageSize(page_size));
        }
        self.lock_state().page_size = page_size;
        self.refresh().await
    }

    /// Adopt a session value and refetch if it differs from the current one.
    pub async fn apply_session(&self, session: Option<UserSession>) -> Result<FetchOutcome> {
        {
            let mut state = self.lock_state();
            if state.user == session {
                return Ok(FetchOutcome::Skipped);
            }
            state.user = session;
            state.current_recipe = None;
        }
        self.refresh().await
    }

    /// Apply a session change that was published since the last call, if any.
    pub async fn sync_session(&self) -> Result<FetchOutcome> {
        let session = {
            let mut rx = self.sessions.lock().await;
            if !matches!(rx.has_changed(), Ok(true)) {
                return Ok(FetchOutcome::Skipped);
            }
            let session = rx.borrow_and_update().clone();
            session
        };
        self.apply_session(session).await
    }

    /// Follow session changes until the provider goes away, calling `on_change`
    /// after each one has been applied.
    ///
    /// The loop only waits on a clone of the shell's receiver and hands every
    /// change to [`RecipeApp::sync_session`], so the shell's own receiver stays
    /// the single source of session values and is never locked while waiting.
    pub async fn watch_sessions(&self, mut on_change: impl FnMut()) {
        let mut wakeups = self.sessions.lock().await.clone();
        while wakeups.changed().await.is_ok() {
            // Failures are already recorded as notices.
            let _ = self.sync_session().await;
            on_change();
        }
        debug!("session watch ended");
    }

    pub async fn sign_in(&self, email: &str, password: &str) -> Result<UserSession> {
        match self.auth.login(email, password).await {
            Ok(session) => {
                self.apply_session(Some(session.clone())).await?;
                Ok(session)
            }
            Err(err) => self.fail("sign_in", err),
        }
    }

    pub async fn register(&self, email: &str, password: &str) -> Result<UserSession> {
        match self.auth.register(email, password).await {
            Ok(session) => {
                self.apply_session(Some(session.clone())).await?;
                Ok(session)
            }
            Err(err) => self.fail("register", err),
        }
    }

    pub async fn sign_in_federated(&self) -> Result<UserSession> {
        match self.auth.login_federated().await {
            Ok(session) => {
                self.apply_session(Some(session.clone())).await?;
                Ok(session)
            }
            Err(err) => self.fail("sign_in_federated", err),
        }
    }

    pub async fn sign_out(&self) -> Result<()> {
        if let Err(err) = self.auth.logout().await {
            return self.fail("sign_out", err);
        }
        self.apply_session(None).await?;
        Ok(())
    }

    pub async fn send_password_reset(&self, email: &str) -> Result<()> {
        if email.trim().is_empty() {
            self.notify(LogLevel::Error, "Missing username!");
            return Err(AuthError::InvalidEmail.into());
        }
        match self.auth.request_password_reset(email).await {
            Ok(()) => {
                self.notify(LogLevel::Success, "Sent the password reset email");
                Ok(())
            }
            Err(err) => self.fail("send_password_reset", err),
        }
    }

    pub async fn add_recipe(&self, draft: &RecipeDraft) -> Result<String> {
        let id = match self.catalog.create(draft).await {
            Ok(id) => id,
            Err(err) => return self.fail("add_recipe", err),
        };
        info!(%id, "created recipe");
        self.notify(
            LogLevel::Success,
            &format!("Successfully created a recipe with ID = {id}"),
        );
        self.lock_state().current_recipe = None;
        self.refresh().await?;
        Ok(id)
    }

    pub async fn update_recipe(&self, id: &str, draft: &RecipeDraft) -> Result<()> {
        if let Err(err) = self.catalog.update(id, draft).await {
            return self.fail("update_recipe", err);
        }
        info!(%id, "updated recipe");
        self.notify(
            LogLevel::Success,
            &format!("Updated a recipe with ID = {id}"),
        );
        self.lock_state().current_recipe = None;
        self.refresh().await?;
        Ok(())
    }

    /// Delete after the user agrees. Returns `false` when they decline.
    pub async fn delete_recipe(&self, id: &str, confirm: &impl Confirm) -> Result<bool> {
        if !confirm.confirm(DELETE_PROMPT) {
            debug!(%id, "delete declined");
            return Ok(false);
        }
        if let Err(err) = self.catalog.delete(id).await {
            return self.fail("delete_recipe", err);
        }
        info!(%id, "deleted recipe");
        self.notify(
            LogLevel::Success,
            &format!("Deleted a recipe with ID = {id}"),
        );
        self.lock_state().current_recipe = None;
        self.refresh().await?;
        Ok(true)
    }

    /// Load a displayed recipe into the edit form.
    pub fn edit_recipe(&self, id: &str) -> Option<Recipe> {
        let mut state = self.lock_state();
        let recipe = state.recipes.iter().find(|r| r.id == id).cloned();
        state.current_recipe = recipe.clone();
        recipe
    }

    pub fn cancel_edit(&self) {
        self.lock_state().current_recipe = None;
    }

    /// Upload an image under the configured directory and return its download URL.
    pub async fn upload_image(&self, file_name: &str, bytes: &[u8]) -> Result<String> {
        let path = image_path(&self.config.storage.image_dir, file_name);
        self.lock_state().upload_progress = Some(0);

        let result = self
            .blobs
            .upload(bytes, &path, |percent| {
                self.lock_state().upload_progress = Some(percent);
            })
            .await;

        match result {
            Ok(url) => {
                info!(%path, "uploaded image");
                self.notify(LogLevel::Info, "Image uploaded");
                Ok(url)
            }
            Err(err) => {
                self.lock_state().upload_progress = None;
                self.fail("upload_image", err)
            }
        }
    }

    pub async fn remove_image(&self, download_url: &str) -> Result<()> {
        if let Err(err) = self.blobs.delete(download_url).await {
            return self.fail("remove_image", err);
        }
        self.lock_state().upload_progress = None;
        self.notify(LogLevel::Info, "Image removed");
        Ok(())
    }
}
