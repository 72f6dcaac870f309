//! Desktop entry point.
//!
//! Opens the recipe documents under the platform data directory (or
//! `RECIPES__RUNTIME__DATA_DIR`), seeds a few demo recipes on first run, and
//! launches the recipe screen.

use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use anyhow::{anyhow, Context, Result};
use api::{AuthProvider, Category, LocalAuth, MemoryBlobStore, RecipeDraft, Settings};
use chrono::{Duration, Utc};
use dioxus::prelude::*;
use store::{DocumentStore, FileStore, QueryDescriptor, RecipesConfig};
use tracing::{info, warn};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use ui::{AppHandle, LocalRecipeApp, LogLevel, RecipeApp};

const DEMO_EMAIL: &str = "demo@example.com";
const DEMO_PASSWORD: &str = "demo-password";
const PLACEHOLDER_IMAGE: &[u8] = b"\x89PNG\r\n\x1a\n";

/// Set once in `main` before the window opens.
static BACKENDS: OnceLock<Backends> = OnceLock::new();

/// Backend clients shared by the seeding pass and the window.
#[derive(Clone, Debug)]
struct Backends {
    store: FileStore,
    auth: LocalAuth,
    blobs: MemoryBlobStore,
    config: RecipesConfig,
}

impl Backends {
    fn app(&self) -> LocalRecipeApp {
        RecipeApp::new(
            self.store.clone(),
            self.auth.clone(),
            self.blobs.clone(),
            self.config.clone(),
        )
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false))
        .init();
}

fn data_dir(settings: &Settings) -> PathBuf {
    settings.runtime.data_dir.clone().unwrap_or_else(|| {
        dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("recipes")
    })
}

/// Leave an editable copy of the effective config next to the data.
fn write_default_config(dir: &Path, config: &RecipesConfig) -> Result<()> {
    let path = dir.join(RecipesConfig::filename());
    if path.exists() {
        return Ok(());
    }
    let toml = config.to_toml().context("Failed to serialize config")?;
    std::fs::write(&path, toml)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    info!(path = %path.display(), "wrote default config");
    Ok(())
}

fn demo_recipes() -> Vec<(&'static str, Category, bool)> {
    vec![
        ("Focaccia", Category::BreadsSandwichesAndPizza, true),
        ("Shakshuka", Category::EggsAndBreakfast, true),
        ("Lemon Tart", Category::DessertsAndBakedGoods, true),
        ("Grilled Mackerel", Category::FishAndSeafood, true),
        ("Roast Squash", Category::Vegetables, false),
        ("Banana Bread", Category::DessertsAndBakedGoods, true),
    ]
}

async fn seed(app: &LocalRecipeApp) -> Result<()> {
    let existing = app
        .catalog()
        .store()
        .read_many(app.catalog().collection(), &QueryDescriptor::new().limit(1))
        .await?;
    if !existing.is_empty() {
        return Ok(());
    }

    app.register(DEMO_EMAIL, DEMO_PASSWORD).await?;
    let now = Utc::now();
    for (age, (name, category, published)) in demo_recipes().into_iter().enumerate() {
        let file_name = format!("{}.png", name.to_lowercase().replace(' ', "-"));
        let image_url = app.upload_image(&file_name, PLACEHOLDER_IMAGE).await?;
        let draft = RecipeDraft {
            name: name.to_string(),
            category,
            directions: format!("Prepare the {} and serve.", name.to_lowercase()),
            ingredients: vec!["salt".to_string(), "olive oil".to_string()],
            publish_date: now - Duration::days(age as i64),
            is_published: published,
            image_url: Some(image_url),
        };
        app.add_recipe(&draft).await?;
    }
    app.sign_out().await?;
    info!(count = demo_recipes().len(), "seeded demo recipes");
    Ok(())
}

fn flush_notices(app: &LocalRecipeApp) {
    for notice in app.drain_notices() {
        match notice.level {
            LogLevel::Error => warn!(at = %notice.timestamp, "{}", notice.message),
            _ => info!(at = %notice.timestamp, "{}", notice.message),
        }
    }
}

fn main() -> Result<()> {
    let settings = Settings::new().context("Failed to load settings")?;
    init_tracing();

    let dir = data_dir(&settings);
    std::fs::create_dir_all(&dir)
        .with_context(|| format!("Failed to create {}", dir.display()))?;
    let config = settings.recipes_config();
    write_default_config(&dir, &config)?;

    let auth = LocalAuth::new();
    let _session_log = auth.sessions().subscribe(|session| match session {
        Some(user) => info!(email = %user.email, "session started"),
        None => info!("no active session"),
    });

    let blobs = MemoryBlobStore::new(
        settings.runtime.storage_base_url.clone(),
        config.storage.bucket.clone(),
    );
    let backends = Backends {
        store: FileStore::new(dir.join("documents")),
        auth,
        blobs,
        config,
    };

    // Seed on a short-lived runtime; the window brings its own.
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Failed to start runtime")?
        .block_on(async {
            let app = backends.app();
            seed(&app).await?;
            flush_notices(&app);
            Ok::<_, anyhow::Error>(())
        })
        .context("Failed to seed demo recipes")?;

    BACKENDS
        .set(backends)
        .map_err(|_| anyhow!("backends were already set"))?;
    dioxus::launch(App);
    Ok(())
}

#[component]
fn App() -> Element {
    use_context_provider(|| Signal::new(ui::ActivityLog::default()));
    let app = use_hook(|| BACKENDS.get().map(|backends| AppHandle::new(backends.app())));

    match app {
        Some(app) => rsx! {
            ui::RecipeProvider {
                app,
                ui::RecipeScreen {}
            }
        },
        None => rsx! {
            p { class: "p-8 text-red-600", "Recipe storage is not set up." }
        },
    }
}
