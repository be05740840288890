use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use color_eyre::eyre::{Result, eyre};
use tokio::sync::mpsc;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use forkful::application::{ImageSlot, RecipeList, RecipeListState};
use forkful::infrastructure::{
    AppConfig, CliArgs, DiskImageStore, HttpByteFetcher, ImageCache, ImageLoader, LoaderConfig,
    MemoryImageStore, RecipeClient,
};

fn init_logging(config: &AppConfig) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.log_level.to_string()));

    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_thread_ids(false);

    tracing_subscriber::registry()
        .with(filter)
        .with(stderr_layer)
        .init();

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let args = CliArgs::parse();
    let mut config = AppConfig::load(args.config.as_deref())?;
    config.merge_with_args(&args);

    init_logging(&config)?;
    info!(version = forkful::VERSION, "starting forkful");

    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(config.timeout_secs))
        .build()?;

    let mut list = RecipeList::new(Arc::new(RecipeClient::new(
        client.clone(),
        config.recipes_url.clone(),
    )));
    list.refresh().await;

    let recipes = match list.state() {
        RecipeListState::Loaded(recipes) => recipes.clone(),
        RecipeListState::Failed(message) => {
            return Err(eyre!("could not load recipes: {message}"));
        }
        _ => return Err(eyre!("recipe list did not settle")),
    };

    println!("{} recipes:", recipes.len());
    for recipe in &recipes {
        println!("  {} ({})", recipe.name, recipe.cuisine);
    }

    let disk = Arc::new(DiskImageStore::new(config.effective_cache_dir()).await?);
    let memory = Arc::new(MemoryImageStore::new(config.memory_capacity));
    let cache = Arc::new(ImageCache::new(memory, disk));

    let (event_tx, mut event_rx) = mpsc::unbounded_channel();
    let loader = ImageLoader::new(
        cache.clone(),
        Arc::new(HttpByteFetcher::with_client(client)),
        &LoaderConfig {
            max_concurrent_downloads: config.max_concurrent_downloads,
        },
        &event_tx,
    );

    // One slot per distinct thumbnail; recipes sharing a URL share a slot.
    let mut slots: HashMap<_, (String, ImageSlot)> = HashMap::new();
    for recipe in &recipes {
        if let Some(url) = recipe.thumbnail_url() {
            let slot = ImageSlot::new(url);
            slots
                .entry(slot.key().clone())
                .or_insert_with(|| (recipe.name.clone(), slot));
        }
    }
    for (_, slot) in slots.values_mut() {
        if let Some((key, url)) = slot.start() {
            loader.request(key, url);
        }
    }

    println!("fetching {} thumbnails...", slots.len());
    let mut remaining = slots.len();
    while remaining > 0 {
        let Ok(Some(event)) =
            tokio::time::timeout(Duration::from_secs(config.timeout_secs * 2), event_rx.recv())
                .await
        else {
            warn!(remaining, "timed out waiting for image loads");
            break;
        };

        if let Some((name, slot)) = slots.get_mut(&event.key) {
            slot.apply(&event.key, &event.result);
            match &event.result {
                Ok(loaded) => println!(
                    "  {name}: {}x{} ({})",
                    loaded.image.width(),
                    loaded.image.height(),
                    loaded.source
                ),
                Err(message) => println!("  {name}: failed ({message})"),
            }
            remaining -= 1;
        }
    }

    info!(stats = %cache.memory().stats(), "image cache");
    Ok(())
}
