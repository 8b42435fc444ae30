use anyhow::{bail, Context, Result};
use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use shopfront::api::{BackendClient, ImageResolver, RequestScope};
use shopfront::catalog::CatalogView;
use shopfront::config::Config;
use shopfront::countdown::{now_ms, CountdownBoard, SharedClock};
use shopfront::events::Event;
use shopfront::location::{Location, MemoryHistory};
use shopfront::preview::{load_preview, LoadState};
use shopfront::state::category_title;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    // Usage: shopfront [config.toml] [/products?category=..&search=..&page=..#section]
    let mut args = std::env::args().skip(1);
    let config_path = args.next().unwrap_or_else(|| "config.toml".to_string());
    let location_arg = args.next().unwrap_or_else(|| "/products".to_string());

    let cfg = if Path::new(&config_path).exists() {
        Config::load(&config_path)?
    } else {
        let mut cfg = Config::default();
        cfg.apply_env();
        cfg
    };

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&cfg.general.log_level));
    tracing_subscriber::fmt().with_env_filter(filter).init();
    info!("Loaded config: {:?}", cfg);

    let shop_id = cfg.storefront.shop_id.clone();
    if shop_id.is_empty() {
        bail!("No shop id: set storefront.shop_id or SHOPFRONT_SHOP_ID");
    }

    let client = BackendClient::new(
        &cfg.backend.base_url,
        Duration::from_secs(cfg.backend.timeout_secs),
    )?;
    let images = ImageResolver::new(&cfg.backend.asset_base(), &cfg.backend.placeholder_image);

    // Fetch the preview; the scope lives as long as this page
    let scope = RequestScope::new();
    let mut state = LoadState::Loading;
    state.apply(load_preview(&client, &scope.handle(), &shop_id).await);

    let preview = match state {
        LoadState::Loaded(preview) => preview,
        LoadState::Failed(message) => {
            eprintln!("{}", message);
            return Ok(());
        }
        LoadState::Loading => return Ok(()),
    };

    let categories = match client.categories().await {
        Ok(categories) => categories,
        Err(e) => {
            warn!("Categories unavailable: {}", e);
            Vec::new()
        }
    };

    println!("{}", preview.shop.name);
    println!("Avatar: {}", images.resolve(preview.shop.avatar.as_deref()));
    if let Some(address) = &preview.shop.address {
        println!("Address: {}", address);
    }
    if let Some(phone) = &preview.shop.phone_number {
        println!("Phone: {}", phone);
    }
    println!(
        "Rating: {:.1}/5 ({} reviews)\n",
        preview.rating.average, preview.rating.review_count
    );

    // Catalog page driven by the location argument
    let location = Location::parse(&location_arg)
        .with_context(|| format!("Invalid location: {}", location_arg))?;
    if let Some(section) = location.section() {
        info!("Jumping to #{}", section.anchor());
    }
    let requested_page = location
        .query_param("page")
        .and_then(|p| p.parse().ok())
        .unwrap_or(1);

    let mut view = CatalogView::new(
        preview.products.clone(),
        cfg.storefront.page_size,
        MemoryHistory::new(location),
    );
    view.set_page(requested_page);

    let page = view.current_page();
    if let Some(category) = &view.selection().category {
        println!("Category: {}", category_title(&categories, category));
    }
    if page.is_no_results() {
        println!("No products found");
    } else {
        println!("Page {}/{} ({} products)", page.page, page.page_count, page.total_count);
        for product in &page.items {
            let price = product
                .discount_price
                .map(|p| format!("${}", p))
                .unwrap_or_else(|| "-".to_string());
            println!(
                "  {:<30} {:>10}  {}",
                product.name,
                price,
                images.resolve(product.primary_image())
            );
        }
    }
    println!();

    // Countdowns for the shop's events, all driven by one clock
    let names: HashMap<String, String> = preview
        .events
        .iter()
        .map(|e| (e.id.clone(), e.name.clone()))
        .collect();

    let mut board = CountdownBoard::new(cfg.storefront.hide_on_expire);
    let now = now_ms();
    for event in &preview.events {
        for update in board.watch(event, now) {
            println!("{}", describe(&update, &names));
        }
    }

    if board.is_empty() {
        println!("No events running");
        return Ok(());
    }

    let (tx, mut rx) = mpsc::channel::<Event>(100);
    let clock = SharedClock::spawn(Duration::from_millis(cfg.storefront.tick_millis));
    let _board_task = board.spawn(clock.subscribe(), tx.clone());

    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            let _ = tx.send(Event::Shutdown).await;
        }
    });

    // Main event loop
    println!("Watching {} events... (Ctrl+C to quit)\n", names.len());
    while let Some(event) = rx.recv().await {
        if event == Event::Shutdown {
            println!("Shutting down...");
            break;
        }
        println!("{}", describe(&event, &names));
    }

    drop(clock);
    Ok(())
}

fn describe(event: &Event, names: &HashMap<String, String>) -> String {
    let name_of = |id: &str| names.get(id).cloned().unwrap_or_else(|| id.to_string());
    match event {
        Event::Countdown { event_id, display } => format!("{}: {}", name_of(event_id), display),
        Event::Expired { event_id } => format!("{} has ended", name_of(event_id)),
        Event::Shutdown => "Shutting down...".to_string(),
    }
}
