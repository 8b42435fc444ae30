use anyhow::{bail, Result};
use std::time::{Duration, Instant};

use shopfront::api::BackendClient;
use shopfront::catalog::{filter_and_paginate, FilterSelection, DEFAULT_PAGE_SIZE};
use shopfront::config::Config;

/// Times each backend endpoint, then the filter pipeline over the result.
#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt::init();

    let mut cfg = Config::default();
    cfg.apply_env();
    let shop_id = cfg.storefront.shop_id.clone();
    if shop_id.is_empty() {
        bail!("Set SHOPFRONT_SHOP_ID");
    }

    let client = BackendClient::new(&cfg.backend.base_url, Duration::from_secs(10))?;
    println!("Backend: {}\n", client.base_url());

    let start = Instant::now();
    let shop = client.shop_info(&shop_id).await?;
    println!("shop info:   {}ms ({})", start.elapsed().as_millis(), shop.name);

    let start = Instant::now();
    let products = client.shop_products(&shop_id).await?;
    println!("products:    {}ms ({} items)", start.elapsed().as_millis(), products.len());

    let start = Instant::now();
    let events = client.shop_events(&shop_id).await?;
    println!("events:      {}ms ({} items)", start.elapsed().as_millis(), events.len());

    let start = Instant::now();
    let categories = client.categories().await?;
    println!("categories:  {}ms ({} items)", start.elapsed().as_millis(), categories.len());

    // Filter timing over every price bucket and a short search
    let selection = FilterSelection {
        prices: (0..5).collect(),
        search: "a".to_string(),
        ..Default::default()
    };
    let mut times: Vec<u128> = Vec::new();
    for _ in 0..100 {
        let start = Instant::now();
        let page = filter_and_paginate(&products, &selection, 1, DEFAULT_PAGE_SIZE);
        times.push(start.elapsed().as_nanos());
        std::hint::black_box(page.total_count);
    }

    times.sort();
    let avg = times.iter().sum::<u128>() / times.len() as u128;
    println!("\n=== FILTER + PAGINATE ({} products, 100 runs) ===", products.len());
    println!("Min:    {}ns", times[0]);
    println!("Median: {}ns", times[times.len() / 2]);
    println!("Avg:    {}ns", avg);
    println!("Max:    {}ns", times[times.len() - 1]);

    Ok(())
}
