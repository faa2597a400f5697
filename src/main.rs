//! Coinlens - terminal cryptocurrency market dashboard.

use std::io::{self, BufRead, Write};
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use coinlens_chart::{spawn_history_fetch, ChartController, TextBackend};
use coinlens_core::{Period, TimestampUnit};
use coinlens_data::fmt::{format_currency, format_percentage};
use coinlens_data::records::{estimated_total_pages, has_more_pages};
use coinlens_data::{CoinGeckoClient, LiveEvent, LiveFeed};

const COIN_ID: &str = "bitcoin";
const CHART_HEIGHT: u32 = 360;
const INITIAL_WIDTH: u32 = 800;
const PER_PAGE: u32 = 10;
const LIVE_POLL: Duration = Duration::from_secs(30);

#[tokio::main]
async fn main() {
    env_logger::init();
    if let Err(e) = run().await {
        eprintln!("Error: {e}");
    }
}

async fn run() -> Result<()> {
    let client = Arc::new(CoinGeckoClient::new());

    // Coin overview: detail record and initial daily candles, fetched together.
    let (detail, initial) = tokio::join!(client.coin(COIN_ID), client.ohlc(COIN_ID, Period::Daily));

    match detail {
        Ok(coin) => {
            println!(
                "{} / {}  {}",
                coin.name,
                coin.symbol.to_uppercase(),
                format_currency(coin.market_data.current_price.usd)
            );
        }
        Err(e) => {
            log::error!("coin overview unavailable: {e}");
            println!("{COIN_ID} (details unavailable)");
        }
    }

    let initial = match initial {
        Ok(raw) => raw,
        Err(e) => {
            log::error!("initial candle data unavailable: {e}");
            Vec::new()
        }
    };

    let mut controller = ChartController::new(
        COIN_ID,
        Period::Daily,
        CHART_HEIGHT,
        Box::new(TextBackend::new()),
    );
    controller.mount(&initial, TimestampUnit::Milliseconds, INITIAL_WIDTH);

    print_help();

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    loop {
        print!("> ");
        io::stdout().flush()?;
        let Some(line) = lines.next() else { break };
        let line = line?;
        let mut parts = line.split_whitespace();
        let command = parts.next().unwrap_or("");

        match command {
            "q" | "quit" => break,
            "" => {}
            "w" => {
                let width: u32 = parts.next().and_then(|w| w.parse().ok()).unwrap_or(0);
                if width == 0 {
                    println!("usage: w <pixels>");
                } else {
                    controller.on_resize(width);
                }
            }
            "live" => {
                run_live_session(&client, &mut controller).await;
            }
            "coins" => {
                let page: u32 = parts.next().and_then(|p| p.parse().ok()).unwrap_or(1);
                print_markets(&client, page).await;
            }
            "cats" => {
                print_categories(&client).await;
            }
            other => match other.parse::<Period>() {
                Ok(period) => {
                    if let Some(requested) = controller.request_period_change(period) {
                        let fetch = spawn_history_fetch(
                            client.clone(),
                            COIN_ID.to_string(),
                            requested,
                            controller.event_sender(),
                        );
                        let _ = fetch.await;
                    }
                }
                Err(_) => print_help(),
            },
        }

        controller.update();
    }

    controller.unmount();
    Ok(())
}

/// Forward a few live ticks into the chart, then stop polling.
async fn run_live_session(client: &Arc<CoinGeckoClient>, controller: &mut ChartController) {
    println!("live: polling every {}s, 3 ticks (ctrl-c to abort)", LIVE_POLL.as_secs());
    let (mut feed, mut events) = LiveFeed::subscribe(client.clone(), COIN_ID, LIVE_POLL);
    let mut ticks = 0;
    while ticks < 3 {
        match tokio::time::timeout(LIVE_POLL + Duration::from_secs(10), events.recv()).await {
            Ok(Some(LiveEvent::Tick(candle))) => {
                controller.on_live_tick(candle);
                ticks += 1;
            }
            Ok(Some(LiveEvent::Connected)) => {}
            Ok(Some(LiveEvent::Error(e))) => log::warn!("live poll failed: {e}"),
            Ok(Some(LiveEvent::Disconnected)) | Ok(None) | Err(_) => break,
        }
    }
    feed.unsubscribe();
}

async fn print_markets(client: &Arc<CoinGeckoClient>, page: u32) {
    match client.markets(page, PER_PAGE).await {
        Ok(coins) => {
            println!(
                "{:<5} {:<24} {:>14} {:>10} {:>20}",
                "Rank", "Token", "Price", "24h", "Market Cap"
            );
            for coin in &coins {
                let rank = coin
                    .market_cap_rank
                    .map(|r| format!("#{r}"))
                    .unwrap_or_else(|| "-".to_string());
                let change = coin
                    .price_change_percentage_24h
                    .map(|c| {
                        if c > 0.0 {
                            format!("+{}", format_percentage(c))
                        } else {
                            format_percentage(c)
                        }
                    })
                    .unwrap_or_else(|| "-".to_string());
                println!(
                    "{:<5} {:<24} {:>14} {:>10} {:>20}",
                    rank,
                    format!("{} ({})", coin.name, coin.symbol.to_uppercase()),
                    format_currency(coin.current_price),
                    change,
                    format_currency(coin.market_cap),
                );
            }
            println!(
                "page {page} of ~{} (estimate){}",
                estimated_total_pages(page),
                if has_more_pages(coins.len(), PER_PAGE) {
                    ""
                } else {
                    " - last page"
                }
            );
        }
        Err(e) => {
            // Keep the dashboard alive; the table just shows nothing this time.
            log::error!("markets fetch failed: {e}");
            println!("coins unavailable, try again");
        }
    }
}

async fn print_categories(client: &Arc<CoinGeckoClient>) {
    match client.categories().await {
        Ok(categories) => {
            println!(
                "{:<32} {:>10} {:>20} {:>20}",
                "Category", "24h", "Market Cap", "24h Volume"
            );
            for category in categories.iter().take(10) {
                let change = category
                    .market_cap_change_24h
                    .map(format_percentage)
                    .unwrap_or_else(|| "-".to_string());
                let cap = category
                    .market_cap
                    .map(format_currency)
                    .unwrap_or_else(|| "-".to_string());
                let volume = category
                    .volume_24h
                    .map(format_currency)
                    .unwrap_or_else(|| "-".to_string());
                println!("{:<32} {:>10} {:>20} {:>20}", category.name, change, cap, volume);
            }
        }
        Err(e) => {
            log::error!("categories fetch failed: {e}");
            println!("categories unavailable, try again");
        }
    }
}

fn print_help() {
    let periods: Vec<_> = Period::all().iter().map(|p| p.label()).collect();
    println!("commands: {} | w <px> | live | coins [page] | cats | q", periods.join("/"));
}
