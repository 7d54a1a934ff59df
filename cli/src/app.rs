use anyhow::Context;
use clap::{Parser, Subcommand};
use rust_decimal::Decimal;
use spot_price::{valuation::*, SpotPrice, SpotPriceApp};

use std::path::PathBuf;

use super::config::*;

#[derive(Parser)]
#[clap(version, long_about = None)]
struct Cli {
    /// Sets a custom config file
    #[clap(short, long, env = "GOLDSPOT_CONFIG", value_name = "FILE")]
    config: Option<PathBuf>,

    /// Metalprice api key
    #[clap(long, env = "METALPRICE_API_KEY", default_value = "", hide_env_values = true)]
    metalprice_api_key: String,

    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Prints the current spot price and where it came from
    Price {
        /// Print as json
        #[clap(long)]
        json: bool,
    },
    /// Resolves the price once and prints the cache state
    Status {
        /// Print as json
        #[clap(long)]
        json: bool,
    },
    /// Values an item at the current spot price
    Value {
        /// Weight in grams
        #[clap(short, long)]
        weight: Decimal,
        /// Karat grade, e.g. 14K
        #[clap(short, long, default_value = "14K")]
        purity: Purity,
    },
}

pub async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = Config::from_path(
        cli.config,
        EnvOverride {
            metalprice_api_key: cli.metalprice_api_key,
        },
    )?;
    crate::tracing::init_tracer(&config.tracing)?;

    let base_currency = config.metalprice.base_currency.clone();
    let app = SpotPriceApp::init(config.spot_price, config.metalprice)
        .context("Couldn't initialize spot price")?;

    match cli.command {
        Command::Price { json } => price_cmd(&app, &base_currency, json).await?,
        Command::Status { json } => status_cmd(&app, &base_currency, json).await?,
        Command::Value { weight, purity } => value_cmd(&app, weight, purity).await?,
    }
    Ok(())
}

async fn price_cmd(app: &SpotPriceApp, base_currency: &str, json: bool) -> anyhow::Result<()> {
    let price = app.current_price().await;
    if json {
        println!("{}", serde_json::to_string_pretty(&price)?);
    } else {
        print_price(app, base_currency, &price);
    }
    Ok(())
}

async fn status_cmd(app: &SpotPriceApp, base_currency: &str, json: bool) -> anyhow::Result<()> {
    let price = app.current_price().await;
    let status = app.cache_status().await;
    if json {
        println!("{}", serde_json::to_string_pretty(&status)?);
        return Ok(());
    }
    print_price(app, base_currency, &price);
    println!("Cache:");
    println!("  has snapshot:   {}", status.has_snapshot);
    if let (Some(age), Some(expires)) = (status.age_minutes, status.expires_in_minutes) {
        println!("  age:            {} min", age);
        println!("  expires in:     {} min", expires);
    }
    println!(
        "  upstream polls: ~{} / day, ~{} / month",
        status.polls_per_day, status.polls_per_month
    );
    Ok(())
}

async fn value_cmd(app: &SpotPriceApp, weight: Decimal, purity: Purity) -> anyhow::Result<()> {
    let price = app.current_price().await;
    let valuation = calculate_value(weight, purity, price.price_per_gram())
        .context("Weight must be positive")?;
    let currency = &app.config().quote_currency;

    println!("{} of {}", format_grams(weight), purity.label());
    println!(
        "  pure content:  {}",
        format_grams(valuation.pure_content_grams.round_dp(3))
    );
    println!(
        "  spot per gram: {} {}",
        valuation.spot_price_per_gram_at_purity.round_dp(2),
        currency
    );
    println!("  spot value:    {} {}", valuation.spot_value, currency);
    println!(
        "  target price:  {} {} ({}% of spot)",
        valuation.target_value,
        currency,
        purity.target_percent() * Decimal::ONE_HUNDRED
    );
    if price.is_degraded() {
        eprintln!(
            "warning: priced with a fallback spot price ({} min old)",
            price.age_minutes()
        );
    }
    Ok(())
}

fn print_price(app: &SpotPriceApp, base_currency: &str, price: &SpotPrice) {
    let config = app.config();
    println!(
        "{}/{}: {} {}/g",
        config.commodity,
        config.quote_currency,
        price.price_per_gram().round_dp(2),
        config.quote_currency
    );
    println!(
        "  per troy oz:   {} {}",
        price.figures().price_in_quote_unit(),
        base_currency
    );
    println!(
        "  {}/{}:       {}",
        base_currency,
        config.quote_currency,
        price.figures().exchange_rate()
    );
    println!(
        "  source:        {} ({} min old, acquired {})",
        price.origin(),
        price.age_minutes(),
        price.acquired_at()
    );
}

fn format_grams(grams: Decimal) -> String {
    format!("{} g", grams.normalize())
}
