//! shoecart - drive the cart store from the command line.
//!
//! ```bash
//! shoecart show
//! shoecart add 2
//! shoecart update 2 3
//! shoecart remove 2
//! shoecart --metrics add 5
//! ```
//!
//! Settings come from `SHOECART_*` environment variables
//! (`SHOECART_API_BASE_URL`, `SHOECART_STORAGE_DIR`, `SHOECART_STORAGE_KEY`, ...).

use clap::{Parser, Subcommand};
use std::process::ExitCode;
use std::sync::Arc;
use tracing::info;

use shoecart_rs::{
    init_observability,
    models::{Cart, ProductId, UpdateProductAmount},
    repositories::{FileStorage, HttpProductLookup},
    services::{CartStore, ChannelNotifier},
    shutdown_observability, Config, Metrics,
};

#[derive(Parser)]
#[command(name = "shoecart")]
#[command(author, version, about = "Storefront shopping cart")]
struct Cli {
    /// Print Prometheus metrics after the command
    #[arg(long, global = true)]
    metrics: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the cart
    Show,
    /// Add one unit of a product
    Add {
        /// Product id
        product_id: ProductId,
    },
    /// Remove a product from the cart
    Remove {
        /// Product id
        product_id: ProductId,
    },
    /// Set the amount of a product already in the cart
    Update {
        /// Product id
        product_id: ProductId,
        /// New amount; values below 1 are ignored
        #[arg(allow_negative_numbers = true)]
        amount: i64,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    let config = Config::from_environment()?;
    let observability = &config.observability;
    init_observability(
        &observability.service_name,
        &observability.service_version,
        observability.otlp_endpoint(),
        &observability.log_level,
        observability.enable_json_logging,
    )?;

    let metrics = Arc::new(Metrics::new()?);

    let lookup = HttpProductLookup::new(
        &config.lookup.api_base_url,
        config.lookup.request_timeout(),
    )?
    .with_metrics(metrics.clone());
    let storage = FileStorage::new(config.storage.storage_dir.clone());
    let (notifier, mut notifications) = ChannelNotifier::new();

    let store = CartStore::new(
        Arc::new(lookup),
        Arc::new(notifier),
        Arc::new(storage),
        config.storage.storage_key.clone(),
    )
    .await
    .with_metrics(metrics.clone());

    match cli.command {
        Commands::Show => {}
        Commands::Add { product_id } => store.add_product(product_id).await,
        Commands::Remove { product_id } => store.remove_product(product_id).await,
        Commands::Update { product_id, amount } => {
            store
                .update_product_amount(UpdateProductAmount::new(product_id, amount))
                .await
        }
    }

    print_cart(&store.cart());

    let mut failed = false;
    while let Ok(notification) = notifications.try_recv() {
        eprintln!("error: {}", notification.message);
        failed = true;
    }

    if cli.metrics {
        print!("{}", metrics.encode()?);
    }

    if observability.otlp_endpoint().is_some() {
        shutdown_observability().await;
    }

    info!("Done");
    Ok(if failed {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    })
}

fn print_cart(cart: &Cart) {
    if cart.is_empty() {
        println!("Cart is empty");
        return;
    }

    for item in cart.items() {
        println!(
            "{:>6}  {:>3} x {:>9}  {:>10}  {}",
            item.id,
            item.amount,
            item.price.round_dp(2),
            item.subtotal().round_dp(2),
            item.title
        );
    }
    println!(
        "{} items, subtotal {}",
        cart.total_items(),
        cart.subtotal().round_dp(2)
    );
}
