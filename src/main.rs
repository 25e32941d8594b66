use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::{info, Instrument};

use cart_store::{
    setup_tracing, CartConfig, CartSystem, LoadOptions, ProductId, StockAction,
    TracingNotifier, UpdateProductAmount,
};

#[derive(Debug, Parser)]
#[command(name = "cart", about = "Manage the persisted shopping cart")]
struct Cli {
    /// Config file (defaults to ./cart.toml when present).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print the cart.
    Show,
    /// Add one unit of a product.
    Add { product_id: ProductId },
    /// Remove a product entirely.
    Remove { product_id: ProductId },
    /// Set the amount of a product already in the cart.
    Set {
        product_id: ProductId,
        amount: u32,
        #[arg(long, default_value = "add")]
        action: StockAction,
    },
    /// Print the stock the remote service reports.
    Stock { product_id: ProductId },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = CartConfig::load(LoadOptions {
        require_file: cli.config.is_some(),
        config_path: cli.config,
    })
    .context("failed to load configuration")?;
    setup_tracing(&config.logging);

    let system = CartSystem::from_config(&config, Arc::new(TracingNotifier))
        .context("failed to start cart system")?;
    let store = &system.store;

    let span = tracing::info_span!("cart_command", command = ?cli.command);
    async {
        match cli.command {
            Command::Show => {}
            Command::Add { product_id } => store.add_product(product_id).await,
            Command::Remove { product_id } => store.remove_product(product_id).await,
            Command::Set {
                product_id,
                amount,
                action,
            } => {
                store
                    .update_product_amount(UpdateProductAmount {
                        product_id,
                        amount,
                        action,
                    })
                    .await
            }
            Command::Stock { product_id } => match store.query_available_stock(product_id).await {
                Some(amount) => println!("{amount}"),
                None => println!("unknown"),
            },
        }
    }
    .instrument(span)
    .await;

    let cart = store.cart().await?;
    println!("{}", serde_json::to_string_pretty(&cart)?);
    info!(items = cart.len(), "Command finished");

    system.shutdown().await.map_err(anyhow::Error::msg)?;
    Ok(())
}
