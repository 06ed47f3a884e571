//! Jersey House CLI - cart inspection and catalog tools.
//!
//! # Usage
//!
//! ```bash
//! # Every cart in the storefront's cart directory
//! jh-cli cart list
//!
//! # Show a device's guest cart, or a user's cart with --user
//! jh-cli cart --device 6f1c0b1e5a2f4c7d9e8a1b2c3d4e5f60 show
//!
//! # Add a jersey without asking the catalog
//! jh-cli cart --device ... add 12 --size XL --edition "Fan Edition" \
//!     --name "Harambee Stars Home" --price 3500
//!
//! # Price a cart for delivery
//! jh-cli cart --device ... quote "ZONE 4"
//!
//! # Browse the catalog
//! jh-cli catalog list --category Jerseys --search arsenal
//! jh-cli catalog show 12
//! ```
//!
//! # Commands
//!
//! - `cart` - List, show, edit and price session carts
//! - `catalog` - Products and categories from the shop API
//! - `regions` - Shipping regions and fees

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use jersey_house_core::{CartKey, PACKAGING_FEE, ShippingRegion, UserId};
use jersey_house_storefront::cart::DeviceId;
use rust_decimal::Decimal;

mod commands;

use commands::cart::{CartTarget, NewLine};

#[derive(Parser)]
#[command(name = "jh-cli")]
#[command(author, version, about = "Jersey House CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Inspect and edit session carts
    Cart {
        #[command(flatten)]
        target: TargetArgs,

        #[command(subcommand)]
        action: CartAction,
    },
    /// Browse the catalog
    Catalog {
        #[command(subcommand)]
        action: CatalogAction,
    },
    /// List shipping regions and fees
    Regions,
}

#[derive(Args)]
struct TargetArgs {
    /// Cart directory of the storefront
    #[arg(long, default_value = "data/carts")]
    dir: PathBuf,

    /// Device id the cart belongs to
    #[arg(long)]
    device: Option<DeviceId>,

    /// User id; omit for the guest cart
    #[arg(long)]
    user: Option<i32>,
}

impl TargetArgs {
    fn target(&self) -> CartTarget {
        CartTarget {
            dir: self.dir.clone(),
            device: self.device,
            key: CartKey::for_user(self.user.map(UserId::new)),
        }
    }
}

#[derive(Subcommand)]
enum CartAction {
    /// Every cart in the directory
    List,
    /// Show the cart
    Show,
    /// Add a product
    Add {
        /// Product id
        product: i32,

        #[arg(short, long, default_value_t = 1)]
        quantity: u32,

        #[arg(long)]
        size: String,

        #[arg(long)]
        edition: String,

        #[arg(long)]
        badge: Option<String>,

        #[arg(long)]
        font: Option<String>,

        /// Name printed on the shirt
        #[arg(long)]
        custom_name: Option<String>,

        /// Number printed on the shirt
        #[arg(long)]
        custom_number: Option<String>,

        /// Product name (skips the catalog lookup, with --price)
        #[arg(long, requires = "price")]
        name: Option<String>,

        /// Unit price in KES (skips the catalog lookup, with --name)
        #[arg(long, requires = "name")]
        price: Option<Decimal>,
    },
    /// Remove a line
    Remove {
        /// Line id, as printed by `show`
        line: String,
    },
    /// Set a line's quantity (0 removes it)
    SetQty { line: String, quantity: u32 },
    /// Empty the cart
    Clear,
    /// Price the cart for delivery to a region
    Quote { region: String },
}

#[derive(Subcommand)]
enum CatalogAction {
    /// List products
    List {
        #[arg(long)]
        category: Option<String>,

        #[arg(long)]
        search: Option<String>,
    },
    /// Show one product
    Show { id: i32 },
    /// List categories
    Categories,
    /// Products in a category
    Category { id: i32 },
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    match run(cli).await {
        Ok(output) => print_output(&output),
        Err(e) => {
            tracing::error!("Command failed: {e}");
            std::process::exit(1);
        }
    }
}

#[allow(clippy::print_stdout)]
fn print_output(output: &str) {
    println!("{output}");
}

async fn run(cli: Cli) -> Result<String, Box<dyn std::error::Error>> {
    let output = match cli.command {
        Commands::Cart { target, action } => {
            let cart = target.target();
            match action {
                CartAction::List => commands::cart::list(&target.dir)?,
                CartAction::Show => commands::cart::show(&cart)?,
                CartAction::Add {
                    product,
                    quantity,
                    size,
                    edition,
                    badge,
                    font,
                    custom_name,
                    custom_number,
                    name,
                    price,
                } => {
                    let line = NewLine {
                        product_id: product,
                        quantity,
                        size: Some(size),
                        edition: Some(edition),
                        badge,
                        font,
                        custom_name,
                        custom_number,
                        name,
                        price,
                        image_url: None,
                    };
                    commands::cart::add(&cart, line).await?
                }
                CartAction::Remove { line } => commands::cart::remove(&cart, &line)?,
                CartAction::SetQty { line, quantity } => {
                    commands::cart::set_quantity(&cart, &line, quantity)?
                }
                CartAction::Clear => commands::cart::clear(&cart)?,
                CartAction::Quote { region } => commands::cart::quote(&cart, &region)?,
            }
        }
        Commands::Catalog { action } => match action {
            CatalogAction::List { category, search } => {
                commands::catalog::list(category.as_deref(), search.as_deref()).await?
            }
            CatalogAction::Show { id } => commands::catalog::show(id).await?,
            CatalogAction::Categories => commands::catalog::categories().await?,
            CatalogAction::Category { id } => commands::catalog::category(id).await?,
        },
        Commands::Regions => regions(),
    };
    Ok(output)
}

fn regions() -> String {
    let mut rows: Vec<String> = ShippingRegion::ALL
        .iter()
        .map(|region| format!("{:<14} KES {}", region.label(), region.fee()))
        .collect();
    rows.push(format!("Packaging fee: KES {PACKAGING_FEE}"));
    rows.join("\n")
}
