use clap::{Parser, Subcommand};
use miette::{IntoDiagnostic, Result};
use promptpos::application::pos::PosService;
use promptpos::config::AppConfig;
use promptpos::domain::ports::{ProductStoreBox, SaleStoreBox};
use promptpos::domain::promptpay::{self, PayloadEncoder};
use promptpos::infrastructure::in_memory::InMemoryStore;
use promptpos::interfaces::csv::inventory_writer::InventoryWriter;
use promptpos::interfaces::csv::product_reader::ProductReader;
use promptpos::interfaces::csv::sale_reader::SaleReader;
use promptpos::interfaces::json::promptpay::{self as promptpay_json, PromptPayRequest};
use promptpos::telemetry;
use rust_decimal::Decimal;
use std::fs::File;
use std::io::{self, Read};
use std::path::PathBuf;
use tracing::error;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// JSON configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log filter, e.g. `info` or `promptpos=debug`. Overrides the config file.
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print a PromptPay payload as `{"payload": ...}`.
    ///
    /// Without --amount, a JSON request body `{"amount": ...}` is read from stdin.
    Payload {
        /// Amount to charge; 0 leaves the amount open
        #[arg(long, allow_negative_numbers = true)]
        amount: Option<Decimal>,

        /// PromptPay number receiving the payment
        #[arg(long, env = "PROMPTPOS_MERCHANT_PHONE")]
        phone: Option<String>,
    },
    /// Check the checksum and field layout of a payload
    Verify { payload: String },
    /// Create products and settle sales from CSV files, then print the inventory
    Process {
        /// Products CSV: name,price,cost,quantity,description
        #[arg(long)]
        products: Option<PathBuf>,

        /// Sales CSV: sale,product,quantity
        #[arg(long)]
        sales: Option<PathBuf>,

        /// Path to persistent database (optional). If provided, uses RocksDB.
        #[arg(long)]
        db_path: Option<PathBuf>,
    },
    /// Print the inventory
    Products {
        /// Path to persistent database (optional). If provided, uses RocksDB.
        #[arg(long)]
        db_path: Option<PathBuf>,
    },
}

fn open_stores(db_path: Option<PathBuf>) -> Result<(ProductStoreBox, SaleStoreBox)> {
    if let Some(db_path) = db_path {
        #[cfg(feature = "storage-rocksdb")]
        {
            let store = promptpos::infrastructure::rocksdb::RocksDBStore::open(db_path)
                .into_diagnostic()?;
            return Ok((Box::new(store.clone()), Box::new(store)));
        }
        #[cfg(not(feature = "storage-rocksdb"))]
        {
            let _ = db_path;
            tracing::warn!(
                "Persistent storage requested via --db-path, but 'storage-rocksdb' feature is not enabled. Falling back to In-Memory storage."
            );
        }
    }

    let store = InMemoryStore::new();
    Ok((Box::new(store.clone()), Box::new(store)))
}

fn build_service(
    config: &AppConfig,
    phone: Option<String>,
    db_path: Option<PathBuf>,
) -> Result<PosService> {
    let encoder = PayloadEncoder::new(config.promptpay.clone()).into_diagnostic()?;
    let phone = phone.unwrap_or_else(|| config.merchant_phone.clone());
    let (products, sales) = open_stores(db_path)?;
    Ok(PosService::new(products, sales, encoder, phone))
}

fn print_inventory(products: &[promptpos::domain::product::Product]) -> Result<()> {
    let stdout = io::stdout();
    let mut writer = InventoryWriter::new(stdout.lock());
    writer.write_products(products).into_diagnostic()
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = AppConfig::load(cli.config.as_deref()).into_diagnostic()?;
    telemetry::init_tracing(cli.log_level.as_deref().unwrap_or(&config.log_level));

    match cli.command {
        Command::Payload { amount, phone } => {
            let service = build_service(&config, phone, None)?;
            let response = match amount {
                Some(amount) => {
                    let response = promptpay_json::respond(&service, PromptPayRequest { amount })
                        .into_diagnostic()?;
                    serde_json::to_string(&response).into_diagnostic()?
                }
                None => {
                    let mut body = String::new();
                    io::stdin().read_to_string(&mut body).into_diagnostic()?;
                    promptpay_json::handle(&service, &body).into_diagnostic()?
                }
            };
            println!("{}", response);
        }
        Command::Verify { payload } => {
            let fields = promptpay::decode(payload.trim()).into_diagnostic()?;
            for field in fields {
                println!("{} {:02} {}", field.tag, field.value.len(), field.value);
            }
        }
        Command::Process {
            products,
            sales,
            db_path,
        } => {
            let service = build_service(&config, None, db_path)?;

            if let Some(path) = products {
                let reader = ProductReader::new(File::open(path).into_diagnostic()?);
                for product in reader.products() {
                    match product {
                        Ok(product) => {
                            if let Err(e) = service.create_product(product).await {
                                error!("Error creating product: {}", e);
                            }
                        }
                        Err(e) => error!("Error reading product: {}", e),
                    }
                }
            }

            if let Some(path) = sales {
                let reader = SaleReader::new(File::open(path).into_diagnostic()?);
                for batch in reader.sales() {
                    match batch {
                        Ok(batch) => {
                            if let Err(e) = service.create_sale(batch.draft).await {
                                error!("Error processing sale {}: {}", batch.reference, e);
                            }
                        }
                        Err(e) => error!("Error reading sale: {}", e),
                    }
                }
            }

            print_inventory(&service.list_products().await.into_diagnostic()?)?;
        }
        Command::Products { db_path } => {
            let service = build_service(&config, None, db_path)?;
            print_inventory(&service.list_products().await.into_diagnostic()?)?;
        }
    }

    Ok(())
}
