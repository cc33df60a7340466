//! finvoice - agent setup and one-shot extraction utility.
//!
//! `finvoice setup` registers the invoice extraction agent with the hosted
//! service (idempotent). `finvoice extract <image>` runs a single extraction
//! against the configured agent, prints the result, and saves the raw data
//! to `sample_output.json`.

use std::path::Path;

use finvoice_core::format::{line_item_rows, text_or_na, vat_summary_rows};
use finvoice_core::schema::Invoice;
use finvoice_core::traits::ExtractionAgent;
use finvoice_core::{format_currency, ExtractConfig};
use finvoice_extract::LlamaExtractClient;
use tracing::Level;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

const OUTPUT_FILE: &str = "sample_output.json";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env().add_directive(Level::WARN.into()))
        .init();

    let mut args = std::env::args().skip(1);
    match args.next().as_deref() {
        Some("setup") => setup().await,
        Some("extract") => match args.next() {
            Some(image) => extract(&image).await,
            None => {
                eprintln!("usage: finvoice extract <image>");
                std::process::exit(2);
            }
        },
        _ => {
            eprintln!("usage: finvoice <setup | extract <image>>");
            std::process::exit(2);
        }
    }
}

/// Register the invoice extraction agent, reusing it if it already exists.
async fn setup() -> Result<(), Box<dyn std::error::Error>> {
    let config = ExtractConfig::from_env()?;
    let agent_name = config.agent_name.clone();
    let client = LlamaExtractClient::new(config);

    println!("Connecting to extraction service...");
    let agent = client.get_or_create_agent(&agent_name).await?;

    println!("Agent '{}' is ready (id: {})", agent.name, agent.id);
    println!("Next: run `finvoice extract <image>` to test extraction.");
    Ok(())
}

/// Run one extraction and print the structured result.
async fn extract(image_path: &str) -> Result<(), Box<dyn std::error::Error>> {
    let config = ExtractConfig::from_env()?;
    let client = LlamaExtractClient::new(config);
    let agent = client.agent().await?;

    let path = Path::new(image_path);
    let filename = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("upload.jpg");
    let bytes = tokio::fs::read(path).await?;

    println!("Processing {}...", image_path);
    let invoice = agent.extract(&bytes, filename).await?;

    print_invoice(&invoice);

    tokio::fs::write(OUTPUT_FILE, serde_json::to_string_pretty(&invoice)?).await?;
    println!("\nRaw data saved to {}", OUTPUT_FILE);
    Ok(())
}

fn print_invoice(invoice: &Invoice) {
    println!("\nInvoice {}", text_or_na(invoice.invoice_number.as_deref()));
    println!("Issue date: {}", text_or_na(invoice.issue_date.as_deref()));

    let seller = invoice
        .seller
        .as_ref()
        .and_then(|s| s.name.as_deref());
    let client = invoice
        .client
        .as_ref()
        .and_then(|c| c.name.as_deref());
    println!("Seller: {}", text_or_na(seller));
    println!("Client: {}", text_or_na(client));

    let items = line_item_rows(invoice);
    if items.is_empty() {
        println!("\nNo line items found.");
    } else {
        println!("\nLine items:");
        println!(
            "{:<8} {:<30} {:>8} {:>12} {:>12} {:>8} {:>12}",
            "Item #", "Description", "Qty", "Net Price", "Net Worth", "VAT %", "Gross"
        );
        for row in &items {
            println!(
                "{:<8} {:<30} {:>8} {:>12} {:>12} {:>8} {:>12}",
                row.item_number,
                row.description,
                row.quantity,
                row.net_price,
                row.net_worth,
                row.vat_percentage,
                row.gross_worth
            );
        }
    }

    let vat = vat_summary_rows(invoice);
    if !vat.is_empty() {
        println!("\nVAT breakdown:");
        println!(
            "{:<8} {:>12} {:>12} {:>12}",
            "VAT %", "Net Worth", "VAT", "Gross"
        );
        for row in &vat {
            println!(
                "{:<8} {:>12} {:>12} {:>12}",
                row.vat_percentage, row.net_worth, row.vat_amount, row.gross_worth
            );
        }
    }

    if let Some(summary) = &invoice.summary {
        println!("\nTotal net worth:   {}", format_currency(summary.total_net_worth.as_ref()));
        println!("Total VAT:         {}", format_currency(summary.total_vat.as_ref()));
        println!("Total gross worth: {}", format_currency(summary.total_gross_worth.as_ref()));
    }
}
