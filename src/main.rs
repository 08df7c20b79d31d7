use std::error::Error;

use colored::*;
use csv::Writer;
use dotenv::dotenv;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use multidrop::database::sqlx::db_connection;
use multidrop::domain::types::MultiDropQuote;
use multidrop::fixtures::demo_request::demo_request;
use multidrop::geocode::NominatimGeocoder;
use multidrop::quote::QuoteOrchestrator;
use multidrop::terrain::TerrainTables;

/// Initialize tracing and environment
fn init_tracing_and_env() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(
            fmt::layer()
                .with_span_events(fmt::format::FmtSpan::NEW | fmt::format::FmtSpan::CLOSE)
                .pretty(),
        )
        .init();

    dotenv().ok();
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    init_tracing_and_env()?;
    let db_pool = db_connection().await?;

    let geocoder = NominatimGeocoder::from_env(Some(db_pool));
    let mut orchestrator = QuoteOrchestrator::new(geocoder, TerrainTables::builtin());

    let request = demo_request();
    info!(
        "Requesting quote: {} stops from {}, urgency '{}'",
        request.stops.len(),
        request.business.city,
        request.urgency
    );

    match orchestrator.quote(&request).await {
        Ok(quote) => {
            print_quote(&quote);
            save_breakdown_csv(&quote, "quote_breakdown.csv")?;
            Ok(())
        }
        Err(e) => {
            eprintln!("{} {}", "Quote failed:".red(), e);
            Err(e.into())
        }
    }
}

fn print_quote(quote: &MultiDropQuote) {
    println!("\n{}", "=== Multi-Drop Quote ===".bold());
    println!("Route: {:.1} miles, est. {}", quote.total_miles, quote.estimated_time);

    println!("\nOptimized stop order:");
    for (i, node) in quote.optimized_route.iter().enumerate() {
        match &node.stop_id {
            None => println!("  {}. {} ({})", i, "origin".cyan(), node.city),
            Some(id) => println!("  {}. {} ({})", i, id, node.city),
        }
    }

    println!("\nPer-stop costs:");
    for stop in &quote.stop_costs {
        println!(
            "  {} - {}: {:.2} miles from origin, x{:.2} terrain, ${:.2}",
            stop.stop_id,
            stop.customer_name,
            stop.distance_from_origin_miles,
            stop.terrain_multiplier,
            stop.cost
        );
    }

    println!("\nBase fee: ${:.2}", quote.base_fee);
    if quote.elevation_adjustment > 0.0 {
        println!(
            "Elevation adjustment: ${:.2} (max terrain x{:.2})",
            quote.elevation_adjustment, quote.max_terrain_multiplier
        );
    }

    let total = format!("${:.2}", quote.total_cost);
    if quote.max_terrain_multiplier > 1.1 {
        println!("Total: {} {}", total.green().bold(), "(includes terrain charges)".yellow());
    } else {
        println!("Total: {}", total.green().bold());
    }
    println!(
        "Split across {} customers: ${:.2} each",
        quote.stop_costs.len(),
        quote.cost_per_customer
    );
}

fn save_breakdown_csv(quote: &MultiDropQuote, filename: &str) -> Result<(), Box<dyn Error>> {
    let mut wtr = Writer::from_path(filename)?;

    wtr.write_record([
        "stop_id",
        "customer_name",
        "distance_from_origin_miles",
        "terrain_multiplier",
        "cost",
        "cost_per_customer",
    ])?;

    for stop in &quote.stop_costs {
        wtr.write_record([
            stop.stop_id.clone(),
            stop.customer_name.clone(),
            format!("{:.2}", stop.distance_from_origin_miles),
            format!("{:.2}", stop.terrain_multiplier),
            format!("{:.2}", stop.cost),
            format!("{:.2}", quote.cost_per_customer),
        ])?;
    }

    wtr.flush()?;
    info!("Saved per-stop breakdown to {}", filename);
    Ok(())
}
