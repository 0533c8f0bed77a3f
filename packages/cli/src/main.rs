#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Terminal front end for the crime choropleth map.
//!
//! ```text
//! crime_choropleth municipalities
//! crime_choropleth render [--crime "HOMICIDIO DOLOSO"] [--municipality Fortaleza]
//! crime_choropleth legend
//! ```
//!
//! `render` drives the same [`MapView`] a browser map would, with a
//! [`terminal::TerminalMap`] standing in for the mapping widget, and
//! prints every municipality with its color and style.
//!
//! The backend is `--api-url`, else `CHOROPLETH_API_URL`, else
//! `http://127.0.0.1:5000`.

mod terminal;

use std::sync::Arc;

use clap::{Parser, Subcommand};
use crime_choropleth_backend::{Backend, BackendConfig, HttpBackend};
use crime_choropleth_map::{MapView, MapWidget as _};
use crime_choropleth_map_models::{ColorBucket, MapDefaults, StyleState};

use crate::terminal::{ArgControls, TerminalMap};

#[derive(Parser)]
#[command(
    name = "crime_choropleth",
    about = "Crime rates per 100k residents by municipality"
)]
struct Cli {
    /// Backend base URL (overrides `CHOROPLETH_API_URL`)
    #[arg(long, global = true)]
    api_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the municipalities the backend knows about
    Municipalities,
    /// Load a crime type and print the rendered map
    Render {
        /// Crime type (e.g. "HOMICIDIO DOLOSO")
        #[arg(long)]
        crime: Option<String>,
        /// Municipality to select after loading
        #[arg(long)]
        municipality: Option<String>,
    },
    /// Print the color scale
    Legend,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    pretty_env_logger::init_custom_env("RUST_LOG");
    let cli = Cli::parse();

    let config = match cli.api_url {
        Some(url) => BackendConfig::from_env().with_base_url(url),
        None => BackendConfig::from_env(),
    };

    match cli.command {
        Commands::Municipalities => {
            let backend = HttpBackend::new(config)?;
            let names = backend.list_municipalities().await?;
            for name in &names {
                println!("{name}");
            }
            println!("\n{} municipalities", names.len());
        }
        Commands::Render {
            crime,
            municipality,
        } => render(config, crime, municipality).await?,
        Commands::Legend => print_legend(),
    }

    Ok(())
}

async fn render(
    config: BackendConfig,
    crime: Option<String>,
    municipality: Option<String>,
) -> Result<(), Box<dyn std::error::Error>> {
    let defaults = MapDefaults::embedded()?;
    let backend = Arc::new(HttpBackend::new(config)?);

    log::info!("Using backend at {}", backend.config().base_url);

    let widget = TerminalMap::new(defaults.viewport);
    let controls = ArgControls::new(crime);
    let mut view = MapView::initialize(backend, widget, controls, defaults).await?;

    if let Some(name) = municipality {
        view.on_municipality_change(&name);
    }

    let map = view.widget();
    log::debug!(
        "{} polygon layer(s), tiles {:?}, built-in double-click zoom {}",
        map.layer_count(),
        map.tiles().map(|t| t.url.as_str()),
        map.double_click_zoom()
    );

    let Some(collection) = view.collection() else {
        eprintln!(
            "No map data could be loaded for '{}'",
            view.filters().crime_type
        );
        std::process::exit(1);
    };

    println!("Crime type: {}", collection.crime_type);
    println!(
        "Municipality: {} ({} options)",
        view.controls()
            .selected_municipality()
            .unwrap_or(view.defaults().whole_region_label.as_str()),
        view.controls().municipality_options().len()
    );
    println!();
    println!(
        "{:<32} {:>8} {:>12} {:<9} {:<8} BORDER",
        "MUNICIPALITY", "COUNT", "PER 100K", "COLOR", "STYLE"
    );
    println!("{}", "-".repeat(88));

    let layer = view.layer_id();
    for (id, feature) in collection.iter() {
        let state = view.style_state(id).unwrap_or(StyleState::Default);
        let marker = if state == StyleState::Selected { "*" } else { " " };
        let border = layer
            .and_then(|l| map.style(l, id))
            .map_or_else(String::new, |s| format!("{}px {}", s.weight, s.color));
        println!(
            "{marker}{:<31} {:>8} {:>12.2} {:<9} {:<8} {border}",
            feature.name,
            feature.quantity,
            feature.rate_per_100k,
            feature.bucket().color(),
            state.as_ref(),
        );
    }

    if let Some(top) = layer
        .and_then(|l| map.topmost(l))
        .and_then(|id| collection.get(id))
    {
        println!("\nDrawn on top: {}", top.name);
    }

    let viewport = map.viewport();
    println!(
        "\n{} municipalities, viewport {} zoom {}",
        collection.len(),
        viewport.center,
        viewport.zoom
    );

    Ok(())
}

fn print_legend() {
    println!("{:<10} COLOR", "PER 100K");
    for bucket in ColorBucket::ALL.iter().rev() {
        println!("{:<10} {}", bucket.label(), bucket.color());
    }
}
