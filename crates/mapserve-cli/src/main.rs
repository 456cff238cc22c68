mod commands;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use mapserve_cli::output::OutputFormat;
use mapserve_lib::RasterRequest;

use crate::commands::places::{
    handle_locate_command, handle_nearest_command, handle_search_command,
};
use crate::commands::raster::handle_raster_command;
use crate::commands::route::{handle_route_command, RouteCommandArgs};

#[derive(Parser, Debug)]
#[command(author, version, about = "Road map routing, place search, and tile selection")]
struct Cli {
    /// Override the directory holding vertices.csv, edges.csv, and places.csv.
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Output format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text, global = true)]
    format: OutputFormat,

    /// JSON file describing the tile pyramid. Defaults to the built-in map.
    #[arg(long, global = true)]
    raster_config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Find the graph vertex closest to a position.
    Nearest {
        #[arg(long, allow_negative_numbers = true)]
        lon: f64,
        #[arg(long, allow_negative_numbers = true)]
        lat: f64,
    },
    /// Compute a route with turn-by-turn directions between two positions.
    Route {
        #[arg(long, allow_negative_numbers = true)]
        from_lon: f64,
        #[arg(long, allow_negative_numbers = true)]
        from_lat: f64,
        #[arg(long, allow_negative_numbers = true)]
        to_lon: f64,
        #[arg(long, allow_negative_numbers = true)]
        to_lat: f64,
    },
    /// List place names starting with a prefix (case and punctuation ignored).
    Search {
        /// Prefix to complete. An empty prefix lists every name.
        prefix: String,
    },
    /// Show every location registered under a place name.
    Locate {
        /// Place name to look up.
        name: String,
    },
    /// Select the map tiles covering a viewport.
    Raster {
        #[arg(long, allow_negative_numbers = true)]
        ullon: f64,
        #[arg(long, allow_negative_numbers = true)]
        ullat: f64,
        #[arg(long, allow_negative_numbers = true)]
        lrlon: f64,
        #[arg(long, allow_negative_numbers = true)]
        lrlat: f64,
        /// Viewport width in pixels.
        #[arg(long)]
        width: f64,
        /// Viewport height in pixels.
        #[arg(long)]
        height: f64,
    },
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let data_dir = cli.data_dir.as_deref();

    match cli.command {
        Command::Nearest { lon, lat } => handle_nearest_command(data_dir, cli.format, lon, lat),
        Command::Route {
            from_lon,
            from_lat,
            to_lon,
            to_lat,
        } => handle_route_command(
            data_dir,
            cli.format,
            RouteCommandArgs {
                from_lon,
                from_lat,
                to_lon,
                to_lat,
            },
        ),
        Command::Search { prefix } => handle_search_command(data_dir, cli.format, &prefix),
        Command::Locate { name } => handle_locate_command(data_dir, cli.format, &name),
        Command::Raster {
            ullon,
            ullat,
            lrlon,
            lrlat,
            width,
            height,
        } => handle_raster_command(
            cli.raster_config.as_deref(),
            cli.format,
            RasterRequest {
                ullon,
                ullat,
                lrlon,
                lrlat,
                width,
                height,
            },
        ),
    }
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .finish();

    let _ = tracing::subscriber::set_global_default(subscriber);
}
