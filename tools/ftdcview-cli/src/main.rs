//! ftdcview CLI: plot an FTDC capture and zoom into time ranges.
//!
//! Usage:
//!   ftdcview [OPTIONS] <FILE>
//!
//! Renders every metric once at startup, then reads commands from stdin
//! (`range`, `reset range`, `help`, `quit`).

use std::path::PathBuf;

use clap::Parser;
use ftdcview_common::config::AppConfig;

mod commands;

#[derive(Parser, Debug)]
#[command(
    name = "ftdcview",
    about = "Plot FTDC diagnostic captures with gnuplot",
    version,
    author
)]
struct Cli {
    /// FTDC capture to plot
    file: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Renderer executable
    #[arg(long)]
    renderer: Option<String>,

    /// Image file written on every render
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Seconds before a running render is killed (0 waits forever)
    #[arg(long)]
    timeout: Option<u64>,

    /// Canvas width in pixels
    #[arg(long)]
    width: Option<u32>,

    /// Canvas height per graph in pixels
    #[arg(long)]
    graph_height: Option<u32>,

    /// Lower bound of every graph's y-axis
    #[arg(long, allow_hyphen_values = true, conflicts_with = "autoscale_y")]
    y_floor: Option<f64>,

    /// Let the renderer pick y-axis bounds
    #[arg(long)]
    autoscale_y: bool,
}

impl Cli {
    /// Layer command-line options over the loaded configuration.
    fn apply_overrides(&self, config: &mut AppConfig) {
        if self.verbose {
            config.logging.level = "debug".to_string();
        }
        if let Some(renderer) = &self.renderer {
            config.renderer.binary = renderer.clone();
        }
        if let Some(timeout) = self.timeout {
            config.renderer.timeout_secs = Some(timeout);
        }
        if let Some(output) = &self.output {
            config.plot.output_image = output.clone();
        }
        if let Some(width) = self.width {
            config.plot.width = width;
        }
        if let Some(height) = self.graph_height {
            config.plot.graph_height = height;
        }
        if let Some(floor) = self.y_floor {
            config.plot.y_floor = Some(floor);
        }
        if self.autoscale_y {
            config.plot.y_floor = None;
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = AppConfig::load();
    cli.apply_overrides(&mut config);

    // Initialize logging
    ftdcview_common::logging::init_logging(&config.logging);
    config.validate()?;

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    let result = runtime.block_on(commands::view::run(cli.file, config));

    // A pending stdin read cannot be cancelled; don't wait for it.
    runtime.shutdown_background();
    result
}
