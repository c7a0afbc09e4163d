//! Load a capture and hand it to the interactive loop.

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::Context;
use ftdcview_common::config::AppConfig;
use ftdcview_console::{CommandLoop, Interrupts};
use ftdcview_plot_engine::{GnuplotRenderer, PlotOptions, ScriptCompiler};
use ftdcview_series_model::{Datapoint, DatapointDecoder, JsonlDecoder};

const USAGE: &str = "Expected an FTDC filename. E.g: ftdcview <path-to>/viam-server.ftdc";

pub async fn run(file: Option<PathBuf>, config: AppConfig) -> anyhow::Result<()> {
    let mut stdout = std::io::stdout();
    let Some(dataset) = load_dataset(file.as_deref(), &JsonlDecoder, &mut stdout)? else {
        return Ok(());
    };

    let renderer = GnuplotRenderer::from_config(&config.renderer);
    if !renderer.is_available() {
        tracing::warn!(
            binary = %config.renderer.binary,
            "Renderer not found in PATH; every render will fail"
        );
    }

    let mut options = PlotOptions::from(&config.plot);
    options.output_image = resolve_output(&options.output_image)?;

    let stdin = tokio::io::BufReader::new(tokio::io::stdin());
    CommandLoop::new(&dataset, ScriptCompiler::new(options), renderer)
        .with_interrupts(Interrupts::ctrl_c())
        .run(stdin, &mut stdout)
        .await?;

    Ok(())
}

/// Decode the capture at `file`.
///
/// Returns `None` after printing usage when no file was given or it cannot
/// be opened. Decode failures are errors.
fn load_dataset<W: Write>(
    file: Option<&Path>,
    decoder: &dyn DatapointDecoder,
    out: &mut W,
) -> anyhow::Result<Option<Vec<Datapoint>>> {
    let Some(path) = file else {
        writeln!(out, "{USAGE}")?;
        return Ok(None);
    };

    let mut capture = match File::open(path) {
        Ok(capture) => capture,
        Err(e) => {
            writeln!(out, "Error opening file. File: {} Err: {e}", path.display())?;
            writeln!(out, "{USAGE}")?;
            return Ok(None);
        }
    };

    let started = std::time::Instant::now();
    let dataset = decoder
        .decode(&mut capture)
        .with_context(|| format!("Failed to decode {}", path.display()))?;

    tracing::info!(
        path = %path.display(),
        decoder = decoder.name(),
        datapoints = dataset.len(),
        load_ms = started.elapsed().as_millis(),
        "Loaded capture"
    );
    Ok(Some(dataset))
}

/// Anchor a relative image path to the working directory, so the renderer
/// writes it there regardless of where the script lives.
fn resolve_output(image: &Path) -> anyhow::Result<PathBuf> {
    if image.is_absolute() {
        return Ok(image.to_path_buf());
    }
    let cwd = std::env::current_dir().context("Failed to read working directory")?;
    Ok(cwd.join(image))
}
