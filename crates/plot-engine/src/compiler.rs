//! Compiles routed series into one top-level gnuplot script.

use std::path::{Path, PathBuf};

use ftdcview_common::config::PlotConfig;
use ftdcview_common::error::{FtdcViewError, FtdcViewResult};

use crate::router::SeriesRouter;
use crate::script::{Directive, PlotScript};

/// Layout applied to every compiled script.
#[derive(Debug, Clone, PartialEq)]
pub struct PlotOptions {
    /// Image the renderer writes.
    pub output_image: PathBuf,

    /// Canvas width in pixels.
    pub width: u32,

    /// Canvas height per graph in pixels.
    pub graph_height: u32,

    /// Shared y-axis floor; `None` autoscales. Defaults to zero, which clips
    /// negative-valued metrics.
    pub y_floor: Option<f64>,
}

impl Default for PlotOptions {
    fn default() -> Self {
        Self::from(&PlotConfig::default())
    }
}

impl From<&PlotConfig> for PlotOptions {
    fn from(config: &PlotConfig) -> Self {
        Self {
            output_image: config.output_image.clone(),
            width: config.width,
            graph_height: config.graph_height,
            y_floor: config.y_floor,
        }
    }
}

/// A script written to disk and ready for the renderer.
#[derive(Debug, Clone)]
pub struct CompiledScript {
    /// Absolute path of the top-level script.
    pub path: PathBuf,

    /// Graph rows in the layout.
    pub graphs: usize,

    /// Points across all referenced stores.
    pub points: u64,
}

/// Builds the [`PlotScript`] for a pass and writes it out.
#[derive(Debug, Clone, Default)]
pub struct ScriptCompiler {
    options: PlotOptions,
}

impl ScriptCompiler {
    pub fn new(options: PlotOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &PlotOptions {
        &self.options
    }

    /// Canvas height for `graphs` rows.
    pub fn canvas_height(&self, graphs: usize) -> u32 {
        u32::try_from(graphs)
            .unwrap_or(u32::MAX)
            .saturating_mul(self.options.graph_height)
    }

    /// Layout and axis directives shared by every graph.
    fn preamble(&self, graphs: usize) -> PlotScript {
        let mut script = PlotScript::new();
        script
            .push(Directive::Terminal {
                width: self.options.width,
                height: self.canvas_height(graphs),
            })
            .push(Directive::Output(self.options.output_image.clone()))
            .push(Directive::Multiplot {
                rows: graphs,
                columns: 1,
            })
            .push(Directive::TimeFormat("%s".to_string()))
            .push(Directive::XTickFormat("%H:%M:%S".to_string()))
            .push(Directive::XLabel("Time".to_string()))
            .push(Directive::XDataTime)
            .push(Directive::YRange {
                floor: self.options.y_floor,
            });
        script
    }

    /// Close every store of `router`, reference it in the script, and write
    /// the script to `script_path`.
    ///
    /// Consumes the router: stores are closed one by one as they are
    /// referenced, and any left over after an error are closed on drop.
    pub fn compile(
        &self,
        router: SeriesRouter,
        script_path: &Path,
    ) -> FtdcViewResult<CompiledScript> {
        let series = router.into_series();
        let graphs = series.len();
        let mut script = self.preamble(graphs);
        let mut points = 0u64;

        for (metric, store) in series {
            points += store.points();
            let data = store.close()?;
            script.push(Directive::Plot {
                data,
                title: metric,
            });
        }

        std::fs::write(script_path, script.render()).map_err(|e| {
            FtdcViewError::store(format!(
                "Failed to write plot script {}: {e}",
                script_path.display()
            ))
        })?;

        let path = std::fs::canonicalize(script_path)?;
        tracing::info!(
            script = %path.display(),
            graphs,
            points,
            "Compiled plot script"
        );

        Ok(CompiledScript {
            path,
            graphs,
            points,
        })
    }
}
