//! One render pass from decoded datapoints to a compiled script.

use std::path::Path;

use ftdcview_common::error::{FtdcViewError, FtdcViewResult};
use ftdcview_series_model::{Datapoint, TimeWindow};
use tempfile::TempDir;

use crate::compiler::{CompiledScript, ScriptCompiler};
use crate::router::SeriesRouter;

const SCRIPT_FILE_NAME: &str = "main.gp";

/// Files backing a single render pass.
///
/// Owns a private temporary directory holding the series stores and the
/// top-level script. Dropping the session deletes it, so keep the session
/// alive until the renderer has finished.
#[derive(Debug)]
pub struct RenderSession {
    dir: TempDir,
    script: CompiledScript,
    window: TimeWindow,
}

impl RenderSession {
    /// Route the whole dataset through `window` and compile the result.
    ///
    /// `datapoints` is only read; every session starts from the same
    /// unfiltered capture.
    pub fn prepare(
        datapoints: &[Datapoint],
        window: TimeWindow,
        compiler: &ScriptCompiler,
    ) -> FtdcViewResult<Self> {
        let dir = tempfile::Builder::new()
            .prefix("ftdc_parser")
            .tempdir()
            .map_err(|e| FtdcViewError::store(format!("Failed to create session dir: {e}")))?;

        let started = std::time::Instant::now();
        let mut router = SeriesRouter::new(window, dir.path());
        for datapoint in datapoints {
            router.add_datapoint(datapoint)?;
        }
        tracing::debug!(
            %window,
            accepted = router.accepted(),
            discarded = router.discarded(),
            metrics = router.metric_count(),
            route_ms = started.elapsed().as_millis(),
            "Routed datapoints"
        );

        let script = compiler.compile(router, &dir.path().join(SCRIPT_FILE_NAME))?;

        Ok(Self {
            dir,
            script,
            window,
        })
    }

    /// Absolute path of the top-level script.
    pub fn script_path(&self) -> &Path {
        &self.script.path
    }

    /// Number of graphs in the compiled layout.
    pub fn graphs(&self) -> usize {
        self.script.graphs
    }

    /// Number of in-window points across all graphs.
    pub fn points(&self) -> u64 {
        self.script.points
    }

    pub fn window(&self) -> TimeWindow {
        self.window
    }

    /// Directory holding this session's files.
    pub fn dir(&self) -> &Path {
        self.dir.path()
    }
}
