//! Routes decoded readings into per-metric series stores.
//!
//! Points outside the active window are dropped on the way in and never
//! reach a store, so a pass only materializes what it will draw.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use ftdcview_common::error::{FtdcViewError, FtdcViewResult};
use ftdcview_series_model::{Datapoint, TimeWindow, TimestampSecs};
use indexmap::IndexMap;

/// Append-only data file holding one metric's `(time, value)` pairs,
/// one `"<secs> <value>"` line per point.
pub struct MetricStore {
    writer: BufWriter<File>,
    path: PathBuf,
    points: u64,
}

impl MetricStore {
    fn create(path: PathBuf) -> FtdcViewResult<Self> {
        let file = File::create(&path).map_err(|e| {
            FtdcViewError::store(format!(
                "Failed to create series store {}: {e}",
                path.display()
            ))
        })?;

        Ok(Self {
            writer: BufWriter::new(file),
            path,
            points: 0,
        })
    }

    fn append(&mut self, time_secs: TimestampSecs, value: f32) -> FtdcViewResult<()> {
        writeln!(self.writer, "{time_secs} {value:.5}").map_err(|e| {
            FtdcViewError::store(format!(
                "Failed to write series store {}: {e}",
                self.path.display()
            ))
        })?;
        self.points += 1;
        Ok(())
    }

    /// Flush and close the store, returning the path of the finished file.
    pub fn close(mut self) -> FtdcViewResult<PathBuf> {
        self.writer.flush().map_err(|e| {
            FtdcViewError::store(format!(
                "Failed to flush series store {}: {e}",
                self.path.display()
            ))
        })?;
        Ok(self.path.clone())
    }

    /// Path of the backing data file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Number of points written.
    pub fn points(&self) -> u64 {
        self.points
    }
}

impl Drop for MetricStore {
    fn drop(&mut self) {
        let _ = self.writer.flush();
    }
}

impl std::fmt::Debug for MetricStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MetricStore")
            .field("path", &self.path)
            .field("points", &self.points)
            .finish()
    }
}

/// Groups readings by metric name for a single render pass.
///
/// Metrics keep the order in which they were first seen; points keep the
/// order in which they arrived. Nothing is sorted.
#[derive(Debug)]
pub struct SeriesRouter {
    window: TimeWindow,
    dir: PathBuf,
    series: IndexMap<String, MetricStore>,
    accepted: u64,
    discarded: u64,
}

impl SeriesRouter {
    /// Create a router whose stores are written under `dir`.
    pub fn new(window: TimeWindow, dir: impl Into<PathBuf>) -> Self {
        Self {
            window,
            dir: dir.into(),
            series: IndexMap::new(),
            accepted: 0,
            discarded: 0,
        }
    }

    /// Route one reading. Out-of-window points are silently discarded.
    pub fn add_point(
        &mut self,
        time_secs: TimestampSecs,
        metric: &str,
        value: f32,
    ) -> FtdcViewResult<()> {
        if !self.window.contains(time_secs) {
            self.discarded += 1;
            return Ok(());
        }

        self.store_for(metric)?.append(time_secs, value)?;
        self.accepted += 1;
        Ok(())
    }

    /// Route every reading of `datapoint` under its shared timestamp.
    pub fn add_datapoint(&mut self, datapoint: &Datapoint) -> FtdcViewResult<()> {
        for (time_secs, metric, value) in datapoint.flatten() {
            self.add_point(time_secs, metric, value)?;
        }
        Ok(())
    }

    fn store_for(&mut self, metric: &str) -> FtdcViewResult<&mut MetricStore> {
        let index = match self.series.get_index_of(metric) {
            Some(index) => index,
            None => {
                // Stores are named by position; metric names never touch the filesystem.
                let path = self
                    .dir
                    .join(format!("series-{:04}.dat", self.series.len()));
                let store = MetricStore::create(path)?;
                tracing::trace!(metric, path = %store.path().display(), "Allocated series store");
                self.series.insert_full(metric.to_string(), store).0
            }
        };
        Ok(&mut self.series[index])
    }

    /// The window this pass filters by.
    pub fn window(&self) -> TimeWindow {
        self.window
    }

    /// Number of metrics with at least one in-window point.
    pub fn metric_count(&self) -> usize {
        self.series.len()
    }

    /// Metric names in first-seen order.
    pub fn metrics(&self) -> impl Iterator<Item = &str> {
        self.series.keys().map(String::as_str)
    }

    /// Points written to a store.
    pub fn accepted(&self) -> u64 {
        self.accepted
    }

    /// Points dropped by the window.
    pub fn discarded(&self) -> u64 {
        self.discarded
    }

    /// Hand the stores over for compilation, in first-seen order.
    pub fn into_series(self) -> IndexMap<String, MetricStore> {
        self.series
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ftdcview_series_model::Reading;

    fn drain(router: SeriesRouter) -> Vec<(String, String)> {
        router
            .into_series()
            .into_iter()
            .map(|(metric, store)| {
                let path = store.close().unwrap();
                (metric, std::fs::read_to_string(path).unwrap())
            })
            .collect()
    }

    #[test]
    fn test_window_filters_scenario() {
        let dir = tempfile::tempdir().unwrap();
        let mut router = SeriesRouter::new(TimeWindow::new(100, 150), dir.path());

        router.add_datapoint(&Datapoint::single(100, "cpu", 1.0)).unwrap();
        router.add_datapoint(&Datapoint::single(200, "cpu", 2.0)).unwrap();
        router.add_datapoint(&Datapoint::single(150, "mem", 5.0)).unwrap();

        assert_eq!(router.accepted(), 2);
        assert_eq!(router.discarded(), 1);

        let series = drain(router);
        assert_eq!(
            series,
            vec![
                ("cpu".to_string(), "100 1.00000\n".to_string()),
                ("mem".to_string(), "150 5.00000\n".to_string()),
            ]
        );
    }

    #[test]
    fn test_out_of_window_metric_gets_no_store() {
        let dir = tempfile::tempdir().unwrap();
        let mut router = SeriesRouter::new(TimeWindow::new(0, 10), dir.path());

        router.add_point(50, "late", 1.0).unwrap();
        router.add_point(5, "early", 1.0).unwrap();

        assert_eq!(router.metrics().collect::<Vec<_>>(), vec!["early"]);
        let files = std::fs::read_dir(dir.path()).unwrap().count();
        assert_eq!(files, 1);
    }

    #[test]
    fn test_arrival_order_is_preserved() {
        let dir = tempfile::tempdir().unwrap();
        let mut router = SeriesRouter::new(TimeWindow::unbounded(), dir.path());

        for t in [30, 10, 20] {
            router.add_point(t, "cpu", t as f32).unwrap();
        }

        let series = drain(router);
        assert_eq!(series[0].1, "30 30.00000\n10 10.00000\n20 20.00000\n");
    }

    #[test]
    fn test_metrics_keep_first_seen_order() {
        let dir = tempfile::tempdir().unwrap();
        let mut router = SeriesRouter::new(TimeWindow::unbounded(), dir.path());

        router
            .add_datapoint(&Datapoint::new(
                1,
                vec![
                    Reading::new("zeta", 1.0),
                    Reading::new("alpha", 2.0),
                    Reading::new("mid", 3.0),
                ],
            ))
            .unwrap();
        router.add_point(2, "alpha", 4.0).unwrap();

        let metrics: Vec<_> = router.metrics().map(str::to_string).collect();
        assert_eq!(metrics, vec!["zeta", "alpha", "mid"]);
    }

    #[test]
    fn test_values_are_never_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let mut router = SeriesRouter::new(TimeWindow::unbounded(), dir.path());

        router.add_point(1, "volts", -3.25).unwrap();
        router.add_point(2, "volts", 0.0).unwrap();

        let series = drain(router);
        assert_eq!(series[0].1, "1 -3.25000\n2 0.00000\n");
    }

    #[test]
    fn test_unwritable_directory_is_store_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("does-not-exist");
        let mut router = SeriesRouter::new(TimeWindow::unbounded(), missing);

        let err = router.add_point(1, "cpu", 1.0).unwrap_err();
        assert!(matches!(err, FtdcViewError::Store { .. }));
    }
}
