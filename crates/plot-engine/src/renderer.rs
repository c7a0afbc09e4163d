//! External renderer invocation.

use std::future::Future;
use std::path::Path;
use std::process::{ExitStatus, Stdio};
use std::time::Duration;

use ftdcview_common::config::RendererConfig;
use tokio::process::Command;

/// Why a render produced no image.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("failed to start {binary}: {source}")]
    Spawn {
        binary: String,
        source: std::io::Error,
    },

    #[error("failed waiting on {binary}: {source}")]
    Wait {
        binary: String,
        source: std::io::Error,
    },

    #[error("{binary} exited with {status}")]
    Exit {
        binary: String,
        status: ExitStatus,
        /// Captured stdout followed by stderr.
        output: String,
    },

    #[error("{binary} did not finish within {}s and was killed", .timeout.as_secs_f64())]
    TimedOut { binary: String, timeout: Duration },

    #[error("{binary} was cancelled")]
    Cancelled { binary: String },
}

impl RenderError {
    /// Output captured from a renderer that exited unsuccessfully.
    pub fn output(&self) -> Option<&str> {
        match self {
            RenderError::Exit { output, .. } => Some(output),
            _ => None,
        }
    }
}

/// Runs a compiled script to produce the image.
///
/// Implementations block the caller until the render finishes, fails, or
/// `cancel` resolves.
#[allow(async_fn_in_trait)]
pub trait Renderer {
    async fn render<C>(&self, script: &Path, cancel: C) -> Result<(), RenderError>
    where
        C: Future<Output = ()>;

    /// Renderer name for messages.
    fn name(&self) -> &str;
}

/// Invokes `gnuplot <script>` (or a compatible binary).
#[derive(Debug, Clone)]
pub struct GnuplotRenderer {
    binary: String,
    timeout: Option<Duration>,
}

impl GnuplotRenderer {
    pub fn new(binary: impl Into<String>) -> Self {
        Self {
            binary: binary.into(),
            timeout: None,
        }
    }

    pub fn from_config(config: &RendererConfig) -> Self {
        Self::new(config.binary.clone()).with_timeout(config.timeout())
    }

    /// Kill the renderer if it runs longer than `timeout`.
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// Check if the binary is on `PATH`.
    pub fn is_available(&self) -> bool {
        command_exists(&self.binary)
    }
}

impl Renderer for GnuplotRenderer {
    async fn render<C>(&self, script: &Path, cancel: C) -> Result<(), RenderError>
    where
        C: Future<Output = ()>,
    {
        tracing::debug!(binary = %self.binary, script = %script.display(), "Running renderer");
        let started = std::time::Instant::now();

        let child = Command::new(&self.binary)
            .arg(script)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| RenderError::Spawn {
                binary: self.binary.clone(),
                source,
            })?;

        let deadline = async {
            match self.timeout {
                Some(timeout) => tokio::time::sleep(timeout).await,
                None => std::future::pending().await,
            }
        };

        // Leaving the select early drops the child, which kills it.
        let output = tokio::select! {
            output = child.wait_with_output() => output.map_err(|source| RenderError::Wait {
                binary: self.binary.clone(),
                source,
            })?,
            _ = deadline => {
                tracing::warn!(binary = %self.binary, timeout = ?self.timeout, "Renderer timed out");
                return Err(RenderError::TimedOut {
                    binary: self.binary.clone(),
                    timeout: self.timeout.unwrap_or_default(),
                });
            }
            _ = cancel => {
                tracing::info!(binary = %self.binary, "Render cancelled");
                return Err(RenderError::Cancelled {
                    binary: self.binary.clone(),
                });
            }
        };

        if !output.status.success() {
            let mut combined = String::from_utf8_lossy(&output.stdout).into_owned();
            combined.push_str(&String::from_utf8_lossy(&output.stderr));
            return Err(RenderError::Exit {
                binary: self.binary.clone(),
                status: output.status,
                output: combined,
            });
        }

        tracing::info!(
            binary = %self.binary,
            elapsed_ms = started.elapsed().as_millis(),
            "Render finished"
        );
        Ok(())
    }

    fn name(&self) -> &str {
        &self.binary
    }
}

fn command_exists(binary: &str) -> bool {
    std::process::Command::new("sh")
        .arg("-c")
        .arg("command -v \"$0\" >/dev/null 2>&1")
        .arg(binary)
        .status()
        .map(|status| status.success())
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shell_script(body: &str) -> (tempfile::TempDir, std::path::PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("main.gp");
        std::fs::write(&path, body).unwrap();
        (dir, path)
    }

    #[tokio::test]
    async fn test_successful_render() {
        let (_dir, script) = shell_script("exit 0\n");
        let renderer = GnuplotRenderer::new("sh");
        renderer
            .render(&script, std::future::pending())
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_nonzero_exit_captures_output() {
        let (_dir, script) = shell_script("echo out-line\necho err-line >&2\nexit 3\n");
        let renderer = GnuplotRenderer::new("sh");
        let err = renderer
            .render(&script, std::future::pending())
            .await
            .unwrap_err();

        match &err {
            RenderError::Exit { status, .. } => assert_eq!(status.code(), Some(3)),
            other => panic!("expected exit error, got {other:?}"),
        }
        assert_eq!(err.output(), Some("out-line\nerr-line\n"));
    }

    #[tokio::test]
    async fn test_missing_binary_is_spawn_error() {
        let (_dir, script) = shell_script("");
        let renderer = GnuplotRenderer::new("ftdcview-no-such-renderer");
        let err = renderer
            .render(&script, std::future::pending())
            .await
            .unwrap_err();
        assert!(matches!(err, RenderError::Spawn { .. }));
        assert!(err.output().is_none());
    }

    #[tokio::test]
    async fn test_timeout_kills_renderer() {
        let (_dir, script) = shell_script("sleep 30\n");
        let renderer =
            GnuplotRenderer::new("sh").with_timeout(Some(Duration::from_millis(200)));

        let started = std::time::Instant::now();
        let err = renderer
            .render(&script, std::future::pending())
            .await
            .unwrap_err();
        assert!(matches!(err, RenderError::TimedOut { .. }));
        assert!(started.elapsed() < Duration::from_secs(10));
    }

    #[tokio::test]
    async fn test_cancel_stops_renderer() {
        let (_dir, script) = shell_script("sleep 30\n");
        let renderer = GnuplotRenderer::new("sh");

        let started = std::time::Instant::now();
        let err = renderer
            .render(&script, tokio::time::sleep(Duration::from_millis(100)))
            .await
            .unwrap_err();
        assert!(matches!(err, RenderError::Cancelled { .. }));
        assert!(started.elapsed() < Duration::from_secs(10));
    }

    #[test]
    fn test_is_available() {
        assert!(GnuplotRenderer::new("sh").is_available());
        assert!(!GnuplotRenderer::new("ftdcview-no-such-renderer").is_available());
    }

    #[test]
    fn test_from_config_applies_timeout() {
        let config = RendererConfig {
            binary: "gnuplot".to_string(),
            timeout_secs: Some(9),
        };
        let renderer = GnuplotRenderer::from_config(&config);
        assert_eq!(renderer.name(), "gnuplot");
        assert_eq!(renderer.timeout(), Some(Duration::from_secs(9)));
    }
}
