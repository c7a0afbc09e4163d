//! The interactive read-eval-render loop.

use std::io::Write;

use ftdcview_common::error::FtdcViewResult;
use ftdcview_plot_engine::{RenderSession, Renderer, ScriptCompiler};
use ftdcview_series_model::Datapoint;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};

use crate::command::Command;
use crate::interrupt::Interrupts;
use crate::state::{SessionState, Transition};

/// Drives operator commands against one decoded capture.
///
/// The capture is borrowed and never modified; every render starts over
/// from it with the current window.
pub struct CommandLoop<'a, R> {
    dataset: &'a [Datapoint],
    state: SessionState,
    compiler: ScriptCompiler,
    renderer: R,
    interrupts: Interrupts,
}

impl<'a, R: Renderer> CommandLoop<'a, R> {
    pub fn new(dataset: &'a [Datapoint], compiler: ScriptCompiler, renderer: R) -> Self {
        Self {
            dataset,
            state: SessionState::new(),
            compiler,
            renderer,
            interrupts: Interrupts::none(),
        }
    }

    pub fn with_state(mut self, state: SessionState) -> Self {
        self.state = state;
        self
    }

    pub fn with_interrupts(mut self, interrupts: Interrupts) -> Self {
        self.interrupts = interrupts;
        self
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    /// Render once, then serve commands from `input` until `quit`, end of
    /// input, or an interrupt at the prompt.
    ///
    /// Renderer failures are reported to `out` and the loop continues.
    /// Failing to build a render session is returned as an error.
    pub async fn run<I, W>(&mut self, mut input: I, out: &mut W) -> FtdcViewResult<()>
    where
        I: AsyncBufRead + Unpin,
        W: Write,
    {
        self.render(out).await?;

        let mut line = String::new();
        loop {
            write!(out, "$ ")?;
            out.flush()?;

            line.clear();
            let read = tokio::select! {
                read = input.read_line(&mut line) => read?,
                _ = self.interrupts.next() => {
                    writeln!(out, "\nExiting...")?;
                    return Ok(());
                }
            };
            if read == 0 {
                writeln!(out, "\nExiting...")?;
                return Ok(());
            }

            match self.state.apply(Command::parse(&line)) {
                Transition::Render => self.render(out).await?,
                Transition::Reply(text) => writeln!(out, "{text}")?,
                Transition::Idle => {}
                Transition::Exit => {
                    writeln!(out, "Exiting...")?;
                    return Ok(());
                }
            }
        }
    }

    /// One full pass: route, compile, render. Session files are removed
    /// when this returns.
    async fn render<W: Write>(&mut self, out: &mut W) -> FtdcViewResult<()> {
        let window = self.state.window();
        let session = RenderSession::prepare(self.dataset, window, &self.compiler)?;

        writeln!(
            out,
            "Output file: `{}`",
            self.compiler.options().output_image.display()
        )?;
        out.flush()?;

        let result = self
            .renderer
            .render(session.script_path(), self.interrupts.next())
            .await;

        match result {
            Ok(()) => {
                tracing::info!(
                    %window,
                    graphs = session.graphs(),
                    points = session.points(),
                    "Rendered plot"
                );
            }
            Err(err) => {
                tracing::warn!(error = %err, "Render failed");
                writeln!(out, "error running {}: {err}", self.renderer.name())?;
                if let Some(output) = err.output() {
                    writeln!(out, "{} output: {output}", self.renderer.name())?;
                }
            }
        }

        Ok(())
    }
}
