//! Operator session state machine.
//!
//! The window is the only state carried between commands. Applying a
//! command is pure: it updates the window and names the next step, and the
//! loop carries that step out.

use ftdcview_series_model::TimeWindow;

use crate::command::Command;

pub const HELP_TEXT: &str = "\
range <start> <end>
-  Only plot datapoints within the given range. \"zoom in\"
-  E.g: range 2024-09-24T18:00:00 2024-09-24T18:30:00
-       range start 2024-09-24T18:30:00
-       range 2024-09-24T18:00:00 end
-  All times in UTC

reset range
-  Unset any prior range. \"zoom out to full\"

`quit` or Ctrl-d to exit";

pub const UNKNOWN_COMMAND: &str = "Unknown command. Type `h` for help.";

/// What the loop does after a command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition {
    /// Run a fresh render pass with the current window.
    Render,
    /// Print a reply; nothing is rendered.
    Reply(String),
    /// Do nothing.
    Idle,
    /// Leave the loop.
    Exit,
}

/// State threaded through the operator loop.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionState {
    window: TimeWindow,
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_window(window: TimeWindow) -> Self {
        Self { window }
    }

    /// Window the next render pass filters by.
    pub fn window(&self) -> TimeWindow {
        self.window
    }

    /// Apply one command. Rejected commands leave the window untouched.
    pub fn apply(&mut self, command: Command) -> Transition {
        match command {
            Command::Range { min_secs, max_secs } => {
                self.window = TimeWindow::new(min_secs, max_secs);
                if min_secs > max_secs {
                    tracing::warn!(window = %self.window, "Range start is after its end; nothing will plot");
                }
                Transition::Render
            }
            Command::ResetRange => {
                self.window = TimeWindow::unbounded();
                Transition::Render
            }
            Command::Help => Transition::Reply(HELP_TEXT.to_string()),
            Command::Quit => Transition::Exit,
            Command::Empty => Transition::Idle,
            Command::Unknown(line) => {
                tracing::debug!(input = %line, "Unknown command");
                Transition::Reply(UNKNOWN_COMMAND.to_string())
            }
            Command::Invalid(err) => Transition::Reply(err.to_string()),
        }
    }
}
