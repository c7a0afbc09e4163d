//! ftdcview Console
//!
//! The operator-facing loop. Each input line becomes a [`Command`], the
//! [`SessionState`] turns it into a [`Transition`], and render transitions
//! run a fresh render pass over the full capture with the current window.
//!
//! State handling is pure and I/O-free; [`CommandLoop`] is the only part
//! that touches input, output, and the renderer.

pub mod command;
pub mod command_loop;
pub mod interrupt;
pub mod state;

pub use command::{Bound, Command, CommandError};
pub use command_loop::CommandLoop;
pub use interrupt::Interrupts;
pub use state::{SessionState, Transition, HELP_TEXT, UNKNOWN_COMMAND};
