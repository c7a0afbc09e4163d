//! ftdcview Plot Engine
//!
//! One render pass turns the decoded capture into a gnuplot image:
//!
//! ```text
//! datapoints ──┐
//!              ├── SeriesRouter (window filter, one store per metric)
//! window ──────┘         │
//!                        ▼
//!               series-0000.dat, series-0001.dat, ...
//!                        │
//!                        ├── ScriptCompiler (PlotScript model → main.gp)
//!                        ▼
//!                     main.gp
//!                        │
//!                        ├── Renderer (gnuplot, timeout + cancel)
//!                        ▼
//!                     plot.png
//! ```
//!
//! Every pass lives in its own [`RenderSession`]; dropping the session
//! removes the stores and the script.

pub mod compiler;
pub mod renderer;
pub mod router;
pub mod script;
pub mod session;

pub use compiler::{CompiledScript, PlotOptions, ScriptCompiler};
pub use renderer::{GnuplotRenderer, RenderError, Renderer};
pub use router::{MetricStore, SeriesRouter};
pub use script::{Directive, PlotScript};
pub use session::RenderSession;
