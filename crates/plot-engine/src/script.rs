//! In-memory model of a gnuplot script.
//!
//! Directives carry plain values; quoting and markup escaping happen only
//! in serialization, so no metric name or path can alter the script's
//! structure.

use std::fmt;
use std::path::PathBuf;

/// One gnuplot statement.
#[derive(Debug, Clone, PartialEq)]
pub enum Directive {
    /// `set term png size W, H`
    Terminal { width: u32, height: u32 },

    /// `set output '<image>'`
    Output(PathBuf),

    /// Grid of independent graphs, filled row by row.
    Multiplot { rows: usize, columns: usize },

    /// `set timefmt`: how time values are read from the data files.
    TimeFormat(String),

    /// `set format x`: how time ticks are printed.
    XTickFormat(String),

    XLabel(String),

    /// `set xdata time`
    XDataTime,

    /// y-axis range; `None` autoscales both ends.
    YRange { floor: Option<f64> },

    /// One graph drawn from a two-column data file.
    Plot { data: PathBuf, title: String },
}

/// Ordered list of directives forming one top-level script.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlotScript {
    directives: Vec<Directive>,
}

impl PlotScript {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, directive: Directive) -> &mut Self {
        self.directives.push(directive);
        self
    }

    pub fn directives(&self) -> &[Directive] {
        &self.directives
    }

    /// Number of graphs the script draws.
    pub fn plot_count(&self) -> usize {
        self.directives
            .iter()
            .filter(|d| matches!(d, Directive::Plot { .. }))
            .count()
    }

    /// Serialize to gnuplot source, one directive per line.
    pub fn render(&self) -> String {
        let mut out = String::new();
        for directive in &self.directives {
            out.push_str(&directive.to_string());
            out.push('\n');
        }
        out
    }
}

impl fmt::Display for Directive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Directive::Terminal { width, height } => {
                write!(f, "set term png size {width}, {height}")
            }
            Directive::Output(path) => {
                write!(f, "set output {}", quote(&path.display().to_string()))
            }
            Directive::Multiplot { rows, columns } => write!(
                f,
                "set multiplot layout {rows},{columns} margins 0.05,0.9, 0.05,0.9 spacing screen 0, char 5"
            ),
            Directive::TimeFormat(fmt_str) => write!(f, "set timefmt {}", quote(fmt_str)),
            Directive::XTickFormat(fmt_str) => write!(f, "set format x {}", quote(fmt_str)),
            Directive::XLabel(label) => write!(f, "set xlabel {}", quote(label)),
            Directive::XDataTime => write!(f, "set xdata time"),
            Directive::YRange { floor: Some(floor) } => write!(f, "set yrange [{floor}:*]"),
            Directive::YRange { floor: None } => write!(f, "set autoscale y"),
            Directive::Plot { data, title } => write!(
                f,
                "plot {} using 1:2 with lines linestyle 7 lw 4 title {}",
                quote(&data.display().to_string()),
                quote(&escape_title(title))
            ),
        }
    }
}

/// Single-quote `value` for gnuplot. Embedded quotes are doubled and line
/// breaks flattened so the argument cannot end early or span lines.
pub fn quote(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('\'');
    for c in value.chars() {
        match c {
            '\'' => out.push_str("''"),
            '\n' | '\r' => out.push(' '),
            _ => out.push(c),
        }
    }
    out.push('\'');
    out
}

/// Escape underscores so enhanced-text mode prints them instead of
/// starting a subscript.
pub fn escape_title(metric: &str) -> String {
    metric.replace('_', "\\_")
}
