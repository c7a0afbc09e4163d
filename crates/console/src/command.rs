//! Operator command parsing.

use ftdcview_series_model::{parse_utc_timestamp, TimeWindow, TimestampSecs, TIMESTAMP_EXAMPLE};

/// Which end of a `range` command failed to parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bound {
    Start,
    End,
}

impl Bound {
    /// Keyword that selects the open bound at this end.
    pub fn keyword(self) -> &'static str {
        match self {
            Bound::Start => "start",
            Bound::End => "end",
        }
    }

    fn open_value(self) -> TimestampSecs {
        match self {
            Bound::Start => TimeWindow::OPEN_MIN,
            Bound::End => TimeWindow::OPEN_MAX,
        }
    }
}

impl std::fmt::Display for Bound {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.keyword())
    }
}

/// A command the operator typed that cannot be carried out.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CommandError {
    #[error("Error parsing {bound} time. Working example: `{}` Inp: {input:?} Err: {source}", TIMESTAMP_EXAMPLE)]
    InvalidBound {
        bound: Bound,
        input: String,
        source: chrono::ParseError,
    },

    #[error("Expected `range <start> <end>`. Inp: {input:?}")]
    RangeArity { input: String },
}

/// One parsed input line.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Restrict rendering to `[min_secs, max_secs]`.
    Range {
        min_secs: TimestampSecs,
        max_secs: TimestampSecs,
    },
    ResetRange,
    Help,
    Quit,
    Empty,
    Unknown(String),
    /// A recognized command with bad arguments.
    Invalid(CommandError),
}

impl Command {
    /// Parse one line of operator input. Never fails; problems become
    /// [`Command::Invalid`] or [`Command::Unknown`].
    pub fn parse(line: &str) -> Self {
        let line = line.trim();
        let words: Vec<&str> = line.split_whitespace().collect();

        match words.as_slice() {
            [] => Command::Empty,
            ["quit"] => Command::Quit,
            ["h"] | ["help"] => Command::Help,
            ["reset", "range"] => Command::ResetRange,
            ["range", args @ ..] => parse_range(line, args),
            _ => Command::Unknown(line.to_string()),
        }
    }
}

fn parse_range(line: &str, args: &[&str]) -> Command {
    let [start, end] = args else {
        return Command::Invalid(CommandError::RangeArity {
            input: line.to_string(),
        });
    };

    let min_secs = match parse_bound(Bound::Start, start) {
        Ok(secs) => secs,
        Err(err) => return Command::Invalid(err),
    };
    let max_secs = match parse_bound(Bound::End, end) {
        Ok(secs) => secs,
        Err(err) => return Command::Invalid(err),
    };

    Command::Range { min_secs, max_secs }
}

/// Parse one bound: its keyword selects the open end, anything else must
/// be a `YYYY-MM-DDTHH:MM:SS` UTC timestamp.
pub fn parse_bound(bound: Bound, input: &str) -> Result<TimestampSecs, CommandError> {
    if input == bound.keyword() {
        return Ok(bound.open_value());
    }
    parse_utc_timestamp(input).map_err(|source| CommandError::InvalidBound {
        bound,
        input: input.to_string(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_commands() {
        assert_eq!(Command::parse(""), Command::Empty);
        assert_eq!(Command::parse("   \n"), Command::Empty);
        assert_eq!(Command::parse("quit\n"), Command::Quit);
        assert_eq!(Command::parse("h"), Command::Help);
        assert_eq!(Command::parse("help"), Command::Help);
        assert_eq!(Command::parse("reset range"), Command::ResetRange);
        assert_eq!(
            Command::parse("zoom in"),
            Command::Unknown("zoom in".to_string())
        );
    }

    #[test]
    fn test_range_with_timestamps() {
        assert_eq!(
            Command::parse("range 2024-09-24T18:00:00 2024-09-24T18:30:00"),
            Command::Range {
                min_secs: 1_727_200_800,
                max_secs: 1_727_202_600,
            }
        );
    }

    #[test]
    fn test_range_keywords_map_to_open_bounds() {
        assert_eq!(
            Command::parse("range start 2024-09-24T18:30:00"),
            Command::Range {
                min_secs: 0,
                max_secs: 1_727_202_600,
            }
        );
        assert_eq!(
            Command::parse("range 2024-09-24T18:00:00 end"),
            Command::Range {
                min_secs: 1_727_200_800,
                max_secs: i64::MAX,
            }
        );
        assert_eq!(
            Command::parse("range start end"),
            Command::Range {
                min_secs: 0,
                max_secs: i64::MAX,
            }
        );
    }

    #[test]
    fn test_keywords_only_apply_to_their_own_end() {
        assert!(matches!(
            Command::parse("range end start"),
            Command::Invalid(CommandError::InvalidBound {
                bound: Bound::Start,
                ..
            })
        ));
    }

    #[test]
    fn test_bad_start_reported_before_end() {
        match Command::parse("range yesterday tomorrow") {
            Command::Invalid(err @ CommandError::InvalidBound { .. }) => {
                let msg = err.to_string();
                assert!(msg.starts_with(
                    "Error parsing start time. Working example: `2024-09-24T18:00:00` Inp: \"yesterday\" Err: "
                ));
            }
            other => panic!("expected invalid start bound, got {other:?}"),
        }
    }

    #[test]
    fn test_bad_end_reported() {
        match Command::parse("range start 2024-09-24") {
            Command::Invalid(CommandError::InvalidBound { bound, input, .. }) => {
                assert_eq!(bound, Bound::End);
                assert_eq!(input, "2024-09-24");
            }
            other => panic!("expected invalid end bound, got {other:?}"),
        }
    }

    #[test]
    fn test_range_requires_two_bounds() {
        for line in ["range", "range start", "range start end extra"] {
            assert!(
                matches!(
                    Command::parse(line),
                    Command::Invalid(CommandError::RangeArity { .. })
                ),
                "{line}"
            );
        }
    }
}
