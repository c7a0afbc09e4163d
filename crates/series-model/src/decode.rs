//! Capture decoding.
//!
//! The binary FTDC codec lives outside this workspace. Anything that turns a
//! byte stream into ordered [`Datapoint`]s plugs in through [`DatapointDecoder`];
//! [`JsonlDecoder`] reads the flattened export, one datapoint per line:
//!
//! ```text
//! # optional comment lines
//! {"t":1727200800,"readings":[{"metric":"cpu","value":12.5},{"metric":"mem","value":0.4}]}
//! ```

use std::io::{BufRead, BufReader, Read};

use ftdcview_common::error::{FtdcViewError, FtdcViewResult};

use crate::datapoint::Datapoint;

/// Turns a readable capture into datapoints, in capture order.
///
/// Decoding is all-or-nothing: any failure aborts with an error and no
/// partial results.
pub trait DatapointDecoder {
    fn decode(&self, reader: &mut dyn Read) -> FtdcViewResult<Vec<Datapoint>>;

    /// Decoder name for logs.
    fn name(&self) -> &str;
}

/// Decoder for JSON-lines flattened captures.
#[derive(Debug, Default, Clone, Copy)]
pub struct JsonlDecoder;

impl DatapointDecoder for JsonlDecoder {
    fn decode(&self, reader: &mut dyn Read) -> FtdcViewResult<Vec<Datapoint>> {
        let reader = BufReader::new(reader);
        let mut datapoints = Vec::new();

        for (index, line) in reader.lines().enumerate() {
            let line = line?;
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }
            let datapoint: Datapoint = serde_json::from_str(trimmed)
                .map_err(|e| FtdcViewError::decode(index + 1, e.to_string()))?;
            datapoints.push(datapoint);
        }

        tracing::debug!(datapoints = datapoints.len(), "Decoded JSONL capture");
        Ok(datapoints)
    }

    fn name(&self) -> &str {
        "jsonl"
    }
}
