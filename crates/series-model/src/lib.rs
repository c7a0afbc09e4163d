//! ftdcview Series Model
//!
//! Defines the data contracts shared by every stage of a render pass:
//! - **Datapoints:** one timestamp with any number of named readings
//! - **Time windows:** the inclusive `[min, max]` filter applied while routing
//! - **Decoding:** the seam through which a capture file becomes datapoints
//!
//! Timestamps are whole Unix seconds in UTC.

pub mod datapoint;
pub mod decode;
pub mod window;

pub use datapoint::*;
pub use decode::*;
pub use window::*;
