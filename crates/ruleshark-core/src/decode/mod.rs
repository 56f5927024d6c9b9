//! Link/network/transport decoding into ordered layers.
//!
//! Slicing is delegated to `etherparse`; this module only maps the slices to
//! `LayerInfo` records, outermost first, and appends a `Payload` layer for any
//! bytes left after the innermost header.

pub mod error;
pub mod parser;

pub use error::DecodeError;
pub use parser::decode_packet;
