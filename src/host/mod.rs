//! Binding layer for a numeric scripting host.
//!
//! Host values are matrices, strings and records; [`entry`] exposes the
//! `refine`, `read` and `write` calls over them.

pub mod entry;
pub mod value;

pub use entry::{call_read, call_refine, call_write};
pub use value::HostValue;
