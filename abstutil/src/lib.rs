//! Small utilities shared by the other crates in this workspace: wraparound indexing, JSON
//! (de)serialization to files, and logging setup.

#[macro_use]
extern crate log;

mod collections;
mod io;
pub mod logger;

pub use crate::collections::{wraparound_get, wraparound_idx};
pub use crate::io::{read_json, to_json, write_json};
