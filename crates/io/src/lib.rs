//! # aepsel-io
//!
//! Read selection inputs (result tensors, target tables, IFD tables) from
//! JSON and write result tensors and selection reports back out. Missing
//! values travel as JSON `null` and become NaN in memory.

mod error;
mod reader;
mod validate;
mod writer;

pub use error::IoError;
pub use reader::{read_ifd_table, read_targets, read_tensor};
pub use writer::{write_report, write_tensor};
