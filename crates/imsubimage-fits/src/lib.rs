//! FITS-backed collaborators for the `imsubimage` engine.
//!
//! Images are read from and written to the primary HDU of a FITS file. Array
//! axis `i` is FITS axis `NAXIS{i+1}`, so axis indices given to the engine
//! match FITS axis numbering minus one.

pub mod block;
pub mod error;
pub mod header;
pub mod image;
pub mod maskexpr;
pub mod sink;
pub mod source;
pub mod task;
pub mod value;

pub use block::{BLOCK_SIZE, CARDS_PER_BLOCK, CARD_SIZE};
pub use error::{Error, Result};
pub use maskexpr::{CompareOp, MaskExpr};
pub use sink::{FitsFileSink, ImageSink};
pub use source::{FitsFileSource, ImageSource};
pub use task::{extract, run_task, TaskConfig, TaskConfigBuilder, TaskReport};
