// The derive macros refer to `::hl2bsp`, this lets them work inside the crate too.
extern crate self as hl2bsp;

pub mod prelude;

pub mod data;
pub mod entities;
pub mod file;
#[cfg(feature = "meshing")]
pub mod mesh;
pub mod reader;
pub mod resolve;
pub mod tessellate;
pub mod util;


use std::{path::PathBuf, sync::Arc};

use data::header::{LumpEntry, LumpType};
use thiserror::Error;
use util::display_magic_number;

// Re-exports
pub use glam;
pub use smallvec;

pub use data::BspData;
pub use file::BspFile;

#[derive(Debug, Clone, Error)]
pub enum BspParseError {
	#[error("Failed to read {path:?}: {source}")]
	Io {
		path: PathBuf,
		#[source]
		source: Arc<std::io::Error>,
	},
	#[error("File of {size} bytes is too small for a {required} byte VBSP header")]
	HeaderTooSmall { size: usize, required: usize },
	#[error("Lump {lump} ({entry:?}) out of bounds of data! Malformed/corrupted BSP?")]
	LumpOutOfBounds { lump: LumpType, entry: LumpEntry },
	#[error("Tried to read bytes from {from} to {to} from buffer of size {size}")]
	BufferOutOfBounds { from: usize, to: usize, size: usize },
	#[error("Invalid byte range: offset {offset}, length {len} in buffer of size {size}")]
	InvalidRange { offset: i64, len: i64, size: usize },
	#[error("Wrong magic number! Expected {expected}, found \"{}\"", display_magic_number(found))]
	WrongMagicNumber { found: [u8; 4], expected: &'static str },

	/// For telling the user exactly where the error occurred in the process.
	#[error("{0} - {1}")]
	DoingJob(String, Box<BspParseError>),
}

impl BspParseError {
	/// The error behind any [`BspParseError::DoingJob`].
	pub fn root(&self) -> &BspParseError {
		let mut err = self;
		loop {
			match err {
				Self::DoingJob(_, child) => err = child,
				_ => return err,
			}
		}
	}
}

pub type BspResult<T> = Result<T, BspParseError>;

pub trait BspParseResultDoingJobExt {
	/// Like `map_err`, but specifically for adding messages to BSP errors to tell the user exactly what was going on when the error occurred.
	fn job(self, job: impl ToString) -> Self;
}

impl<T> BspParseResultDoingJobExt for BspResult<T> {
	#[inline]
	fn job(self, job: impl ToString) -> Self {
		self.map_err(|err| BspParseError::DoingJob(job.to_string(), Box::new(err)))
	}
}

/// Input for [`BspFile::parse`] and [`BspData::parse`].
#[derive(Debug, Clone, Copy)]
pub struct BspParseInput<'a> {
	/// The data for the BSP file itself.
	pub bsp: &'a [u8],
}

#[test]
fn error_root() {
	let err = Err::<(), _>(BspParseError::BufferOutOfBounds { from: 0, to: 4, size: 2 })
		.job("inner")
		.job("outer")
		.unwrap_err();

	assert!(matches!(err.root(), BspParseError::BufferOutOfBounds { .. }));
	assert_eq!(err.to_string(), "outer - inner - Tried to read bytes from 0 to 4 from buffer of size 2");
}
