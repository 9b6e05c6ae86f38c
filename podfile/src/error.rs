use std::{io, path::Path};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PodError {
	#[error("not found: {0}")]
	NotFound(String),

	#[error("invalid data: {0}")]
	InvalidData(String),

	#[error("out of range: {0}")]
	OutOfRange(String),

	#[error("I/O error: {0}")]
	Io(#[from] io::Error)
}

impl PodError {
	/// Maps a failed `File::open` so that a missing path reads as `NotFound`.
	pub(crate) fn from_open(path: &Path, err: io::Error) -> Self {
		if err.kind() == io::ErrorKind::NotFound {
			Self::NotFound(path.display().to_string())
		} else {
			Self::Io(err)
		}
	}

	pub(crate) fn invalid(msg: impl Into<String>) -> Self {
		Self::InvalidData(msg.into())
	}
}

pub type Result<T> = std::result::Result<T, PodError>;
