use std::{fs::File, io::{Read, Seek, SeekFrom}, path::{Path, PathBuf}};
use bytes::Bytes;
use tracing::{trace, warn};
use crate::error::{PodError, Result};

/// A byte range inside a file on disk, read on demand.
///
/// No handle is kept between reads: every `read` opens the file, checks the
/// range against the file's current length and closes it again, so handles
/// can be shared freely between threads.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FileData {
	path: PathBuf,
	start: u64,
	size: u32
}

impl FileData {
	pub fn new(path: impl Into<PathBuf>, start: u64, size: u32) -> Self {
		Self {path: path.into(), start, size}
	}

	pub fn path(&self) -> &Path {
		&self.path
	}

	pub fn start(&self) -> u64 {
		self.start
	}

	pub fn len(&self) -> usize {
		self.size as usize
	}

	pub fn is_empty(&self) -> bool {
		self.size == 0
	}

	pub fn read(&self) -> Result<Bytes> {
		let mut file = File::open(&self.path).map_err(|e| PodError::from_open(&self.path, e))?;
		let file_len = file.metadata()?.len();
		let end = self.start + self.size as u64;
		if end > file_len {
			warn!(path = %self.path.display(), start = self.start, size = self.size, file_len, "entry no longer fits in archive");
			return Err(PodError::invalid(format!(
				"range {}..{end} is outside {} ({file_len} bytes)",
				self.start, self.path.display()
			)));
		}
		file.seek(SeekFrom::Start(self.start))?;
		let mut buf = vec![0u8; self.size as usize];
		file.read_exact(&mut buf)?;
		trace!(path = %self.path.display(), start = self.start, size = self.size, "read entry data");
		Ok(buf.into())
	}
}
