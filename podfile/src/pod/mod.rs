use std::{fs::File, io::{BufReader, Read}, path::{Path, PathBuf}};
use bytes::Bytes;
use tracing::{debug, trace};
use crate::{byte_slice::ByteSlice, error::{PodError, Result}, file_data::FileData, tvi::{DecodeOptions, TviStream}, PodFile};

mod entry;
pub use entry::{Entry, ENTRY_LEN, NAME_FIELD_LEN};

pub const DESCRIPTION_LEN: usize = 80;
pub const HEADER_LEN: usize = 4 + DESCRIPTION_LEN;

/// A loaded POD archive. Only the directory is kept in memory; entry bytes
/// are read from the backing file on each extraction.
#[derive(Clone, Debug)]
pub struct Pod {
	path: PathBuf,
	description: String,
	entries: Box<[Entry]>,
	total_size: u64
}

impl Pod {
	pub fn load(path: impl AsRef<Path>) -> Result<Self> {
		let path = path.as_ref();
		let file = File::open(path).map_err(|e| PodError::from_open(path, e))?;
		let total_size = file.metadata()?.len();
		let mut file = BufReader::new(file);

		let mut header = [0u8; HEADER_LEN];
		read_section(&mut file, &mut header, "header")?;
		let count = header.read_u32_field(0, "entry count")? as u64;
		let header_end = HEADER_LEN as u64 + count * ENTRY_LEN as u64;
		if header_end > total_size {
			return Err(PodError::invalid(format!("entry count {count} needs a {header_end} byte table but the archive is {total_size} bytes")));
		}
		let description = description_from(&header[4..]);

		let mut table = vec![0u8; (count as usize) * ENTRY_LEN];
		read_section(&mut file, &mut table, "entry table")?;
		let entries = table.chunks_exact(ENTRY_LEN).map(Entry::decode).collect::<Result<Box<[Entry]>>>()?;

		for entry in &entries {
			if (entry.offset as u64) < header_end {
				return Err(PodError::invalid(format!("entry {} starts at {} inside the {header_end} byte header", entry.path(), entry.offset)));
			}
			if entry.end() > total_size {
				return Err(PodError::invalid(format!("entry {} ends at {} past the {total_size} byte archive", entry.path(), entry.end())));
			}
		}

		debug!(path = %path.display(), entries = entries.len(), description = %description, "loaded pod archive");
		Ok(Self {path: path.to_path_buf(), description, entries, total_size})
	}

	pub fn path(&self) -> &Path {
		&self.path
	}

	pub fn description(&self) -> &str {
		&self.description
	}

	/// Entries in the order they appear in the archive's table.
	pub fn entries(&self) -> &[Entry] {
		&self.entries
	}

	pub fn total_size(&self) -> u64 {
		self.total_size
	}

	pub fn find(&self, directory: &str, name: &str) -> Option<&Entry> {
		self.entries.iter().find(|x| x.matches(directory, name))
	}

	fn find_or_err(&self, directory: &str, name: &str) -> Result<&Entry> {
		self.find(directory, name).ok_or_else(|| PodError::NotFound(format!("{directory}\\{name} in {}", self.path.display())))
	}

	/// Names sorted case-insensitively, ties broken by ordinal comparison.
	pub fn list_names(&self) -> Vec<&str> {
		let mut names = self.entries.iter().map(|x| x.name.as_str()).collect::<Vec<_>>();
		names.sort_by(|a, b| a.to_ascii_lowercase().cmp(&b.to_ascii_lowercase()).then_with(|| a.cmp(b)));
		names
	}

	pub fn entry_data(&self, entry: &Entry) -> FileData {
		FileData::new(&self.path, entry.offset as u64, entry.size)
	}

	pub fn extract(&self, directory: &str, name: &str) -> Result<Bytes> {
		let entry = self.find_or_err(directory, name)?;
		trace!(entry = %entry.path(), size = entry.size, offset = entry.offset, "extracting");
		self.entry_data(entry).read()
	}

	/// Extracts by `DIR\NAME` path; a path without a backslash names a root entry.
	pub fn extract_path(&self, path: &str) -> Result<Bytes> {
		let (directory, name) = path.rsplit_once('\\').unwrap_or(("", path));
		self.extract(directory, name)
	}

	pub fn open(&self, directory: &str, name: &str) -> Result<PodFile> {
		let entry = self.find_or_err(directory, name)?;
		let data = self.entry_data(entry).read()?;
		PodFile::decode(entry.clone(), data)
	}

	pub fn tvi_stream(&self, directory: &str, name: &str, options: DecodeOptions) -> Result<TviStream> {
		TviStream::new(self.extract(directory, name)?, options)
	}
}

fn read_section(file: &mut impl Read, buf: &mut [u8], what: &str) -> Result<()> {
	file.read_exact(buf).map_err(|e| match e.kind() {
		std::io::ErrorKind::UnexpectedEof => PodError::invalid(format!("archive is too short for its {what}")),
		_ => e.into()
	})
}

fn description_from(field: &[u8]) -> String {
	let len = field.iter().rposition(|x| *x != 0).map_or(0, |i| i + 1);
	entry::latin1(&field[..len])
}
