use crate::{byte_slice::ByteSlice, error::{PodError, Result}};

pub const ENTRY_LEN: usize = 40;
pub const NAME_FIELD_LEN: usize = 32;

const DIR_DELIMITER: u8 = b'\\';

/// One record of the POD directory table.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Entry {
	pub directory: String,
	pub name: String,
	pub extra: Option<String>,
	pub size: u32,
	pub offset: u32
}

impl Entry {
	pub fn new(directory: impl Into<String>, name: impl Into<String>, size: u32, offset: u32) -> Self {
		Self {
			directory: directory.into(),
			name: name.into(),
			extra: None,
			size,
			offset
		}
	}

	pub fn with_extra(mut self, extra: impl Into<String>) -> Self {
		let extra = extra.into();
		self.extra = if extra.is_empty() {None} else {Some(extra)};
		self
	}

	/// `DIR\NAME`, or just the name for entries at the archive root.
	pub fn path(&self) -> String {
		if self.directory.is_empty() {
			self.name.clone()
		} else {
			format!("{}\\{}", self.directory, self.name)
		}
	}

	pub fn extension(&self) -> &str {
		self.name.rsplit_once('.').map_or("", |(_, ext)| ext)
	}

	pub fn matches(&self, directory: &str, name: &str) -> bool {
		self.directory.eq_ignore_ascii_case(directory) && self.name.eq_ignore_ascii_case(name)
	}

	pub(crate) fn end(&self) -> u64 {
		self.offset as u64 + self.size as u64
	}

	pub fn encode(&self) -> Result<[u8; ENTRY_LEN]> {
		let mut field = Vec::with_capacity(NAME_FIELD_LEN);
		if !self.directory.is_empty() {
			push_component(&mut field, &self.directory, "directory")?;
			field.push(DIR_DELIMITER);
		}
		push_component(&mut field, &self.name, "name")?;
		if let Some(extra) = self.extra.as_deref().filter(|x| !x.is_empty()) {
			field.push(0);
			push_component(&mut field, extra, "extra")?;
		}
		if field.len() > NAME_FIELD_LEN {
			return Err(PodError::invalid(format!("name field for {} is {} bytes, limit is {NAME_FIELD_LEN}", self.path(), field.len())));
		}
		let size = i32::try_from(self.size).map_err(|_| PodError::invalid(format!("size {} does not fit the entry record", self.size)))?;
		let offset = i32::try_from(self.offset).map_err(|_| PodError::invalid(format!("offset {} does not fit the entry record", self.offset)))?;

		let mut out = [0u8; ENTRY_LEN];
		out[..field.len()].copy_from_slice(&field);
		out[32..36].copy_from_slice(&size.to_le_bytes());
		out[36..40].copy_from_slice(&offset.to_le_bytes());
		Ok(out)
	}

	pub fn decode(record: &[u8]) -> Result<Self> {
		if record.len() != ENTRY_LEN {
			return Err(PodError::invalid(format!("entry record must be {ENTRY_LEN} bytes, got {}", record.len())));
		}
		let field = &record[..NAME_FIELD_LEN];
		let field = &field[..field.iter().rposition(|x| *x != 0).map_or(0, |i| i + 1)];
		let (directory, rest) = match field.iter().position(|x| *x == DIR_DELIMITER) {
			Some(i) => (&field[..i], &field[i + 1..]),
			None => (&[][..], field)
		};
		let (name, extra) = match rest.iter().position(|x| *x == 0) {
			Some(i) => (&rest[..i], Some(latin1(&rest[i + 1..]))),
			None => (rest, None)
		};

		let size = record.read_i32_field(32, "entry size")?;
		let offset = record.read_i32_field(36, "entry offset")?;
		let name = latin1(name);
		if size < 0 || offset < 0 {
			return Err(PodError::invalid(format!("entry {name} has negative size {size} or offset {offset}")));
		}
		Ok(Self {
			directory: latin1(directory),
			name,
			extra,
			size: size as u32,
			offset: offset as u32
		})
	}
}

fn push_component(field: &mut Vec<u8>, value: &str, what: &str) -> Result<()> {
	if !value.is_ascii() || value.bytes().any(|b| b == 0 || b == DIR_DELIMITER) {
		return Err(PodError::invalid(format!("{what} {value:?} cannot be stored in an entry name field")));
	}
	field.extend_from_slice(value.as_bytes());
	Ok(())
}

pub(crate) fn latin1(bytes: &[u8]) -> String {
	bytes.iter().map(|&b| b as char).collect()
}
