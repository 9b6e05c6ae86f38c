use std::borrow::Cow;
use bytes::Bytes;

pub mod error;
pub mod byte_slice;
pub mod byte_iter;
pub mod file_data;
pub mod palette;
pub mod image;
pub mod pod;
pub mod tvi;
#[cfg(test)]
pub(crate) mod test_utils;

pub use error::{PodError, Result};
pub use crate::image::{Image, IndexedPixels};
pub use palette::{Palette, Rgb};
pub use pod::{Entry, Pod};
pub use tvi::{AudioFrame, DecodeOptions, TviStream, VideoFrame};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FileKind {
	Image,
	Palette,
	Text,
	Video,
	Other
}

static FILE_KINDS: phf::Map<&'static str, FileKind> = phf::phf_map! {
	"raw" => FileKind::Image,
	"act" => FileKind::Palette,
	"pal" => FileKind::Palette,
	"txt" => FileKind::Text,
	"tvi" => FileKind::Video
};

impl FileKind {
	pub fn from_extension(ext: &str) -> Self {
		FILE_KINDS.get(ext.to_ascii_lowercase().as_str()).copied().unwrap_or(Self::Other)
	}
}

/// An archive entry decoded according to its extension.
#[derive(Clone, Debug)]
pub enum PodFile {
	Image {entry: Entry, image: Image},
	Palette {entry: Entry, palette: Palette},
	Text {entry: Entry, data: Bytes},
	Video {entry: Entry, data: Bytes},
	Other {entry: Entry, data: Bytes}
}

impl PodFile {
	pub fn decode(entry: Entry, data: Bytes) -> Result<Self> {
		Ok(match FileKind::from_extension(entry.extension()) {
			FileKind::Image => Self::Image {image: Image::from_bytes(&data)?, entry},
			FileKind::Palette => Self::Palette {palette: Palette::from_bytes(&data)?, entry},
			FileKind::Text => Self::Text {entry, data},
			FileKind::Video => Self::Video {entry, data},
			FileKind::Other => Self::Other {entry, data}
		})
	}

	pub fn kind(&self) -> FileKind {
		match self {
			Self::Image {..} => FileKind::Image,
			Self::Palette {..} => FileKind::Palette,
			Self::Text {..} => FileKind::Text,
			Self::Video {..} => FileKind::Video,
			Self::Other {..} => FileKind::Other
		}
	}

	pub fn entry(&self) -> &Entry {
		match self {
			Self::Image {entry, ..}
			| Self::Palette {entry, ..}
			| Self::Text {entry, ..}
			| Self::Video {entry, ..}
			| Self::Other {entry, ..} => entry
		}
	}

	pub fn directory(&self) -> &str {
		&self.entry().directory
	}

	pub fn name(&self) -> &str {
		&self.entry().name
	}

	pub fn extension(&self) -> &str {
		self.entry().extension()
	}

	/// The entry's bytes exactly as stored in the archive.
	pub fn as_bytes(&self) -> &[u8] {
		match self {
			Self::Image {image, ..} => image.indices(),
			Self::Palette {palette, ..} => palette.as_bytes(),
			Self::Text {data, ..} | Self::Video {data, ..} | Self::Other {data, ..} => &data[..]
		}
	}

	/// Text content, with invalid UTF-8 replaced. `None` for other kinds.
	pub fn text(&self) -> Option<Cow<'_, str>> {
		match self {
			Self::Text {data, ..} => Some(String::from_utf8_lossy(data)),
			_ => None
		}
	}

	/// Starts a decode session over a video entry. `None` for other kinds.
	pub fn frames(&self, options: DecodeOptions) -> Option<Result<TviStream>> {
		match self {
			Self::Video {data, ..} => Some(TviStream::new(data.clone(), options)),
			_ => None
		}
	}
}
