//! Builders for synthetic archives and video streams used across unit tests.

use std::io::Write;
use crate::{pod::{Entry, DESCRIPTION_LEN, ENTRY_LEN, HEADER_LEN}, tvi::{AUDIO_MARKER, BLOCKS_ACROSS, BLOCKS_DOWN}};

const BLOCK_COUNT: usize = BLOCKS_ACROSS * BLOCKS_DOWN;

/// Lays out a POD image with entry payloads packed after the table, in order.
pub fn build_pod<D: AsRef<[u8]>>(description: &str, files: &[(&str, &str, D)]) -> Vec<u8> {
	let header_end = HEADER_LEN + files.len() * ENTRY_LEN;
	let mut out = Vec::new();
	out.extend_from_slice(&(files.len() as u32).to_le_bytes());
	let mut desc = [0u8; DESCRIPTION_LEN];
	desc[..description.len()].copy_from_slice(description.as_bytes());
	out.extend_from_slice(&desc);
	let mut offset = header_end;
	for (directory, name, data) in files {
		let len = data.as_ref().len();
		let entry = Entry::new(*directory, *name, len as u32, offset as u32);
		out.extend_from_slice(&entry.encode().unwrap());
		offset += len;
	}
	for (_, _, data) in files {
		out.extend_from_slice(data.as_ref());
	}
	out
}

pub fn write_pod(bytes: &[u8]) -> tempfile::NamedTempFile {
	let mut file = tempfile::NamedTempFile::new().unwrap();
	file.write_all(bytes).unwrap();
	file.flush().unwrap();
	file
}

/// Overwrites the size and offset of table entry `index`.
pub fn patch_entry(pod: &mut [u8], index: usize, size: u32, offset: u32) {
	let at = HEADER_LEN + index * ENTRY_LEN;
	pod[at + 32..at + 36].copy_from_slice(&size.to_le_bytes());
	pod[at + 36..at + 40].copy_from_slice(&offset.to_le_bytes());
}

/// Colour `i` is `(i, 255 - i, i / 2)`.
pub fn ramp_palette() -> Vec<u8> {
	(0..=255u8).flat_map(|i| [i, 255 - i, i / 2]).collect()
}

/// Every block is one RLE run of `colour`.
pub fn solid_frame(colour: u8) -> Vec<u8> {
	[0x02, 0xFF, 64, colour].repeat(BLOCK_COUNT)
}

pub fn copy_frame() -> Vec<u8> {
	vec![0x00; BLOCK_COUNT]
}

pub fn audio_chunk(pcm_len: usize) -> Vec<u8> {
	let mut chunk = vec![AUDIO_MARKER];
	chunk.resize(pcm_len + 1, 0x80);
	chunk
}

/// Wraps chunks in a TVI header whose index table counts the video chunks.
pub fn build_tvi(chunks: &[Vec<u8>]) -> Vec<u8> {
	let mut out = Vec::new();
	let frame_count = chunks.iter().filter(|x| x.first() != Some(&AUDIO_MARKER)).count() as i32;
	out.extend_from_slice(&frame_count.to_le_bytes());
	for i in 0..frame_count {
		out.extend_from_slice(&(i * 1000).to_le_bytes());
	}
	for chunk in chunks {
		out.extend_from_slice(&(chunk.len() as u32).to_le_bytes());
		out.extend_from_slice(chunk);
	}
	out
}
