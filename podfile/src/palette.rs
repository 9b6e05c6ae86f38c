use bytemuck::{Pod, Zeroable};
use crate::error::{PodError, Result};

pub const PALETTE_LEN: usize = 256;
pub const PALETTE_BYTES: usize = PALETTE_LEN * 3;

#[repr(C)]
#[derive(Zeroable, Pod, Clone, Copy, Default, Debug, PartialEq, Eq)]
pub struct Rgb {
	pub r: u8,
	pub g: u8,
	pub b: u8
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Palette {
	colours: [Rgb; PALETTE_LEN]
}

impl Palette {
	pub fn from_bytes(buf: &[u8]) -> Result<Self> {
		if buf.len() != PALETTE_BYTES {
			return Err(PodError::invalid(format!("palette must be {PALETTE_BYTES} bytes, got {}", buf.len())));
		}
		let mut colours = [Rgb::zeroed(); PALETTE_LEN];
		bytemuck::cast_slice_mut::<Rgb, u8>(&mut colours).copy_from_slice(buf);
		Ok(Self {colours})
	}

	pub fn colours(&self) -> &[Rgb; PALETTE_LEN] {
		&self.colours
	}

	pub fn colour(&self, index: u8) -> Rgb {
		self.colours[index as usize]
	}

	pub fn rgba(&self, index: u8) -> [u8; 4] {
		let Rgb {r, g, b} = self.colour(index);
		[r, g, b, 0xFF]
	}

	/// The palette as stored: 256 × (R, G, B).
	pub fn as_bytes(&self) -> &[u8] {
		bytemuck::cast_slice(&self.colours)
	}

	/// Expands palette indices to opaque RGBA, row-major.
	pub fn expand(&self, indices: &[u8]) -> Vec<u8> {
		let mut out = Vec::with_capacity(indices.len() * 4);
		for &index in indices {
			out.extend_from_slice(&self.rgba(index));
		}
		out
	}
}
