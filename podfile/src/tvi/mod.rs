use bytes::Bytes;
use crate::image::IndexedPixels;

mod audio;
mod stream;
mod video;
pub use audio::{AudioFrame, SAMPLE_RATE};
pub use stream::TviStream;
pub use video::decode_video_frame;

pub const FRAME_WIDTH: usize = 320;
pub const FRAME_HEIGHT: usize = 120;
pub const FRAME_LEN: usize = FRAME_WIDTH * FRAME_HEIGHT;
pub const BLOCK_SIZE: usize = 8;
pub const BLOCKS_ACROSS: usize = FRAME_WIDTH / BLOCK_SIZE;
pub const BLOCKS_DOWN: usize = FRAME_HEIGHT / BLOCK_SIZE;

/// Leading byte of an audio chunk. Anything else is a video block stream.
pub const AUDIO_MARKER: u8 = 0x03;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DecodeOptions {
	/// Fail the frame on an unknown block marker instead of leaving the block black.
	pub strict_block_markers: bool
}

impl DecodeOptions {
	pub fn strict() -> Self {
		Self {strict_block_markers: true}
	}
}

/// One decoded 320×120 frame of palette indices.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VideoFrame {
	pub frame_number: i32,
	pixels: Bytes
}

impl VideoFrame {
	pub fn black(frame_number: i32) -> Self {
		Self {frame_number, pixels: Bytes::from(vec![0u8; FRAME_LEN])}
	}

	pub(crate) fn from_pixels(frame_number: i32, pixels: Vec<u8>) -> Self {
		debug_assert_eq!(pixels.len(), FRAME_LEN);
		Self {frame_number, pixels: pixels.into()}
	}

	pub fn pixels(&self) -> &[u8] {
		&self.pixels
	}
}

impl IndexedPixels for VideoFrame {
	fn width(&self) -> u32 {
		FRAME_WIDTH as u32
	}

	fn height(&self) -> u32 {
		FRAME_HEIGHT as u32
	}

	fn indices(&self) -> &[u8] {
		&self.pixels
	}
}
