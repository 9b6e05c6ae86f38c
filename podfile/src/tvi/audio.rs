use bytes::Bytes;
use crate::error::{PodError, Result};
use super::AUDIO_MARKER;

/// 8-bit unsigned mono PCM.
pub const SAMPLE_RATE: u32 = 11025;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AudioFrame {
	pub frame_number: i32,
	pub duration_ms: i32,
	pub pcm: Bytes
}

impl AudioFrame {
	/// Strips the marker byte; the PCM shares the chunk's buffer.
	pub fn parse(frame_number: i32, chunk: Bytes) -> Result<Self> {
		match chunk.first() {
			Some(&AUDIO_MARKER) => {}
			Some(other) => return Err(PodError::invalid(format!("audio chunk for frame {frame_number} starts with 0x{other:02X}"))),
			None => return Err(PodError::invalid(format!("empty audio chunk for frame {frame_number}")))
		}
		let pcm = chunk.slice(1..);
		let duration_ms = (pcm.len() as u64 * 1000 / SAMPLE_RATE as u64) as i32;
		Ok(Self {frame_number, duration_ms, pcm})
	}

	pub fn sample_rate(&self) -> u32 {
		SAMPLE_RATE
	}
}
