use bytes::{Buf, Bytes};
use tracing::trace;
use crate::error::{PodError, Result};
use super::{decode_video_frame, AudioFrame, DecodeOptions, VideoFrame, AUDIO_MARKER};

/// A decode session over one TVI payload.
///
/// Holds the read cursor, the frame counter and the last decoded frame, which
/// is the delta reference for the next one.
#[derive(Debug)]
pub struct TviStream {
	data: Bytes,
	options: DecodeOptions,
	frame_count: i32,
	frames_decoded: i32,
	previous: Option<VideoFrame>
}

impl TviStream {
	pub fn new(data: impl Into<Bytes>, options: DecodeOptions) -> Result<Self> {
		let mut data = data.into();
		if data.remaining() < 4 {
			return Err(PodError::invalid("tvi stream is too short for its frame count"));
		}
		let frame_count = data.get_i32_le();
		let table_len = usize::try_from(frame_count).ok().and_then(|x| x.checked_mul(4))
			.ok_or_else(|| PodError::invalid(format!("invalid tvi frame count {frame_count}")))?;
		if data.remaining() < table_len {
			return Err(PodError::invalid(format!("tvi frame table of {frame_count} entries does not fit in {} bytes", data.remaining())));
		}
		// the index table is not needed for sequential decoding
		data.advance(table_len);
		Ok(Self {data, options, frame_count, frames_decoded: 0, previous: None})
	}

	/// The frame count declared in the stream header.
	pub fn frame_count(&self) -> i32 {
		self.frame_count
	}

	pub fn frames_decoded(&self) -> i32 {
		self.frames_decoded
	}

	pub fn is_finished(&self) -> bool {
		!self.data.has_remaining()
	}

	fn next_chunk(&mut self) -> Result<Bytes> {
		if self.data.remaining() < 4 {
			return Err(PodError::invalid(format!("truncated chunk length after frame {}", self.frames_decoded)));
		}
		let len = self.data.get_u32_le() as usize;
		if self.data.remaining() < len {
			return Err(PodError::invalid(format!("chunk of {len} bytes overruns the stream ({} left)", self.data.remaining())));
		}
		Ok(self.data.split_to(len))
	}

	/// Decodes the next frame and its audio, if any. Past the end of the
	/// stream this yields a black frame and no audio.
	pub fn next_frame(&mut self) -> Result<(VideoFrame, Option<AudioFrame>)> {
		if self.is_finished() {
			return Ok((VideoFrame::black(self.frames_decoded), None));
		}
		let frame_number = self.frames_decoded;
		let mut chunk = self.next_chunk()?;
		let audio = if chunk.first() == Some(&AUDIO_MARKER) {
			let audio = AudioFrame::parse(frame_number, chunk)?;
			if self.is_finished() {
				return Err(PodError::invalid(format!("audio chunk for frame {frame_number} is not followed by video")));
			}
			chunk = self.next_chunk()?;
			Some(audio)
		} else {
			None
		};
		let video = decode_video_frame(frame_number, &chunk, self.previous.as_ref(), self.options)?;
		trace!(frame_number, video_len = chunk.len(), has_audio = audio.is_some(), "decoded tvi frame");
		self.frames_decoded += 1;
		self.previous = Some(video.clone());
		Ok((video, audio))
	}
}

impl Iterator for TviStream {
	type Item = Result<(VideoFrame, Option<AudioFrame>)>;

	fn next(&mut self) -> Option<Self::Item> {
		if self.is_finished() {
			return None;
		}
		let result = self.next_frame();
		if result.is_err() {
			self.data.clear();
		}
		Some(result)
	}
}
