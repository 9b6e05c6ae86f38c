use tracing::debug;
use crate::{byte_iter::ByteIter, error::{PodError, Result}};
use super::{DecodeOptions, VideoFrame, BLOCKS_ACROSS, BLOCKS_DOWN, BLOCK_SIZE, FRAME_LEN, FRAME_WIDTH};

const BLOCK_COPY: u8 = 0x00;
const BLOCK_RLE: u8 = 0x02;
const BLOCK_COMPRESSED: u8 = 0x04;

const RLE_RUN: u8 = 0xFF;

static BLACK_FRAME: [u8; FRAME_LEN] = [0; FRAME_LEN];

/// Decodes one block stream. Copy blocks read from `previous`, or from an
/// all-black frame when there is none.
pub fn decode_video_frame(frame_number: i32, chunk: &[u8], previous: Option<&VideoFrame>, options: DecodeOptions) -> Result<VideoFrame> {
	let previous = previous.map_or(&BLACK_FRAME[..], |x| x.pixels());
	let mut out = vec![0u8; FRAME_LEN];
	let mut src = chunk.iter().copied();
	for block_y in 0..BLOCKS_DOWN {
		for block_x in 0..BLOCKS_ACROSS {
			let origin = block_y * BLOCK_SIZE * FRAME_WIDTH + block_x * BLOCK_SIZE;
			match src.next_u8("block marker")? {
				BLOCK_COPY => copy_block(&mut out, previous, origin),
				BLOCK_RLE => decode_rle_block(&mut src, &mut out, origin)?,
				BLOCK_COMPRESSED => decode_compressed_block(&mut src, &mut out, origin)?,
				marker if options.strict_block_markers => {
					return Err(PodError::invalid(format!("unknown block marker 0x{marker:02X} at block ({block_x}, {block_y}) of frame {frame_number}")));
				}
				marker => debug!(frame_number, block_x, block_y, marker, "skipping unknown block marker")
			}
		}
	}
	Ok(VideoFrame::from_pixels(frame_number, out))
}

fn block_rows(out: &mut [u8], origin: usize) -> impl Iterator<Item = &mut [u8]> {
	out[origin..].chunks_mut(FRAME_WIDTH).take(BLOCK_SIZE).map(|row| &mut row[..BLOCK_SIZE])
}

fn copy_block(out: &mut [u8], previous: &[u8], origin: usize) {
	for (y, row) in block_rows(out, origin).enumerate() {
		let start = origin + y * FRAME_WIDTH;
		row.copy_from_slice(&previous[start..start + BLOCK_SIZE]);
	}
}

fn decode_rle_block(src: &mut impl ByteIter, out: &mut [u8], origin: usize) -> Result<()> {
	let mut colour = 0;
	let mut remaining = 0u8;
	for row in block_rows(out, origin) {
		for pixel in row {
			if remaining > 0 {
				remaining -= 1;
			} else {
				let sub = src.next_u8("rle sub-byte")?;
				if sub == RLE_RUN {
					let [count, run_colour] = src.next_bytes::<2>("rle run")?;
					// the pixel emitted here is the first of the run
					remaining = count.saturating_sub(1);
					colour = run_colour;
				} else {
					colour = sub;
				}
			}
			*pixel = colour;
		}
	}
	Ok(())
}

fn decode_compressed_block(src: &mut impl ByteIter, out: &mut [u8], origin: usize) -> Result<()> {
	let table = src.next_bytes::<8>("compressed block colour table")?;
	for row in block_rows(out, origin) {
		let [lowest, middle, highest] = src.next_bytes::<3>("compressed block row")?;
		let mut mask = 0x80u8;
		for pixel in row {
			let index = (lowest & mask != 0) as usize
				| ((middle & mask != 0) as usize) << 1
				| ((highest & mask != 0) as usize) << 2;
			*pixel = table[index];
			mask >>= 1;
		}
	}
	Ok(())
}

#[cfg(test)]
mod tests {
	use super::*;
	use pretty_assertions::assert_eq;

	const BLOCK_COUNT: usize = BLOCKS_ACROSS * BLOCKS_DOWN;

	/// A stream whose first block is `first` and every other block copies.
	fn with_first_block(first: &[u8]) -> Vec<u8> {
		let mut stream = first.to_vec();
		stream.resize(first.len() + BLOCK_COUNT - 1, BLOCK_COPY);
		stream
	}

	fn block_pixels(frame: &VideoFrame, block_x: usize, block_y: usize) -> Vec<u8> {
		let origin = block_y * BLOCK_SIZE * FRAME_WIDTH + block_x * BLOCK_SIZE;
		(0..BLOCK_SIZE).flat_map(|y| frame.pixels()[origin + y * FRAME_WIDTH..][..BLOCK_SIZE].to_vec()).collect()
	}

	fn patterned_frame() -> VideoFrame {
		VideoFrame::from_pixels(0, (0..FRAME_LEN).map(|i| (i * 7 % 256) as u8).collect())
	}

	#[test]
	fn copy_stream_without_previous_is_black() {
		let frame = decode_video_frame(0, &[BLOCK_COPY; BLOCK_COUNT], None, DecodeOptions::default()).unwrap();
		assert_eq!(frame.pixels(), &BLACK_FRAME[..]);
		assert_eq!(frame.frame_number, 0);
	}

	#[test]
	fn copy_stream_reproduces_previous() {
		let previous = patterned_frame();
		let frame = decode_video_frame(1, &[BLOCK_COPY; BLOCK_COUNT], Some(&previous), DecodeOptions::default()).unwrap();
		assert_eq!(frame.pixels(), previous.pixels());
	}

	#[test]
	fn copy_block_matches_previous_region() {
		let previous = patterned_frame();
		// fill every block with colour 9 except block (3, 2), which copies
		let fill = [BLOCK_RLE, RLE_RUN, 64, 9];
		let target = 2 * BLOCKS_ACROSS + 3;
		let mut stream = Vec::new();
		for i in 0..BLOCK_COUNT {
			if i == target {
				stream.push(BLOCK_COPY);
			} else {
				stream.extend_from_slice(&fill);
			}
		}
		let frame = decode_video_frame(1, &stream, Some(&previous), DecodeOptions::default()).unwrap();
		let origin = 2 * BLOCK_SIZE * FRAME_WIDTH + 3 * BLOCK_SIZE;
		for y in 0..BLOCK_SIZE {
			for x in 0..BLOCK_SIZE {
				let at = origin + y * FRAME_WIDTH + x;
				assert_eq!(frame.pixels()[at], previous.pixels()[at], "pixel ({x}, {y})");
			}
		}
		assert_eq!(block_pixels(&frame, 4, 2), vec![9; 64]);
		assert_eq!(block_pixels(&frame, 0, 0), vec![9; 64]);
	}

	#[test]
	fn rle_run_of_five() {
		let mut block = vec![BLOCK_RLE, RLE_RUN, 0x05, 0x07];
		block.extend((0..59).map(|x| x as u8 + 10));
		let frame = decode_video_frame(0, &with_first_block(&block), None, DecodeOptions::default()).unwrap();
		let pixels = block_pixels(&frame, 0, 0);
		assert_eq!(&pixels[..5], &[7; 5]);
		assert_eq!(pixels[5], 10);
		assert_eq!(pixels[63], 68);
		// the run reads row-major, so the first row holds the run and three literals
		assert_eq!(&frame.pixels()[..8], &[7, 7, 7, 7, 7, 10, 11, 12]);
	}

	#[test]
	fn rle_run_of_one_emits_a_single_pixel() {
		let mut block = vec![BLOCK_RLE, RLE_RUN, 0x01, 0x2A];
		block.extend([0x30; 63]);
		let frame = decode_video_frame(0, &with_first_block(&block), None, DecodeOptions::default()).unwrap();
		let pixels = block_pixels(&frame, 0, 0);
		assert_eq!(pixels[0], 0x2A);
		assert!(pixels[1..].iter().all(|x| *x == 0x30));
	}

	#[test]
	fn rle_maximum_run_stops_at_block_edge() {
		let previous = patterned_frame();
		let block = [BLOCK_RLE, RLE_RUN, 0xFF, 0x11];
		let frame = decode_video_frame(1, &with_first_block(&block), Some(&previous), DecodeOptions::default()).unwrap();
		assert_eq!(block_pixels(&frame, 0, 0), vec![0x11; 64]);
		// the next marker is read straight after the run
		assert_eq!(block_pixels(&frame, 1, 0), block_pixels(&previous, 1, 0));
	}

	#[test]
	fn rle_zero_count_acts_as_one() {
		let mut block = vec![BLOCK_RLE, RLE_RUN, 0x00, 0x05];
		block.extend([0x06; 63]);
		let frame = decode_video_frame(0, &with_first_block(&block), None, DecodeOptions::default()).unwrap();
		let pixels = block_pixels(&frame, 0, 0);
		assert_eq!(pixels[0], 0x05);
		assert_eq!(pixels[1], 0x06);
	}

	#[test]
	fn compressed_block_selects_from_local_table() {
		let mut block = vec![BLOCK_COMPRESSED, 0, 1, 2, 3, 4, 5, 6, 7];
		// first row: column 0 -> index 5 (lowest + highest), column 1 -> index 2, column 7 -> index 7
		block.extend([0b1000_0001, 0b0100_0001, 0b1000_0001]);
		block.extend([0x00; 21]);
		let frame = decode_video_frame(0, &with_first_block(&block), None, DecodeOptions::default()).unwrap();
		let pixels = block_pixels(&frame, 0, 0);
		assert_eq!(pixels[0], 5);
		assert_eq!(pixels[1], 2);
		assert_eq!(pixels[2], 0);
		assert_eq!(pixels[7], 7);
		assert!(pixels[8..].iter().all(|x| *x == 0));
	}

	#[test]
	fn compressed_block_maps_through_table_values() {
		let mut block = vec![BLOCK_COMPRESSED, 0xA0, 0xA1, 0xA2, 0xA3, 0xA4, 0xA5, 0xA6, 0xA7];
		for _ in 0..BLOCK_SIZE {
			block.extend([0xFF, 0x00, 0xFF]);
		}
		let frame = decode_video_frame(0, &with_first_block(&block), None, DecodeOptions::default()).unwrap();
		assert_eq!(block_pixels(&frame, 0, 0), vec![0xA5; 64]);
	}

	#[test]
	fn unknown_marker_leaves_block_black() {
		let previous = patterned_frame();
		let frame = decode_video_frame(1, &with_first_block(&[0x7E]), Some(&previous), DecodeOptions::default()).unwrap();
		assert_eq!(block_pixels(&frame, 0, 0), vec![0; 64]);
		assert_eq!(block_pixels(&frame, 1, 0), block_pixels(&previous, 1, 0));
	}

	#[test]
	fn unknown_marker_fails_in_strict_mode() {
		let result = decode_video_frame(0, &with_first_block(&[0x7E]), None, DecodeOptions::strict());
		assert!(matches!(result, Err(PodError::InvalidData(msg)) if msg.contains("0x7E")));
	}

	#[test]
	fn truncated_stream_fails_the_frame() {
		assert!(decode_video_frame(0, &[BLOCK_COPY; BLOCK_COUNT - 1], None, DecodeOptions::default()).is_err());
		assert!(decode_video_frame(0, &[], None, DecodeOptions::default()).is_err());
		let short_rle = [BLOCK_RLE, 1, 2, 3];
		assert!(decode_video_frame(0, &short_rle, None, DecodeOptions::default()).is_err());
		let short_compressed = [BLOCK_COMPRESSED, 0, 1, 2, 3, 4, 5, 6, 7, 0xFF];
		assert!(decode_video_frame(0, &short_compressed, None, DecodeOptions::default()).is_err());
	}

	#[test]
	fn trailing_bytes_are_ignored() {
		let mut stream = vec![BLOCK_COPY; BLOCK_COUNT];
		stream.extend([0xDE, 0xAD]);
		assert!(decode_video_frame(0, &stream, None, DecodeOptions::default()).is_ok());
	}
}
