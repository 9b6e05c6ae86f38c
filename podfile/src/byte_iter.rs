use crate::error::{PodError, Result};

/// Sequential reads from a byte stream where running dry is an error.
pub trait ByteIter: Iterator<Item = u8> + ExactSizeIterator {
	fn next_u8(&mut self, what: &'static str) -> Result<u8>;
	fn next_bytes<const LEN: usize>(&mut self, what: &'static str) -> Result<[u8; LEN]>;
}

impl<T: Iterator<Item = u8> + ExactSizeIterator> ByteIter for T {
	fn next_u8(&mut self, what: &'static str) -> Result<u8> {
		self.next().ok_or_else(#[cold] || PodError::invalid(format!("ran out of bytes reading {what}")))
	}

	fn next_bytes<const LEN: usize>(&mut self, what: &'static str) -> Result<[u8; LEN]> {
		if LEN > self.len() {
			return Err(PodError::invalid(format!("ran out of bytes reading {what}: need {LEN}, have {}", self.len())));
		}
		let mut arr = [0u8; LEN];
		for (slot, x) in arr.iter_mut().zip(self.take(LEN)) {
			*slot = x;
		}
		Ok(arr)
	}
}
