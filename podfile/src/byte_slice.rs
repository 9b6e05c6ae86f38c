use crate::error::{PodError, Result};

macro_rules! impl_byte_readers {
	($($t:ty),*) => {paste::paste! {$(
		fn [<read_ $t _field>](&self, offset: usize, name: &'static str) -> Result<$t> {
			self.[<get_ $t _at>](offset).ok_or_else(#[cold] || PodError::invalid(format!("could not read {name} at offset {offset}")))
		}
		fn [<get_ $t _at>](&self, offset: usize) -> Option<$t> {
			let bytes = self.get(offset..offset.checked_add(size_of::<$t>())?)?;
			Some($t::from_le_bytes(bytes.try_into().ok()?))
		}
	)*}}
}

/// Bounds-checked little-endian field access over a byte buffer.
pub trait ByteSlice {
	fn read_u8_field(&self, offset: usize, name: &'static str) -> Result<u8>;
	fn read_u32_field(&self, offset: usize, name: &'static str) -> Result<u32>;
	fn read_i32_field(&self, offset: usize, name: &'static str) -> Result<i32>;
	fn get_u8_at(&self, offset: usize) -> Option<u8>;
	fn get_u32_at(&self, offset: usize) -> Option<u32>;
	fn get_i32_at(&self, offset: usize) -> Option<i32>;
}

impl ByteSlice for [u8] {
	impl_byte_readers!(u8, u32, i32);
}
