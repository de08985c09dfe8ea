//! Module containing the core of reading a binary VBSP file and interpreting it into structured data.

use std::mem;

use glam::{IVec2, Vec3};

use crate::{BspParseError, BspParseResultDoingJobExt, BspResult};

/// Like a [`Cursor`](std::io::Cursor), but i don't have to constantly juggle buffers.
#[derive(Clone)]
pub struct BspByteReader<'a> {
	bytes: &'a [u8],
	pos: usize,
}

impl<'a> BspByteReader<'a> {
	#[inline]
	pub fn new(bytes: &'a [u8]) -> Self {
		Self { bytes, pos: 0 }
	}

	fn rest(&self) -> &[u8] {
		&self.bytes[self.pos.min(self.bytes.len())..]
	}

	#[inline]
	pub fn len(&self) -> usize {
		self.rest().len()
	}

	#[inline]
	pub fn is_empty(&self) -> bool {
		self.rest().is_empty()
	}

	#[inline]
	pub fn read<T: BspValue>(&mut self) -> BspResult<T> {
		T::bsp_parse(self)
	}

	#[inline]
	pub fn read_bytes(&mut self, count: usize) -> BspResult<&'a [u8]> {
		let from = self.pos;
		let to = from.checked_add(count).ok_or(BspParseError::BufferOutOfBounds {
			from,
			to: usize::MAX,
			size: self.bytes.len(),
		})?;
		if to > self.bytes.len() {
			return Err(BspParseError::BufferOutOfBounds {
				from,
				to,
				size: self.bytes.len(),
			});
		}
		let bytes = &self.bytes[from..to];
		self.pos = to;
		Ok(bytes)
	}
}

/// Defines how a type should be read from a BSP file.
pub trait BspValue: Sized {
	fn bsp_parse(reader: &mut BspByteReader) -> BspResult<Self>;
	/// Size in bytes of this value on disk.
	fn bsp_struct_size() -> usize;
}

macro_rules! impl_bsp_parse_primitive {
	($ty:ty) => {
		impl BspValue for $ty {
			#[inline]
			fn bsp_parse(reader: &mut BspByteReader) -> BspResult<Self> {
				let mut buf = [0; mem::size_of::<$ty>()];
				buf.copy_from_slice(reader.read_bytes(mem::size_of::<$ty>())?);
				Ok(<$ty>::from_le_bytes(buf))
			}
			#[inline]
			fn bsp_struct_size() -> usize {
				mem::size_of::<$ty>()
			}
		}
	};
}

macro_rules! impl_bsp_parse_vector {
	($ty:ty : [$element:ty; $count:expr]) => {
		impl BspValue for $ty {
			fn bsp_parse(reader: &mut BspByteReader) -> BspResult<Self> {
				Ok(<$ty>::from_array(reader.read::<[$element; $count]>()?))
			}
			fn bsp_struct_size() -> usize {
				mem::size_of::<$element>() * $count
			}
		}
	};
}

impl_bsp_parse_primitive!(u16);
impl_bsp_parse_primitive!(u32);

impl_bsp_parse_primitive!(i16);
impl_bsp_parse_primitive!(i32);

impl_bsp_parse_primitive!(f32);

impl BspValue for u8 {
	#[inline]
	fn bsp_parse(reader: &mut BspByteReader) -> BspResult<Self> {
		reader.read_bytes(1).map(|bytes| bytes[0])
	}
	#[inline]
	fn bsp_struct_size() -> usize {
		1
	}
}

impl_bsp_parse_vector!(Vec3: [f32; 3]);
impl_bsp_parse_vector!(IVec2: [i32; 2]);

impl<T: BspValue + std::fmt::Debug, const N: usize> BspValue for [T; N] {
	#[inline]
	fn bsp_parse(reader: &mut BspByteReader) -> BspResult<Self> {
		// Look ma, no heap allocations!
		let mut out = [(); N].map(|_| mem::MaybeUninit::uninit());
		for out in out.iter_mut() {
			out.write(reader.read()?);
		}
		// SAFETY: Every element was written above, the `?` returns before we get here otherwise.
		Ok(out.map(|v| unsafe { v.assume_init() }))
	}
	#[inline]
	fn bsp_struct_size() -> usize {
		T::bsp_struct_size() * N
	}
}

/// Returns the `len` bytes of `data` starting at `offset`.
///
/// Offsets and lengths come straight from the file, so they are signed and untrusted. This fails rather than panics
/// when either is negative, when `offset + len` overflows, or when the range runs past the end of `data`.
pub fn read_array(data: &[u8], offset: i32, len: i32) -> BspResult<&[u8]> {
	let invalid = || BspParseError::InvalidRange {
		offset: offset as i64,
		len: len as i64,
		size: data.len(),
	};

	let (Ok(from), Ok(count)) = (usize::try_from(offset), usize::try_from(len)) else {
		return Err(invalid());
	};
	let to = from.checked_add(count).ok_or_else(invalid)?;

	data.get(from..to).ok_or_else(invalid)
}

/// Reads as many whole `T`s as fit in `lump_data`. Trailing bytes that don't make up a whole element are ignored.
pub fn read_lump<T: BspValue>(lump_data: &[u8], lump_name: &'static str) -> BspResult<Vec<T>> {
	let lump_entries = lump_data.len() / T::bsp_struct_size();

	let mut reader = BspByteReader::new(lump_data);
	let mut out = Vec::with_capacity(lump_entries);

	for i in 0..lump_entries {
		out.push(reader.read().job(format!("Parsing {lump_name} lump entry {i}"))?);
	}
	if !reader.is_empty() {
		log::debug!("Ignoring {} trailing bytes in {lump_name} lump", reader.len());
	}

	Ok(out)
}

#[cfg(test)]
mod read_array_tests {
	use super::*;

	#[test]
	fn in_bounds() {
		let data = [1, 2, 3, 4, 5];
		assert_eq!(read_array(&data, 1, 3).unwrap(), &[2, 3, 4]);
		assert_eq!(read_array(&data, 0, 5).unwrap(), &data);
		assert!(read_array(&data, 5, 0).unwrap().is_empty());
	}

	#[test]
	fn negative_values_fail() {
		let data = [0; 16];
		assert!(read_array(&data, -1, 4).is_err());
		assert!(read_array(&data, 0, -4).is_err());
		assert!(read_array(&data, i32::MIN, i32::MIN).is_err());
	}

	#[test]
	fn past_end_fails() {
		let data = [0; 16];
		assert!(read_array(&data, 12, 5).is_err());
		assert!(read_array(&data, 17, 0).is_err());
		assert!(read_array(&data, i32::MAX, i32::MAX).is_err());
		assert!(read_array(&data, 1, i32::MAX).is_err());
	}

	#[test]
	fn lump_ignores_trailing_bytes() {
		let mut data = Vec::new();
		data.extend(7_i32.to_le_bytes());
		data.extend((-3_i32).to_le_bytes());
		data.extend([0xFF, 0xFF]);

		let values: Vec<i32> = read_lump(&data, "test").unwrap();
		assert_eq!(values, [7, -3]);
	}

	#[test]
	fn reader_out_of_bounds() {
		let data = [0; 3];
		let mut reader = BspByteReader::new(&data);
		assert!(reader.read::<u16>().is_ok());
		assert_eq!(reader.len(), 1);
		assert!(matches!(reader.read::<u16>(), Err(BspParseError::BufferOutOfBounds { from: 2, to: 4, size: 3 })));
		assert!(reader.read::<u8>().is_ok());
		assert!(reader.is_empty());
	}
}
