//! The fixed-size file header and its lump directory.

use hl2bsp_macros::BspValue;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{
	reader::{read_array, BspByteReader, BspValue},
	BspParseError, BspResult,
};

/// Number of lump slots in a VBSP header, used or not.
pub const HEADER_LUMPS: usize = 64;

/// `VBSP` read as a little-endian 32-bit value.
pub const VBSP_MAGIC: [u8; 4] = *b"VBSP";

/// Lump slots this crate reads, with their index into the lump directory.
///
/// [Valve Developer Community](https://developer.valvesoftware.com/wiki/BSP_(Source)#Lump_types) has the full list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display, strum::IntoStaticStr, strum::EnumIter)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[repr(usize)]
pub enum LumpType {
	Entities = 0,
	TexData = 2,
	Vertices = 3,
	TexInfo = 6,
	Faces = 7,
	Edges = 12,
	SurfEdges = 13,
	DispInfo = 26,
	DispVerts = 33,
	TexDataStringTable = 43,
	TexDataStringData = 44,
}

impl LumpType {
	/// Whether a load can go on without this lump.
	pub fn is_optional(self) -> bool {
		matches!(self, Self::Entities | Self::DispInfo | Self::DispVerts)
	}
}

/// Points to the chunk of data in the file a lump resides in.
#[derive(BspValue, Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LumpEntry {
	pub offset: i32,
	pub len: i32,
	/// Format version of the lump, usually 0.
	pub version: i32,
	/// Uncompressed size if the lump is LZMA compressed, otherwise all zeros.
	pub four_cc: [u8; 4],
}

impl LumpEntry {
	/// Returns the slice of `data` (BSP file input) that this entry points to.
	pub fn get<'a>(&self, data: &'a [u8], lump: LumpType) -> BspResult<&'a [u8]> {
		read_array(data, self.offset, self.len).map_err(|_| BspParseError::LumpOutOfBounds { lump, entry: *self })
	}
}

/// The 64 lump entries of a VBSP header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LumpDirectory {
	pub entries: [LumpEntry; HEADER_LUMPS],
}

impl LumpDirectory {
	#[inline]
	pub fn get(&self, lump: LumpType) -> LumpEntry {
		self.entries[lump as usize]
	}
}

impl BspValue for LumpDirectory {
	fn bsp_parse(reader: &mut BspByteReader) -> BspResult<Self> {
		Ok(Self { entries: reader.read()? })
	}
	fn bsp_struct_size() -> usize {
		LumpEntry::bsp_struct_size() * HEADER_LUMPS
	}
}

#[derive(BspValue, Debug, Clone, PartialEq, Eq)]
pub struct BspHeader {
	pub ident: [u8; 4],
	/// 19 or 20 for Half-Life 2, later branches go up to 21.
	pub version: i32,
	pub lumps: LumpDirectory,
	/// Incremented each time the map is saved in Hammer.
	pub map_revision: i32,
}

impl BspHeader {
	/// Parses and validates the header at the start of `data`.
	pub fn parse(data: &[u8]) -> BspResult<Self> {
		let required = Self::bsp_struct_size();
		if data.len() < required {
			return Err(BspParseError::HeaderTooSmall { size: data.len(), required });
		}

		let header: Self = BspByteReader::new(data).read()?;
		if header.ident != VBSP_MAGIC {
			return Err(BspParseError::WrongMagicNumber {
				found: header.ident,
				expected: "VBSP",
			});
		}

		Ok(header)
	}
}
