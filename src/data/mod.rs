//! Raw VBSP lump data.

pub mod displacement;
pub mod geometry;
pub mod header;
pub mod texture;

use glam::Vec3;
use strum::IntoEnumIterator;

use crate::{
	reader::{read_lump, BspValue},
	BspParseInput, BspParseResultDoingJobExt, BspResult,
};
use displacement::{BspDispInfo, BspDispVert};
use geometry::{BspEdge, BspFace};
use header::{BspHeader, LumpType};
use texture::{BspTexData, BspTexInfo};

/// The lump tables parsed from a VBSP file, exactly as stored. See [`BspFile`](crate::BspFile) for the resolved geometry.
#[derive(Debug, Clone, PartialEq)]
pub struct BspData {
	pub header: BspHeader,

	/// Text of the entity lump, one character per byte, cut off at the first null byte.
	pub entities: String,
	/// All vertex positions.
	pub vertices: Vec<Vec3>,
	pub edges: Vec<BspEdge>,
	/// Signed edge indices, negative means the edge is walked from `b` to `a`.
	pub surface_edges: Vec<i32>,
	pub faces: Vec<BspFace>,
	pub tex_info: Vec<BspTexInfo>,
	pub tex_data: Vec<BspTexData>,
	/// Offsets into `tex_data_string_data`.
	pub tex_data_string_table: Vec<i32>,
	/// Null-terminated texture names.
	pub tex_data_string_data: Vec<u8>,
	pub displacement_infos: Vec<BspDispInfo>,
	pub displacement_vertices: Vec<BspDispVert>,
}

impl BspData {
	/// Parses the data from BSP input.
	///
	/// Fails if the header is missing or invalid, or if a required lump points outside the file. Optional lumps
	/// ([`LumpType::is_optional`]) that point outside the file are logged and left empty.
	pub fn parse(input: BspParseInput) -> BspResult<Self> {
		let BspParseInput { bsp } = input;

		let header = BspHeader::parse(bsp).job("Reading header")?;
		log::info!("VBSP header: version {} map revision {}", header.version, header.map_revision);
		for lump in LumpType::iter() {
			let entry = header.lumps.get(lump);
			log::trace!("Lump {lump} ({}): offset {} len {}", lump as usize, entry.offset, entry.len);
		}

		let data = Self {
			entities: decode_entity_lump(lump_bytes(bsp, &header, LumpType::Entities)?),
			vertices: parse_lump(bsp, &header, LumpType::Vertices)?,
			edges: parse_lump(bsp, &header, LumpType::Edges)?,
			surface_edges: parse_lump(bsp, &header, LumpType::SurfEdges)?,
			faces: parse_lump(bsp, &header, LumpType::Faces)?,
			tex_info: parse_lump(bsp, &header, LumpType::TexInfo)?,
			tex_data: parse_lump(bsp, &header, LumpType::TexData)?,
			tex_data_string_table: parse_lump(bsp, &header, LumpType::TexDataStringTable)?,
			tex_data_string_data: lump_bytes(bsp, &header, LumpType::TexDataStringData)?.to_vec(),
			displacement_infos: parse_lump(bsp, &header, LumpType::DispInfo)?,
			displacement_vertices: parse_lump(bsp, &header, LumpType::DispVerts)?,
			header,
		};

		log::debug!(
			"Lumps: {} vertices, {} edges, {} surface edges, {} faces, {} texinfos, {} texdatas, {} texture names, {} displacements, {} displacement vertices",
			data.vertices.len(),
			data.edges.len(),
			data.surface_edges.len(),
			data.faces.len(),
			data.tex_info.len(),
			data.tex_data.len(),
			data.tex_data_string_table.len(),
			data.displacement_infos.len(),
			data.displacement_vertices.len(),
		);

		Ok(data)
	}
}

/// The bytes of `lump`. If it points outside the file, that's an error for required lumps, and an empty lump for
/// optional ones.
fn lump_bytes<'a>(bsp: &'a [u8], header: &BspHeader, lump: LumpType) -> BspResult<&'a [u8]> {
	match header.lumps.get(lump).get(bsp, lump) {
		Ok(bytes) => Ok(bytes),
		Err(err) if lump.is_optional() => {
			log::warn!("Skipping optional lump: {err}");
			Ok(&[])
		}
		Err(err) => Err(err),
	}
}

fn parse_lump<T: BspValue>(bsp: &[u8], header: &BspHeader, lump: LumpType) -> BspResult<Vec<T>> {
	read_lump(lump_bytes(bsp, header, lump)?, lump.into())
}

/// Each byte is one character. Some compilers leave garbage after the terminating null byte, so we stop there.
fn decode_entity_lump(bytes: &[u8]) -> String {
	bytes.iter().take_while(|b| **b != 0).map(|b| *b as char).collect()
}

#[test]
fn entity_lump_decoding() {
	assert_eq!(decode_entity_lump(b"{\n\"a\" \"b\"\n}\n\0garbage"), "{\n\"a\" \"b\"\n}\n");
	assert_eq!(decode_entity_lump(&[b'{', 0xE9, b'}']), "{\u{e9}}");
	assert_eq!(decode_entity_lump(&[]), "");
}
