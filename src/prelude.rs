pub use crate::{
	data::BspData,
	entities::{BspEntity, EntityRotation},
	file::{BspFile, FacePolygon, FaceVertex},
	tessellate::{DisplacementSurface, TessellationOutput},
	BspParseError, BspParseInput, BspResult,
};

#[cfg(feature = "meshing")]
pub use crate::mesh::{
	materials::MaterialMap,
	settings::ImportSettings,
	ExportedMesh, MeshOutput,
};
