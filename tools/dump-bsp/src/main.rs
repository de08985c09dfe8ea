use hl2bsp::prelude::*;
use std::env;

fn main() {
	env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

	let mut args = env::args().skip(1);
	let path = args.next().expect("Usage: dump-bsp <map.bsp> [import.ini]");
	let settings = match args.next() {
		Some(ini) => ImportSettings::load_from_file(&ini).expect("Failed to read import settings"),
		None => ImportSettings::default(),
	};

	let file = match BspFile::load(&path) {
		Ok(file) => file,
		Err(err) => {
			log::error!("{err}");
			std::process::exit(1);
		}
	};

	println!("{path}: VBSP version {} revision {}", file.version, file.map_revision);
	println!("  {} faces, {} vertices ({} faces dropped)", file.faces.len(), file.vertices.len(), file.skipped_faces);
	println!("  {} displacements, {} displacement vertices", file.displacements.len(), file.displacement_vertices.len());

	let materials = match &settings.material_json_path {
		Some(json) => MaterialMap::load_from_file(json).expect("Failed to read material map"),
		None => MaterialMap::new(),
	};

	let meshes = file.build_meshes(&settings, &materials);
	println!("  {} meshes, {} triangles", meshes.meshes.len(), meshes.triangle_count());
	for mesh in &meshes.meshes {
		println!(
			"    {:?}: {} triangles, material {}",
			mesh.texture,
			mesh.indices.len(),
			mesh.material.as_deref().unwrap_or("<none>")
		);
	}

	println!("{}", serde_json::to_string_pretty(&file.entities).expect("Failed to serialize entities"));
}
