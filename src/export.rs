//! Wavefront OBJ/MTL export of model chunks.

use std::{collections::HashMap, ptr};
use frog_reader::model::{chunk::{ChunkedFile, TextureChunk}, vtx::ModelChunk};
use glam::{Vec2, Vec3};
use itertools::Itertools;
use log::debug;

/// Name of the material the exported mesh uses.
pub const ROOT_MATERIAL: &str = "root";
pub const TEXTURE_DIR: &str = "Textures";

/// Loaded chunked files, by the key models use to name their environment.
pub trait EnvironmentRegistry {
	fn environment(&self, key: &str) -> Option<&ChunkedFile>;
}

impl EnvironmentRegistry for HashMap<String, ChunkedFile> {
	fn environment(&self, key: &str) -> Option<&ChunkedFile> {
		self.get(key)
	}
}

/// A model material matched to a texture chunk of its environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextureBinding {
	pub material_name: String,
	pub texture_name: String,
	pub texture_path: String,
	/// File name of the exported image, without extension
	pub image_stem: String,
}

/// Formats like Java's `Float.toString`: plain decimals from 10^-3 up to 10^7, `1.0E-5` style
/// scientific notation outside that range.
pub fn java_float(value: f32) -> String {
	if value.is_nan() {
		return "NaN".to_owned();
	}
	if value.is_infinite() {
		return if value > 0.0 { "Infinity" } else { "-Infinity" }.to_owned();
	}
	if value == 0.0 || (1e-3..1e7).contains(&value.abs()) {
		return format!("{:?}", value);
	}
	let scientific = format!("{:e}", value);
	match scientific.split_once('e') {
		Some((mantissa, exponent)) if mantissa.contains('.') => format!("{}E{}", mantissa, exponent),
		Some((mantissa, exponent)) => format!("{}.0E{}", mantissa, exponent),
		None => scientific,
	}
}

fn vec3_line(tag: &str, v: Vec3) -> String {
	format!("{} {} {} {}", tag, java_float(v.x), java_float(v.y), java_float(v.z))
}

fn vec2_line(tag: &str, v: Vec2) -> String {
	format!("{} {} {}", tag, java_float(v.x), java_float(v.y))
}

fn section(title: &str, lines: impl Iterator<Item = String>) -> String {
	format!("# {}\n{}", title, lines.map(|line| line + "\n").join(""))
}

/// Faces are guessed: every run of three vertices is one triangle, wound backwards.
fn faces(vertex_count: usize) -> impl Iterator<Item = String> {
	(1..vertex_count.saturating_sub(2)).step_by(3).map(|i| {
		[i + 2, i + 1, i].iter().map(|n| format!("{0}/{0}/{0}", n)).join(" ")
	}).map(|corners| format!("f {}", corners))
}

/// OBJ text for `model`, referencing `<mtl_name>.mtl`.
pub fn export_as_mesh(model: &ModelChunk, mtl_name: &str) -> String {
	let vertices = &model.vertices;
	[
		format!(
			"# Exported by {} {}\nmtllib {}.mtl\nusemtl {}\n",
			env!("CARGO_PKG_NAME"),
			env!("CARGO_PKG_VERSION"),
			mtl_name,
			ROOT_MATERIAL,
		),
		section("Vertices", vertices.iter().map(|v| vec3_line("v", v.position))),
		section("Normals", vertices.iter().map(|v| vec3_line("vn", v.normal))),
		section("Texture Coordinates", vertices.iter().map(|v| vec2_line("vt", v.uv))),
		section("Faces", faces(vertices.len())),
	]
	.join("\n")
}

fn file_stem(path: &str) -> &str {
	let name = path.rsplit(|c| c == '/' || c == '\\').next().unwrap_or(path);
	name.split('.').next().unwrap_or(name)
}

/// Matches each textured material to the last texture chunk of the model's environment whose
/// name contains the texture file's stem. The first chunk bound becomes the root material.
pub fn export_materials(model: &ModelChunk, registry: &impl EnvironmentRegistry) -> Vec<TextureBinding> {
	let Some(key) = &model.environment else {
		return vec![];
	};
	let Some(environment) = registry.environment(key) else {
		debug!("environment {:?} is not loaded", key);
		return vec![];
	};
	let textures = environment
		.textures()
		.map(|(chunk, texture)| (chunk.name.to_lowercase(), chunk.name.as_str(), texture))
		.collect_vec();
	let mut root: Option<&TextureChunk> = None;
	let mut bindings = vec![];
	for material in model.materials.iter().filter(|material| !material.texture_file.is_empty()) {
		let stem = material.texture_file.split('.').next().unwrap_or_default().to_lowercase();
		let Some(&(_, name, texture)) = textures.iter().rev().find(|(lower, _, _)| lower.contains(&stem)) else {
			debug!("no texture chunk for material {:?} ({:?})", material.name, material.texture_file);
			continue;
		};
		let first = *root.get_or_insert(texture);
		bindings.push(TextureBinding {
			material_name: if ptr::eq(first, texture) { ROOT_MATERIAL.to_owned() } else { name.to_owned() },
			texture_name: name.to_owned(),
			texture_path: texture.path.to_string(),
			image_stem: file_stem(&texture.path).to_owned(),
		});
	}
	bindings
}

/// MTL text for `bindings`, with images expected under `Textures/`.
pub fn material_library(bindings: &[TextureBinding]) -> String {
	bindings
		.iter()
		.map(|binding| {
			format!(
				"newmtl {}\nKd 1 1 1\nmap_Kd {}/{}.png\n\n",
				binding.material_name, TEXTURE_DIR, binding.image_stem,
			)
		})
		.join("")
}
