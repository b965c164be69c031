use glam::{Vec2, Vec3};
use log::debug;
use crate::{read_vec, write_slice, DataReader, DataWriter, FixedString, Readable, Result, Writable};
use super::{declared_len, stored_count};

pub const MATERIAL_NAME_LEN: usize = 32;
pub const MATERIAL_FILE_LEN: usize = 32;
pub const MATERIAL_EXTRA_LEN: usize = 80;
/// 64 byte vertices
pub const COMPACT_MODE: i32 = 5;
/// 68 byte vertices, one more header word
pub const FULL_MODE: i32 = 6;
/// `1.0f32`, the usual value of the unknown vertex words
pub const ONE_BITS: u32 = 0x3F80_0000;

#[derive(Readable, Writable, Debug, Clone, PartialEq, Eq)]
pub struct Material {
	#[fixed_str(MATERIAL_NAME_LEN)]
	pub name: FixedString,
	/// Empty when the material is untextured
	#[fixed_str(MATERIAL_FILE_LEN)]
	pub texture_file: FixedString,
	pub extra: Box<[u8; MATERIAL_EXTRA_LEN]>,
}

impl Material {
	pub fn new(name: impl Into<String>, texture_file: impl Into<String>) -> Self {
		Self {
			name: FixedString::new(name),
			texture_file: FixedString::new(texture_file),
			extra: Box::new([0; MATERIAL_EXTRA_LEN]),
		}
	}
}

/// Header words that are not derived from the model's collections.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelHeader {
	/// Usually 338 or 342
	pub flags: i32,
	pub mode: i32,
	pub node_count: i32,
	pub material_address: i32,
	pub reserved: [i32; 4],
	/// Stored only in mode 6, -1 otherwise
	pub mode6_extra: i32,
	pub tail: i32,
}

impl ModelHeader {
	pub fn new(mode: i32) -> Self {
		Self {
			flags: 0,
			mode,
			node_count: 0,
			material_address: 0,
			reserved: [0; 4],
			mode6_extra: if mode == FULL_MODE { 0 } else { -1 },
			tail: 0,
		}
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VertexLayout {
	Compact,
	Full,
}

impl VertexLayout {
	pub fn from_mode(mode: i32) -> Self {
		match mode {
			COMPACT_MODE => VertexLayout::Compact,
			_ => VertexLayout::Full,
		}
	}

	pub const fn stride(self) -> usize {
		match self {
			VertexLayout::Compact => 64,
			VertexLayout::Full => 68,
		}
	}
}

/// Unidentified words of a mode 5 vertex.
#[derive(Readable, Writable, Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompactExtra {
	pub lead: [u32; 2],
	pub shade: [u32; 5],
	/// Looks like a second uv pair
	pub uv2: [u32; 2],
	pub tail: [u32; 2],
}

impl Default for CompactExtra {
	fn default() -> Self {
		Self {
			lead: [0; 2],
			shade: [ONE_BITS; 5],
			uv2: [0; 2],
			tail: [0; 2],
		}
	}
}

/// Unidentified words of a full vertex.
#[derive(Readable, Writable, Debug, Clone, Copy, PartialEq, Eq)]
pub struct FullExtra {
	pub w: u32,
	pub shade: [u32; 5],
	pub tail: [u32; 3],
}

impl Default for FullExtra {
	fn default() -> Self {
		Self {
			w: ONE_BITS,
			shade: [ONE_BITS; 5],
			tail: [0; 3],
		}
	}
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vertex {
	pub position: Vec3,
	/// Zero for compact vertices, which store none
	pub normal: Vec3,
	pub uv: Vec2,
	compact: CompactExtra,
	full: FullExtra,
}

impl Vertex {
	pub fn new(position: Vec3, normal: Vec3, uv: Vec2) -> Self {
		Self {
			position,
			normal,
			uv,
			compact: CompactExtra::default(),
			full: FullExtra::default(),
		}
	}

	pub fn read(reader: &mut DataReader, layout: VertexLayout) -> Result<Self> {
		match layout {
			VertexLayout::Compact => {
				let uv = reader.read()?;
				let lead = reader.read()?;
				let position = reader.read()?;
				let shade = reader.read()?;
				let uv2 = reader.read()?;
				let tail = reader.read()?;
				Ok(Self {
					position,
					normal: Vec3::ZERO,
					uv,
					compact: CompactExtra { lead, shade, uv2, tail },
					full: FullExtra::default(),
				})
			},
			VertexLayout::Full => {
				let position = reader.read()?;
				let w = reader.read()?;
				let normal = reader.read()?;
				let shade = reader.read()?;
				let uv = reader.read()?;
				let tail = reader.read()?;
				Ok(Self {
					position,
					normal,
					uv,
					compact: CompactExtra::default(),
					full: FullExtra { w, shade, tail },
				})
			},
		}
	}

	pub fn write(&self, writer: &mut DataWriter, layout: VertexLayout) -> Result<()> {
		match layout {
			VertexLayout::Compact => {
				self.uv.write(writer)?;
				self.compact.lead.write(writer)?;
				self.position.write(writer)?;
				self.compact.shade.write(writer)?;
				self.compact.uv2.write(writer)?;
				self.compact.tail.write(writer)
			},
			VertexLayout::Full => {
				self.position.write(writer)?;
				self.full.w.write(writer)?;
				self.normal.write(writer)?;
				self.full.shade.write(writer)?;
				self.uv.write(writer)?;
				self.full.tail.write(writer)
			},
		}
	}

	pub fn compact_extra(&self) -> &CompactExtra {
		&self.compact
	}

	pub fn full_extra(&self) -> &FullExtra {
		&self.full
	}
}

/// Reads words until one has a nonzero high half, which is left unread, or the data ends.
pub fn scan_small_words(reader: &mut DataReader) -> Result<Vec<u32>> {
	let mut words = Vec::new();
	while reader.has_more() {
		let word: u32 = reader.read()?;
		if word & 0xFFFF_0000 != 0 {
			reader.set_position(reader.position() - 4);
			break;
		}
		words.push(word);
	}
	Ok(words)
}

/// Root body of a VTX chunk.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelChunk {
	pub header: ModelHeader,
	pub materials: Vec<Material>,
	/// Face-like data, not understood yet
	pub small_words: Vec<u32>,
	pub opaque: Box<[u8]>,
	alignment: Box<[u8]>,
	pub vertices: Vec<Vertex>,
	/// Name of the chunked file holding this model's textures
	pub environment: Option<String>,
}

impl ModelChunk {
	pub fn new(header: ModelHeader) -> Self {
		Self {
			header,
			materials: vec![],
			small_words: vec![],
			opaque: Box::default(),
			alignment: Box::default(),
			vertices: vec![],
			environment: None,
		}
	}

	pub fn layout(&self) -> VertexLayout {
		VertexLayout::from_mode(self.header.mode)
	}
}

impl Readable for ModelChunk {
	fn read(reader: &mut DataReader) -> Result<Self> {
		let start = reader.position();
		let flags = reader.read()?;
		let mode: i32 = reader.read()?;
		let material_count: i32 = reader.read()?;
		let node_count = reader.read()?;
		let opaque_len: i32 = reader.read()?;
		let material_address = reader.read()?;
		let vertex_count: i32 = reader.read()?;
		let reserved = reader.read()?;
		let mode6_extra = if mode == FULL_MODE { reader.read()? } else { -1 };
		let tail = reader.read()?;
		if material_count > 1 {
			debug!("model has {} materials", material_count);
		}
		if mode != COMPACT_MODE && mode != FULL_MODE {
			debug!("unknown model mode {}, reading full vertices", mode);
		}
		let materials = read_vec(reader, declared_len(material_count))?;
		let small_words = scan_small_words(reader)?;
		let opaque = reader.read_bytes(declared_len(opaque_len))?.into();
		let misalign = (reader.position() - start) % 4;
		let alignment = match misalign {
			0 => Box::default(),
			_ => reader.read_bytes(4 - misalign)?.into(),
		};
		let layout = VertexLayout::from_mode(mode);
		let vertices = (0..declared_len(vertex_count))
			.map(|_| Vertex::read(reader, layout))
			.collect::<Result<_>>()?;
		Ok(Self {
			header: ModelHeader {
				flags,
				mode,
				node_count,
				material_address,
				reserved,
				mode6_extra,
				tail,
			},
			materials,
			small_words,
			opaque,
			alignment,
			vertices,
			environment: None,
		})
	}
}

impl Writable for ModelChunk {
	fn write(&self, writer: &mut DataWriter) -> Result<()> {
		let material_count = stored_count::<i32>("material count", self.materials.len())?;
		let opaque_len = stored_count::<i32>("opaque length", self.opaque.len())?;
		let vertex_count = stored_count::<i32>("vertex count", self.vertices.len())?;
		let start = writer.position();
		let header = &self.header;
		header.flags.write(writer)?;
		header.mode.write(writer)?;
		material_count.write(writer)?;
		header.node_count.write(writer)?;
		opaque_len.write(writer)?;
		header.material_address.write(writer)?;
		vertex_count.write(writer)?;
		header.reserved.write(writer)?;
		if header.mode == FULL_MODE {
			header.mode6_extra.write(writer)?;
		}
		header.tail.write(writer)?;
		write_slice(writer, &self.materials)?;
		write_slice(writer, &self.small_words)?;
		writer.write_bytes(&self.opaque);
		let pad = (4 - (writer.position() - start) % 4) % 4;
		if self.alignment.len() == pad {
			writer.write_bytes(&self.alignment);
		} else {
			writer.write_null(pad);
		}
		let layout = self.layout();
		for vertex in &self.vertices {
			vertex.write(writer, layout)?;
		}
		Ok(())
	}
}
