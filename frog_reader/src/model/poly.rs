use arrayvec::ArrayVec;
use bitfield::bitfield;
use crate::{error::Error, read_vec, write_slice, DataReader, DataWriter, Readable, Result, Writable};
use super::{ByteUv, ColorVector};

bitfield! {
	#[derive(Readable, Writable, Clone, Copy, Default, PartialEq, Eq)]
	pub struct TextureFlags(u16);
	impl Debug;
	pub semi_transparent, _: 0;
	/// Show the solid environment image, e.g. water drawn as a solid body
	pub environment_image, _: 1;
	/// Back of the order table: lowest or highest render priority
	pub max_order_table, _: 2;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextureFlag {
	SemiTransparent,
	EnvironmentImage,
	MaxOrderTable,
}

impl TextureFlag {
	pub const fn mask(self) -> u16 {
		match self {
			TextureFlag::SemiTransparent => 1 << 0,
			TextureFlag::EnvironmentImage => 1 << 1,
			TextureFlag::MaxOrderTable => 1 << 2,
		}
	}
}

impl TextureFlags {
	pub const fn from_bits(bits: u16) -> Self {
		Self(bits)
	}

	pub const fn bits(self) -> u16 {
		self.0
	}

	pub fn test_flag(self, flag: TextureFlag) -> bool {
		self.0 & flag.mask() == flag.mask()
	}

	/// No-op when the flag already has `state`; never touches other bits.
	pub fn set_flag(&mut self, flag: TextureFlag, state: bool) {
		if self.test_flag(flag) == state {
			return;
		}
		if state {
			self.0 |= flag.mask();
		} else {
			self.0 &= !flag.mask();
		}
	}
}

/// Textured map polygon types. Flat polygons carry one color, gouraud polygons one per vertex.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PolygonKind {
	Ft3,
	Ft4,
	Gt3,
	Gt4,
}

impl PolygonKind {
	pub const fn vertex_count(self) -> usize {
		match self {
			PolygonKind::Ft3 | PolygonKind::Gt3 => 3,
			PolygonKind::Ft4 | PolygonKind::Gt4 => 4,
		}
	}

	pub const fn color_count(self) -> usize {
		match self {
			PolygonKind::Ft3 | PolygonKind::Ft4 => 1,
			PolygonKind::Gt3 | PolygonKind::Gt4 => self.vertex_count(),
		}
	}

	pub fn from_counts(vertex_count: usize, color_count: usize) -> Option<Self> {
		[PolygonKind::Ft3, PolygonKind::Ft4, PolygonKind::Gt3, PolygonKind::Gt4]
			.into_iter()
			.find(|kind| kind.vertex_count() == vertex_count && kind.color_count() == color_count)
	}
}

/// Halfwords with no meaning in the file, replayed as they were read.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct PaddingWords {
	after_flags: u16,
	/// Filled in by the game at runtime
	clut_id: u16,
	/// Triangles only
	after_uvs: u16,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TexturedPolygon {
	pub flags: TextureFlags,
	/// In vertex order. Quads store slot 3 ahead of slot 2.
	pub uvs: ArrayVec<ByteUv, 4>,
	/// Index into the level's texture list
	pub texture_id: u16,
	pub colors: Vec<ColorVector>,
	padding: PaddingWords,
}

impl TexturedPolygon {
	pub fn new(kind: PolygonKind, texture_id: u16) -> Self {
		Self {
			flags: TextureFlags::default(),
			uvs: (0..kind.vertex_count()).map(|_| ByteUv::default()).collect(),
			texture_id,
			colors: vec![ColorVector::default(); kind.color_count()],
			padding: PaddingWords::default(),
		}
	}

	pub fn read(reader: &mut DataReader, kind: PolygonKind) -> Result<Self> {
		Self::read_with_counts(reader, kind.vertex_count(), kind.color_count())
	}

	pub fn read_with_counts(reader: &mut DataReader, vertex_count: usize, color_count: usize) -> Result<Self> {
		if !matches!(vertex_count, 3 | 4) {
			return Err(Error::UnsupportedVertexCount(vertex_count));
		}
		let flags = reader.read()?;
		let after_flags = reader.read()?;
		let mut uvs = ArrayVec::new();
		uvs.push(reader.read()?);
		let clut_id = reader.read()?;
		uvs.push(reader.read()?);
		let texture_id = reader.read()?;
		let mut after_uvs = 0;
		if vertex_count == 3 {
			uvs.push(reader.read()?);
			after_uvs = reader.read()?;
		} else {
			let uv3 = reader.read()?;//stored ahead of uv2
			uvs.push(reader.read()?);
			uvs.push(uv3);
		}
		let colors = read_vec(reader, color_count)?;
		Ok(Self {
			flags,
			uvs,
			texture_id,
			colors,
			padding: PaddingWords { after_flags, clut_id, after_uvs },
		})
	}

	pub fn vertex_count(&self) -> usize {
		self.uvs.len()
	}

	pub fn kind(&self) -> Option<PolygonKind> {
		PolygonKind::from_counts(self.uvs.len(), self.colors.len())
	}

	/// Exchanges UV slots 2 and 3 of a quad. Triangles are left alone.
	pub fn swap_quad_uvs(&mut self) {
		if self.uvs.len() == 4 {
			self.uvs.swap(2, 3);
		}
	}
}

impl Writable for TexturedPolygon {
	fn write(&self, writer: &mut DataWriter) -> Result<()> {
		let uvs = self.uvs.as_slice();
		if !matches!(uvs.len(), 3 | 4) {
			return Err(Error::UnsupportedVertexCount(uvs.len()));
		}
		self.flags.write(writer)?;
		self.padding.after_flags.write(writer)?;
		uvs[0].write(writer)?;
		self.padding.clut_id.write(writer)?;
		uvs[1].write(writer)?;
		self.texture_id.write(writer)?;
		if uvs.len() == 3 {
			uvs[2].write(writer)?;
			self.padding.after_uvs.write(writer)?;
		} else {
			uvs[3].write(writer)?;
			uvs[2].write(writer)?;
		}
		write_slice(writer, &self.colors)
	}
}
