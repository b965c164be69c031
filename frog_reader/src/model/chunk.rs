use std::collections::{hash_map::Entry, HashMap};
use bitfield::bitfield;
use log::{trace, warn};
use crate::{error::Error, DataReader, DataWriter, FixedString, Readable, Result, Writable};
use super::{stored_count, vtx::ModelChunk};

pub const SIGNATURE: &str = "CHNK";
pub const CHUNK_NAME_LEN: usize = 32;
pub const FULL_NAME_LEN: usize = 260;
/// Fill after the terminator of a reference's full name
pub const FULL_NAME_PAD: u8 = 0xCD;
pub const TEXTURE_PATH_LEN: usize = 260;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChunkType {
	Model,
	Texture,
}

impl ChunkType {
	pub const fn tag(self) -> [u8; 4] {
		match self {
			ChunkType::Model => *b"VTX\0",
			ChunkType::Texture => *b"TEX\0",
		}
	}

	pub fn from_tag(tag: [u8; 4]) -> Option<Self> {
		[ChunkType::Model, ChunkType::Texture].into_iter().find(|chunk_type| chunk_type.tag() == tag)
	}
}

bitfield! {
	#[derive(Readable, Writable, Clone, Copy, Default, PartialEq, Eq)]
	pub struct ChunkFlags(u32);
	impl Debug;
	/// Clear for chunks that only name a root chunk living elsewhere
	pub root, set_root: 0;
}

impl ChunkFlags {
	pub const fn from_bits(bits: u32) -> Self {
		Self(bits)
	}

	pub const fn bits(self) -> u32 {
		self.0
	}
}

/// Body of a non-root chunk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChunkReference {
	pub name: FixedString,
	pub full_name: FixedString,
	/// Index of the root chunk with this name, filled in by `ChunkedFile::resolve_references`
	pub resolved: Option<usize>,
}

impl ChunkReference {
	pub fn new(name: impl Into<String>, full_name: impl Into<String>) -> Self {
		Self {
			name: FixedString::new(name),
			full_name: FixedString::new(full_name),
			resolved: None,
		}
	}
}

impl Readable for ChunkReference {
	fn read(reader: &mut DataReader) -> Result<Self> {
		Ok(Self {
			name: reader.read_fixed(CHUNK_NAME_LEN)?,
			full_name: reader.read_fixed(FULL_NAME_LEN)?,
			resolved: None,
		})
	}
}

impl Writable for ChunkReference {
	fn write(&self, writer: &mut DataWriter) -> Result<()> {
		writer.write_fixed(&self.name, CHUNK_NAME_LEN, 0);
		writer.write_fixed(&self.full_name, FULL_NAME_LEN, FULL_NAME_PAD);
		Ok(())
	}
}

/// Root body of a TEX chunk.
#[derive(Readable, Writable, Debug, Clone, PartialEq, Eq)]
pub struct TextureChunk {
	/// Archive path of the image
	#[fixed_str(TEXTURE_PATH_LEN)]
	pub path: FixedString,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ChunkData {
	Model(ModelChunk),
	Texture(TextureChunk),
	Reference(ChunkReference),
}

impl ChunkData {
	pub fn is_root(&self) -> bool {
		!matches!(self, ChunkData::Reference(_))
	}

	fn read(reader: &mut DataReader, chunk_type: ChunkType, root: bool) -> Result<Self> {
		Ok(match (chunk_type, root) {
			(_, false) => ChunkData::Reference(reader.read()?),
			(ChunkType::Model, true) => ChunkData::Model(reader.read()?),
			(ChunkType::Texture, true) => ChunkData::Texture(reader.read()?),
		})
	}
}

impl Writable for ChunkData {
	fn write(&self, writer: &mut DataWriter) -> Result<()> {
		match self {
			ChunkData::Model(model) => model.write(writer),
			ChunkData::Texture(texture) => texture.write(writer),
			ChunkData::Reference(reference) => reference.write(writer),
		}
	}
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum EncodeSource {
	#[default]
	Structured,
	/// Replay the body bytes captured at decode time
	Captured,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContainerOptions {
	/// Link references to root chunks once every chunk is decoded
	pub resolve_references: bool,
	pub encode_source: EncodeSource,
}

impl Default for ContainerOptions {
	fn default() -> Self {
		Self {
			resolve_references: true,
			encode_source: EncodeSource::Structured,
		}
	}
}

#[derive(Debug, Clone, PartialEq)]
pub struct Chunk {
	pub chunk_type: ChunkType,
	/// The root bit is rewritten from `data` on encode
	pub flags: ChunkFlags,
	pub name: FixedString,
	pub data: ChunkData,
	/// Body bytes after the structured record
	pub unparsed: Box<[u8]>,
	captured: Option<Box<[u8]>>,
}

impl Chunk {
	pub fn new(chunk_type: ChunkType, name: impl Into<String>, data: ChunkData) -> Self {
		let mut flags = ChunkFlags::default();
		flags.set_root(data.is_root());
		Self {
			chunk_type,
			flags,
			name: FixedString::new(name),
			data,
			unparsed: Box::default(),
			captured: None,
		}
	}

	pub fn is_root(&self) -> bool {
		self.data.is_root()
	}

	/// Body bytes as they were decoded. `None` for chunks built in memory.
	pub fn captured(&self) -> Option<&[u8]> {
		self.captured.as_deref()
	}

	pub fn encode_body(&self) -> Result<Vec<u8>> {
		let mut body = DataWriter::new();
		self.data.write(&mut body)?;
		body.write_bytes(&self.unparsed);
		Ok(body.into_bytes())
	}

	/// Whether the structured body encodes to exactly the captured bytes.
	pub fn matches_capture(&self) -> Result<bool> {
		Ok(match &self.captured {
			Some(captured) => self.encode_body()? == **captured,
			None => false,
		})
	}

	pub fn write_with(&self, writer: &mut DataWriter, source: EncodeSource) -> Result<()> {
		let body = match (source, &self.captured) {
			(EncodeSource::Captured, Some(captured)) => captured.to_vec(),
			_ => self.encode_body()?,
		};
		let length = stored_count::<u32>("chunk body length", body.len())?;
		let mut flags = self.flags;
		flags.set_root(self.is_root());
		writer.write_bytes(&self.chunk_type.tag());
		flags.write(writer)?;
		let length_pos = writer.position();
		writer.write_null(4);
		writer.write_fixed(&self.name, CHUNK_NAME_LEN, 0);
		writer.write_bytes(&body);
		writer.jump_temp(length_pos);
		length.write(writer)?;
		writer.jump_return()
	}
}

impl Readable for Chunk {
	fn read(reader: &mut DataReader) -> Result<Self> {
		let offset = reader.position();
		let tag = reader.read_array::<4>()?;
		let chunk_type = ChunkType::from_tag(tag).ok_or(Error::UnknownChunkType { offset, tag })?;
		let flags: ChunkFlags = reader.read()?;
		let length = reader.read::<u32>()? as usize;
		let name = reader.read_fixed(CHUNK_NAME_LEN)?;
		trace!("{:?} chunk {:?} at {:#x}, {} byte body", chunk_type, name, offset, length);
		let mut body = reader.sub_reader(reader.position(), Some(length))?;
		reader.skip(length)?;
		let captured = body.peek_remaining()?;
		let data = ChunkData::read(&mut body, chunk_type, flags.root())?;
		let unparsed = body.peek_remaining()?;
		if !unparsed.is_empty() {
			warn!("{} bytes left over in chunk {:?}", unparsed.len(), name);
		}
		Ok(Self {
			chunk_type,
			flags,
			name,
			data,
			unparsed,
			captured: Some(captured),
		})
	}
}

impl Writable for Chunk {
	fn write(&self, writer: &mut DataWriter) -> Result<()> {
		self.write_with(writer, EncodeSource::Structured)
	}
}

/// A TOC-style container: a signature, a chunk count, the chunks and whatever follows them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChunkedFile {
	pub chunks: Vec<Chunk>,
	pub trailing: Box<[u8]>,
}

impl ChunkedFile {
	pub fn read_with(reader: &mut DataReader, options: &ContainerOptions) -> Result<Self> {
		reader.verify_string(SIGNATURE)?;
		let count = reader.read::<u32>()?;
		let chunks = (0..count).map(|_| Chunk::read(reader)).collect::<Result<_>>()?;
		let trailing = reader.read_bytes(reader.remaining())?.into();
		let mut file = Self { chunks, trailing };
		if options.resolve_references {
			file.resolve_references();
		}
		Ok(file)
	}

	pub fn write_with(&self, writer: &mut DataWriter, options: &ContainerOptions) -> Result<()> {
		writer.write_bytes(SIGNATURE.as_bytes());
		stored_count::<u32>("chunk count", self.chunks.len())?.write(writer)?;
		for chunk in &self.chunks {
			chunk.write_with(writer, options.encode_source)?;
		}
		writer.write_bytes(&self.trailing);
		Ok(())
	}

	/// Points every reference at the first root chunk of the same name. Targets may live in a
	/// sibling file, so missing ones are only logged.
	pub fn resolve_references(&mut self) {
		let mut roots = HashMap::new();
		for (index, chunk) in self.chunks.iter().enumerate().filter(|(_, chunk)| chunk.is_root()) {
			match roots.entry(chunk.name.text.clone()) {
				Entry::Vacant(entry) => {
					entry.insert(index);
				},
				Entry::Occupied(entry) => {
					warn!("root chunk {:?} at {} shadowed by the one at {}", chunk.name, index, entry.get());
				},
			}
		}
		for chunk in &mut self.chunks {
			if let ChunkData::Reference(reference) = &mut chunk.data {
				reference.resolved = roots.get(reference.name.as_str()).copied();
				if reference.resolved.is_none() {
					warn!("unresolved reference {:?} ({:?})", reference.name, reference.full_name);
				}
			}
		}
	}

	/// The root chunk `index` stands for: itself, or the target of its reference.
	pub fn resolve(&self, index: usize) -> Option<&Chunk> {
		let chunk = self.chunks.get(index)?;
		match &chunk.data {
			ChunkData::Reference(reference) => self.chunks.get(reference.resolved?),
			_ => Some(chunk),
		}
	}

	pub fn models(&self) -> impl Iterator<Item = (&Chunk, &ModelChunk)> {
		self.chunks.iter().filter_map(|chunk| match &chunk.data {
			ChunkData::Model(model) => Some((chunk, model)),
			_ => None,
		})
	}

	pub fn textures(&self) -> impl Iterator<Item = (&Chunk, &TextureChunk)> {
		self.chunks.iter().filter_map(|chunk| match &chunk.data {
			ChunkData::Texture(texture) => Some((chunk, texture)),
			_ => None,
		})
	}

	/// Names the file holding the textures of every model in this one.
	pub fn set_environment(&mut self, key: &str) {
		for chunk in &mut self.chunks {
			if let ChunkData::Model(model) = &mut chunk.data {
				model.environment = Some(key.to_owned());
			}
		}
	}
}

impl Readable for ChunkedFile {
	fn read(reader: &mut DataReader) -> Result<Self> {
		Self::read_with(reader, &ContainerOptions::default())
	}
}

impl Writable for ChunkedFile {
	fn write(&self, writer: &mut DataWriter) -> Result<()> {
		self.write_with(writer, &ContainerOptions::default())
	}
}
