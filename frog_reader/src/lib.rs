extern crate self as frog_reader;

pub mod model;
pub mod sound;
mod cursor;
mod error;
mod glam_impls;
mod impls;
mod jump;
mod text;
mod writer;

pub use cursor::DataReader;
pub use error::{Error, Result};
pub use frog_derive::{Readable, Writable};
pub use jump::JumpStack;
pub use model::chunk::{ContainerOptions, EncodeSource};
pub use text::FixedString;
pub use writer::DataWriter;

/// Decodes `Self` from the reader's position, consuming exactly the bytes of its layout.
pub trait Readable: Sized {
	fn read(reader: &mut DataReader) -> Result<Self>;
}

/// Writes the layout `Readable::read` consumes, byte for byte.
pub trait Writable {
	fn write(&self, writer: &mut DataWriter) -> Result<()>;
}

pub fn read_vec<T: Readable>(reader: &mut DataReader, len: usize) -> Result<Vec<T>> {
	let mut vec = Vec::with_capacity(len.min(reader.remaining()));//counts come from untrusted headers
	for _ in 0..len {
		vec.push(T::read(reader)?);
	}
	Ok(vec)
}

pub fn write_slice<T: Writable>(writer: &mut DataWriter, items: &[T]) -> Result<()> {
	for item in items {
		item.write(writer)?;
	}
	Ok(())
}

/// Decodes a record from the start of `bytes`.
pub fn decode<T: Readable>(bytes: &[u8]) -> Result<T> {
	T::read(&mut DataReader::new(bytes))
}

pub fn encode<T: Writable + ?Sized>(record: &T) -> Result<Vec<u8>> {
	let mut writer = DataWriter::new();
	record.write(&mut writer)?;
	Ok(writer.into_bytes())
}
