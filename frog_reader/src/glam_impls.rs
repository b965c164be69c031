use glam::{Vec2, Vec3};
use crate::{DataReader, DataWriter, Readable, Result, Writable};

macro_rules! impl_codec_glam {
	($type:ty, $array:ty) => {
		impl Readable for $type {
			fn read(reader: &mut DataReader) -> Result<Self> {
				Ok(<$array>::read(reader)?.into())
			}
		}

		impl Writable for $type {
			fn write(&self, writer: &mut DataWriter) -> Result<()> {
				self.to_array().write(writer)
			}
		}
	};
}

impl_codec_glam!(Vec2, [f32; 2]);
impl_codec_glam!(Vec3, [f32; 3]);
