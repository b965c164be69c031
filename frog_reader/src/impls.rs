use std::mem::size_of;
use arrayvec::ArrayVec;
use byteorder::{ByteOrder, LE};
use crate::{read_vec, DataReader, DataWriter, Readable, Result, Writable};

//primitive impls

impl Readable for () {
	fn read(_: &mut DataReader) -> Result<Self> { Ok(()) }
}

impl Writable for () {
	fn write(&self, _: &mut DataWriter) -> Result<()> { Ok(()) }
}

impl Readable for u8 {
	fn read(reader: &mut DataReader) -> Result<Self> {
		reader.read_byte()
	}
}

impl Writable for u8 {
	fn write(&self, writer: &mut DataWriter) -> Result<()> {
		writer.write_byte(*self);
		Ok(())
	}
}

impl Readable for i8 {
	fn read(reader: &mut DataReader) -> Result<Self> {
		Ok(reader.read_byte()? as i8)
	}
}

impl Writable for i8 {
	fn write(&self, writer: &mut DataWriter) -> Result<()> {
		writer.write_byte(*self as u8);
		Ok(())
	}
}

macro_rules! impl_codec_prim_le {
	($type:ty, $read:ident, $write:ident) => {
		impl Readable for $type {
			fn read(reader: &mut DataReader) -> Result<Self> {
				Ok(LE::$read(reader.read_bytes(size_of::<$type>())?))
			}
		}

		impl Writable for $type {
			fn write(&self, writer: &mut DataWriter) -> Result<()> {
				let mut buf = [0; size_of::<$type>()];
				LE::$write(&mut buf, *self);
				writer.write_bytes(&buf);
				Ok(())
			}
		}
	};
}

impl_codec_prim_le!(u16, read_u16, write_u16);
impl_codec_prim_le!(i16, read_i16, write_i16);
impl_codec_prim_le!(u32, read_u32, write_u32);
impl_codec_prim_le!(i32, read_i32, write_i32);
impl_codec_prim_le!(u64, read_u64, write_u64);
impl_codec_prim_le!(i64, read_i64, write_i64);
impl_codec_prim_le!(f32, read_f32, write_f32);
impl_codec_prim_le!(f64, read_f64, write_f64);

//array impls

impl<T: Readable, const N: usize> Readable for [T; N] {
	fn read(reader: &mut DataReader) -> Result<Self> {
		let mut array = ArrayVec::<T, N>::new();
		for _ in 0..N {
			array.push(T::read(reader)?);
		}
		Ok(array.into_inner().ok().unwrap())//reads exactly N items
	}
}

impl<T: Writable, const N: usize> Writable for [T; N] {
	fn write(&self, writer: &mut DataWriter) -> Result<()> {
		self.iter().try_for_each(|item| item.write(writer))
	}
}

impl<T: Writable> Writable for [T] {
	fn write(&self, writer: &mut DataWriter) -> Result<()> {
		self.iter().try_for_each(|item| item.write(writer))
	}
}

impl<T: Readable, const N: usize> Readable for Box<[T; N]> {
	fn read(reader: &mut DataReader) -> Result<Self> {
		Ok(read_vec(reader, N)?.into_boxed_slice().try_into().ok().unwrap())//reads exactly N items
	}
}

impl<T: Writable + ?Sized> Writable for Box<T> {
	fn write(&self, writer: &mut DataWriter) -> Result<()> {
		(**self).write(writer)
	}
}

impl<T: Writable> Writable for Vec<T> {
	fn write(&self, writer: &mut DataWriter) -> Result<()> {
		self.as_slice().write(writer)
	}
}

#[cfg(test)]
mod tests {
	use crate::{decode, encode};

	#[test]
	fn little_endian_prims() {
		assert_eq!(decode::<u16>(&[0x34, 0x12]).unwrap(), 0x1234);
		assert_eq!(decode::<i32>(&[0xFE, 0xFF, 0xFF, 0xFF]).unwrap(), -2);
		assert_eq!(decode::<f32>(&[0, 0, 0x80, 0x3F]).unwrap(), 1.0);
		assert_eq!(encode(&0x0102_0304u32).unwrap(), [4, 3, 2, 1]);
		assert_eq!(encode(&-1i16).unwrap(), [0xFF, 0xFF]);
	}

	#[test]
	fn short_input_is_end_of_data() {
		assert!(matches!(decode::<u32>(&[1, 2, 3]), Err(crate::Error::EndOfData { need: 4, have: 3, .. })));
	}

	#[test]
	fn arrays_read_in_order() {
		let bytes = [1, 0, 2, 0, 3, 0];
		let array = decode::<[u16; 3]>(&bytes).unwrap();
		assert_eq!(array, [1, 2, 3]);
		assert_eq!(encode(&array).unwrap(), bytes);
		let boxed = decode::<Box<[u8; 6]>>(&bytes).unwrap();
		assert_eq!(encode(&boxed).unwrap(), bytes);
	}
}
