use byteorder::{ByteOrder, LE};
use num_traits::AsPrimitive;
use crate::{error::{Error, Result}, jump::JumpStack, text::{self, FixedString}, Readable};

/// Read cursor over an owned, fully loaded byte buffer.
///
/// The position may be moved past the end of the data; only reads fail there.
#[derive(Debug, Clone)]
pub struct DataReader {
	data: Box<[u8]>,
	pos: usize,
	jumps: JumpStack,
}

impl DataReader {
	pub fn new(data: impl Into<Box<[u8]>>) -> Self {
		Self {
			data: data.into(),
			pos: 0,
			jumps: JumpStack::default(),
		}
	}

	pub fn len(&self) -> usize {
		self.data.len()
	}

	pub fn is_empty(&self) -> bool {
		self.data.is_empty()
	}

	pub fn position(&self) -> usize {
		self.pos
	}

	pub fn set_position(&mut self, pos: usize) {
		self.pos = pos;
	}

	pub fn remaining(&self) -> usize {
		self.data.len().saturating_sub(self.pos)
	}

	pub fn has_more(&self) -> bool {
		self.pos < self.data.len()
	}

	/// Number of `jump_temp` calls not yet matched by `jump_return`.
	pub fn jump_depth(&self) -> usize {
		self.jumps.depth()
	}

	fn ensure(&self, need: usize) -> Result<()> {
		let have = self.remaining();
		if need > have {
			return Err(Error::EndOfData { offset: self.pos, need, have });
		}
		Ok(())
	}

	pub fn read_byte(&mut self) -> Result<u8> {
		self.ensure(1)?;
		let byte = self.data[self.pos];
		self.pos += 1;
		Ok(byte)
	}

	pub fn read_bytes(&mut self, n: usize) -> Result<&[u8]> {
		self.ensure(n)?;
		let start = self.pos;
		self.pos += n;
		Ok(&self.data[start..self.pos])
	}

	pub fn read_array<const N: usize>(&mut self) -> Result<[u8; N]> {
		let mut array = [0; N];
		array.copy_from_slice(self.read_bytes(N)?);
		Ok(array)
	}

	pub fn skip(&mut self, n: usize) -> Result<()> {
		self.ensure(n)?;
		self.pos += n;
		Ok(())
	}

	pub fn read<T: Readable>(&mut self) -> Result<T> {
		T::read(self)
	}

	/// Reads a `T` and widens it, e.g. `read_as::<u8, u16>()`.
	pub fn read_as<T, U>(&mut self) -> Result<U>
	where
		T: Readable + AsPrimitive<U>,
		U: Copy + 'static,
	{
		Ok(T::read(self)?.as_())
	}

	/// Little-endian unsigned integer of `n` bytes, `1 <= n <= 8`.
	pub fn read_uint(&mut self, n: usize) -> Result<u64> {
		Ok(LE::read_uint(self.read_bytes(n)?, n))
	}

	/// Little-endian sign-extended integer of `n` bytes, `1 <= n <= 8`.
	pub fn read_int(&mut self, n: usize) -> Result<i64> {
		Ok(LE::read_int(self.read_bytes(n)?, n))
	}

	/// Saves the current position and moves to `pos`. Undo with `jump_return`.
	pub fn jump_temp(&mut self, pos: usize) {
		self.jumps.push(self.pos);
		self.pos = pos;
	}

	pub fn jump_return(&mut self) -> Result<()> {
		self.pos = self.jumps.pop()?;
		Ok(())
	}

	/// Copies everything from the current position to the end without moving.
	pub fn peek_remaining(&mut self) -> Result<Box<[u8]>> {
		self.jump_temp(self.pos);
		let bytes = self.read_bytes(self.remaining()).map(Box::<[u8]>::from);
		self.jump_return()?;
		bytes
	}

	/// Scans forward for `pattern`, leaving the cursor at its start, or just past it if
	/// `place_after` is set.
	pub fn find_bytes(&mut self, pattern: &[u8], place_after: bool) -> Result<()> {
		let Some((&first, rest)) = pattern.split_first() else {
			return Err(Error::EmptyPattern);
		};
		let start = self.pos;
		while self.has_more() {
			if self.read_byte()? != first {
				continue;
			}
			self.jump_temp(self.pos);
			let mut pass = true;
			for &expected in rest {
				if !self.has_more() || self.read_byte()? != expected {
					pass = false;
					break;
				}
			}
			self.jump_return()?;
			if pass {
				self.pos -= 1;
				if place_after {
					self.skip(pattern.len())?;
				}
				return Ok(());
			}
		}
		Err(Error::PatternNotFound { pattern: pattern.into(), offset: start })
	}

	/// Independent reader over a copy of `length` bytes at `offset`, or up to the end if `length`
	/// is `None`. This reader's position is left as it was.
	pub fn sub_reader(&mut self, offset: usize, length: Option<usize>) -> Result<DataReader> {
		self.jump_temp(offset);
		let len = length.unwrap_or_else(|| self.remaining());
		let bytes = self.read_bytes(len).map(Box::<[u8]>::from);
		self.jump_return()?;
		Ok(DataReader::new(bytes?))
	}

	/// Reads a string stored in exactly `len` bytes, ending at the first zero byte.
	pub fn read_fixed_string(&mut self, len: usize) -> Result<String> {
		let bytes = self.read_bytes(len)?;
		let end = bytes.iter().position(|&b| b == 0).unwrap_or(len);
		Ok(text::decode(&bytes[..end]))
	}

	/// Like `read_fixed_string`, keeping the bytes after the terminator for re-encoding.
	pub fn read_fixed(&mut self, len: usize) -> Result<FixedString> {
		Ok(FixedString::from_stored(self.read_bytes(len)?.into()))
	}

	/// Reads until `terminator`, which is consumed but not returned.
	pub fn read_terminated_string(&mut self, terminator: u8) -> Result<String> {
		let mut bytes = Vec::new();
		loop {
			match self.read_byte()? {
				b if b == terminator => break,
				b => bytes.push(b),
			}
		}
		Ok(text::decode(&bytes))
	}

	pub fn read_null_terminated_string(&mut self) -> Result<String> {
		self.read_terminated_string(0)
	}

	/// Format signature check.
	pub fn verify_string(&mut self, expected: &str) -> Result<()> {
		let offset = self.pos;
		let expected_bytes = text::encode(expected);
		let found = self.read_bytes(expected_bytes.len())?;
		if found != expected_bytes.as_slice() {
			return Err(Error::StringMismatch {
				offset,
				expected: expected.to_owned(),
				found: text::decode(found),
			});
		}
		Ok(())
	}
}
