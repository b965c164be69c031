use byteorder::{ByteOrder, LE};
use crate::{error::Result, jump::JumpStack, text::{self, FixedString}, Writable};

/// Write cursor over a growing buffer.
///
/// Writes overwrite whatever is at the position and extend the buffer as needed. Writing past
/// the end after a seek zero-fills the gap.
#[derive(Debug, Default, Clone)]
pub struct DataWriter {
	buf: Vec<u8>,
	pos: usize,
	jumps: JumpStack,
}

impl DataWriter {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn with_capacity(capacity: usize) -> Self {
		Self {
			buf: Vec::with_capacity(capacity),
			..Self::default()
		}
	}

	pub fn len(&self) -> usize {
		self.buf.len()
	}

	pub fn is_empty(&self) -> bool {
		self.buf.is_empty()
	}

	pub fn position(&self) -> usize {
		self.pos
	}

	pub fn set_position(&mut self, pos: usize) {
		self.pos = pos;
	}

	pub fn jump_depth(&self) -> usize {
		self.jumps.depth()
	}

	pub fn jump_temp(&mut self, pos: usize) {
		self.jumps.push(self.pos);
		self.pos = pos;
	}

	pub fn jump_return(&mut self) -> Result<()> {
		self.pos = self.jumps.pop()?;
		Ok(())
	}

	pub fn write_byte(&mut self, byte: u8) {
		self.write_bytes(&[byte]);
	}

	pub fn write_bytes(&mut self, bytes: &[u8]) {
		let end = self.pos + bytes.len();
		if end > self.buf.len() {
			self.buf.resize(end, 0);
		}
		self.buf[self.pos..end].copy_from_slice(bytes);
		self.pos = end;
	}

	pub fn write_null(&mut self, n: usize) {
		self.write_fill(0, n);
	}

	pub fn write_fill(&mut self, byte: u8, n: usize) {
		let end = self.pos + n;
		if end > self.buf.len() {
			self.buf.resize(end, 0);
		}
		self.buf[self.pos..end].fill(byte);
		self.pos = end;
	}

	pub fn write<T: Writable + ?Sized>(&mut self, value: &T) -> Result<()> {
		value.write(self)
	}

	/// Low `n` bytes of `value`, little-endian, `1 <= n <= 8`.
	pub fn write_uint(&mut self, value: u64, n: usize) {
		let mut buf = [0; 8];
		LE::write_uint(&mut buf, value, n);
		self.write_bytes(&buf[..n]);
	}

	/// Writes `text` into exactly `len` bytes. Shorter strings get a zero terminator and are
	/// filled with `pad`; longer ones are cut off.
	pub fn write_fixed_string(&mut self, text: &str, len: usize, pad: u8) {
		let mut bytes = text::encode(text);
		bytes.truncate(len);
		let written = bytes.len();
		self.write_bytes(&bytes);
		if written < len {
			self.write_byte(0);
			self.write_fill(pad, len - written - 1);
		}
	}

	/// Replays the stored bytes of `text` while they still hold it, else as `write_fixed_string`.
	pub fn write_fixed(&mut self, text: &FixedString, len: usize, pad: u8) {
		match text.stored_bytes(len) {
			Some(stored) => self.write_bytes(stored),
			None => self.write_fixed_string(text, len, pad),
		}
	}

	pub fn write_terminated_string(&mut self, text: &str, terminator: u8) {
		self.write_bytes(&text::encode(text));
		self.write_byte(terminator);
	}

	pub fn write_null_terminated_string(&mut self, text: &str) {
		self.write_terminated_string(text, 0);
	}

	/// Pads with `fill` up to the next multiple of `alignment` measured from the buffer start.
	pub fn align(&mut self, alignment: usize, fill: u8) {
		let rem = self.pos % alignment;
		if rem != 0 {
			self.write_fill(fill, alignment - rem);
		}
	}

	pub fn as_bytes(&self) -> &[u8] {
		&self.buf
	}

	pub fn into_bytes(self) -> Vec<u8> {
		self.buf
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn out_of_order_writes() {
		let mut writer = DataWriter::new();
		writer.write_bytes(b"HEAD");
		let len_pos = writer.position();
		writer.write_null(4);
		writer.write_bytes(&[9; 6]);
		writer.jump_temp(len_pos);
		writer.write_uint(6, 4);
		writer.jump_return().unwrap();
		writer.write_byte(1);
		assert_eq!(writer.into_bytes(), b"HEAD\x06\0\0\0\x09\x09\x09\x09\x09\x09\x01");
	}

	#[test]
	fn writing_after_a_far_seek_zero_fills() {
		let mut writer = DataWriter::new();
		writer.set_position(3);
		writer.write_byte(0xAA);
		assert_eq!(writer.as_bytes(), &[0, 0, 0, 0xAA]);
	}

	#[test]
	fn fixed_string_padding() {
		let mut writer = DataWriter::new();
		writer.write_fixed_string("ab", 6, 0xCD);
		writer.write_fixed_string("toolong", 4, 0);
		writer.write_fixed_string("full", 4, 0);
		assert_eq!(writer.as_bytes(), b"ab\0\xCD\xCD\xCDtoolfull");
	}

	#[test]
	fn alignment_is_from_buffer_start() {
		let mut writer = DataWriter::new();
		writer.write_bytes(&[1; 5]);
		writer.align(4, 0);
		assert_eq!(writer.len(), 8);
		writer.align(4, 0);
		assert_eq!(writer.len(), 8);
	}

	#[test]
	fn jump_return_without_jump() {
		let mut writer = DataWriter::new();
		assert!(writer.jump_return().is_err());
		assert_eq!(writer.jump_depth(), 0);
	}
}
