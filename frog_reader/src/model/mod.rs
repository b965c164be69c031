pub mod chunk;
pub mod poly;
pub mod vtx;

use crate::{error::Error, Readable, Result, Writable};

/// Texture coordinate in texels of the texture page.
#[derive(Readable, Writable, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ByteUv {
	pub u: u8,
	pub v: u8,
}

impl ByteUv {
	pub const fn new(u: u8, v: u8) -> Self {
		Self { u, v }
	}
}

/// PSX `CVECTOR`.
#[derive(Readable, Writable, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ColorVector {
	pub red: u8,
	pub green: u8,
	pub blue: u8,
	/// GPU primitive code, copied into the packet at runtime
	pub code: u8,
}

/// Byte count declared by a signed header field. Negative counts can never be satisfied.
pub(crate) fn declared_len(count: i32) -> usize {
	usize::try_from(count).unwrap_or(usize::MAX)
}

/// `count` converted for a header field, failing instead of truncating.
pub(crate) fn stored_count<T: TryFrom<usize>>(what: &'static str, count: usize) -> Result<T> {
	T::try_from(count).map_err(|_| Error::CountOverflow { what, count })
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn negative_declared_len_is_unsatisfiable() {
		assert_eq!(declared_len(12), 12);
		assert_eq!(declared_len(-1), usize::MAX);
	}

	#[test]
	fn oversized_counts_are_errors() {
		assert_eq!(stored_count::<i32>("vertex count", 7).unwrap(), 7);
		assert_eq!(stored_count::<u32>("chunk count", u32::MAX as usize).unwrap(), u32::MAX);
		let too_many = i32::MAX as usize + 1;
		match stored_count::<i32>("vertex count", too_many) {
			Err(Error::CountOverflow { what, count }) => {
				assert_eq!(what, "vertex count");
				assert_eq!(count, too_many);
			},
			other => panic!("unexpected {:?}", other),
		}
		#[cfg(target_pointer_width = "64")]
		assert!(matches!(
			stored_count::<u32>("chunk body length", u32::MAX as usize + 1),
			Err(Error::CountOverflow { what: "chunk body length", .. })
		));
	}
}
