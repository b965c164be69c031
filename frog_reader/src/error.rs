use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
	#[error("unexpected end of data at offset {offset:#x} (need {need} bytes, have {have})")]
	EndOfData {
		offset: usize,
		need: usize,
		have: usize,
	},

	/// A `jump_return` without a matching `jump_temp`.
	#[error("jump_return called with an empty jump stack")]
	EmptyJumpStack,

	#[error("cannot search for an empty byte pattern")]
	EmptyPattern,

	#[error("byte pattern {pattern:02x?} not found after offset {offset:#x}")]
	PatternNotFound { pattern: Box<[u8]>, offset: usize },

	#[error("string mismatch at offset {offset:#x}: expected {expected:?}, found {found:?}")]
	StringMismatch {
		offset: usize,
		expected: String,
		found: String,
	},

	#[error("unknown chunk type {tag:?} at offset {offset:#x}")]
	UnknownChunkType { offset: usize, tag: [u8; 4] },

	#[error("polygons with {0} vertices have no defined layout")]
	UnsupportedVertexCount(usize),

	#[error("invalid wav data: {0}")]
	InvalidWav(&'static str),

	#[error("{what} of {count} does not fit its header field")]
	CountOverflow { what: &'static str, count: usize },
}

pub type Result<T> = std::result::Result<T, Error>;
