use crate::error::{Error, Result};

/// Saved positions for temporary jumps, last in first out.
#[derive(Debug, Default, Clone)]
pub struct JumpStack(Vec<usize>);

impl JumpStack {
	pub fn push(&mut self, position: usize) {
		self.0.push(position);
	}

	/// Fails without touching the stack when nothing was pushed.
	pub fn pop(&mut self) -> Result<usize> {
		self.0.pop().ok_or(Error::EmptyJumpStack)
	}

	pub fn depth(&self) -> usize {
		self.0.len()
	}
}
