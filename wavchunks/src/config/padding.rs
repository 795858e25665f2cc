/// How odd-sized records are aligned
///
/// RIFF requires every chunk body to start on an even offset, so a record with an odd
/// size is followed by a single pad byte that is not counted in its size field. Not every
/// writer honors this, so the behavior can be switched off for both reading and writing.
///
/// # Examples
///
/// ```rust
/// use wavchunks::config::{ChunkPadding, ParseOptions};
///
/// // This file came from a writer that never pads its chunks
/// let parse_options = ParseOptions::new().padding(ChunkPadding::None);
/// ```
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
pub enum ChunkPadding {
	/// Odd-sized records are followed by one pad byte
	#[default]
	Even,
	/// Records are packed back to back
	None,
}

impl ChunkPadding {
	/// The number of pad bytes following a record of `size` bytes
	///
	/// # Examples
	///
	/// ```rust
	/// use wavchunks::config::ChunkPadding;
	///
	/// assert_eq!(ChunkPadding::Even.pad_len(3), 1);
	/// assert_eq!(ChunkPadding::Even.pad_len(4), 0);
	/// assert_eq!(ChunkPadding::None.pad_len(3), 0);
	/// ```
	pub fn pad_len(self, size: u64) -> u64 {
		match self {
			ChunkPadding::Even => size % 2,
			ChunkPadding::None => 0,
		}
	}
}
