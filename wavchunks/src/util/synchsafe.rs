//! Synchsafe integers, as used by ID3v2 tag headers
//!
//! A synchsafe integer stores 7 bits per byte, leaving the most significant bit of each byte
//! clear so the value can never be mistaken for an MPEG frame sync.

use crate::error::Result;
use crate::macros::err;

/// An integer that can be converted to and from synchsafe variants
pub(crate) trait SynchsafeInteger: Sized {
	/// Create a synchsafe integer
	///
	/// # Errors
	///
	/// `self` doesn't fit in 28 bits
	fn synch(self) -> Result<Self>;

	/// Unsynchronise a synchsafe integer
	fn unsynch(self) -> Self;
}

impl SynchsafeInteger for u32 {
	fn synch(self) -> Result<Self> {
		// 7 bits are available per byte
		const MAXIMUM_INTEGER: u32 = 0x0FFF_FFFF;

		if self > MAXIMUM_INTEGER {
			err!(TooMuchData);
		}

		Ok((self & 0x7F)
			| ((self & (0x7F << 7)) << 1)
			| ((self & (0x7F << 14)) << 2)
			| ((self & (0x7F << 21)) << 3))
	}

	fn unsynch(self) -> Self {
		((self & 0x7F00_0000) >> 3) | ((self & 0x7F_0000) >> 2) | ((self & 0x7F00) >> 1) | (self & 0x7F)
	}
}

#[cfg(test)]
mod tests {
	use super::SynchsafeInteger;

	#[test_log::test]
	fn u32_synch() {
		assert_eq!(0xFFF_FFFF_u32.synch().unwrap(), 0x7F7F_7F7F_u32);
		assert_eq!(0x80_u32.synch().unwrap(), 0x0100_u32);
		assert!(0x1000_0000_u32.synch().is_err());
	}

	#[test_log::test]
	fn u32_unsynch() {
		assert_eq!(0x7F7F_7F7F_u32.unsynch(), 0xFFF_FFFF_u32);
		assert_eq!(0x0000_0101_u32.unsynch(), 0x81_u32);
	}

	#[test_log::test]
	fn u32_synch_unsynch_inverse() {
		for value in [0_u32, 1, 127, 128, 16_383, 16_384, 0x0ABC_DEF0 & 0x0FFF_FFFF] {
			assert_eq!(value.synch().unwrap().unsynch(), value);
		}
	}
}
