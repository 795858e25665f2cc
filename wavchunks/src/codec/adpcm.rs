//! IMA ADPCM, 4 bits per value
//!
//! The whole buffer is a single stream, starting with a predictor of 0 and a step index of 0.
//! Each byte holds two 16-bit values, high nibble first.
//!
//! The values form a little-endian linear stream of `linear_width` byte values, 2 bytes as-is
//! or 4 bytes shifted up by 16. That stream is read in groups of 8 bytes, each group being a
//! single `i64` sample. A partial group at the end of the buffer is not decoded.

use crate::error::Result;
use crate::macros::err;
use crate::util::alloc::VecFallibleCapacity;

use byteorder::{ByteOrder, LittleEndian};

const INDEX_TABLE: [i32; 16] = [-1, -1, -1, -1, 2, 4, 6, 8, -1, -1, -1, -1, 2, 4, 6, 8];

#[rustfmt::skip]
const STEP_TABLE: [i32; 89] = [
	7, 8, 9, 10, 11, 12, 13, 14, 16, 17,
	19, 21, 23, 25, 28, 31, 34, 37, 41, 45,
	50, 55, 60, 66, 73, 80, 88, 97, 107, 118,
	130, 143, 157, 173, 190, 209, 230, 253, 279, 307,
	337, 371, 408, 449, 494, 544, 598, 658, 724, 796,
	876, 963, 1060, 1166, 1282, 1411, 1552, 1707, 1878, 2066,
	2272, 2499, 2749, 3024, 3327, 3660, 4026, 4428, 4871, 5358,
	5894, 6484, 7132, 7845, 8630, 9493, 10442, 11487, 12635, 13899,
	15289, 16818, 18500, 20350, 22385, 24623, 27086, 29794, 32767,
];

#[derive(Default)]
struct ImaState {
	predictor: i32,
	index: usize,
}

impl ImaState {
	fn step(&self) -> i32 {
		STEP_TABLE[self.index]
	}

	fn apply(&mut self, nibble: u8) -> i16 {
		let step = self.step();

		let mut diff = step >> 3;
		if nibble & 4 != 0 {
			diff += step;
		}
		if nibble & 2 != 0 {
			diff += step >> 1;
		}
		if nibble & 1 != 0 {
			diff += step >> 2;
		}

		if nibble & 8 == 0 {
			self.predictor += diff;
		} else {
			self.predictor -= diff;
		}
		self.predictor = self
			.predictor
			.clamp(i32::from(i16::MIN), i32::from(i16::MAX));

		let index = self.index as i32 + INDEX_TABLE[usize::from(nibble & 0x0F)];
		self.index = index.clamp(0, 88) as usize;

		// Clamped to the 16-bit range above
		self.predictor as i16
	}

	fn quantize(&self, sample: i32) -> u8 {
		let mut step = self.step();
		let mut diff = sample - self.predictor;

		let mut nibble = 0;
		if diff < 0 {
			nibble = 8;
			diff = -diff;
		}

		if diff >= step {
			nibble |= 4;
			diff -= step;
		}
		step >>= 1;
		if diff >= step {
			nibble |= 2;
			diff -= step;
		}
		step >>= 1;
		if diff >= step {
			nibble |= 1;
		}

		nibble
	}
}

/// The number of ADPCM bytes that make up a single sample
pub(crate) fn stride(linear_width: usize) -> usize {
	// Every byte expands to two linear values
	8 / (2 * linear_width)
}

pub(crate) fn decode(raw: &[u8], linear_width: usize) -> Result<Vec<i64>> {
	let stride = stride(linear_width);
	let mut state = ImaState::default();

	let mut samples = Vec::try_with_capacity_stable(raw.len() / stride)?;
	for bytes in raw.chunks_exact(stride) {
		let mut group = [0; 8];
		let mut slots = group.chunks_exact_mut(linear_width);

		for byte in bytes {
			for nibble in [byte >> 4, byte & 0x0F] {
				let value = state.apply(nibble);
				let Some(slot) = slots.next() else {
					break;
				};

				match linear_width {
					2 => LittleEndian::write_i16(slot, value),
					_ => LittleEndian::write_i32(slot, i32::from(value) << 16),
				}
			}
		}

		samples.push(LittleEndian::read_i64(&group));
	}

	Ok(samples)
}

pub(crate) fn encode(samples: &[i64], linear_width: usize) -> Result<Vec<u8>> {
	let mut state = ImaState::default();

	let mut out = Vec::try_with_capacity_stable(samples.len().saturating_mul(stride(linear_width)))?;
	let mut high = None;
	for sample in samples {
		let group = sample.to_le_bytes();

		for slot in group.chunks_exact(linear_width) {
			let value = match linear_width {
				2 => LittleEndian::read_i16(slot),
				_ => {
					let value = LittleEndian::read_i32(slot);
					if value & 0xFFFF != 0 {
						err!(InvalidSample(
							"32-bit ADPCM values must be 16-bit values shifted up by 16"
						));
					}

					(value >> 16) as i16
				},
			};

			let nibble = state.quantize(i32::from(value));
			state.apply(nibble);

			match high.take() {
				Some(high) => out.push((high << 4) | nibble),
				None => high = Some(nibble),
			}
		}
	}

	if high.is_some() {
		err!(EncodingRoundTrip {
			expected: samples.len().saturating_mul(stride(linear_width)),
			actual: out.len() + 1,
		});
	}

	Ok(out)
}
