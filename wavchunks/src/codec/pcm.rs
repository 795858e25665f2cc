//! Little-endian integer and IEEE float samples

use super::Sample;
use crate::error::Result;
use crate::macros::err;

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};

/// The inclusive range of values a PCM sample of `width` bytes can hold
///
/// 8-bit PCM is unsigned, everything wider is signed.
pub(crate) fn int_range(width: usize) -> (i64, i64) {
	match width {
		1 => (0, i64::from(u8::MAX)),
		8 => (i64::MIN, i64::MAX),
		_ => {
			let bits = width * 8 - 1;
			(-(1_i64 << bits), (1_i64 << bits) - 1)
		},
	}
}

pub(crate) fn read_int(mut raw: &[u8], width: usize) -> Result<i64> {
	if width == 1 {
		return Ok(i64::from(raw.read_u8()?));
	}

	Ok(raw.read_int::<LittleEndian>(width)?)
}

pub(crate) fn write_int(out: &mut Vec<u8>, sample: &Sample, width: usize) -> Result<()> {
	let Sample::Int(value) = *sample else {
		err!(InvalidSample("Expected an integer sample"));
	};

	let (min, max) = int_range(width);
	if value < min || value > max {
		err!(InvalidSample("Integer sample is out of range for the sample width"));
	}

	if width == 1 {
		// Checked above
		out.write_u8(value as u8)?;
		return Ok(());
	}

	out.write_int::<LittleEndian>(value, width)?;
	Ok(())
}

pub(crate) fn read_float(mut raw: &[u8], width: usize) -> Result<f64> {
	if width == 4 {
		return Ok(f64::from(raw.read_f32::<LittleEndian>()?));
	}

	Ok(raw.read_f64::<LittleEndian>()?)
}

pub(crate) fn write_float(out: &mut Vec<u8>, sample: &Sample, width: usize) -> Result<()> {
	let Sample::Float(value) = *sample else {
		err!(InvalidSample("Expected a floating point sample"));
	};

	if width == 4 {
		if value.is_finite() && value.abs() > f64::from(f32::MAX) {
			err!(InvalidSample("Float sample is out of range for a 32-bit float"));
		}

		out.write_f32::<LittleEndian>(value as f32)?;
		return Ok(());
	}

	out.write_f64::<LittleEndian>(value)?;
	Ok(())
}
