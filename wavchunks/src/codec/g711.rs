//! ITU-T G.711 A-law and µ-law companding
//!
//! Both work on 16-bit linear PCM, wider or narrower samples are rescaled by the caller.

const SIGN_BIT: u8 = 0x80;
const QUANT_MASK: u8 = 0x0F;
const SEG_SHIFT: u8 = 4;
const SEG_MASK: u8 = 0x70;

const ALAW_SEG_END: [i32; 8] = [0x1F, 0x3F, 0x7F, 0xFF, 0x1FF, 0x3FF, 0x7FF, 0xFFF];
const ULAW_SEG_END: [i32; 8] = [0x3F, 0x7F, 0xFF, 0x1FF, 0x3FF, 0x7FF, 0xFFF, 0x1FFF];

const ULAW_BIAS: i32 = 0x84;
const ULAW_CLIP: i32 = 8159;

fn segment(value: i32, table: &[i32; 8]) -> u8 {
	let mut seg = 0;
	for end in table {
		if value <= *end {
			break;
		}
		seg += 1;
	}
	seg
}

pub(crate) fn alaw_to_linear(a_val: u8) -> i16 {
	let a_val = a_val ^ 0x55;

	let mut t = i32::from(a_val & QUANT_MASK) << 4;
	let seg = (a_val & SEG_MASK) >> SEG_SHIFT;
	match seg {
		0 => t += 8,
		1 => t += 0x108,
		_ => {
			t += 0x108;
			t <<= seg - 1;
		},
	}

	let linear = if a_val & SIGN_BIT == 0 { -t } else { t };
	// At most 0x7E00 in magnitude
	linear as i16
}

pub(crate) fn linear_to_alaw(pcm_val: i16) -> u8 {
	let mut pcm_val = i32::from(pcm_val) >> 3;

	let mask;
	if pcm_val >= 0 {
		mask = 0xD5;
	} else {
		mask = 0x55;
		pcm_val = -pcm_val - 1;
	}

	let seg = segment(pcm_val, &ALAW_SEG_END);
	if seg >= 8 {
		return 0x7F ^ mask;
	}

	let mut a_val = seg << SEG_SHIFT;
	let shift = if seg < 2 { 1 } else { seg };
	a_val |= ((pcm_val >> shift) as u8) & QUANT_MASK;

	a_val ^ mask
}

pub(crate) fn ulaw_to_linear(u_val: u8) -> i16 {
	let u_val = !u_val;

	let mut t = (i32::from(u_val & QUANT_MASK) << 3) + ULAW_BIAS;
	t <<= (u_val & SEG_MASK) >> SEG_SHIFT;

	let linear = if u_val & SIGN_BIT == 0 {
		t - ULAW_BIAS
	} else {
		ULAW_BIAS - t
	};
	// At most 0x7D7C in magnitude
	linear as i16
}

pub(crate) fn linear_to_ulaw(pcm_val: i16) -> u8 {
	let mut pcm_val = i32::from(pcm_val) >> 2;

	let mask;
	if pcm_val < 0 {
		pcm_val = -pcm_val;
		mask = 0x7F;
	} else {
		mask = 0xFF;
	}

	pcm_val = pcm_val.min(ULAW_CLIP) + (ULAW_BIAS >> 2);

	let seg = segment(pcm_val, &ULAW_SEG_END);
	if seg >= 8 {
		return 0x7F ^ mask;
	}

	let u_val = (seg << SEG_SHIFT) | (((pcm_val >> (seg + 1)) as u8) & QUANT_MASK);
	u_val ^ mask
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test_log::test]
	fn alaw_known_values() {
		assert_eq!(alaw_to_linear(0xD5), 8);
		assert_eq!(alaw_to_linear(0x55), -8);
		assert_eq!(alaw_to_linear(0xAA), 32256);
		assert_eq!(alaw_to_linear(0x2A), -32256);

		assert_eq!(linear_to_alaw(0), 0xD5);
		assert_eq!(linear_to_alaw(i16::MAX), 0xAA);
		assert_eq!(linear_to_alaw(i16::MIN), 0x2A);
	}

	#[test_log::test]
	fn ulaw_known_values() {
		assert_eq!(ulaw_to_linear(0xFF), 0);
		assert_eq!(ulaw_to_linear(0x7F), 0);
		assert_eq!(ulaw_to_linear(0x80), 32124);
		assert_eq!(ulaw_to_linear(0x00), -32124);

		assert_eq!(linear_to_ulaw(0), 0xFF);
		assert_eq!(linear_to_ulaw(i16::MAX), 0x80);
		assert_eq!(linear_to_ulaw(i16::MIN), 0x00);
	}

	#[test_log::test]
	fn every_code_survives_expansion() {
		for code in 0..=u8::MAX {
			let alaw = alaw_to_linear(code);
			assert_eq!(alaw_to_linear(linear_to_alaw(alaw)), alaw, "A-law {code:#04x}");

			let ulaw = ulaw_to_linear(code);
			assert_eq!(ulaw_to_linear(linear_to_ulaw(ulaw)), ulaw, "µ-law {code:#04x}");
		}
	}
}
