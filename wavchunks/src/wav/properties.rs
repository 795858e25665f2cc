use crate::chunk::{AudioFormat, FactChunk, FmtChunk};

use std::time::Duration;

/// A WAV file's audio properties
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub struct WavProperties {
	pub(crate) format: AudioFormat,
	pub(crate) duration: Duration,
	pub(crate) audio_bitrate: u32,
	pub(crate) sample_rate: u32,
	pub(crate) bit_depth: u16,
	pub(crate) channels: u16,
}

impl WavProperties {
	/// The format samples are encoded with, see [`FmtChunk::effective_format`]
	pub fn format(&self) -> AudioFormat {
		self.format
	}

	/// Duration of the audio
	pub fn duration(&self) -> Duration {
		self.duration
	}

	/// Audio bitrate (kbps)
	pub fn bitrate(&self) -> u32 {
		self.audio_bitrate
	}

	/// Sample rate (Hz)
	pub fn sample_rate(&self) -> u32 {
		self.sample_rate
	}

	/// Bits per sample
	///
	/// For `WAVE_FORMAT_EXTENSIBLE` files, this is the number of valid bits.
	pub fn bit_depth(&self) -> u16 {
		self.bit_depth
	}

	/// Channel count
	pub fn channels(&self) -> u16 {
		self.channels
	}
}

pub(super) fn read_properties(
	fmt: &FmtChunk,
	fact: Option<&FactChunk>,
	stream_len: u64,
) -> WavProperties {
	let format = fmt.effective_format();

	let bit_depth = match fmt.valid_bits_per_sample() {
		Some(valid_bits_per_sample) if valid_bits_per_sample > 0 => valid_bits_per_sample,
		_ => fmt.bits_per_sample,
	};

	let audio_bitrate = div_round(u64::from(fmt.byte_rate) * 8, 1000) as u32;

	// Only uncompressed formats can derive their length from the stream
	let total_samples = match format {
		AudioFormat::Pcm | AudioFormat::IeeeFloat if fmt.block_align > 0 => {
			stream_len / u64::from(fmt.block_align)
		},
		AudioFormat::Pcm | AudioFormat::IeeeFloat => 0,
		_ => fact.map_or(0, |fact| u64::from(fact.sample_length)),
	};

	let duration = if fmt.sample_rate > 0 && total_samples > 0 {
		log::debug!("Calculating duration from total samples");

		Duration::from_millis(div_round(
			total_samples.saturating_mul(1000),
			u64::from(fmt.sample_rate),
		))
	} else if stream_len > 0 && fmt.byte_rate > 0 {
		log::debug!("Calculating duration from stream length/byte rate");

		Duration::from_millis(div_round(
			stream_len.saturating_mul(1000),
			u64::from(fmt.byte_rate),
		))
	} else {
		log::warn!("Unable to calculate duration");
		Duration::ZERO
	};

	WavProperties {
		format,
		duration,
		audio_bitrate,
		sample_rate: fmt.sample_rate,
		bit_depth,
		channels: fmt.num_channels,
	}
}

// Rounds half up, `rhs` is never 0
fn div_round(lhs: u64, rhs: u64) -> u64 {
	lhs / rhs + u64::from(lhs % rhs >= rhs - rhs / 2)
}

#[cfg(test)]
mod tests {
	use super::{div_round, read_properties};
	use crate::chunk::{AudioFormat, FactChunk, FmtChunk};

	use std::time::Duration;

	#[test_log::test]
	fn rounding() {
		assert_eq!(div_round(1, 2), 1);
		assert_eq!(div_round(5, 2), 3);
		assert_eq!(div_round(1_411_200, 1000), 1411);
		assert_eq!(div_round(1500, 4000), 0);
		assert_eq!(div_round(2000, 4000), 1);
		assert_eq!(div_round(0, 3), 0);
	}

	#[test_log::test]
	fn pcm_from_stream_length() {
		let fmt = FmtChunk::new(AudioFormat::Pcm, 2, 44100, 16);
		let properties = read_properties(&fmt, None, 44100 * 4 * 3);

		assert_eq!(properties.duration(), Duration::from_secs(3));
		assert_eq!(properties.bitrate(), 1411);
		assert_eq!(properties.bit_depth(), 16);
		assert_eq!(properties.channels(), 2);
	}

	#[test_log::test]
	fn compressed_uses_fact() {
		let fmt = FmtChunk::new(AudioFormat::MuLaw, 1, 8000, 8);
		let fact = FactChunk {
			sample_length: 4000,
		};

		let properties = read_properties(&fmt, Some(&fact), 8000);
		assert_eq!(properties.duration(), Duration::from_millis(500));

		// Without a fact chunk, the byte rate is used
		let properties = read_properties(&fmt, None, 16000);
		assert_eq!(properties.duration(), Duration::from_secs(2));
	}

	#[test_log::test]
	fn extensible_valid_bits() {
		let mut fmt = FmtChunk::new(AudioFormat::Extensible, 2, 48000, 32);
		let mut extension = vec![22, 0, 24, 0, 3, 0, 0, 0, 1, 0];
		extension.extend_from_slice(&[0; 14]);
		fmt.extra_format_bytes = Some(extension);

		let properties = read_properties(&fmt, None, 0);
		assert_eq!(properties.format(), AudioFormat::Pcm);
		assert_eq!(properties.bit_depth(), 24);
		assert_eq!(properties.duration(), Duration::ZERO);
	}
}
