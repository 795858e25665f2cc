use super::Sample;
use crate::chunk::FmtChunk;
use crate::error::Result;
use crate::macros::{decode_err, err};
use crate::util::alloc::VecFallibleCapacity;

/// Split interleaved samples into one sequence per channel
///
/// Channel `i` takes samples `i`, `i + n`, `i + 2n`, ..., where `n` is [`FmtChunk::num_channels`].
///
/// # Errors
///
/// `fmt` declares zero channels
///
/// # Examples
///
/// ```rust
/// use wavchunks::chunk::{AudioFormat, FmtChunk};
/// use wavchunks::codec::{Sample, to_channels};
///
/// # fn main() -> wavchunks::error::Result<()> {
/// let fmt = FmtChunk::new(AudioFormat::Pcm, 2, 8000, 16);
///
/// let samples = [1, 2, 3, 4].map(Sample::Int);
/// let channels = to_channels(&fmt, &samples)?;
///
/// assert_eq!(channels[0], [Sample::Int(1), Sample::Int(3)]);
/// assert_eq!(channels[1], [Sample::Int(2), Sample::Int(4)]);
/// # Ok(()) }
/// ```
pub fn to_channels(fmt: &FmtChunk, samples: &[Sample]) -> Result<Vec<Vec<Sample>>> {
	let num_channels = usize::from(fmt.num_channels);
	if num_channels == 0 {
		decode_err!(@BAIL Format, "Format chunk declares zero channels");
	}

	let mut channels = Vec::try_with_capacity_stable(num_channels)?;
	for _ in 0..num_channels {
		channels.push(Vec::try_with_capacity_stable(samples.len().div_ceil(num_channels))?);
	}

	for (index, sample) in samples.iter().enumerate() {
		channels[index % num_channels].push(*sample);
	}

	Ok(channels)
}

/// Interleave per-channel samples, the inverse of [`to_channels`]
///
/// # Errors
///
/// The channels are not all the same length, reported as
/// [`ErrorKind::ChannelLengthMismatch`](crate::error::ErrorKind::ChannelLengthMismatch) for the first offending channel.
///
/// # Examples
///
/// ```rust
/// use wavchunks::codec::{Sample, to_interleaved};
///
/// # fn main() -> wavchunks::error::Result<()> {
/// let channels = vec![vec![Sample::Int(1), Sample::Int(3)], vec![Sample::Int(2), Sample::Int(4)]];
///
/// let samples = to_interleaved(&channels)?;
/// assert_eq!(samples, [1, 2, 3, 4].map(Sample::Int));
/// # Ok(()) }
/// ```
pub fn to_interleaved(channels: &[Vec<Sample>]) -> Result<Vec<Sample>> {
	let Some(first) = channels.first() else {
		return Ok(Vec::new());
	};

	let expected = first.len();
	if let Some((channel, found)) = channels
		.iter()
		.map(Vec::len)
		.enumerate()
		.find(|(_, len)| *len != expected)
	{
		err!(ChannelLengthMismatch {
			channel,
			expected,
			found,
		});
	}

	let mut samples = Vec::with_capacity(expected * channels.len());
	for index in 0..expected {
		samples.extend(channels.iter().map(|channel| channel[index]));
	}

	Ok(samples)
}
