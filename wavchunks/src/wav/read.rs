use super::WavFile;
use crate::chunk::record::{Records, RiffRecord};
use crate::chunk::{Chunk, ParseContext, RIFF_HEADER_SIZE, RiffHeader};
use crate::config::ParseOptions;
use crate::error::{ErrorKind, Result, WavError};
use crate::macros::{decode_err, parse_mode_choice};
use crate::util::alloc::copy_bytes;

pub(super) fn parse(data: &[u8], parse_options: ParseOptions) -> Result<WavFile> {
	let header = RiffHeader::parse(data)?;
	if u64::from(header.size) + 8 != data.len() as u64 {
		log::debug!(
			"RIFF size ({}) does not match the input length ({}), ignoring",
			header.size,
			data.len()
		);
	}

	let parse_mode = parse_options.parsing_mode;
	let mut ctx = ParseContext::new(parse_options);
	let mut records = Records::<RiffRecord>::new(&data[RIFF_HEADER_SIZE..], parse_options.padding);

	let mut chunks = Vec::new();
	let mut truncated = false;
	loop {
		let raw = match records.next() {
			Ok(Some(raw)) => raw,
			Ok(None) => break,
			Err(err) => parse_mode_choice!(
				parse_mode,
				STRICT: return Err(err),
				RELAXED: {
					ctx.recover(err)?;
					match records.next_clamped() {
						Some(raw) => raw,
						None => break,
					}
				},
				DEFAULT: {
					// The chunk is kept with the trailing bytes
					ctx.recover(err)?;
					truncated = true;
					break;
				}
			),
		};

		log::debug!(
			"Found chunk \"{}\", size: {}",
			String::from_utf8_lossy(&raw.fourcc),
			raw.size
		);
		chunks.push(Chunk::parse(raw, &mut ctx)?);
	}

	let trailing = records.take_remainder();
	if !trailing.is_empty() && !truncated {
		ctx.recover(WavError::new(ErrorKind::MalformedRecord(
			"File ends with bytes that do not form a chunk",
		)))?;
	}

	if parse_options.decode_samples {
		decode_samples(&mut chunks, &mut ctx)?;
	}

	Ok(WavFile {
		header,
		chunks,
		trailing: copy_bytes(trailing)?,
		fields: ctx.fields,
		warnings: ctx.warnings,
	})
}

fn decode_samples(chunks: &mut [Chunk], ctx: &mut ParseContext) -> Result<()> {
	let fmt = chunks.iter().find_map(|chunk| match chunk {
		Chunk::Format(fmt) => Some(fmt.clone()),
		_ => None,
	});

	let Some(fmt) = fmt else {
		if chunks.iter().any(|chunk| matches!(chunk, Chunk::Data(_))) {
			ctx.recover(decode_err!(
				Format,
				"Cannot decode samples without a format chunk"
			))?;
		}

		return Ok(());
	};

	for chunk in chunks {
		let Chunk::Data(data) = chunk else {
			continue;
		};

		// Samples that fail to decode are left raw
		if let Err(err) = data.decode_in_place(&fmt) {
			ctx.recover(err)?;
		}
	}

	Ok(())
}
