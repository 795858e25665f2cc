use wavchunks::config::{ParseOptions, WriteOptions};
use wavchunks::wav::WavFile;

/// Wrap `contents` in a chunk header, followed by a pad byte if its length is odd
pub fn chunk(fourcc: &[u8; 4], contents: &[u8]) -> Vec<u8> {
	let mut out = fourcc.to_vec();
	out.extend_from_slice(&(contents.len() as u32).to_le_bytes());
	out.extend_from_slice(contents);
	if contents.len() % 2 == 1 {
		out.push(0);
	}

	out
}

/// A `LIST` chunk of type `list_type`, holding `records`
pub fn list(list_type: &[u8; 4], records: &[Vec<u8>]) -> Vec<u8> {
	let mut contents = list_type.to_vec();
	for record in records {
		contents.extend_from_slice(record);
	}

	chunk(b"LIST", &contents)
}

/// A RIFF/WAVE file holding `chunks`
pub fn riff(chunks: &[Vec<u8>]) -> Vec<u8> {
	let body = chunks.concat();

	let mut out = b"RIFF".to_vec();
	out.extend_from_slice(&(body.len() as u32 + 4).to_le_bytes());
	out.extend_from_slice(b"WAVE");
	out.extend_from_slice(&body);
	out
}

/// A 16 byte `fmt ` chunk
pub fn fmt(format: u16, channels: u16, sample_rate: u32, bits_per_sample: u16) -> Vec<u8> {
	let block_align = bits_per_sample / 8 * channels;

	let mut contents = Vec::new();
	contents.extend_from_slice(&format.to_le_bytes());
	contents.extend_from_slice(&channels.to_le_bytes());
	contents.extend_from_slice(&sample_rate.to_le_bytes());
	contents.extend_from_slice(&(sample_rate * u32::from(block_align)).to_le_bytes());
	contents.extend_from_slice(&block_align.to_le_bytes());
	contents.extend_from_slice(&bits_per_sample.to_le_bytes());

	chunk(b"fmt ", &contents)
}

/// An ID3v2.4 tag of `frames`, followed by `padding` zeroes
pub fn id3v24(frames: &[(&[u8; 4], &[u8])], padding: usize) -> Vec<u8> {
	let mut body = Vec::new();
	for (id, frame_body) in frames {
		body.extend_from_slice(*id);
		// Every frame in these tests is below 128 bytes, the synchsafe size is the plain size
		body.extend_from_slice(&(frame_body.len() as u32).to_be_bytes());
		body.extend_from_slice(&[0, 0]);
		body.extend_from_slice(frame_body);
	}

	body.resize(body.len() + padding, 0);

	let mut tag = b"ID3\x04\x00\x00".to_vec();
	tag.extend_from_slice(&(body.len() as u32).to_be_bytes());
	tag.extend_from_slice(&body);
	tag
}

pub fn parse(bytes: &[u8]) -> WavFile {
	WavFile::parse(bytes, ParseOptions::new()).unwrap()
}

/// Write `file` with its own field order
pub fn dump(file: &WavFile) -> Vec<u8> {
	let mut out = Vec::new();
	file.dump_to(&mut out, WriteOptions::default()).unwrap();
	out
}

/// A file with one chunk of every recognized kind, plus an unknown one
pub fn full_file() -> Vec<u8> {
	riff(&[
		fmt(1, 2, 8000, 16),
		chunk(b"data", &[1, 0, 2, 0, 0xFF, 0xFF, 0xFE, 0xFF]),
		chunk(
			b"cue ",
			&[
				1, 0, 0, 0, // count
				1, 0, 0, 0, // id
				0, 0, 0, 0, // position
				b'd', b'a', b't', b'a', // data chunk id
				0, 0, 0, 0, // chunk start
				0, 0, 0, 0, // block start
				1, 0, 0, 0, // sample offset
			],
		),
		list(
			b"INFO",
			&[
				chunk(b"INAM", b"Foo title\0"),
				chunk(b"IART", b"Bar artist\0"),
				chunk(b"XTRA", b"x\0"),
			],
		),
		list(b"adtl", &[chunk(b"labl", b"\x01\x00\x00\x00Intro\0")]),
		chunk(
			b"ID3 ",
			&id3v24(&[(b"TIT2", b"\x03Foo title"), (b"XXXX", b"\x00")], 4),
		),
		chunk(b"XTRA", b"abc"),
	])
}
