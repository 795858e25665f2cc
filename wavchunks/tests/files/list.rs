use crate::util::{chunk, dump, list, parse, riff};

use wavchunks::chunk::{AdtlEntry, AdtlKey, InfoKey};
use wavchunks::config::{ParseOptions, ParsingMode};
use wavchunks::error::ErrorKind;
use wavchunks::wav::{FieldId, WavFile};

#[test_log::test]
fn unknown_info_record() {
	let bytes = riff(&[list(
		b"INFO",
		&[chunk(b"XTRA", b"Foo\0"), chunk(b"INAM", b"Foo title\0")],
	)]);
	let file = parse(&bytes);

	let info = file.info().unwrap();
	assert_eq!(info.title(), Some("Foo title"));
	assert_eq!(info.unrecognized()[0].fourcc, *b"XTRA");
	assert_eq!(info.unrecognized()[0].content, b"Foo\0");

	// Unrecognized records follow the recognized ones
	let written = parse(&dump(&file));
	assert_eq!(written.info(), file.info());
}

#[test_log::test]
fn invalid_utf8() {
	let bytes = riff(&[list(b"INFO", &[chunk(b"IART", b"\xFF\xFE\0")])]);

	let file = parse(&bytes);
	let info = file.info().unwrap();
	assert_eq!(info.artist(), None);
	assert_eq!(info.unrecognized().len(), 1);
	assert!(matches!(file.warnings()[0].kind(), ErrorKind::TextDecode(_)));
	assert_eq!(dump(&file), bytes);

	let err = WavFile::parse(&bytes, ParseOptions::new().parsing_mode(ParsingMode::Strict))
		.unwrap_err();
	assert!(matches!(err.kind(), ErrorKind::TextDecode(_)));
}

#[test_log::test]
fn duplicate_keys() {
	let bytes = riff(&[list(
		b"INFO",
		&[chunk(b"INAM", b"First\0"), chunk(b"INAM", b"Second\0")],
	)]);
	let file = parse(&bytes);

	let info = file.info().unwrap();
	assert_eq!(info.get(InfoKey::Title), Some("First"));
	assert_eq!(info.unrecognized()[0].content, b"Second\0");
	assert_eq!(dump(&file), bytes);
}

#[test_log::test]
fn adtl_entries() {
	let mut ltxt = b"\x02\x00\x00\x00".to_vec();
	ltxt.extend_from_slice(&100_u32.to_le_bytes());
	ltxt.extend_from_slice(b"rgn ");
	ltxt.extend_from_slice(&[0; 8]);
	ltxt.extend_from_slice(b"Verse\0");

	let bytes = riff(&[list(
		b"adtl",
		&[
			chunk(b"labl", b"\x01\x00\x00\x00Intro\0"),
			chunk(b"note", b"\x01\x00\x00\x00Quiet\0"),
			chunk(b"ltxt", &ltxt),
		],
	)]);
	let file = parse(&bytes);

	let adtl = file.adtl().unwrap();
	assert_eq!(adtl.label([1, 0, 0, 0]), Some("Intro"));
	assert_eq!(adtl.note([1, 0, 0, 0]), Some("Quiet"));

	let labeled = adtl.get(AdtlKey::LabeledText, [2, 0, 0, 0]).unwrap();
	let text_info = labeled.text_info.unwrap();
	assert_eq!(text_info.sample_length, 100);
	assert_eq!(text_info.purpose, *b"rgn ");
	assert_eq!(labeled.trimmed_text(), "Verse");

	assert_eq!(dump(&file), bytes);
}

#[test_log::test]
fn add_adtl_entry() {
	let bytes = riff(&[list(b"adtl", &[chunk(b"labl", b"\x01\x00\x00\x00Intro\0")])]);
	let mut file = parse(&bytes);

	file.adtl_mut().unwrap().insert(AdtlEntry::new(
		AdtlKey::Label,
		[2, 0, 0, 0],
		String::from("Outro"),
	));
	// Entries of a listed kind are all written
	assert!(file.fields().contains(FieldId::Adtl(AdtlKey::Label)));

	let file = parse(&dump(&file));
	let adtl = file.adtl().unwrap();
	assert_eq!(adtl.entries().len(), 2);
	assert_eq!(adtl.label([2, 0, 0, 0]), Some("Outro"));
}

#[test_log::test]
fn several_info_lists() {
	let bytes = riff(&[
		list(b"INFO", &[chunk(b"INAM", b"Foo title\0")]),
		list(
			b"INFO",
			&[
				chunk(b"INAM", b"Foo title\0"),
				chunk(b"IART", b"Bar artist\0"),
			],
		),
	]);
	let file = parse(&bytes);

	// The artist is only in the second list, but still precedes its container
	assert_eq!(file.fields().to_string(), "INAM, IART, INFO");
	assert_eq!(dump(&file), bytes);
}

#[test_log::test]
fn interleaved_adtl_entries() {
	let bytes = riff(&[list(
		b"adtl",
		&[
			chunk(b"labl", b"\x01\x00\x00\x00Intro\0"),
			chunk(b"note", b"\x01\x00\x00\x00Quiet\0"),
			chunk(b"labl", b"\x02\x00\x00\x00Outro\0"),
		],
	)]);
	let file = parse(&bytes);

	assert_eq!(file.adtl().unwrap().entries().len(), 3);
	assert_eq!(dump(&file), bytes);
}
