#![no_main]

use libfuzzer_sys::fuzz_target;
use wavchunks::config::{ParseOptions, WriteOptions};
use wavchunks::wav::WavFile;

fuzz_target!(|data: &[u8]| {
	let Ok(file) = WavFile::parse(data, ParseOptions::new()) else {
		return;
	};

	let mut out = Vec::new();
	if file.dump_to(&mut out, WriteOptions::default()).is_err() {
		return;
	}

	let written = WavFile::parse(&out, ParseOptions::new()).expect("a written file should parse");

	// Containers with nothing left to write are omitted
	if written.chunks().len() == file.chunks().len() {
		assert_eq!(written.chunks(), file.chunks());
		assert_eq!(written.trailing(), file.trailing());
	}
});
