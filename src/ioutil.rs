use std::fs;
use std::io;
use std::io::Read;
use std::path::Path;

use flate2;


// gzip magic, RFC 1952
static GZ_MAGIC: [u8; 2] = [0x1f, 0x8b];


/// Wrap a raw byte stream so gzip input decompresses transparently.
/// Detection goes by content, not by file name; the sources are served
/// both plain and gzipped depending on mirror.
pub fn magic_reader<R: Read + 'static>(mut r: R) -> io::Result<Box<dyn Read>> {
	let mut head = Vec::with_capacity(2);
	r.by_ref().take(2).read_to_end(&mut head)?;
	let is_gz = head[..] == GZ_MAGIC[..];
	let rejoined = io::Cursor::new(head).chain(r);
	if is_gz {
		Ok(Box::new(flate2::read::GzDecoder::new(rejoined)))
	} else {
		Ok(Box::new(rejoined))
	}
}


pub fn magic_open<P: AsRef<Path>>(path: P) -> io::Result<Box<dyn Read>> {
	magic_reader(fs::File::open(path)?)
}


#[cfg(test)]
mod tests {
	use super::*;

	use std::io::Write;

	use flate2::write::GzEncoder;

	#[test]
	fn plain_input_passes_through() {
		let src = io::Cursor::new(b"Date,Germany\n2020-01-22,0\n".to_vec());
		let mut out = String::new();
		magic_reader(src).unwrap().read_to_string(&mut out).unwrap();
		assert_eq!(out, "Date,Germany\n2020-01-22,0\n");
	}

	#[test]
	fn gzip_input_is_decompressed() {
		let mut enc = GzEncoder::new(Vec::new(), flate2::Compression::default());
		enc.write_all(b"Date,Germany\n2020-01-22,0\n").unwrap();
		let compressed = enc.finish().unwrap();
		let mut out = String::new();
		magic_reader(io::Cursor::new(compressed)).unwrap().read_to_string(&mut out).unwrap();
		assert_eq!(out, "Date,Germany\n2020-01-22,0\n");
	}

	#[test]
	fn short_input_does_not_error() {
		let src = io::Cursor::new(b"x".to_vec());
		let mut out = String::new();
		magic_reader(src).unwrap().read_to_string(&mut out).unwrap();
		assert_eq!(out, "x");
	}
}
