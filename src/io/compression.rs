//! Transparent gzip handling for inputs and outputs.
//!
//! Inputs are sniffed by their magic bytes rather than their extension, so a
//! mislabeled `.ent` that is actually compressed still reads correctly.

use crate::io::error::Error;
use flate2::Compression;
use flate2::read::MultiGzDecoder;
use flate2::write::GzEncoder;
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter};
use std::path::Path;

const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

/// Opens `path` for buffered line reading, decompressing gzip content when detected.
pub fn open_reader(path: &Path) -> Result<Box<dyn BufRead + Send>, Error> {
    let file = File::open(path).map_err(|e| Error::from_io(e, Some(path.to_path_buf())))?;
    let mut reader = BufReader::new(file);
    let head = reader
        .fill_buf()
        .map_err(|e| Error::from_io(e, Some(path.to_path_buf())))?;

    if head.starts_with(&GZIP_MAGIC) {
        Ok(Box::new(BufReader::new(MultiGzDecoder::new(reader))))
    } else {
        Ok(Box::new(reader))
    }
}

/// Creates (or truncates) `path` as a gzip-compressed output stream.
pub fn create_gz_writer(path: &Path) -> Result<GzEncoder<BufWriter<File>>, Error> {
    let file = File::create(path).map_err(|e| Error::from_io(e, Some(path.to_path_buf())))?;
    Ok(GzEncoder::new(BufWriter::new(file), Compression::default()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Read, Write};

    #[test]
    fn open_reader_reads_plain_text() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("plain.txt");
        std::fs::write(&path, "line one\nline two\n").unwrap();

        let lines: Vec<String> = open_reader(&path).unwrap().lines().map(|l| l.unwrap()).collect();

        assert_eq!(lines, vec!["line one", "line two"]);
    }

    #[test]
    fn open_reader_detects_gzip_regardless_of_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("compressed.ent");
        let mut writer = create_gz_writer(&path).unwrap();
        writer.write_all(b"HEADER\nEND\n").unwrap();
        writer.finish().unwrap().flush().unwrap();

        let mut content = String::new();
        open_reader(&path).unwrap().read_to_string(&mut content).unwrap();

        assert_eq!(content, "HEADER\nEND\n");
    }

    #[test]
    fn open_reader_reports_missing_file_with_path() {
        let err = match open_reader(Path::new("/nonexistent/dir/file.ent")) {
            Err(e) => e,
            Ok(_) => panic!("missing file must fail"),
        };

        assert!(matches!(err, Error::Io { path: Some(_), .. }));
    }
}
