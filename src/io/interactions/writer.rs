use super::record::encode;
use crate::io::compression::create_gz_writer;
use crate::io::error::Error;
use crate::model::record::DistanceRecord;
use flate2::write::GzEncoder;
use std::collections::HashSet;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;
use std::sync::Mutex;

/// Destination for records produced concurrently by several workers.
pub trait RecordSink: Sync {
    /// Appends a batch of records and returns how many were actually stored. A batch is
    /// never interleaved with another one.
    fn write_records(&self, records: &[DistanceRecord]) -> io::Result<usize>;

    /// Flushes and terminates the output. Writing after `close` is unspecified.
    fn close(&self) -> io::Result<()>;
}

/// Output streams that need an explicit end-of-stream step beyond `flush`.
pub trait FinishWrite: Write {
    fn finish_write(&mut self) -> io::Result<()> {
        self.flush()
    }
}

impl<W: Write> FinishWrite for GzEncoder<W> {
    fn finish_write(&mut self) -> io::Result<()> {
        self.try_finish()?;
        self.get_mut().flush()
    }
}

impl<W: Write> FinishWrite for BufWriter<W> {}

impl FinishWrite for Vec<u8> {}

#[derive(Debug)]
struct WriterState<W> {
    writer: W,
    written: HashSet<String>,
}

/// Serializes records as tab-separated lines behind a mutex.
///
/// A line identical to one already written during the lifetime of the writer is dropped,
/// so a structure present twice under the root yields its records once.
#[derive(Debug)]
pub struct InteractionWriter<W: Write> {
    inner: Mutex<WriterState<W>>,
}

impl InteractionWriter<GzEncoder<BufWriter<File>>> {
    /// Creates (or truncates) a gzip-compressed interactions file.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] when the file cannot be created.
    pub fn create(path: &Path) -> Result<Self, Error> {
        Ok(Self::new(create_gz_writer(path)?))
    }
}

impl<W: Write> InteractionWriter<W> {
    pub fn new(writer: W) -> Self {
        Self {
            inner: Mutex::new(WriterState {
                writer,
                written: HashSet::new(),
            }),
        }
    }

    /// Returns the underlying stream.
    pub fn into_inner(self) -> W {
        self.inner
            .into_inner()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .writer
    }

    fn lock(&self) -> io::Result<std::sync::MutexGuard<'_, WriterState<W>>> {
        self.inner
            .lock()
            .map_err(|_| io::Error::other("interaction writer lock poisoned"))
    }
}

impl<W: FinishWrite + Send> RecordSink for InteractionWriter<W> {
    fn write_records(&self, records: &[DistanceRecord]) -> io::Result<usize> {
        if records.is_empty() {
            return Ok(0);
        }
        let lines: Vec<String> = records.iter().map(encode).collect();

        let mut state = self.lock()?;
        let mut batch = String::new();
        let mut stored = 0;
        for line in lines {
            if state.written.contains(&line) {
                continue;
            }
            batch.push_str(&line);
            batch.push('\n');
            state.written.insert(line);
            stored += 1;
        }
        state.writer.write_all(batch.as_bytes())?;
        Ok(stored)
    }

    fn close(&self) -> io::Result<()> {
        self.lock()?.writer.finish_write()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::record::{ContactKind, ResidueSite};
    use std::thread;

    fn record(id: &str, pos: usize) -> DistanceRecord {
        let site = |position| ResidueSite {
            chromosome: "X".to_string(),
            transcript_id: "T1".to_string(),
            position,
            amino_acid: 'A',
        };
        DistanceRecord {
            interaction_id: id.to_string(),
            kind: ContactKind::Contact,
            distance: 1.5,
            site1: site(pos),
            site2: site(pos + 20),
        }
    }

    #[test]
    fn write_records_appends_one_line_per_record() {
        let writer = InteractionWriter::new(Vec::new());

        writer
            .write_records(&[record("S:A_1-A_21:T1", 1), record("S:A_2-A_22:T1", 2)])
            .unwrap();
        writer.close().unwrap();

        let text = String::from_utf8(writer.into_inner()).unwrap();
        assert_eq!(text.lines().count(), 2);
        assert!(text.starts_with("S:A_1-A_21:T1\tcontact\t1.5\tX\tT1\t1\tA"));
    }

    #[test]
    fn repeated_lines_are_written_once() {
        let writer = InteractionWriter::new(Vec::new());

        let first = writer.write_records(&[record("S:A_1-A_21:T1", 1)]).unwrap();
        let second = writer
            .write_records(&[record("S:A_1-A_21:T1", 1), record("S:A_2-A_22:T1", 2)])
            .unwrap();

        assert_eq!((first, second), (1, 1));
        let text = String::from_utf8(writer.into_inner()).unwrap();
        assert_eq!(text.lines().count(), 2);
    }

    #[test]
    fn concurrent_batches_do_not_interleave() {
        let writer = InteractionWriter::new(Vec::new());

        thread::scope(|scope| {
            for worker in 0..4 {
                let writer = &writer;
                scope.spawn(move || {
                    let batch: Vec<DistanceRecord> = (1..=50)
                        .map(|i| record(&format!("W{worker}"), i))
                        .collect();
                    writer.write_records(&batch).unwrap();
                });
            }
        });

        let text = String::from_utf8(writer.into_inner()).unwrap();
        let owners: Vec<&str> = text.lines().map(|l| l.split('\t').next().unwrap()).collect();
        assert_eq!(owners.len(), 200);
        for block in owners.chunks(50) {
            assert!(block.iter().all(|o| *o == block[0]));
        }
    }
}
