//! Orchestration of a full extraction run over a directory of structure files.
//!
//! Each file is handled independently: its structure id is derived from the file name,
//! candidate transcripts are looked up, the structure is parsed and filtered, mappings are
//! confirmed, and contacts of every confirmed chain are written to the shared sink. Files
//! run in parallel on a bounded rayon pool. A file that fails is counted and skipped;
//! only a failing sink stops the run.

use super::confirm::confirm;
use super::contacts::{ContactConfig, detect_contacts};
use super::error::Error;
use super::filter::{FilterConfig, Rejection, accept_structure};
use crate::config::ExtractConfig;
use crate::db::genome::Genome;
use crate::db::id_map::{IdMap, IdMapEntry};
use crate::db::transcripts::TranscriptIndex;
use crate::io::compression::open_reader;
use crate::io::interactions::{InteractionWriter, RecordSink};
use crate::io::{IoContext, read_pdb_structure};
use crate::model::record::ContactKind;
use flate2::write::GzEncoder;
use rayon::prelude::*;
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tracing::{debug, info, warn};

/// File-name suffixes recognized as structure files, longest first.
const STRUCTURE_EXTENSIONS: &[&str] = &[".ent.gz", ".pdb.gz", ".ent", ".pdb"];

/// Collects structure files below `root`, recursively and in sorted order.
///
/// # Errors
///
/// Returns [`Error::MissingDirectory`] when `root` is not a directory, and
/// [`Error::Io`] when a directory cannot be listed.
pub fn discover(root: &Path) -> Result<Vec<PathBuf>, Error> {
    if !root.is_dir() {
        return Err(Error::missing_directory(root));
    }

    let mut files = Vec::new();
    let mut pending = vec![root.to_path_buf()];
    while let Some(dir) = pending.pop() {
        let entries =
            fs::read_dir(&dir).map_err(|e| crate::io::Error::from_io(e, Some(dir.clone())))?;
        for entry in entries {
            let path = entry
                .map_err(|e| crate::io::Error::from_io(e, Some(dir.clone())))?
                .path();
            if path.is_dir() {
                pending.push(path);
            } else if is_structure_file(&path) {
                files.push(path);
            }
        }
    }

    files.sort();
    info!("Found {} structure files under '{}'", files.len(), root.display());
    Ok(files)
}

fn is_structure_file(path: &Path) -> bool {
    path.file_name()
        .and_then(|name| name.to_str())
        .is_some_and(|name| {
            let name = name.to_ascii_lowercase();
            STRUCTURE_EXTENSIONS.iter().any(|ext| name.ends_with(ext))
        })
}

/// Derives a structure id from a file name: `pdb1a12.ent.gz` becomes `1A12`.
pub fn structure_id_from_path(path: &Path) -> String {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    let mut base = name.as_str();
    if let Some(rest) = base.strip_prefix("pdb") {
        if !rest.is_empty() {
            base = rest;
        }
    }
    for ext in STRUCTURE_EXTENSIONS {
        if base.len() > ext.len() && base.to_ascii_lowercase().ends_with(ext) {
            base = &base[..base.len() - ext.len()];
            break;
        }
    }

    base.to_ascii_uppercase()
}

/// Opens the gzip interactions file for a run.
///
/// # Errors
///
/// Returns [`Error::SinkOpen`] when the file cannot be created.
pub fn open_sink(path: &Path) -> Result<InteractionWriter<GzEncoder<BufWriter<File>>>, Error> {
    InteractionWriter::create(path).map_err(|e| Error::sink_open(path, e))
}

/// Totals reported at the end of a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub files_discovered: usize,
    pub no_candidates: usize,
    pub parse_errors: usize,
    pub rejected_resolution: usize,
    pub rejected_organism: usize,
    pub files_passing: usize,
    pub unconfirmed: usize,
    pub confirmed_mappings: usize,
    pub contact_records: usize,
    pub non_contact_records: usize,
    pub coordinate_errors: usize,
    pub chains_too_long: usize,
    pub files_cancelled: usize,
    /// Detected records dropped because an identical line was already written.
    pub duplicate_records: usize,
}

impl RunSummary {
    pub fn records_written(&self) -> usize {
        (self.contact_records + self.non_contact_records).saturating_sub(self.duplicate_records)
    }
}

/// Monotonic run counters shared by the workers.
#[derive(Debug, Default)]
struct Counters {
    files_discovered: AtomicUsize,
    no_candidates: AtomicUsize,
    parse_errors: AtomicUsize,
    rejected_resolution: AtomicUsize,
    rejected_organism: AtomicUsize,
    files_passing: AtomicUsize,
    unconfirmed: AtomicUsize,
    confirmed_mappings: AtomicUsize,
    contact_records: AtomicUsize,
    non_contact_records: AtomicUsize,
    coordinate_errors: AtomicUsize,
    chains_too_long: AtomicUsize,
    files_cancelled: AtomicUsize,
    duplicate_records: AtomicUsize,
}

fn bump(counter: &AtomicUsize, amount: usize) {
    counter.fetch_add(amount, Ordering::Relaxed);
}

impl Counters {
    pub fn snapshot(&self) -> RunSummary {
        let get = |c: &AtomicUsize| c.load(Ordering::Relaxed);
        RunSummary {
            files_discovered: get(&self.files_discovered),
            no_candidates: get(&self.no_candidates),
            parse_errors: get(&self.parse_errors),
            rejected_resolution: get(&self.rejected_resolution),
            rejected_organism: get(&self.rejected_organism),
            files_passing: get(&self.files_passing),
            unconfirmed: get(&self.unconfirmed),
            confirmed_mappings: get(&self.confirmed_mappings),
            contact_records: get(&self.contact_records),
            non_contact_records: get(&self.non_contact_records),
            coordinate_errors: get(&self.coordinate_errors),
            chains_too_long: get(&self.chains_too_long),
            files_cancelled: get(&self.files_cancelled),
            duplicate_records: get(&self.duplicate_records),
        }
    }
}

/// What happened to a single structure file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileOutcome {
    /// The run was stopped before the file was started.
    Cancelled,
    /// No candidate transcript of the structure is known to the genome.
    NoCandidates,
    /// The file could not be read or parsed.
    ParseError,
    Rejected(Rejection),
    /// Admitted, but no chain matched any candidate transcript.
    Unconfirmed,
    Processed {
        confirmed: usize,
        contacts: usize,
        non_contacts: usize,
    },
    /// Writing the file's records failed; the run stops after it.
    SinkFailed,
}

/// Cloneable flag that stops a running [`Pipeline`] from starting new files.
#[derive(Debug, Clone, Default)]
pub struct StopHandle(Arc<AtomicBool>);

impl StopHandle {
    pub fn stop(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_stopped(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// A configured extraction run writing to sink `S`.
pub struct Pipeline<'g, S: RecordSink> {
    genome: &'g Genome,
    id_map: &'g IdMap,
    index: TranscriptIndex,
    context: IoContext,
    filter: FilterConfig,
    contacts: ContactConfig,
    max_mismatch_rate: f64,
    max_chain_residues: Option<usize>,
    threads: usize,
    sink: S,
    confirmed_map: Option<Mutex<Box<dyn Write + Send>>>,
    counters: Counters,
    stop: StopHandle,
    sink_error: Mutex<Option<io::Error>>,
}

impl<'g, S: RecordSink> Pipeline<'g, S> {
    /// Prepares a run, indexing the genome's transcripts.
    ///
    /// # Arguments
    ///
    /// * `genome` - Transcripts and their proteins, shared read-only by all workers.
    /// * `id_map` - Candidate structure-to-transcript mappings.
    /// * `config` - Validated before use.
    /// * `sink` - Destination of the records.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfig`] when `config` fails validation.
    pub fn new(
        genome: &'g Genome,
        id_map: &'g IdMap,
        config: &ExtractConfig,
        sink: S,
    ) -> Result<Self, Error> {
        config.validate()?;
        let index = TranscriptIndex::build(genome);
        info!(
            "Indexed {} transcripts ({} in genome)",
            index.len(),
            genome.transcript_count()
        );

        Ok(Self {
            genome,
            id_map,
            index,
            context: IoContext::new_default(),
            filter: FilterConfig::from(config),
            contacts: ContactConfig::from(config),
            max_mismatch_rate: config.max_mismatch_rate,
            max_chain_residues: config.max_chain_residues,
            threads: config.threads,
            sink,
            confirmed_map: None,
            counters: Counters::default(),
            stop: StopHandle::default(),
            sink_error: Mutex::new(None),
        })
    }

    /// Additionally writes every confirmed mapping, one tab-separated line each.
    pub fn with_confirmed_map(mut self, writer: Box<dyn Write + Send>) -> Self {
        self.confirmed_map = Some(Mutex::new(writer));
        self
    }

    pub fn index(&self) -> &TranscriptIndex {
        &self.index
    }

    pub fn stop_handle(&self) -> StopHandle {
        self.stop.clone()
    }

    pub fn summary(&self) -> RunSummary {
        self.counters.snapshot()
    }

    /// Processes `files` on the worker pool.
    pub fn run(&self, files: &[PathBuf]) -> Result<(), Error> {
        self.run_with(files, |_, _| {})
    }

    /// Processes `files`, calling `on_done` after each file finishes.
    ///
    /// Per-file failures are counted and never abort the other files. A sink failure
    /// stops scheduling; the error is returned by [`finalize`](Self::finalize).
    ///
    /// # Errors
    ///
    /// Returns [`Error::ThreadPool`] when the worker pool cannot be built.
    pub fn run_with<F>(&self, files: &[PathBuf], on_done: F) -> Result<(), Error>
    where
        F: Fn(&Path, FileOutcome) + Sync,
    {
        bump(&self.counters.files_discovered, files.len());

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.threads)
            .build()
            .map_err(|e| Error::ThreadPool {
                details: e.to_string(),
            })?;
        info!(
            "Processing {} files on {} threads",
            files.len(),
            pool.current_num_threads()
        );

        pool.install(|| {
            files.par_iter().for_each(|path| match self.process(path) {
                Ok(outcome) => on_done(path, outcome),
                Err(e) => {
                    warn!("Stopping after output failure on '{}': {}", path.display(), e);
                    on_done(path, FileOutcome::SinkFailed);
                }
            });
        });

        Ok(())
    }

    /// Runs one file through lookup, parsing, filtering, confirmation and detection.
    ///
    /// # Errors
    ///
    /// Returns [`Error::SinkWrite`] when records cannot be written. Every other failure
    /// is reported through the returned [`FileOutcome`].
    pub fn process(&self, path: &Path) -> Result<FileOutcome, Error> {
        if self.stop.is_stopped() {
            bump(&self.counters.files_cancelled, 1);
            return Ok(FileOutcome::Cancelled);
        }

        let structure_id = structure_id_from_path(path);
        let candidates: Vec<IdMapEntry> = self
            .id_map
            .lookup(&structure_id)
            .iter()
            .filter(|entry| self.index.contains(&entry.transcript_id))
            .cloned()
            .collect();
        if candidates.is_empty() {
            debug!("{}: no candidate transcripts", structure_id);
            bump(&self.counters.no_candidates, 1);
            return Ok(FileOutcome::NoCandidates);
        }

        let structure = match open_reader(path).and_then(|r| read_pdb_structure(r, &self.context)) {
            Ok(structure) => structure,
            Err(e) => {
                warn!("Skipping '{}': {}", path.display(), e.with_path(path));
                bump(&self.counters.parse_errors, 1);
                return Ok(FileOutcome::ParseError);
            }
        };

        if let Err(rejection) = accept_structure(&structure, &self.filter) {
            debug!("{}: rejected, {}", structure_id, rejection);
            let counter = if rejection.is_resolution() {
                &self.counters.rejected_resolution
            } else {
                &self.counters.rejected_organism
            };
            bump(counter, 1);
            return Ok(FileOutcome::Rejected(rejection));
        }
        bump(&self.counters.files_passing, 1);

        let confirmations = confirm(
            &structure,
            &candidates,
            self.genome,
            &self.index,
            &self.filter,
            self.max_mismatch_rate,
        );
        if confirmations.is_empty() {
            debug!("{}: no confirmed mapping", structure_id);
            bump(&self.counters.unconfirmed, 1);
            return Ok(FileOutcome::Unconfirmed);
        }

        let mut contacts = 0;
        let mut non_contacts = 0;
        for confirmation in &confirmations {
            bump(&self.counters.confirmed_mappings, 1);
            self.write_confirmed(&confirmation.entry);

            let chain = confirmation.chain;
            if self
                .max_chain_residues
                .is_some_and(|cap| chain.amino_acid_count() > cap)
            {
                debug!("{}: chain {} too long, skipped", structure_id, chain.id);
                bump(&self.counters.chains_too_long, 1);
                continue;
            }

            let transcript = self.genome.transcript(confirmation.transcript);
            let found = detect_contacts(&structure_id, chain, transcript, &self.contacts);
            let chain_contacts = found.count(ContactKind::Contact);
            let chain_non_contacts = found.count(ContactKind::NonContact);

            let stored = match self.sink.write_records(&found.records) {
                Ok(stored) => stored,
                Err(e) => {
                    self.stop.stop();
                    let message = e.to_string();
                    if let Ok(mut slot) = self.sink_error.lock() {
                        slot.get_or_insert(e);
                    }
                    return Err(Error::SinkWrite {
                        source: io::Error::other(message),
                    });
                }
            };
            bump(
                &self.counters.duplicate_records,
                found.records.len().saturating_sub(stored),
            );

            bump(&self.counters.coordinate_errors, found.coordinate_errors);
            bump(&self.counters.contact_records, chain_contacts);
            bump(&self.counters.non_contact_records, chain_non_contacts);
            contacts += chain_contacts;
            non_contacts += chain_non_contacts;
            debug!(
                "{}: chain {} on {}: {} contacts, {} non-contacts, {} unresolved",
                structure_id,
                chain.id,
                transcript.id,
                chain_contacts,
                chain_non_contacts,
                found.coordinate_errors
            );
        }

        Ok(FileOutcome::Processed {
            confirmed: confirmations.len(),
            contacts,
            non_contacts,
        })
    }

    fn write_confirmed(&self, entry: &IdMapEntry) {
        let Some(writer) = &self.confirmed_map else {
            return;
        };
        let result = writer
            .lock()
            .map_err(|_| io::Error::other("confirmed map lock poisoned"))
            .and_then(|mut w| writeln!(w, "{}", entry));
        if let Err(e) = result {
            warn!("Cannot write confirmed mapping {}: {}", entry, e);
        }
    }

    /// Closes the outputs and returns the final counters.
    ///
    /// # Errors
    ///
    /// Returns [`Error::SinkWrite`] when a write failed during the run or when closing
    /// the sink fails.
    pub fn finalize(self) -> Result<RunSummary, Error> {
        if let Some(writer) = &self.confirmed_map {
            if let Ok(mut w) = writer.lock() {
                if let Err(e) = w.flush() {
                    warn!("Cannot flush confirmed mappings: {}", e);
                }
            }
        }

        let earlier = self
            .sink_error
            .into_inner()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        if let Some(source) = earlier {
            return Err(Error::SinkWrite { source });
        }
        self.sink
            .close()
            .map_err(|source| Error::SinkWrite { source })?;

        let summary = self.counters.snapshot();
        info!(
            "Finished: {} files, {} passing filters, {} confirmed mappings, {} records",
            summary.files_discovered,
            summary.files_passing,
            summary.confirmed_mappings,
            summary.records_written()
        );
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::interactions;
    use crate::model::record::DistanceRecord;
    use std::fmt::Write as _;

    const HUMAN_HEADER: &str = "\
HEADER    TEST PROTEIN                            01-JAN-00   TEST
REMARK   2 RESOLUTION.    2.00 ANGSTROMS.
COMPND    MOL_ID: 1;
COMPND   2 CHAIN: A;
SOURCE    MOL_ID: 1;
SOURCE   2 ORGANISM_SCIENTIFIC: HOMO SAPIENS;
SOURCE   3 ORGANISM_COMMON: HUMAN;
";

    /// Poly-alanine chain whose residue 1 sits 2.5 Å from residue 25.
    fn folded_pdb(header: &str) -> String {
        let mut text = header.to_string();
        for idx in 0..30 {
            let seq = idx + 1;
            let (x, y) = if seq == 1 {
                (240.0, 2.5)
            } else {
                (idx as f64 * 10.0, 0.0)
            };
            writeln!(
                text,
                "ATOM  {:>5}  CA  ALA A{:>4}    {:>8.3}{:>8.3}{:>8.3}  1.00  0.00           C",
                seq, seq, x, y, 0.0
            )
            .unwrap();
        }
        text.push_str("END\n");
        text
    }

    #[derive(Default)]
    struct MemorySink {
        records: Mutex<Vec<DistanceRecord>>,
        fail: bool,
    }

    impl RecordSink for MemorySink {
        fn write_records(&self, records: &[DistanceRecord]) -> io::Result<usize> {
            if self.fail {
                return Err(io::Error::other("disk full"));
            }
            self.records.lock().unwrap().extend_from_slice(records);
            Ok(records.len())
        }

        fn close(&self) -> io::Result<()> {
            Ok(())
        }
    }

    struct Fixture {
        dir: tempfile::TempDir,
        genome: Genome,
        id_map: IdMap,
    }

    fn fixture(protein: &str, map: &str) -> Fixture {
        let dir = tempfile::tempdir().unwrap();
        let mut genome = Genome::new();
        let gene = genome.add_gene("GENE1");
        genome.add_transcript(gene, "NM_000001.2", "12", protein);
        let id_map = IdMap::from_reader(io::Cursor::new(map.to_string())).unwrap();
        Fixture { dir, genome, id_map }
    }

    fn write_file(dir: &Path, name: &str, content: &str) -> PathBuf {
        let path = dir.join(name);
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn structure_id_from_path_strips_prefix_and_extensions() {
        assert_eq!(structure_id_from_path(Path::new("/db/pdb/a1/pdb1a12.ent.gz")), "1A12");
        assert_eq!(structure_id_from_path(Path::new("pdb4ovu.ent")), "4OVU");
        assert_eq!(structure_id_from_path(Path::new("2xyz.pdb")), "2XYZ");
        assert_eq!(structure_id_from_path(Path::new("3abc.pdb.gz")), "3ABC");
    }

    #[test]
    fn discover_walks_recursively_and_sorts() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("b/nested")).unwrap();
        fs::create_dir_all(dir.path().join("a")).unwrap();
        write_file(&dir.path().join("b/nested"), "pdb2bbb.ent.gz", "");
        write_file(&dir.path().join("a"), "pdb1aaa.ent", "");
        write_file(dir.path(), "notes.txt", "");
        write_file(dir.path(), "3ccc.pdb", "");

        let files = discover(dir.path()).unwrap();
        let names: Vec<String> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();

        assert_eq!(names, vec!["3ccc.pdb", "pdb1aaa.ent", "pdb2bbb.ent.gz"]);
    }

    #[test]
    fn discover_requires_a_directory() {
        let dir = tempfile::tempdir().unwrap();

        assert!(matches!(
            discover(&dir.path().join("missing")),
            Err(Error::MissingDirectory { .. })
        ));
    }

    #[test]
    fn scenario_confirmed_structure_yields_one_contact() {
        let fx = fixture(&"A".repeat(30), "TEST\tNM_000001\n");
        let path = write_file(fx.dir.path(), "pdbtest.ent", &folded_pdb(HUMAN_HEADER));
        let pipeline =
            Pipeline::new(&fx.genome, &fx.id_map, &ExtractConfig::default(), MemorySink::default())
                .unwrap();

        pipeline.run(&[path]).unwrap();
        let records = pipeline.sink.records.lock().unwrap().clone();
        let summary = pipeline.finalize().unwrap();

        assert_eq!(records.len(), 1);
        let record = &records[0];
        assert_eq!(record.interaction_id, "TEST:A_1-A_25:NM_000001.2");
        assert_eq!(record.kind, ContactKind::Contact);
        assert_eq!(record.distance, 2.5);
        assert_eq!(record.site1.chromosome, "12");
        assert_eq!((record.site1.position, record.site2.position), (1, 25));
        assert_eq!(summary.files_discovered, 1);
        assert_eq!(summary.files_passing, 1);
        assert_eq!(summary.confirmed_mappings, 1);
        assert_eq!(summary.contact_records, 1);
    }

    #[test]
    fn scenario_low_resolution_structure_is_rejected() {
        let fx = fixture(&"A".repeat(30), "TEST\tNM_000001\n");
        let header = HUMAN_HEADER.replace("2.00 ANGSTROMS", "4.00 ANGSTROMS");
        let path = write_file(fx.dir.path(), "pdbtest.ent", &folded_pdb(&header));
        let pipeline =
            Pipeline::new(&fx.genome, &fx.id_map, &ExtractConfig::default(), MemorySink::default())
                .unwrap();

        assert_eq!(
            pipeline.process(&path).unwrap(),
            FileOutcome::Rejected(Rejection::ResolutionTooCoarse)
        );
        pipeline.run(&[path]).unwrap();

        assert!(pipeline.sink.records.lock().unwrap().is_empty());
        let summary = pipeline.summary();
        assert_eq!(summary.files_discovered, 1);
        assert_eq!(summary.files_passing, 0);
        assert_eq!(summary.rejected_resolution, 2);
    }

    #[test]
    fn scenario_mismatched_sequence_is_not_confirmed() {
        let fx = fixture(&"W".repeat(30), "TEST\tNM_000001\n");
        let path = write_file(fx.dir.path(), "pdbtest.ent", &folded_pdb(HUMAN_HEADER));
        let pipeline =
            Pipeline::new(&fx.genome, &fx.id_map, &ExtractConfig::default(), MemorySink::default())
                .unwrap();

        let outcome = pipeline.process(&path).unwrap();

        assert_eq!(outcome, FileOutcome::Unconfirmed);
        assert_eq!(pipeline.summary().unconfirmed, 1);
    }

    #[test]
    fn scenario_unknown_transcript_skips_file_before_parsing() {
        let fx = fixture(&"A".repeat(30), "TEST\tNM_424242\n");
        let path = write_file(fx.dir.path(), "pdbtest.ent", "this is not a PDB file");
        let pipeline =
            Pipeline::new(&fx.genome, &fx.id_map, &ExtractConfig::default(), MemorySink::default())
                .unwrap();

        let outcome = pipeline.process(&path).unwrap();

        assert_eq!(outcome, FileOutcome::NoCandidates);
        let summary = pipeline.summary();
        assert_eq!(summary.no_candidates, 1);
        assert_eq!(summary.parse_errors, 0);
    }

    #[test]
    fn broken_files_are_counted_and_do_not_stop_the_run() {
        let fx = fixture(&"A".repeat(30), "TEST\tNM_000001\nBAD1\tNM_000001\n");
        let good = write_file(fx.dir.path(), "pdbtest.ent", &folded_pdb(HUMAN_HEADER));
        let bad = write_file(
            fx.dir.path(),
            "pdbbad1.ent",
            "ATOM      1  CA  ALA A   1       0.000   xxxxx   0.000  1.00  0.00           C\n",
        );
        let pipeline =
            Pipeline::new(&fx.genome, &fx.id_map, &ExtractConfig::default(), MemorySink::default())
                .unwrap();

        pipeline.run(&[bad, good]).unwrap();
        let summary = pipeline.finalize().unwrap();

        assert_eq!(summary.parse_errors, 1);
        assert_eq!(summary.contact_records, 1);
    }

    #[test]
    fn non_finite_coordinates_fail_only_their_own_file() {
        let fx = fixture(&"A".repeat(30), "TEST\tNM_000001\nBAD1\tNM_000001\n");
        let broken = folded_pdb(HUMAN_HEADER).replacen(" 240.000", "     inf", 1);
        let bad = write_file(fx.dir.path(), "pdbbad1.ent", &broken);
        let good = write_file(fx.dir.path(), "pdbtest.ent", &folded_pdb(HUMAN_HEADER));
        let pipeline =
            Pipeline::new(&fx.genome, &fx.id_map, &ExtractConfig::default(), MemorySink::default())
                .unwrap();

        pipeline.run(&[bad, good]).unwrap();
        let records = pipeline.sink.records.lock().unwrap().clone();
        let summary = pipeline.finalize().unwrap();

        assert_eq!(summary.parse_errors, 1);
        assert_eq!(summary.files_passing, 1);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].interaction_id, "TEST:A_1-A_25:NM_000001.2");
    }

    #[test]
    fn sink_failure_is_reported_to_the_progress_callback() {
        let fx = fixture(&"A".repeat(30), "TEST\tNM_000001\n");
        let path = write_file(fx.dir.path(), "pdbtest.ent", &folded_pdb(HUMAN_HEADER));
        let sink = MemorySink {
            fail: true,
            ..Default::default()
        };
        let pipeline = Pipeline::new(&fx.genome, &fx.id_map, &ExtractConfig::default(), sink).unwrap();
        let outcomes = Mutex::new(Vec::new());

        pipeline
            .run_with(&[path], |_, outcome| outcomes.lock().unwrap().push(outcome))
            .unwrap();

        assert_eq!(outcomes.into_inner().unwrap(), vec![FileOutcome::SinkFailed]);
        assert_eq!(pipeline.summary().files_cancelled, 0);
        assert!(pipeline.finalize().is_err());
    }

    #[test]
    fn sink_failure_stops_the_run_and_surfaces_in_finalize() {
        let fx = fixture(&"A".repeat(30), "TEST\tNM_000001\n");
        let path = write_file(fx.dir.path(), "pdbtest.ent", &folded_pdb(HUMAN_HEADER));
        let sink = MemorySink {
            fail: true,
            ..Default::default()
        };
        let pipeline = Pipeline::new(&fx.genome, &fx.id_map, &ExtractConfig::default(), sink).unwrap();

        assert!(pipeline.process(&path).is_err());
        assert_eq!(pipeline.process(&path).unwrap(), FileOutcome::Cancelled);
        assert!(matches!(pipeline.finalize(), Err(Error::SinkWrite { .. })));
    }

    #[test]
    fn stop_handle_cancels_pending_files() {
        let fx = fixture(&"A".repeat(30), "TEST\tNM_000001\n");
        let path = write_file(fx.dir.path(), "pdbtest.ent", &folded_pdb(HUMAN_HEADER));
        let pipeline =
            Pipeline::new(&fx.genome, &fx.id_map, &ExtractConfig::default(), MemorySink::default())
                .unwrap();

        pipeline.stop_handle().stop();
        pipeline.run(&[path.clone(), path]).unwrap();
        let summary = pipeline.finalize().unwrap();

        assert_eq!(summary.files_cancelled, 2);
        assert_eq!(summary.records_written(), 0);
    }

    #[test]
    fn chains_above_the_cap_are_skipped_but_stay_confirmed() {
        let fx = fixture(&"A".repeat(30), "TEST\tNM_000001\n");
        let path = write_file(fx.dir.path(), "pdbtest.ent", &folded_pdb(HUMAN_HEADER));
        let config = ExtractConfig {
            max_chain_residues: Some(10),
            ..Default::default()
        };
        let pipeline = Pipeline::new(&fx.genome, &fx.id_map, &config, MemorySink::default()).unwrap();

        pipeline.run(&[path]).unwrap();
        let summary = pipeline.finalize().unwrap();

        assert_eq!(summary.confirmed_mappings, 1);
        assert_eq!(summary.chains_too_long, 1);
        assert_eq!(summary.records_written(), 0);
    }

    #[test]
    fn invalid_configuration_is_refused() {
        let fx = fixture("M", "");
        let config = ExtractConfig {
            contact_threshold: -1.0,
            ..Default::default()
        };

        assert!(matches!(
            Pipeline::new(&fx.genome, &fx.id_map, &config, MemorySink::default()),
            Err(Error::InvalidConfig(_))
        ));
    }

    #[test]
    fn rerunning_produces_identical_output() {
        let fx = fixture(&"A".repeat(30), "TEST\tNM_000001\n");
        let path = write_file(fx.dir.path(), "pdbtest.ent", &folded_pdb(HUMAN_HEADER));
        let config = ExtractConfig {
            non_contact_threshold: Some(150.0),
            ..Default::default()
        };

        let mut outputs = Vec::new();
        for run in 0..2 {
            let out = fx.dir.path().join(format!("run{run}.bin"));
            let pipeline =
                Pipeline::new(&fx.genome, &fx.id_map, &config, open_sink(&out).unwrap()).unwrap();
            pipeline.run(&[path.clone()]).unwrap();
            pipeline.finalize().unwrap();
            outputs.push(interactions::open(&out).unwrap());
        }

        assert!(!outputs[0].is_empty());
        assert_eq!(outputs[0], outputs[1]);
        assert!(outputs[0].iter().any(|r| r.kind == ContactKind::NonContact));
    }

    #[test]
    fn confirmed_mappings_are_written_when_requested() {
        let fx = fixture(&"A".repeat(30), "TEST\tNM_000001\n");
        let path = write_file(fx.dir.path(), "pdbtest.ent", &folded_pdb(HUMAN_HEADER));
        let map_path = fx.dir.path().join("confirmed.txt");
        let pipeline =
            Pipeline::new(&fx.genome, &fx.id_map, &ExtractConfig::default(), MemorySink::default())
                .unwrap()
                .with_confirmed_map(Box::new(File::create(&map_path).unwrap()));

        pipeline.run(&[path]).unwrap();
        pipeline.finalize().unwrap();

        assert_eq!(
            fs::read_to_string(&map_path).unwrap(),
            "TEST\tNM_000001\tA\t30\t30\n"
        );
    }

    #[test]
    fn duplicate_structure_files_write_their_records_once() {
        let fx = fixture(&"A".repeat(30), "TEST\tNM_000001\n");
        let first = write_file(fx.dir.path(), "pdbtest.ent", &folded_pdb(HUMAN_HEADER));
        let second = write_file(fx.dir.path(), "TEST.pdb", &folded_pdb(HUMAN_HEADER));
        let out = fx.dir.path().join("interactions.bin");
        let pipeline = Pipeline::new(
            &fx.genome,
            &fx.id_map,
            &ExtractConfig::default(),
            open_sink(&out).unwrap(),
        )
        .unwrap();

        pipeline.run(&[first, second]).unwrap();
        let summary = pipeline.finalize().unwrap();

        assert_eq!(summary.contact_records, 2);
        assert_eq!(summary.duplicate_records, 1);
        assert_eq!(summary.records_written(), 1);
        assert_eq!(interactions::open(&out).unwrap().len(), 1);
    }
}
