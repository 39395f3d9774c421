//! `Processor` — drives decode → classify → write for each transaction file.
//!
//! Each file moves through `Pending → Decoding → Classifying → Writing → Done`
//! and ends in `Failed` if any stage errors. Files are processed one after
//! another; by default the first failed file stops the run.

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use tracing::{debug, error, info, warn};

use crate::codec::TxDecoder;
use crate::error::FileError;
use crate::filter::{filter_unsent_groups, filter_unsent_txs};
use crate::group::{group_records, TxBatch};
use crate::oracle::StatusOracle;
use crate::writer::{unsent_path, write_records};

/// Processing stage of a single file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileStage {
    Pending,
    Decoding,
    Classifying,
    Writing,
    Done,
    Failed,
}

impl std::fmt::Display for FileStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pending => write!(f, "pending"),
            Self::Decoding => write!(f, "decoding"),
            Self::Classifying => write!(f, "classifying"),
            Self::Writing => write!(f, "writing"),
            Self::Done => write!(f, "done"),
            Self::Failed => write!(f, "failed"),
        }
    }
}

/// Configuration for [`Processor`].
#[derive(Debug, Clone)]
pub struct ProcessorConfig {
    /// Maximum status lookups in flight per filter pass (1 = sequential).
    pub concurrency: usize,
    /// Continue with the next file after a failure instead of stopping the run.
    pub keep_going: bool,
}

impl Default for ProcessorConfig {
    fn default() -> Self {
        Self {
            concurrency: 1,
            keep_going: false,
        }
    }
}

/// Outcome of one successfully processed file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileReport {
    pub path: PathBuf,
    pub groups: usize,
    pub individuals: usize,
    pub unsent_groups: usize,
    pub unsent_individuals: usize,
    /// Where the unsent transactions were written, if any were found.
    pub output: Option<PathBuf>,
}

/// Outcome of a multi-file run.
#[derive(Debug, Default)]
pub struct RunSummary {
    pub reports: Vec<FileReport>,
    pub failures: Vec<FileError>,
    /// Files never attempted because an earlier file failed.
    pub skipped: Vec<PathBuf>,
}

impl RunSummary {
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }
}

struct StageTracker<'a> {
    path: &'a Path,
    stage: FileStage,
}

impl<'a> StageTracker<'a> {
    fn new(path: &'a Path) -> Self {
        Self {
            path,
            stage: FileStage::Pending,
        }
    }

    fn advance(&mut self, next: FileStage) {
        debug!(file = %self.path.display(), from = %self.stage, to = %next, "stage");
        self.stage = next;
    }

    fn fail(&mut self, err: &FileError) {
        debug!(file = %self.path.display(), stage = %self.stage, error = %err, "stage failed");
        self.stage = FileStage::Failed;
    }
}

/// Read and partition a transaction file.
pub fn read_tx_file(path: &Path) -> Result<TxBatch, FileError> {
    let file = File::open(path).map_err(|source| FileError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    group_records(TxDecoder::new(BufReader::new(file))).map_err(|source| FileError::Group {
        path: path.to_path_buf(),
        source,
    })
}

/// Classifies transaction files against a [`StatusOracle`] and re-files the
/// unsent ones.
pub struct Processor<O> {
    oracle: O,
    config: ProcessorConfig,
}

impl<O: StatusOracle> Processor<O> {
    pub fn new(oracle: O, config: ProcessorConfig) -> Self {
        Self { oracle, config }
    }

    pub fn oracle(&self) -> &O {
        &self.oracle
    }

    pub fn config(&self) -> &ProcessorConfig {
        &self.config
    }

    /// Process one file end to end.
    ///
    /// On error nothing is written for this file.
    pub async fn process_file(&self, path: &Path) -> Result<FileReport, FileError> {
        let mut tracker = StageTracker::new(path);
        let result = self.drive(path, &mut tracker).await;
        match &result {
            Ok(_) => tracker.advance(FileStage::Done),
            Err(err) => tracker.fail(err),
        }
        result
    }

    async fn drive(
        &self,
        path: &Path,
        tracker: &mut StageTracker<'_>,
    ) -> Result<FileReport, FileError> {
        tracker.advance(FileStage::Decoding);
        let batch = read_tx_file(path)?;
        let (groups, individuals) = (batch.group_count(), batch.individual_count());
        info!(
            file = %path.display(),
            groups,
            individuals,
            "found {} groups and {} individual transactions in {}",
            groups,
            individuals,
            path.display()
        );

        tracker.advance(FileStage::Classifying);
        let concurrency = self.config.concurrency;
        let filter_err = |source| FileError::Filter {
            path: path.to_path_buf(),
            source,
        };
        let unsent = TxBatch {
            groups: filter_unsent_groups(batch.groups, &self.oracle, concurrency)
                .await
                .map_err(filter_err)?,
            individuals: filter_unsent_txs(batch.individuals, &self.oracle, concurrency)
                .await
                .map_err(filter_err)?,
        };
        let (unsent_groups, unsent_individuals) = (unsent.group_count(), unsent.individual_count());
        info!(
            file = %path.display(),
            unsent_groups,
            unsent_individuals,
            "file {} has {} unsent groups and {} unsent individual transactions",
            path.display(),
            unsent_groups,
            unsent_individuals
        );

        tracker.advance(FileStage::Writing);
        let out_path = unsent_path(path);
        let output = if write_records(&out_path, &unsent.into_records())? {
            info!(
                file = %path.display(),
                output = %out_path.display(),
                "wrote unsent transactions to {}",
                out_path.display()
            );
            Some(out_path)
        } else {
            info!(file = %path.display(), "no unsent transaction were found!");
            None
        };

        Ok(FileReport {
            path: path.to_path_buf(),
            groups,
            individuals,
            unsent_groups,
            unsent_individuals,
            output,
        })
    }

    /// Process files in order.
    ///
    /// A failed file is logged. Unless `keep_going` is set, the remaining
    /// files are skipped.
    pub async fn run<P: AsRef<Path>>(&self, paths: &[P]) -> RunSummary {
        let mut summary = RunSummary::default();
        let mut pending = paths.iter().map(AsRef::<Path>::as_ref);

        while let Some(path) = pending.next() {
            match self.process_file(path).await {
                Ok(report) => summary.reports.push(report),
                Err(err) => {
                    error!(file = %err.path().display(), "{err}");
                    summary.failures.push(err);
                    if !self.config.keep_going {
                        summary.skipped = pending.by_ref().map(Path::to_path_buf).collect();
                        if !summary.skipped.is_empty() {
                            warn!(skipped = summary.skipped.len(), "stopping after failed file");
                        }
                        break;
                    }
                }
            }
        }

        summary
    }
}
