pub mod patterns;

use std::path::{Path, PathBuf};

use futures::future::try_join_all;
use tracing::{debug, info, trace};

use crate::error::{TrackerError, TrackerResult};
use crate::types::{ContractRecord, VerificationStatus};
use patterns::LogLine;

/// Extensions (compared case-insensitively) of the files considered build-tool logs.
pub const LOG_EXTENSIONS: &[&str] = &["log", "txt"];

/// Fields collected for the record currently open in the log.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
struct RecordBuilder {
    address: Option<String>,
    chain: Option<String>,
    verification_status: Option<VerificationStatus>,
    compiler: Option<String>,
    optimizations: Option<u64>,
    contract_path: Option<String>,
    contract_name: Option<String>,
}

impl RecordBuilder {
    fn open(line: &str) -> Self {
        Self { address: patterns::address(line), chain: patterns::chain_id(line), ..Default::default() }
    }

    /// A record needs at least an address and a chain to be emitted.
    fn build(self) -> Option<ContractRecord> {
        match (self.address, self.chain) {
            (Some(address), Some(chain)) => Some(ContractRecord {
                address,
                chain,
                verification_status: self.verification_status,
                compiler: self.compiler,
                optimizations: self.optimizations,
                contract_path: self.contract_path,
                contract_name: self.contract_name,
            }),
            (address, chain) => {
                debug!(?address, ?chain, "Dropping deployment record without address or chain");
                None
            }
        }
    }
}

#[derive(Debug, Default)]
enum SectionState {
    #[default]
    Outside,
    /// Inside the deployment section, with the record opened by the latest start marker.
    Inside(Option<RecordBuilder>),
}

/// Single-pass state machine over the lines of one log file.
#[derive(Debug, Default)]
struct LogScanner {
    state: SectionState,
    records: Vec<ContractRecord>,
}

impl LogScanner {
    fn flush(&mut self, builder: Option<RecordBuilder>) {
        if let Some(record) = builder.and_then(RecordBuilder::build) {
            trace!(address = %record.address, chain = %record.chain, "Deployment record closed");
            self.records.push(record);
        }
    }

    fn process(&mut self, line: &str, next_line: Option<&str>) {
        let classified = LogLine::classify(line);

        let SectionState::Inside(open) = &mut self.state else {
            if classified == LogLine::SectionMarker {
                self.state = SectionState::Inside(None);
            }
            return;
        };

        match classified {
            LogLine::StartVerifying(line) => {
                let previous = open.replace(RecordBuilder::open(line));
                self.flush(previous);
            }
            LogLine::CompilerVersion(line) => {
                if let Some(builder) = open {
                    builder.compiler = patterns::compiler_version(line);
                }
            }
            LogLine::Optimizations(line) => {
                if let Some(builder) = open {
                    builder.optimizations = patterns::optimizations(line);
                }
            }
            LogLine::SubmittingVerification(line) => {
                if let Some(builder) = open {
                    let (path, name) = patterns::contract_id(line).unzip();
                    builder.contract_path = path;
                    builder.contract_name = name.flatten();
                }
            }
            LogLine::VerificationStatus => {
                if let Some(builder) = open {
                    builder.verification_status =
                        next_line.and_then(patterns::response_status).map(VerificationStatus::from);
                }
            }
            LogLine::SectionMarker | LogLine::Other => {}
        }
    }

    fn finish(mut self) -> Vec<ContractRecord> {
        if let SectionState::Inside(open) = std::mem::take(&mut self.state) {
            self.flush(open);
        }
        self.records
    }
}

/// Extracts the deployment records of one log, in the order their start markers appear.
pub fn scan_text(text: &str) -> Vec<ContractRecord> {
    let mut scanner = LogScanner::default();
    let mut lines = text.lines().peekable();

    while let Some(line) = lines.next() {
        scanner.process(line, lines.peek().copied());
    }

    scanner.finish()
}

fn is_log_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| LOG_EXTENSIONS.iter().any(|known| known.eq_ignore_ascii_case(ext)))
}

/// Log files of `dir`, sorted by name.
pub async fn list_log_files(dir: &Path) -> TrackerResult<Vec<PathBuf>> {
    let mut entries = tokio::fs::read_dir(dir).await.map_err(|e| TrackerError::io(dir, e))?;
    let mut files = Vec::new();

    while let Some(entry) = entries.next_entry().await.map_err(|e| TrackerError::io(dir, e))? {
        let path = entry.path();
        // Follows symlinks, unlike `DirEntry::file_type`.
        let metadata = tokio::fs::metadata(&path).await.map_err(|e| TrackerError::io(&path, e))?;
        if metadata.is_file() && is_log_file(&path) {
            files.push(path);
        } else {
            trace!(path = %path.display(), "Skipping non-log entry");
        }
    }

    files.sort();
    Ok(files)
}

async fn scan_file(path: PathBuf) -> TrackerResult<Vec<ContractRecord>> {
    let text = tokio::fs::read_to_string(&path).await.map_err(|e| TrackerError::io(&path, e))?;
    let records = scan_text(&text);
    debug!(path = %path.display(), records = records.len(), "Scanned log file");
    Ok(records)
}

/// Extracts the deployment records of every log file in `dir`.
///
/// Files are read concurrently; the result keeps file-name order, then in-file order.
pub async fn scan(dir: &Path) -> TrackerResult<Vec<ContractRecord>> {
    let files = list_log_files(dir).await?;
    let per_file = try_join_all(files.into_iter().map(scan_file)).await?;
    let records: Vec<_> = per_file.into_iter().flatten().collect();

    info!(dir = %dir.display(), records = records.len(), "Scanned deployment logs");
    Ok(records)
}
