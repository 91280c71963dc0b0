//! Consistency verifier.
//!
//! Reloads both artifacts of every mode listed in the index and checks
//! them against each other position by position. The artifacts are the
//! ground truth; the tier tables are only used for the RTP sanity check.
//!
//! RULES:
//!   - Nothing here panics or returns early on a bad mode. Every problem
//!     becomes a Finding and the next mode is still checked.
//!   - Only an unreadable index stops verification outright. A single
//!     malformed mode entry fails that mode only.
//!   - Flat-table lines are judged one at a time; a line that is not
//!     UTF-8 or not an integer is a malformed cell, not a load failure.
//!   - At most MAX_DETAILED_MISMATCHES positional findings are kept per
//!     mode; the total is always counted.

use crate::{
    codec::ZstdCodec,
    config::{builtin_allows_zero, ConfigWarning, MathConfig},
    error::{MathError, MathResult},
    manifest::{Index, IndexListing, ListedMode, ModeManifestEntry, INDEX_FILE},
    population::PopulationStats,
    record::OutcomeRecord,
    types::ScaledMultiplier,
};
use std::{fmt, path::PathBuf};

pub const MAX_DETAILED_MISMATCHES: usize = 5;

/// One line of a reloaded flat table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlatCell {
    Value(ScaledMultiplier),
    Malformed(String),
}

impl FlatCell {
    pub fn value(&self) -> Option<ScaledMultiplier> {
        match self {
            Self::Value(v) => Some(*v),
            Self::Malformed(_) => None,
        }
    }
}

impl fmt::Display for FlatCell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Value(v) => write!(f, "{v}"),
            Self::Malformed(raw) => write!(f, "{raw:?}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Finding {
    /// Tier table drifted from its probability or RTP target.
    ConfigWarning(ConfigWarning),
    /// Mode is in the index but not in the config; RTP sanity skipped.
    UnknownMode,
    CountMismatch { flat: usize, records: usize },
    IdMismatch { index: usize, id: u64 },
    ValueMismatch { index: usize, flat: FlatCell, record: ScaledMultiplier },
    DomainViolation { zeros: usize },
    IoFailure { artifact: String, message: String },
}

impl Finding {
    /// Whether this finding fails the verification run.
    pub fn is_failure(&self) -> bool {
        !matches!(self, Self::ConfigWarning(_) | Self::UnknownMode)
    }

    pub fn is_positional(&self) -> bool {
        matches!(self, Self::IdMismatch { .. } | Self::ValueMismatch { .. })
    }
}

impl fmt::Display for Finding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ConfigWarning(w) => write!(f, "config warning: {w}"),
            Self::UnknownMode => write!(f, "mode not in config, RTP sanity skipped"),
            Self::CountMismatch { flat, records } => {
                write!(f, "count mismatch: flat table has {flat}, record stream has {records}")
            }
            Self::IdMismatch { index, id } => {
                write!(f, "id mismatch at index {index}: record id {id}")
            }
            Self::ValueMismatch { index, flat, record } => {
                write!(f, "value mismatch at index {index}: flat {flat}, record {record}")
            }
            Self::DomainViolation { zeros } => {
                write!(f, "found {zeros} zero-payout entries in a no-zero mode")
            }
            Self::IoFailure { artifact, message } => {
                write!(f, "cannot load {artifact}: {message}")
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ModeReport {
    pub name: String,
    pub flat_entries: usize,
    pub record_entries: usize,
    /// Total id/value divergences, including ones not kept in `findings`.
    pub mismatch_count: usize,
    pub measured_rtp: Option<f64>,
    pub findings: Vec<Finding>,
}

impl ModeReport {
    fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            flat_entries: 0,
            record_entries: 0,
            mismatch_count: 0,
            measured_rtp: None,
            findings: Vec::new(),
        }
    }

    pub fn passed(&self) -> bool {
        !self.findings.iter().any(Finding::is_failure)
    }

    fn record_mismatch(&mut self, finding: Finding) {
        if self.mismatch_count < MAX_DETAILED_MISMATCHES {
            log::warn!("mode={} {finding}", self.name);
            self.findings.push(finding);
        }
        self.mismatch_count += 1;
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct VerificationReport {
    pub version: u32,
    pub modes: Vec<ModeReport>,
}

impl VerificationReport {
    pub fn passed(&self) -> bool {
        self.modes.iter().all(ModeReport::passed)
    }

    pub fn mode(&self, name: &str) -> Option<&ModeReport> {
        self.modes.iter().find(|m| m.name == name)
    }

    pub fn failed_modes(&self) -> Vec<&str> {
        self.modes
            .iter()
            .filter(|m| !m.passed())
            .map(|m| m.name.as_str())
            .collect()
    }
}

impl fmt::Display for VerificationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Index version: {}", self.version)?;
        for m in &self.modes {
            writeln!(f)?;
            writeln!(f, "[{}]", m.name)?;
            writeln!(f, "  flat entries:   {}", m.flat_entries)?;
            writeln!(f, "  record entries: {}", m.record_entries)?;
            if let Some(rtp) = m.measured_rtp {
                writeln!(f, "  measured RTP:   {rtp:.4}")?;
            }
            for finding in &m.findings {
                let tag = if finding.is_failure() { "ERROR" } else { "warn" };
                writeln!(f, "  [{tag}] {finding}")?;
            }
            if m.mismatch_count > MAX_DETAILED_MISMATCHES {
                writeln!(
                    f,
                    "  ... {} more positional mismatches not shown",
                    m.mismatch_count - MAX_DETAILED_MISMATCHES
                )?;
            }
            if m.passed() {
                writeln!(f, "  ✓ content matches completely")?;
            }
        }
        writeln!(f)?;
        if self.passed() {
            write!(f, "RESULT: PASS ({} modes)", self.modes.len())
        } else {
            write!(f, "RESULT: FAIL ({})", self.failed_modes().join(", "))
        }
    }
}

/// Parse raw flat-table bytes. Blank lines are skipped; any other line
/// that is not an unsigned integer (invalid UTF-8 included) is kept as a
/// malformed cell.
pub fn parse_flat_table(bytes: &[u8]) -> Vec<FlatCell> {
    bytes
        .split(|&b| b == b'\n')
        .map(String::from_utf8_lossy)
        .filter(|line| !line.trim().is_empty())
        .map(|line| {
            let line = line.trim();
            match line.parse::<ScaledMultiplier>() {
                Ok(v) => FlatCell::Value(v),
                Err(_) => FlatCell::Malformed(line.to_string()),
            }
        })
        .collect()
}

/// Parse decompressed record text. Blank lines are skipped; a line that
/// is not a well-formed OutcomeRecord makes the whole stream unusable.
pub fn parse_record_stream(text: &str) -> MathResult<Vec<OutcomeRecord>> {
    text.lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(i, line)| {
            serde_json::from_str(line).map_err(|source| MathError::MalformedRecord {
                line: i + 1,
                source,
            })
        })
        .collect()
}

fn invalid_utf8(e: std::str::Utf8Error) -> MathError {
    MathError::Io(std::io::Error::new(std::io::ErrorKind::InvalidData, e))
}

pub struct Verifier<'a> {
    library_dir: PathBuf,
    config: &'a MathConfig,
    codec: ZstdCodec,
}

impl<'a> Verifier<'a> {
    pub fn new(library_dir: impl Into<PathBuf>, config: &'a MathConfig) -> Self {
        Self {
            library_dir: library_dir.into(),
            config,
            codec: ZstdCodec::new(config.compression_level),
        }
    }

    /// Read index.json and verify every mode it lists. A mode entry that
    /// cannot be decoded is reported as an I/O failure for that mode.
    pub fn verify(&self) -> MathResult<VerificationReport> {
        let listing = IndexListing::read(&self.library_dir.join(INDEX_FILE))?;
        let modes = listing
            .entries()
            .into_iter()
            .map(|listed| match listed {
                ListedMode::Entry(entry) => self.verify_mode(&entry),
                ListedMode::Malformed { name, error } => {
                    io_failure(ModeReport::new(&name), INDEX_FILE, error.into())
                }
            })
            .collect();
        Ok(VerificationReport {
            version: listing.version,
            modes,
        })
    }

    pub fn verify_index(&self, index: &Index) -> VerificationReport {
        let modes = index.modes.iter().map(|entry| self.verify_mode(entry)).collect();
        VerificationReport {
            version: index.version,
            modes,
        }
    }

    pub fn load_flat_table(&self, entry: &ModeManifestEntry) -> MathResult<Vec<FlatCell>> {
        let bytes = std::fs::read(self.library_dir.join(&entry.weights))?;
        Ok(parse_flat_table(&bytes))
    }

    pub fn load_records(&self, entry: &ModeManifestEntry) -> MathResult<Vec<OutcomeRecord>> {
        let file = std::fs::File::open(self.library_dir.join(&entry.events))?;
        let bytes = self.codec.decompress(std::io::BufReader::new(file))?;
        let text = std::str::from_utf8(&bytes).map_err(invalid_utf8)?;
        parse_record_stream(text)
    }

    pub fn verify_mode(&self, entry: &ModeManifestEntry) -> ModeReport {
        let mut report = ModeReport::new(&entry.name);
        log::info!("mode={} verifying", entry.name);

        self.check_table_sanity(&mut report);

        let flat = match self.load_flat_table(entry) {
            Ok(flat) => flat,
            Err(e) => return io_failure(report, &entry.weights, e),
        };
        report.flat_entries = flat.len();

        let records = match self.load_records(entry) {
            Ok(records) => records,
            Err(e) => return io_failure(report, &entry.events, e),
        };
        report.record_entries = records.len();

        if flat.len() != records.len() {
            let finding = Finding::CountMismatch {
                flat: flat.len(),
                records: records.len(),
            };
            log::warn!("mode={} {finding}", entry.name);
            report.findings.push(finding);
        }

        for (index, (cell, record)) in flat.iter().zip(&records).enumerate() {
            if record.id != index as u64 {
                report.record_mismatch(Finding::IdMismatch {
                    index,
                    id: record.id,
                });
            }
            if cell.value() != Some(record.payout_multiplier) {
                report.record_mismatch(Finding::ValueMismatch {
                    index,
                    flat: cell.clone(),
                    record: record.payout_multiplier,
                });
            }
        }

        let values: Vec<ScaledMultiplier> = flat.iter().filter_map(FlatCell::value).collect();
        let stats = PopulationStats::from_values(&values);
        report.measured_rtp = Some(stats.measured_rtp());

        if !self.allows_zero(&entry.name) && stats.zero_count() > 0 {
            let finding = Finding::DomainViolation {
                zeros: stats.zero_count(),
            };
            log::error!("mode={} {finding}", entry.name);
            report.findings.push(finding);
        }

        report
    }

    fn allows_zero(&self, mode: &str) -> bool {
        self.config
            .mode(mode)
            .map(|m| m.allows_zero)
            .unwrap_or_else(|| builtin_allows_zero(mode))
    }

    fn check_table_sanity(&self, report: &mut ModeReport) {
        match self.config.mode(&report.name) {
            Some(mode) => {
                for warning in mode.tiers.check(self.config.target_rtp) {
                    log::warn!("mode={} config: {warning}", report.name);
                    report.findings.push(Finding::ConfigWarning(warning));
                }
            }
            None => {
                log::warn!("mode={} is not configured; skipping RTP sanity", report.name);
                report.findings.push(Finding::UnknownMode);
            }
        }
    }
}

fn io_failure(mut report: ModeReport, artifact: &str, error: MathError) -> ModeReport {
    log::error!("mode={} cannot load {artifact}: {error}", report.name);
    report.findings.push(Finding::IoFailure {
        artifact: artifact.to_string(),
        message: error.to_string(),
    });
    report
}
