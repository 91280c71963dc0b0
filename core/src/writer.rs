//! Dual-format writer.
//!
//! RULE: Both artifacts for a mode are written from the SAME in-memory
//! population, in the same order. Nothing here reshuffles or regenerates.
//!
//!   lookUpTable_<mode>_0.csv   one integer per line, newline-joined
//!   books_<mode>.jsonl.zst     one compact OutcomeRecord per line, zstd

use crate::{
    codec::ZstdCodec,
    config::{flat_table_file, record_stream_file},
    error::MathResult,
    manifest::{Index, ModeManifestEntry, INDEX_FILE},
    record::OutcomeRecord,
    types::ScaledMultiplier,
};
use std::{
    fs::File,
    io::{BufWriter, ErrorKind, Write},
    path::PathBuf,
};

/// Write the flat lookup table. No trailing newline, no header.
pub fn write_flat_table<W: Write>(values: &[ScaledMultiplier], mut writer: W) -> MathResult<()> {
    for (i, value) in values.iter().enumerate() {
        if i > 0 {
            writer.write_all(b"\n")?;
        }
        write!(writer, "{value}")?;
    }
    writer.flush()?;
    Ok(())
}

/// Write the uncompressed record text (one JSON line per entry).
pub fn write_record_text<W: Write>(
    values: &[ScaledMultiplier],
    mode: &str,
    mut writer: W,
) -> MathResult<()> {
    for (i, &value) in values.iter().enumerate() {
        if i > 0 {
            writer.write_all(b"\n")?;
        }
        serde_json::to_writer(&mut writer, &OutcomeRecord::new(i, value, mode))?;
    }
    writer.flush()?;
    Ok(())
}

/// Stream the record text through the codec into `writer`.
/// Returns the inner writer once the final frame is flushed.
pub fn write_record_stream<W: Write>(
    values: &[ScaledMultiplier],
    mode: &str,
    codec: &ZstdCodec,
    writer: W,
) -> MathResult<W> {
    let mut encoder = codec.encoder(writer)?;
    write_record_text(values, mode, &mut encoder)?;
    Ok(encoder.finish()?)
}

/// Writes mode artifacts and the index into one library directory.
pub struct LibraryWriter {
    dir: PathBuf,
    codec: ZstdCodec,
}

impl LibraryWriter {
    /// Create the directory (and parents) if needed.
    pub fn create(dir: impl Into<PathBuf>, codec: ZstdCodec) -> MathResult<Self> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)?;
        Ok(Self { dir, codec })
    }

    /// Delete an index left by an earlier run, if any.
    pub fn remove_index(&self) -> MathResult<()> {
        let path = self.dir.join(INDEX_FILE);
        match std::fs::remove_file(&path) {
            Ok(()) => {
                log::info!("removed previous {}", path.display());
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    /// Write both artifacts for one mode and return its manifest entry.
    pub fn write_mode(
        &self,
        mode: &str,
        values: &[ScaledMultiplier],
    ) -> MathResult<ModeManifestEntry> {
        let weights = flat_table_file(mode);
        let events = record_stream_file(mode);

        log::info!("mode={mode} writing {weights} ({} entries)", values.len());
        let csv = BufWriter::new(File::create(self.dir.join(&weights))?);
        write_flat_table(values, csv)?;

        log::info!("mode={mode} writing {events} (zstd level {})", self.codec.level);
        let books = BufWriter::new(File::create(self.dir.join(&events))?);
        let mut books = write_record_stream(values, mode, &self.codec, books)?;
        books.flush()?;

        Ok(ModeManifestEntry::new(mode, events, weights))
    }

    pub fn write_index(&self, index: &Index) -> MathResult<PathBuf> {
        let path = self.dir.join(INDEX_FILE);
        index.write_to(BufWriter::new(File::create(&path)?))?;
        log::info!("wrote {} with {} modes", path.display(), index.modes.len());
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn remove_index_tolerates_a_missing_index() {
        let dir = tempfile::tempdir().unwrap();
        let writer = LibraryWriter::create(dir.path(), ZstdCodec::default()).unwrap();
        writer.remove_index().unwrap();

        writer.write_index(&Index::new(vec![])).unwrap();
        assert!(dir.path().join(INDEX_FILE).exists());
        writer.remove_index().unwrap();
        assert!(!dir.path().join(INDEX_FILE).exists());
    }

    #[test]
    fn flat_table_has_no_trailing_newline() {
        let mut out = Vec::new();
        write_flat_table(&[100, 0, 2000], &mut out).unwrap();
        assert_eq!(out, b"100\n0\n2000");
    }

    #[test]
    fn empty_population_writes_empty_artifacts() {
        let mut csv = Vec::new();
        write_flat_table(&[], &mut csv).unwrap();
        assert!(csv.is_empty());

        let mut text = Vec::new();
        write_record_text(&[], "base", &mut text).unwrap();
        assert!(text.is_empty());
    }

    #[test]
    fn record_lines_are_positional() {
        let values = [600, 100, 10_000];
        let mut text = Vec::new();
        write_record_text(&values, "no_zero", &mut text).unwrap();
        let text = String::from_utf8(text).unwrap();
        let records: Vec<OutcomeRecord> = text
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect();
        assert_eq!(records.len(), 3);
        for (i, record) in records.iter().enumerate() {
            assert_eq!(record.id, i as u64);
            assert_eq!(record.payout_multiplier, values[i]);
            assert_eq!(record.criteria, "no_zero");
        }
        assert!(!text.ends_with('\n'));
    }

    #[test]
    fn compressed_stream_decodes_to_identical_text() {
        let values: Vec<ScaledMultiplier> = (0..5_000).map(|i| (i % 5) * 100).collect();
        let codec = ZstdCodec::default();

        let mut plain = Vec::new();
        write_record_text(&values, "base", &mut plain).unwrap();
        let compressed = write_record_stream(&values, "base", &codec, Vec::new()).unwrap();

        assert!(compressed.len() < plain.len());
        assert_eq!(codec.decompress(&compressed[..]).unwrap(), plain);
    }
}
