//! File-level alignment runs and CSV/JSON export.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};

use crate::align::assembler::{Granularity, LineAligner};
use crate::dataset::{build_dataset, load_wordlist, PhoneticSearchDataset};
use crate::error::AlignError;
use crate::lyrics::AnalyzedLyrics;
use crate::types::AlignedMora;

/// Extension of analyzed lyric files picked up from a directory.
const LYRICS_EXTENSION: &str = "txt";

/// Options for a multi-file alignment run.
#[derive(Debug, Clone, Copy, Default)]
pub struct AlignOptions {
    pub granularity: Granularity,
    /// Skip files that fail instead of aborting the run
    pub keep_going: bool,
}

/// Lyric files under `input`: a directory yields its `*.txt` files sorted
/// by path, a file yields itself.
pub fn collect_input_files(input: &Path) -> Result<Vec<PathBuf>> {
    if input.is_dir() {
        let mut files = Vec::new();
        let entries = std::fs::read_dir(input)
            .with_context(|| format!("Failed to read directory: {}", input.display()))?;
        for entry in entries {
            let path = entry?.path();
            if path.is_file() && path.extension().is_some_and(|e| e == LYRICS_EXTENSION) {
                files.push(path);
            }
        }
        files.sort();
        Ok(files)
    } else if input.is_file() {
        Ok(vec![input.to_path_buf()])
    } else {
        bail!("Input not found: {}", input.display())
    }
}

/// Align one analyzed lyrics file, tagging rows with its path.
pub fn align_file(
    aligner: &LineAligner,
    path: &Path,
    granularity: Granularity,
) -> Result<Vec<AlignedMora>> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read lyrics: {}", path.display()))?;
    let lyrics = AnalyzedLyrics::from_text(&text)
        .with_context(|| format!("Failed to parse lyrics: {}", path.display()))?;
    let mut rows = aligner
        .align_lyrics(&lyrics, granularity)
        .with_context(|| format!("Alignment failed for {}", path.display()))?;

    let source = path.display().to_string();
    for row in &mut rows {
        row.input_file_path = Some(source.clone());
    }
    Ok(rows)
}

/// Align every file in order and concatenate the rows.
pub fn align_files(
    aligner: &LineAligner,
    files: &[PathBuf],
    options: AlignOptions,
) -> Result<Vec<AlignedMora>> {
    let mut all_rows = Vec::new();
    let mut skipped = 0;

    for path in files {
        log::info!("Aligning {} ({} level)", path.display(), options.granularity);
        match align_file(aligner, path, options.granularity) {
            Ok(rows) => all_rows.extend(rows),
            Err(e) if options.keep_going => {
                log::warn!("Skipping {}: {:#}", path.display(), e);
                skipped += 1;
            }
            Err(e) => return Err(e),
        }
    }

    log::info!(
        "Aligned {} files into {} rows ({} skipped)",
        files.len() - skipped,
        all_rows.len(),
        skipped
    );
    Ok(all_rows)
}

/// Write data via a sibling temp file and rename it into place.
fn atomic_write(target: &Path, data: &[u8]) -> Result<()> {
    if let Some(parent) = target.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }

    let tmp_path = target.with_extension("tmp");
    std::fs::write(&tmp_path, data)
        .with_context(|| format!("Failed to write: {}", tmp_path.display()))?;
    std::fs::rename(&tmp_path, target)
        .with_context(|| format!("Failed to move output into place: {}", target.display()))?;
    Ok(())
}

/// CSV with a header row, columns in struct field order.
pub fn write_aligned_csv(path: &Path, rows: &[AlignedMora]) -> Result<()> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    for row in rows {
        writer
            .serialize(row)
            .map_err(|e| AlignError::csv("serializing aligned rows", e))?;
    }
    let data = writer
        .into_inner()
        .map_err(|e| AlignError::io("flushing CSV buffer", e.into_error()))?;
    atomic_write(path, &data)?;
    log::info!("Wrote {} rows to {}", rows.len(), path.display());
    Ok(())
}

pub fn read_aligned_csv(path: &Path) -> Result<Vec<AlignedMora>> {
    let mut reader = csv::Reader::from_path(path)
        .with_context(|| format!("Failed to open aligned CSV: {}", path.display()))?;
    let rows = reader
        .deserialize()
        .collect::<std::result::Result<Vec<AlignedMora>, _>>()
        .with_context(|| format!("Failed to parse aligned CSV: {}", path.display()))?;
    Ok(rows)
}

pub fn write_dataset_json(path: &Path, dataset: &PhoneticSearchDataset) -> Result<()> {
    let data = serde_json::to_vec_pretty(dataset)
        .map_err(|e| AlignError::json("serializing dataset", e))?;
    atomic_write(path, &data)?;
    log::info!("Wrote {} queries to {}", dataset.queries.len(), path.display());
    Ok(())
}

/// Build the search dataset from a word table and a word-level CSV.
pub fn create_dataset(word_table: &Path, aligned: &Path) -> Result<PhoneticSearchDataset> {
    let file = std::fs::File::open(word_table)
        .with_context(|| format!("Failed to open word table: {}", word_table.display()))?;
    let wordlist = load_wordlist(file)
        .with_context(|| format!("Failed to load word table: {}", word_table.display()))?;
    let rows = read_aligned_csv(aligned)?;
    Ok(build_dataset(&rows, wordlist))
}
