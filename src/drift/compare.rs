// SPDX-License-Identifier: MIT
//! Artifact comparison — file pairs and recursive trees.
//!
//! Content comparison normalizes insignificant whitespace first: every line
//! is trimmed and blank lines are dropped, so a reindented or
//! trailing-space-touched copy never reports drift.

use crate::drift::{DriftError, DriftOutcome};
use globset::{Glob, GlobSet, GlobSetBuilder};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Compare a live artifact against its staged reference.
///
/// Missing-file classification is asymmetric: an absent `source` (the live
/// artifact, which is mandatory) yields [`DriftOutcome::MissingSource`]; an
/// absent `reference` yields [`DriftOutcome::MissingReference`].
pub fn compare_files(source: &Path, reference: &Path) -> Result<DriftOutcome, DriftError> {
    if !source.exists() {
        return Ok(DriftOutcome::MissingSource);
    }
    if !reference.exists() {
        return Ok(DriftOutcome::MissingReference);
    }

    let a = normalized_contents(source)?;
    let b = normalized_contents(reference)?;
    if a == b {
        Ok(DriftOutcome::Match)
    } else {
        Ok(DriftOutcome::Drift)
    }
}

/// Coarse recursive comparison of two trees.
///
/// Every file under both roots is compared except paths matching a glob in
/// `exclude_patterns` (relative to the root). A path present on only one
/// side counts as [`DriftOutcome::Drift`] — tree comparison has no fixed
/// pairing, so there is no missing-source/reference classification here.
/// Per-file detail is deliberately not reported at this granularity; that is
/// the job of the Tier-1 catalog.
pub fn compare_trees(
    root_a: &Path,
    root_b: &Path,
    exclude_patterns: &[String],
) -> Result<DriftOutcome, DriftError> {
    let excludes = build_globset(exclude_patterns)?;

    let files_a = collect_files(root_a, &excludes)?;
    let files_b = collect_files(root_b, &excludes)?;

    // Added or removed files are drift.
    if files_a != files_b {
        return Ok(DriftOutcome::Drift);
    }

    for rel in &files_a {
        let a = normalized_contents(&root_a.join(rel))?;
        let b = normalized_contents(&root_b.join(rel))?;
        if a != b {
            return Ok(DriftOutcome::Drift);
        }
    }
    Ok(DriftOutcome::Match)
}

/// Compile exclusion globs. Patterns match the path relative to the root,
/// and `*` crosses directory separators, so `*passphrase*` excludes secret
/// files at any depth.
fn build_globset(patterns: &[String]) -> Result<GlobSet, DriftError> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        let glob = Glob::new(pattern).map_err(|source| DriftError::Pattern {
            pattern: pattern.clone(),
            source,
        })?;
        builder.add(glob);
    }
    builder.build().map_err(|source| DriftError::Pattern {
        pattern: patterns.join(", "),
        source,
    })
}

/// Relative paths of all non-excluded files under `root`, sorted.
fn collect_files(root: &Path, excludes: &GlobSet) -> Result<BTreeSet<PathBuf>, DriftError> {
    let mut files = BTreeSet::new();
    for entry in WalkDir::new(root) {
        let entry = entry.map_err(|source| DriftError::Walk {
            root: root.to_path_buf(),
            source,
        })?;
        if !entry.file_type().is_file() {
            continue;
        }
        let rel = entry
            .path()
            .strip_prefix(root)
            .unwrap_or(entry.path())
            .to_path_buf();
        if excludes.is_match(&rel) {
            continue;
        }
        files.insert(rel);
    }
    Ok(files)
}

/// Read a file and normalize insignificant whitespace: trim every line,
/// drop blank lines. Non-UTF-8 bytes are replaced losslessly enough for
/// equality testing (both sides go through the same conversion).
fn normalized_contents(path: &Path) -> Result<String, DriftError> {
    let bytes = std::fs::read(path).map_err(|source| DriftError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let text = String::from_utf8_lossy(&bytes);
    Ok(normalize(&text))
}

fn normalize(text: &str) -> String {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}
