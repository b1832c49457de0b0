//! Coveralls job payload and its construction from an lcov trace.

use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::trace::{parse_lcov, LcovRecord};
use crate::upload::SubmissionOptions;

/// Upper bound on the per-file `coverage` array.
const MAX_TRACKED_LINES: usize = 1_000_000;

/// Body of `POST /api/v1/jobs`.
#[derive(Debug, Clone, Serialize)]
pub struct CoverallsJob {
    #[serde(flatten)]
    pub options: SubmissionOptions,
    pub source_files: Vec<SourceFile>,
}

/// Coverage of one source file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceFile {
    /// Path relative to the options' `filepath` root, `/`-separated.
    pub name: String,
    /// MD5 of the source, when the file could be read.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_digest: Option<String>,
    /// One entry per source line; `null` for lines that are not relevant.
    pub coverage: Vec<Option<u64>>,
    /// Flattened `[line, block, branch, hits, ...]`.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub branches: Vec<u64>,
}

/// Build a job from lcov text. Blocking: reads source files for digests.
///
/// Source paths are resolved against `cwd/<options.filepath>`; the
/// `filepath` marker itself is not sent.
pub fn build_job(trace: &str, options: &SubmissionOptions, cwd: &Path) -> CoverallsJob {
    let root = cwd.join(options.filepath.as_deref().unwrap_or("."));

    let source_files = parse_lcov(trace)
        .into_iter()
        .map(|record| source_file(&root, record))
        .collect();

    let mut options = options.clone();
    options.filepath = None;

    CoverallsJob {
        options,
        source_files,
    }
}

fn source_file(root: &Path, record: LcovRecord) -> SourceFile {
    let path = root.join(&record.source_file);
    let source = std::fs::read(&path).ok();

    let source_lines = source
        .as_deref()
        .map(|bytes| String::from_utf8_lossy(bytes).lines().count())
        .unwrap_or(0);
    let len = source_lines
        .max(record.last_line() as usize)
        .min(MAX_TRACKED_LINES);

    // DA entries past the tracked range come from corrupt traces
    let mut coverage = vec![None; len];
    for (&line, &hits) in &record.lines {
        if let Some(slot) = (line as usize).checked_sub(1).and_then(|i| coverage.get_mut(i)) {
            *slot = Some(hits);
        }
    }

    let branches = record
        .branches
        .iter()
        .flat_map(|(&(line, block, branch), &hits)| {
            [line as u64, block as u64, branch as u64, hits]
        })
        .collect();

    SourceFile {
        name: display_name(root, &path, &record.source_file),
        source_digest: source.map(|bytes| format!("{:x}", md5::compute(bytes))),
        coverage,
        branches,
    }
}

fn display_name(root: &Path, path: &Path, original: &str) -> String {
    let root = lexical(root);
    let path = lexical(path);
    match path.strip_prefix(&root) {
        Ok(relative) => relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/"),
        Err(_) => original.to_string(),
    }
}

fn lexical(path: &Path) -> PathBuf {
    path.components()
        .filter(|c| !matches!(c, std::path::Component::CurDir))
        .collect()
}
