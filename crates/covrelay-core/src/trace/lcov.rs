//! Minimal LCOV reader.
//!
//! Only the records Coveralls needs are read:
//!
//! ```text
//! SF:<source file>
//! DA:<line>,<hits>[,<checksum>]
//! BRDA:<line>,<block>,<branch>,<taken | ->
//! end_of_record
//! ```
//!
//! Everything else (`TN`, `FN`, `FNDA`, `LF`, `LH`, ...) is skipped. Sections
//! for the same source file (typical after merging several trace files) are
//! combined by summing hit counts.

use std::collections::BTreeMap;

/// Line and branch hits for one source file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LcovRecord {
    pub source_file: String,
    /// Hits per 1-based line number.
    pub lines: BTreeMap<u32, u64>,
    /// Hits per `(line, block, branch)`.
    pub branches: BTreeMap<(u32, u32, u32), u64>,
}

impl LcovRecord {
    fn new(source_file: &str) -> Self {
        Self {
            source_file: source_file.to_string(),
            ..Self::default()
        }
    }

    fn absorb(&mut self, other: LcovRecord) {
        for (line, hits) in other.lines {
            *self.lines.entry(line).or_insert(0) += hits;
        }
        for (key, hits) in other.branches {
            *self.branches.entry(key).or_insert(0) += hits;
        }
    }

    /// Highest line number with a `DA` entry.
    pub fn last_line(&self) -> u32 {
        self.lines.keys().next_back().copied().unwrap_or(0)
    }
}

/// Parse LCOV text into one record per source file, in first-seen order.
pub fn parse_lcov(text: &str) -> Vec<LcovRecord> {
    let mut records: Vec<LcovRecord> = Vec::new();
    let mut current: Option<LcovRecord> = None;

    for raw in text.lines() {
        let line = raw.trim();

        if line == "end_of_record" {
            flush(&mut records, current.take());
            continue;
        }

        let Some((tag, value)) = line.split_once(':') else {
            continue;
        };

        match tag {
            "SF" => {
                flush(&mut records, current.take());
                current = Some(LcovRecord::new(value));
            }
            "DA" => {
                if let (Some(record), Some((line_no, hits))) = (current.as_mut(), parse_da(value)) {
                    *record.lines.entry(line_no).or_insert(0) += hits;
                }
            }
            "BRDA" => {
                if let (Some(record), Some((key, hits))) = (current.as_mut(), parse_brda(value)) {
                    *record.branches.entry(key).or_insert(0) += hits;
                }
            }
            _ => {}
        }
    }

    // Trailing section without end_of_record (file caught mid-write)
    flush(&mut records, current.take());
    records
}

fn flush(records: &mut Vec<LcovRecord>, record: Option<LcovRecord>) {
    if let Some(record) = record {
        match records.iter_mut().find(|r| r.source_file == record.source_file) {
            Some(existing) => existing.absorb(record),
            None => records.push(record),
        }
    }
}

fn parse_da(value: &str) -> Option<(u32, u64)> {
    let mut parts = value.split(',');
    let line = parts.next()?.trim().parse().ok()?;
    let hits = parts.next()?.trim().parse().ok()?;
    Some((line, hits))
}

fn parse_brda(value: &str) -> Option<((u32, u32, u32), u64)> {
    let parts: Vec<&str> = value.split(',').map(str::trim).collect();
    if parts.len() != 4 {
        return None;
    }
    let line = parts[0].parse().ok()?;
    let block = parts[1].parse().ok()?;
    let branch = parts[2].parse().ok()?;
    // "-" means the branch's block was never executed
    let taken = if parts[3] == "-" { 0 } else { parts[3].parse().ok()? };
    Some(((line, block, branch), taken))
}
