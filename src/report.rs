use crate::error::KtResult;
use crate::evaluator::Evaluator;
use crate::layout::Finger;
use serde::Serialize;
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::fs;
use std::io::Write;
use std::path::Path;
use strum::IntoEnumIterator;

pub const CHARACTERS_CSV: &str = "characters.csv";
pub const UNMAPPED_CSV: &str = "unmapped.csv";

/// Character counts that remember the order characters were first seen in,
/// so equal counts sort reproducibly.
#[derive(Debug, Clone, Default)]
pub struct FrequencyTable {
    counts: HashMap<char, u64>,
    first_seen: Vec<char>,
}

impl FrequencyTable {
    pub fn record(&mut self, c: char) {
        match self.counts.entry(c) {
            Entry::Occupied(mut e) => *e.get_mut() += 1,
            Entry::Vacant(e) => {
                e.insert(1);
                self.first_seen.push(c);
            }
        }
    }

    pub fn get(&self, c: char) -> u64 {
        self.counts.get(&c).copied().unwrap_or(0)
    }

    /// Distinct characters.
    pub fn len(&self) -> usize {
        self.first_seen.len()
    }

    pub fn is_empty(&self) -> bool {
        self.first_seen.is_empty()
    }

    /// Sum of all counts.
    pub fn occurrences(&self) -> u64 {
        self.counts.values().sum()
    }

    /// Descending by count, ties in first-seen order.
    pub fn sorted(&self) -> Vec<(char, u64)> {
        let mut entries: Vec<(char, u64)> =
            self.first_seen.iter().map(|&c| (c, self.get(c))).collect();
        // sort_by is stable
        entries.sort_by(|a, b| b.1.cmp(&a.1));
        entries
    }
}

/// `part` as a percentage of `total`; zero when there is nothing to divide by.
pub fn percent(part: u64, total: u64) -> f64 {
    if total == 0 {
        0.0
    } else {
        part as f64 * 100.0 / total as f64
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct FingerUsage {
    pub finger: Finger,
    pub count: u64,
    pub percent: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CharCount {
    #[serde(rename = "char")]
    pub ch: char,
    pub count: u64,
    pub percent: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub sessions: u64,
    pub total: u64,
    pub fingers: Vec<FingerUsage>,
    pub sfb: u64,
    pub sfb_percent: f64,
    pub dsfb: u64,
    pub dsfb_percent: f64,
    pub characters: Vec<CharCount>,
    pub unmapped: Vec<CharCount>,
}

impl Report {
    pub fn from_evaluator(ev: &Evaluator) -> Self {
        let total = ev.total();
        let char_counts = |table: &FrequencyTable| -> Vec<CharCount> {
            table
                .sorted()
                .into_iter()
                .map(|(ch, count)| CharCount {
                    ch,
                    count,
                    percent: percent(count, total),
                })
                .collect()
        };

        Self {
            sessions: ev.sessions(),
            total,
            fingers: Finger::iter()
                .map(|finger| {
                    let count = ev.finger_count(finger);
                    FingerUsage {
                        finger,
                        count,
                        percent: percent(count, total),
                    }
                })
                .collect(),
            sfb: ev.sfb_count(),
            sfb_percent: percent(ev.sfb_count(), total),
            dsfb: ev.dsfb_count(),
            dsfb_percent: percent(ev.dsfb_count(), total),
            characters: char_counts(ev.char_frequency()),
            unmapped: char_counts(ev.unmapped_frequency()),
        }
    }

    pub fn to_json(&self) -> KtResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Writes both frequency tables into `dir` as `characters.csv` and
    /// `unmapped.csv`, creating the directory if needed.
    pub fn export_csv(&self, dir: &Path) -> KtResult<()> {
        fs::create_dir_all(dir)?;
        write_char_counts_csv(&self.characters, fs::File::create(dir.join(CHARACTERS_CSV))?)?;
        write_char_counts_csv(&self.unmapped, fs::File::create(dir.join(UNMAPPED_CSV))?)?;
        Ok(())
    }
}

pub fn write_char_counts_csv<W: Write>(rows: &[CharCount], out: W) -> KtResult<()> {
    let mut wtr = csv::Writer::from_writer(out);
    for row in rows {
        wtr.serialize(row)?;
    }
    wtr.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ties_keep_first_seen_order() {
        let mut t = FrequencyTable::default();
        for c in "bacab".chars() {
            t.record(c);
        }
        assert_eq!(t.sorted(), vec![('b', 2), ('a', 2), ('c', 1)]);
        assert_eq!(t.occurrences(), 5);
    }

    #[test]
    fn percent_of_nothing_is_zero() {
        assert_eq!(percent(3, 0), 0.0);
        assert_eq!(percent(1, 4), 25.0);
    }

    #[test]
    fn csv_has_header_and_rows() {
        let rows = vec![CharCount {
            ch: 'e',
            count: 3,
            percent: 50.0,
        }];
        let mut buf = Vec::new();
        write_char_counts_csv(&rows, &mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert_eq!(text, "char,count,percent\ne,3,50.0\n");
    }
}
