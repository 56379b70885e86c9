//! Per-unit import counters.
//!
//! Counters are owned by one processing unit and handed back when the unit
//! closes; the host merges unit reports with `+=`. There is no process-wide
//! counter state.

use derive_more::{Add, AddAssign};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Counter group label reported to batch hosts.
pub const COUNTER_GROUP_NAME: &str = "Rowpack Import";

///
/// ImportCounter
///

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
#[remain::sorted]
pub enum ImportCounter {
    DroppedMutations,
    EmptyRecords,
    ParserErrors,
    RecordErrors,
    RowsEmitted,
    UpsertsDone,
}

impl ImportCounter {
    pub const ALL: [Self; 6] = [
        Self::ParserErrors,
        Self::EmptyRecords,
        Self::UpsertsDone,
        Self::RecordErrors,
        Self::RowsEmitted,
        Self::DroppedMutations,
    ];

    /// Stable label used when reporting to a batch host.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::DroppedMutations => "Dropped mutations",
            Self::EmptyRecords => "Empty records",
            Self::ParserErrors => "Parser errors",
            Self::RecordErrors => "Errors on records",
            Self::RowsEmitted => "Rows emitted",
            Self::UpsertsDone => "Upserts Done",
        }
    }
}

impl fmt::Display for ImportCounter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

///
/// ImportCounters
///

#[derive(
    Add, AddAssign, Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq, Serialize,
)]
pub struct ImportCounters {
    pub parser_errors: u64,
    pub empty_records: u64,
    pub upserts_done: u64,
    pub record_errors: u64,
    pub rows_emitted: u64,
    pub dropped_mutations: u64,
}

impl ImportCounters {
    /// Increment one counter by one.
    pub const fn bump(&mut self, counter: ImportCounter) {
        self.add(counter, 1);
    }

    /// Increment one counter by `delta`, saturating.
    pub const fn add(&mut self, counter: ImportCounter, delta: u64) {
        let slot = self.slot_mut(counter);
        *slot = slot.saturating_add(delta);
    }

    #[must_use]
    pub const fn get(&self, counter: ImportCounter) -> u64 {
        match counter {
            ImportCounter::DroppedMutations => self.dropped_mutations,
            ImportCounter::EmptyRecords => self.empty_records,
            ImportCounter::ParserErrors => self.parser_errors,
            ImportCounter::RecordErrors => self.record_errors,
            ImportCounter::RowsEmitted => self.rows_emitted,
            ImportCounter::UpsertsDone => self.upserts_done,
        }
    }

    /// (label, value) pairs in reporting order.
    pub fn entries(&self) -> impl Iterator<Item = (&'static str, u64)> + '_ {
        ImportCounter::ALL
            .into_iter()
            .map(|counter| (counter.label(), self.get(counter)))
    }

    const fn slot_mut(&mut self, counter: ImportCounter) -> &mut u64 {
        match counter {
            ImportCounter::DroppedMutations => &mut self.dropped_mutations,
            ImportCounter::EmptyRecords => &mut self.empty_records,
            ImportCounter::ParserErrors => &mut self.parser_errors,
            ImportCounter::RecordErrors => &mut self.record_errors,
            ImportCounter::RowsEmitted => &mut self.rows_emitted,
            ImportCounter::UpsertsDone => &mut self.upserts_done,
        }
    }
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bump_touches_only_the_named_counter() {
        let mut counters = ImportCounters::default();
        counters.bump(ImportCounter::ParserErrors);

        assert_eq!(counters.parser_errors, 1);
        assert_eq!(
            counters.entries().map(|(_, value)| value).sum::<u64>(),
            1
        );
    }

    #[test]
    fn unit_reports_merge_fieldwise() {
        let mut total = ImportCounters {
            upserts_done: 3,
            rows_emitted: 5,
            ..ImportCounters::default()
        };
        total += ImportCounters {
            upserts_done: 2,
            parser_errors: 1,
            ..ImportCounters::default()
        };

        assert_eq!(total.upserts_done, 5);
        assert_eq!(total.parser_errors, 1);
        assert_eq!(total.rows_emitted, 5);
    }

    #[test]
    fn counters_saturate() {
        let mut counters = ImportCounters {
            record_errors: u64::MAX,
            ..ImportCounters::default()
        };
        counters.bump(ImportCounter::RecordErrors);

        assert_eq!(counters.record_errors, u64::MAX);
    }

    #[test]
    fn labels_match_host_counter_names() {
        let labels = ImportCounters::default()
            .entries()
            .map(|(label, _)| label)
            .collect::<Vec<_>>();

        assert_eq!(
            labels,
            [
                "Parser errors",
                "Empty records",
                "Upserts Done",
                "Errors on records",
                "Rows emitted",
                "Dropped mutations"
            ]
        );
    }
}
