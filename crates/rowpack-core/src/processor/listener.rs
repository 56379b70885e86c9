use crate::{
    obs::{ImportCounter, ImportCounters},
    plan::{PlannerError, UpsertListener},
};
use std::fmt;

///
/// UnitUpsertListener
///
/// Listener handed to the planner for one record. Counts successes and
/// record errors on the unit's counters; in strict mode a record error is
/// handed back to the planner as fatal.
///

pub(crate) struct UnitUpsertListener<'a> {
    counters: &'a mut ImportCounters,
    ignore_record_errors: bool,
}

impl<'a> UnitUpsertListener<'a> {
    pub(crate) const fn new(counters: &'a mut ImportCounters, ignore_record_errors: bool) -> Self {
        Self {
            counters,
            ignore_record_errors,
        }
    }
}

impl<R> UpsertListener<R> for UnitUpsertListener<'_>
where
    R: fmt::Debug,
{
    // One bump per planned record, whatever the planner's own upsert count.
    fn upsert_done(&mut self, _upsert_count: u64) {
        self.counters.bump(ImportCounter::UpsertsDone);
    }

    fn error_on_record(&mut self, record: &R, error: PlannerError) -> Result<(), PlannerError> {
        tracing::error!(?record, error = %error, "error on record");
        self.counters.bump(ImportCounter::RecordErrors);

        if self.ignore_record_errors {
            Ok(())
        } else {
            Err(error)
        }
    }
}
