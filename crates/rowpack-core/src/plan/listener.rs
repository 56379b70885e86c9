use crate::plan::PlannerError;

///
/// UpsertListener
///
/// Receives per-record planning outcomes from a mutation planner.
/// `error_on_record` returning `Err` makes the failure fatal for the unit;
/// returning `Ok` lets the planner continue with the next record.
///

pub trait UpsertListener<R> {
    fn upsert_done(&mut self, upsert_count: u64);

    fn error_on_record(&mut self, record: &R, error: PlannerError) -> Result<(), PlannerError>;
}
