use crate::mutation::PendingMutation;

///
/// PreUpsertTransform
///
/// Hook applied to each staged table batch before it is grouped.
/// `table` is the physical table the batch was staged against.
///

pub trait PreUpsertTransform {
    fn transform(&self, table: &str, mutations: Vec<PendingMutation>) -> Vec<PendingMutation>;
}

impl<F> PreUpsertTransform for F
where
    F: Fn(&str, Vec<PendingMutation>) -> Vec<PendingMutation>,
{
    fn transform(&self, table: &str, mutations: Vec<PendingMutation>) -> Vec<PendingMutation> {
        self(table, mutations)
    }
}

///
/// IdentityTransform
/// Default hook; passes every batch through unchanged.
///

#[derive(Clone, Copy, Debug, Default)]
pub struct IdentityTransform;

impl PreUpsertTransform for IdentityTransform {
    fn transform(&self, _table: &str, mutations: Vec<PendingMutation>) -> Vec<PendingMutation> {
        mutations
    }
}
