use crate::model::{Filter, Task};

/// A task as rendered under the current filter, with its position in the bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VisibleTask<'a> {
    pub index: usize,
    pub task: &'a Task,
}

pub fn project(bucket: &[Task], filter: Filter) -> Vec<VisibleTask<'_>> {
    bucket
        .iter()
        .enumerate()
        .filter(|(_, task)| filter.matches(task))
        .map(|(index, task)| VisibleTask { index, task })
        .collect()
}

/// Translate a move between two visible rows into bucket indices.
///
/// Returns `None` when either row is not visible or both rows are the same.
pub fn visible_to_bucket_move(
    visible: &[VisibleTask<'_>],
    from: usize,
    to: usize,
) -> Option<(usize, usize)> {
    if from == to {
        return None;
    }
    let source = visible.get(from)?;
    let target = visible.get(to)?;
    Some((source.index, target.index))
}
