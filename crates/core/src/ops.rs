//! Pure operations over a single day bucket.
//!
//! Every function borrows the current bucket and returns the next one; none of
//! them touch storage or read the clock. Task creation takes `now` explicitly.

use chrono::{DateTime, Utc};

use crate::model::Task;

/// Prepend a new open task. Blank text (after trimming) leaves the bucket unchanged.
pub fn add(bucket: &[Task], text: &str, now: DateTime<Utc>) -> Vec<Task> {
    let text = text.trim();
    if text.is_empty() {
        return bucket.to_vec();
    }
    let mut next = Vec::with_capacity(bucket.len() + 1);
    next.push(Task::new(text, now));
    next.extend_from_slice(bucket);
    next
}

pub fn toggle(bucket: &[Task], id: &str) -> Vec<Task> {
    bucket
        .iter()
        .map(|task| {
            if task.id == id {
                Task {
                    done: !task.done,
                    ..task.clone()
                }
            } else {
                task.clone()
            }
        })
        .collect()
}

/// Replace the text of the matching task. Blank text keeps the previous text.
pub fn edit(bucket: &[Task], id: &str, new_text: &str) -> Vec<Task> {
    let new_text = new_text.trim();
    if new_text.is_empty() {
        return bucket.to_vec();
    }
    bucket
        .iter()
        .map(|task| {
            if task.id == id {
                Task {
                    text: new_text.to_string(),
                    ..task.clone()
                }
            } else {
                task.clone()
            }
        })
        .collect()
}

pub fn remove(bucket: &[Task], id: &str) -> Vec<Task> {
    bucket.iter().filter(|task| task.id != id).cloned().collect()
}

pub fn clear_completed(bucket: &[Task]) -> Vec<Task> {
    bucket.iter().filter(|task| !task.done).cloned().collect()
}

pub fn clear_all(_bucket: &[Task]) -> Vec<Task> {
    Vec::new()
}

/// Move the task at `from` to position `to`, shifting the tasks in between.
///
/// Indices outside the bucket leave it unchanged.
pub fn reorder(bucket: &[Task], from: usize, to: usize) -> Vec<Task> {
    let mut next = bucket.to_vec();
    if from == to {
        return next;
    }
    if from >= next.len() || to >= next.len() {
        tracing::debug!(from, to, len = next.len(), "ignoring out-of-range reorder");
        return next;
    }
    let task = next.remove(from);
    next.insert(to, task);
    next
}

/// Copy the open tasks of `source` to the front of `dest` as brand-new tasks.
pub fn import_unfinished(source: &[Task], dest: &[Task], now: DateTime<Utc>) -> Vec<Task> {
    let copies: Vec<Task> = source
        .iter()
        .filter(|task| !task.done)
        .map(|task| Task::new(task.text.clone(), now))
        .collect();
    if copies.is_empty() {
        return dest.to_vec();
    }
    let mut next = copies;
    next.extend_from_slice(dest);
    next
}
