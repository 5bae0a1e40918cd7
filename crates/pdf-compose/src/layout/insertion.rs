//! Insertion planning
//!
//! New pages are requested by their 1-based position in the *final*
//! document, but are applied one at a time with an insert-at-index primitive
//! that shifts every later page right. Planning the whole batch up front
//! keeps the result independent of submission order:
//!
//! 1. Desired positions are clamped into `[1, existing + new]`.
//! 2. Final slots are assigned in (target, submission) order, so equal
//!    targets end up adjacent in the order they were submitted and
//!    colliding clamps spill towards the nearest free slot.
//! 3. Insertions are applied from the highest final slot down. Inserting at
//!    an index never moves pages below it, so each apply index is simply the
//!    number of original pages that precede the new page.

/// One step of an insertion plan
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedInsertion<T> {
    pub payload: T,
    /// 1-based page number in the final document
    pub final_position: usize,
    /// 0-based index in the page array at the moment this step is applied
    pub apply_index: usize,
}

impl<T> PlannedInsertion<T> {
    /// Replace the payload, keeping the plan coordinates
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> PlannedInsertion<U> {
        PlannedInsertion {
            payload: f(self.payload),
            final_position: self.final_position,
            apply_index: self.apply_index,
        }
    }
}

/// Plan the insertion of new pages into a document of `existing_pages`.
///
/// `entries` pairs each payload with its desired 1-based position and is
/// taken in submission order. The returned steps are in application order.
pub fn plan_insertions<T>(entries: Vec<(usize, T)>, existing_pages: usize) -> Vec<PlannedInsertion<T>> {
    let new_pages = entries.len();
    if new_pages == 0 {
        return Vec::new();
    }
    let total = existing_pages + new_pages;

    // (0-based target, submission index, payload)
    let mut slots: Vec<(usize, usize, T)> = entries
        .into_iter()
        .enumerate()
        .map(|(submission, (desired, payload))| (desired.clamp(1, total) - 1, submission, payload))
        .collect();
    slots.sort_by_key(|&(target, submission, _)| (target, submission));

    // Forward pass pushes ties apart, backward pass pulls overflow back in.
    let mut finals: Vec<usize> = Vec::with_capacity(new_pages);
    for (i, &(target, _, _)) in slots.iter().enumerate() {
        let slot = if i == 0 {
            target
        } else {
            target.max(finals[i - 1] + 1)
        };
        finals.push(slot);
    }
    for i in (0..new_pages).rev() {
        let upper = if i + 1 == new_pages {
            total - 1
        } else {
            finals[i + 1] - 1
        };
        finals[i] = finals[i].min(upper);
    }

    let mut plan: Vec<PlannedInsertion<T>> = slots
        .into_iter()
        .zip(finals)
        .enumerate()
        .map(|(rank, ((_, _, payload), final_slot))| PlannedInsertion {
            payload,
            final_position: final_slot + 1,
            // New pages ranked below this one are not inserted yet
            apply_index: final_slot - rank,
        })
        .collect();
    plan.reverse();

    for (applied, step) in plan.iter_mut().enumerate() {
        step.apply_index = step.apply_index.min(existing_pages + applied);
    }

    plan
}

/// Apply a plan to a page array, in plan order.
pub fn apply_plan<T>(pages: &mut Vec<T>, plan: Vec<PlannedInsertion<T>>) {
    for step in plan {
        let index = step.apply_index.min(pages.len());
        pages.insert(index, step.payload);
    }
}
