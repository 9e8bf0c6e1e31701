//! Daily administration schedule.
//!
//! Placement happens in three passes:
//! 1. Each component is placed in every slot of its timing list
//! 2. Fat-soluble components leave morning/evening for breakfast/dinner
//! 3. Known synergy pairs are pulled into a shared slot

use crate::models::{Component, Schedule, TimeSlot};

/// Pairs that are worth taking together when timing allows.
pub const SCHEDULE_SYNERGY_PAIRS: &[(&str, &str)] = &[
    ("pentoxifylline", "l_arginine"),
    ("vitamin_e", "coq10"),
    ("l_arginine", "tadalafil"),
    ("curcumin", "omega3"),
];

/// Build a schedule for resolved components, in selection order.
pub fn build_schedule(components: &[&Component]) -> Schedule {
    let mut schedule = Schedule::new();

    for component in components {
        for slot in &component.timing {
            place(&mut schedule, *slot, &component.id);
        }
    }

    for component in components.iter().filter(|c| c.fat_soluble) {
        for generic in [TimeSlot::Morning, TimeSlot::Evening] {
            let Some(meal) = generic.paired_meal() else {
                continue;
            };
            // Also drops the generic slot when the meal slot is already held
            if occupies(&schedule, generic, &component.id) && component.allows_slot(meal) {
                relocate(&mut schedule, &component.id, generic, meal);
            }
        }
    }

    for (a, b) in SCHEDULE_SYNERGY_PAIRS {
        let (Some(first), Some(second)) = (find(components, a), find(components, b)) else {
            continue;
        };
        let (Some(slot_a), Some(slot_b)) = (
            first_slot(&schedule, &first.id),
            first_slot(&schedule, &second.id),
        ) else {
            continue;
        };
        if shares_slot(&schedule, &first.id, &second.id) {
            continue;
        }

        let count_a = slot_len(&schedule, slot_a);
        let count_b = slot_len(&schedule, slot_b);

        // Smaller slot joins the larger; on a tie the first member's slot wins
        let (mover, from, to) = if count_a < count_b {
            (first, slot_a, slot_b)
        } else {
            (second, slot_b, slot_a)
        };
        if mover.allows_slot(to) {
            tracing::debug!(component = %mover.id, ?from, ?to, "Co-scheduling synergy pair");
            relocate(&mut schedule, &mover.id, from, to);
        }
    }

    schedule.retain(|_, ids| !ids.is_empty());
    schedule
}

fn find<'c>(components: &[&'c Component], id: &str) -> Option<&'c Component> {
    components.iter().copied().find(|c| c.id == id)
}

fn place(schedule: &mut Schedule, slot: TimeSlot, id: &str) {
    let ids = schedule.entry(slot).or_default();
    if !ids.iter().any(|existing| existing == id) {
        ids.push(id.to_string());
    }
}

fn relocate(schedule: &mut Schedule, id: &str, from: TimeSlot, to: TimeSlot) {
    if let Some(ids) = schedule.get_mut(&from) {
        ids.retain(|existing| existing != id);
    }
    place(schedule, to, id);
}

fn occupies(schedule: &Schedule, slot: TimeSlot, id: &str) -> bool {
    schedule
        .get(&slot)
        .is_some_and(|ids| ids.iter().any(|existing| existing == id))
}

fn first_slot(schedule: &Schedule, id: &str) -> Option<TimeSlot> {
    schedule
        .iter()
        .find(|(_, ids)| ids.iter().any(|existing| existing == id))
        .map(|(slot, _)| *slot)
}

fn shares_slot(schedule: &Schedule, a: &str, b: &str) -> bool {
    schedule.values().any(|ids| {
        ids.iter().any(|existing| existing == a) && ids.iter().any(|existing| existing == b)
    })
}

fn slot_len(schedule: &Schedule, slot: TimeSlot) -> usize {
    schedule.get(&slot).map_or(0, Vec::len)
}
