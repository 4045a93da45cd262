use chrono::NaiveDate;
use tracing::debug;

use crate::models::{FlatSlot, RawSlot, ScheduleDay, Session, SlotLegend, SlotStatus};

/// Turns the per-day session schedule into the flat slot list shown for one date.
///
/// Every function here is pure: the same schedule and date always give the same
/// output in the same order, so callers can re-flatten on every date switch.
pub struct ScheduleFlattener;

impl ScheduleFlattener {
    /// Slots of `date` across all sessions, in session order then slot order.
    /// Unknown dates give an empty list.
    pub fn flatten(days: &[ScheduleDay], date: NaiveDate) -> Vec<FlatSlot> {
        let Some(day) = days.iter().find(|day| day.date == date) else {
            debug!("No schedule day for {}", date);
            return Vec::new();
        };

        day.sessions
            .iter()
            .flat_map(|session| session.slots.iter().map(move |slot| Self::flat_slot(session, slot)))
            .collect()
    }

    /// Explicit slot status wins; otherwise slots of a break session are breaks and
    /// everything else is available.
    pub fn resolve_status(session: &Session, slot: &RawSlot) -> SlotStatus {
        match &slot.status {
            Some(status) => status.clone(),
            None if session.is_break() => SlotStatus::Break,
            None => SlotStatus::Available,
        }
    }

    /// Dates of the fetched window in the order the API returned them.
    pub fn selectable_dates(days: &[ScheduleDay]) -> Vec<NaiveDate> {
        days.iter().map(|day| day.date).collect()
    }

    /// First date in the window with at least one available slot.
    pub fn first_available_date(days: &[ScheduleDay]) -> Option<NaiveDate> {
        days.iter()
            .find(|day| {
                day.sessions.iter().any(|session| {
                    session
                        .slots
                        .iter()
                        .any(|slot| Self::resolve_status(session, slot).is_available())
                })
            })
            .map(|day| day.date)
    }

    /// Slot with the given id, otherwise with the given display label. Sessions can
    /// share a label, so an available slot wins over an unavailable one.
    pub fn find_slot<'a>(slots: &'a [FlatSlot], key: &str) -> Option<&'a FlatSlot> {
        if let Some(slot) = slots.iter().find(|slot| slot.id == key) {
            return Some(slot);
        }
        let mut labelled = slots.iter().filter(|slot| slot.display == key);
        let first = labelled.next()?;
        if first.avail {
            return Some(first);
        }
        labelled.find(|slot| slot.avail).or(Some(first))
    }

    pub fn legend(slots: &[FlatSlot]) -> SlotLegend {
        slots.iter().fold(SlotLegend::default(), |mut legend, slot| {
            match slot.status {
                SlotStatus::Available => legend.available += 1,
                SlotStatus::Booked => legend.booked += 1,
                SlotStatus::Break => legend.on_break += 1,
                SlotStatus::Emergency => legend.emergency += 1,
                SlotStatus::Other(_) => legend.other += 1,
            }
            legend
        })
    }

    fn flat_slot(session: &Session, slot: &RawSlot) -> FlatSlot {
        let status = Self::resolve_status(session, slot);
        FlatSlot {
            id: slot.id.clone(),
            display: slot.time.clone(),
            avail: status.is_available(),
            status,
            session_type: session.session_type.clone(),
            session_name: session.name.clone(),
        }
    }
}
