use time::{Date, OffsetDateTime};
use tracing::warn;

use crate::error::Error;
use crate::foodlog::dto::FoodLogRecord;
use crate::foodlog::totals::NutritionTotals;

/// Calendar-day key in local time, `YYYY-MM-DD`. Formatting a `Date`
/// never involves an offset, so the key cannot drift across timezones.
pub fn date_key(date: Date) -> String {
    format!(
        "{:04}-{:02}-{:02}",
        date.year(),
        u8::from(date.month()),
        date.day()
    )
}

/// Today as a local calendar day, falling back to UTC when the local
/// offset cannot be determined (multi-threaded Unix restriction).
pub fn local_today() -> Date {
    match OffsetDateTime::now_local() {
        Ok(now) => now.date(),
        Err(e) => {
            warn!(error = %e, "local offset unavailable, using UTC day");
            OffsetDateTime::now_utc().date()
        }
    }
}

/// Handle for one in-flight fetch. `apply` only accepts the ticket of
/// the newest selection; anything older is discarded as stale.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchTicket {
    date: Date,
    epoch: u64,
}

impl FetchTicket {
    pub fn date(&self) -> Date {
        self.date
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum DaySlot {
    /// No data fetched yet (or the last fetch failed). Distinct from
    /// an authoritative zero.
    Absent,
    Fetched { date: Date, totals: NutritionTotals },
}

/// Per-date totals as seen on the dashboard: the currently selected
/// day, at most one pending fetch, and the last applied result.
///
/// Records are fetched outside of this type; `select` and `apply`
/// bracket the network call so that interleavings are explicit and a
/// late response for a deselected date can never be applied.
#[derive(Debug)]
pub struct DayView {
    owner_id: String,
    selected: Date,
    epoch: u64,
    pending: bool,
    slot: DaySlot,
}

impl DayView {
    pub fn new(owner_id: String, today: Date) -> Self {
        Self {
            owner_id,
            selected: today,
            epoch: 0,
            pending: false,
            slot: DaySlot::Absent,
        }
    }

    pub fn selected(&self) -> Date {
        self.selected
    }

    /// Totals for the selected date, or `None` while absent.
    pub fn totals(&self) -> Option<NutritionTotals> {
        match self.slot {
            DaySlot::Fetched { totals, .. } => Some(totals),
            DaySlot::Absent => None,
        }
    }

    pub fn is_refreshing(&self, date: Date) -> bool {
        self.pending && self.selected == date
    }

    /// Switch the selection and start a fetch for it. The previous
    /// date's totals are dropped immediately so they can never be
    /// displayed as the new date's data.
    pub fn select(&mut self, date: Date) -> FetchTicket {
        self.selected = date;
        self.epoch += 1;
        self.pending = true;
        self.slot = DaySlot::Absent;
        FetchTicket {
            date,
            epoch: self.epoch,
        }
    }

    /// Apply a finished fetch. Returns `Ok(None)` when the ticket no
    /// longer matches the current selection (response discarded), the
    /// reduced totals when it does, and clears to absent on failure so
    /// no stale value survives a failed refresh.
    pub fn apply(
        &mut self,
        ticket: FetchTicket,
        outcome: Result<Vec<FoodLogRecord>, Error>,
    ) -> Result<Option<NutritionTotals>, Error> {
        if ticket.epoch != self.epoch {
            warn!(date = %date_key(ticket.date), "discarding stale food log response");
            return Ok(None);
        }
        self.pending = false;

        let records = match outcome {
            Ok(records) => records,
            Err(e) => {
                self.slot = DaySlot::Absent;
                return Err(e);
            }
        };

        // Scope to the owner even if the backend already did; a
        // non-scoping backend must not inflate another user's day.
        let totals = NutritionTotals::from_records(
            records
                .iter()
                .filter(|record| record.owner.id() == self.owner_id),
        );
        self.slot = DaySlot::Fetched {
            date: ticket.date,
            totals,
        };
        Ok(Some(totals))
    }

    /// Fold a freshly logged record into the fetched slot when it
    /// belongs to the same date, keeping both derivation paths equal.
    pub fn absorb(&mut self, date: Date, record: &FoodLogRecord) {
        if let DaySlot::Fetched {
            date: slot_date,
            totals,
        } = &mut self.slot
        {
            if *slot_date == date {
                totals.add(record);
            }
        }
    }
}
