// --- File: crates/barbershop_booking/src/slots.rs ---

//! Availability computation for a single barber and day.
//!
//! Everything here is pure: callers load working hours and existing bookings, pass
//! in "now" in shop-local time, and get back the candidate slots with their
//! availability. Times are compared as seconds from midnight so a slot can never
//! wrap past the end of the day.

use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use serde::{Deserialize, Serialize};
use tracing::debug;

#[cfg(feature = "openapi")]
use utoipa::ToSchema;

/// Longest service the shop schedules. A slot has to fit inside one day.
pub const MAX_DURATION_MINUTES: i64 = 24 * 60;

/// A stored duration in minutes, clamped to `0..=MAX_DURATION_MINUTES`.
pub fn bounded_duration(minutes: i64) -> Duration {
    Duration::minutes(minutes.clamp(0, MAX_DURATION_MINUTES))
}

/// A barber's schedule for one weekday.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkingHours {
    /// 0 = Monday .. 6 = Sunday
    pub weekday: u8,
    pub start: NaiveTime,
    pub end: NaiveTime,
    pub break_start: Option<NaiveTime>,
    pub break_end: Option<NaiveTime>,
}

impl WorkingHours {
    /// The break as (start, length), if both ends are set and ordered.
    fn break_window(&self) -> Option<(NaiveTime, Duration)> {
        match (self.break_start, self.break_end) {
            (Some(start), Some(end)) if start < end => Some((start, end - start)),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotRules {
    /// Step between candidate start times.
    pub interval: Duration,
    /// Minimum distance from "now" for slots on the current day.
    pub lead_time: Duration,
}

/// An existing booking that blocks part of the day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BookedSlot {
    pub start: NaiveTime,
    pub duration: Duration,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct Slot {
    /// Local start time, "HH:MM"
    #[cfg_attr(feature = "openapi", schema(example = "10:30"))]
    pub time: String,
    pub available: bool,
}

impl Slot {
    fn new(time: NaiveTime, available: bool) -> Self {
        Self {
            time: format_time(time),
            available,
        }
    }
}

/// Parse "HH:MM" (or "HH:MM:SS") into a time.
pub fn parse_time(value: &str) -> Option<NaiveTime> {
    let value = value.trim();
    NaiveTime::parse_from_str(value, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(value, "%H:%M:%S"))
        .ok()
}

/// Parse a slot time as offered to clients. Only "HH:MM" is accepted.
pub fn parse_slot_time(value: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(value.trim(), "%H:%M").ok()
}

pub fn format_time(time: NaiveTime) -> String {
    time.format("%H:%M").to_string()
}

/// Parse "YYYY-MM-DD".
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").ok()
}

/// 0 = Monday .. 6 = Sunday, matching the `working_hours.weekday` column.
pub fn weekday_index(date: NaiveDate) -> u8 {
    use chrono::Datelike;
    date.weekday().num_days_from_monday() as u8
}

fn secs(time: NaiveTime) -> i64 {
    time.num_seconds_from_midnight() as i64
}

/// Half-open interval overlap: `[a, a+a_dur)` against `[b, b+b_dur)`.
///
/// Back-to-back intervals do not overlap.
pub fn overlaps(a_start: NaiveTime, a_dur: Duration, b_start: NaiveTime, b_dur: Duration) -> bool {
    let (a0, b0) = (secs(a_start), secs(b_start));
    let (a1, b1) = (a0 + a_dur.num_seconds(), b0 + b_dur.num_seconds());
    a0 < b1 && b0 < a1
}

/// Candidate start times inside working hours that fit `duration` and avoid the break.
pub fn generate_candidate_slots(
    hours: &WorkingHours,
    interval: Duration,
    duration: Duration,
) -> Vec<NaiveTime> {
    let step = interval.num_seconds();
    let length = duration.num_seconds();
    if step <= 0 || length <= 0 || hours.start >= hours.end {
        return Vec::new();
    }

    let end = secs(hours.end);
    let break_window = hours.break_window();
    let mut candidates = Vec::new();

    let mut t = secs(hours.start);
    while t + length <= end {
        if let Some(time) = NaiveTime::from_num_seconds_from_midnight_opt(t as u32, 0) {
            let in_break = break_window
                .map(|(b_start, b_len)| overlaps(time, duration, b_start, b_len))
                .unwrap_or(false);
            if !in_break {
                candidates.push(time);
            }
        }
        t += step;
    }
    candidates
}

/// Merge overlapping or touching bookings into disjoint (start, end) second ranges.
fn merge_booked(booked: &[BookedSlot]) -> Vec<(i64, i64)> {
    let mut ranges: Vec<(i64, i64)> = booked
        .iter()
        .filter(|b| b.duration > Duration::zero())
        .map(|b| (secs(b.start), secs(b.start) + b.duration.num_seconds()))
        .collect();
    ranges.sort_unstable();

    let mut merged: Vec<(i64, i64)> = Vec::with_capacity(ranges.len());
    for (start, end) in ranges {
        match merged.last_mut() {
            Some(last) if start <= last.1 => last.1 = last.1.max(end),
            _ => merged.push((start, end)),
        }
    }
    merged
}

/// Mark each candidate available or taken. Order is preserved and taken slots are kept.
///
/// A candidate is taken when it overlaps a booking or starts before `not_before`.
pub fn filter_available(
    candidates: &[NaiveTime],
    booked: &[BookedSlot],
    duration: Duration,
    not_before: Option<NaiveTime>,
) -> Vec<Slot> {
    let busy = merge_booked(booked);
    let length = duration.num_seconds();

    candidates
        .iter()
        .map(|&time| {
            let start = secs(time);
            let end = start + length;
            let too_early = not_before.is_some_and(|cutoff| time < cutoff);
            let clashes = busy.iter().any(|&(b0, b1)| start < b1 && b0 < end);
            Slot::new(time, !too_early && !clashes)
        })
        .collect()
}

/// Full availability for one barber on `date`.
///
/// Past dates and days without working hours yield no slots. On the current day,
/// slots starting before `now_local + lead_time` are reported as taken.
pub fn compute_day_availability(
    date: NaiveDate,
    hours_for_weekday: Option<&WorkingHours>,
    booked: &[BookedSlot],
    duration: Duration,
    rules: &SlotRules,
    now_local: NaiveDateTime,
) -> Vec<Slot> {
    let today = now_local.date();
    if date < today {
        return Vec::new();
    }
    let Some(hours) = hours_for_weekday else {
        return Vec::new();
    };

    let candidates = generate_candidate_slots(hours, rules.interval, duration);
    debug!(
        "{} candidate slots on {} ({} booked)",
        candidates.len(),
        date,
        booked.len()
    );

    let not_before = if date == today {
        let cutoff = now_local + rules.lead_time;
        if cutoff.date() > date {
            // Lead time runs past midnight: nothing left today
            return candidates
                .into_iter()
                .map(|time| Slot::new(time, false))
                .collect();
        }
        Some(cutoff.time())
    } else {
        None
    };

    filter_available(&candidates, booked, duration, not_before)
}
