#[cfg(test)]
mod tests {
    use crate::slots::*;
    use chrono::{Duration, NaiveDate, NaiveTime};
    use proptest::prelude::*;

    fn t(minutes: i64) -> NaiveTime {
        NaiveTime::from_hms_opt((minutes / 60) as u32, (minutes % 60) as u32, 0).unwrap()
    }

    // Build non-overlapping bookings from (gap, length) pairs, starting at `from`.
    fn bookings(from: i64, layout: &[(i64, i64)], limit: i64) -> Vec<BookedSlot> {
        let mut cursor = from;
        let mut out = Vec::new();
        for &(gap, length) in layout {
            let start = cursor + gap;
            if start + length > limit {
                break;
            }
            out.push(BookedSlot {
                start: t(start),
                duration: Duration::minutes(length),
            });
            cursor = start + length;
        }
        out
    }

    proptest! {
        #[test]
        fn test_slots_inside_hours_and_increasing(
            start in 0..720i64,
            span in 30..600i64,
            interval in 5..90i64,
            duration in 5..180i64,
        ) {
            let end = (start + span).min(23 * 60 + 59);
            let hours = WorkingHours {
                weekday: 2,
                start: t(start),
                end: t(end),
                break_start: None,
                break_end: None,
            };
            let candidates = generate_candidate_slots(
                &hours,
                Duration::minutes(interval),
                Duration::minutes(duration),
            );

            for pair in candidates.windows(2) {
                prop_assert!(pair[0] < pair[1]);
            }
            for slot in &candidates {
                prop_assert!(*slot >= hours.start);
                prop_assert!(*slot + Duration::minutes(duration) <= hours.end);
            }
        }

        #[test]
        fn test_available_slots_avoid_bookings_and_break(
            start in 360..600i64,
            span in 240..600i64,
            break_offset in 60..180i64,
            break_len in 15..90i64,
            interval in 10..60i64,
            duration in 15..90i64,
            layout in proptest::collection::vec((0..120i64, 15..90i64), 0..6),
        ) {
            let end = (start + span).min(23 * 60);
            let b_start = start + break_offset;
            let b_end = (b_start + break_len).min(end);
            let hours = WorkingHours {
                weekday: 2,
                start: t(start),
                end: t(end),
                break_start: Some(t(b_start)),
                break_end: Some(t(b_end)),
            };
            let booked = bookings(start, &layout, end);
            let rules = SlotRules {
                interval: Duration::minutes(interval),
                lead_time: Duration::minutes(60),
            };
            let date = NaiveDate::from_ymd_opt(2030, 5, 8).unwrap();
            let now = NaiveDate::from_ymd_opt(2030, 5, 1).unwrap().and_hms_opt(12, 0, 0).unwrap();
            let length = Duration::minutes(duration);

            let slots = compute_day_availability(date, Some(&hours), &booked, length, &rules, now);

            let parsed: Vec<NaiveTime> = slots.iter().map(|s| parse_time(&s.time).unwrap()).collect();
            for pair in parsed.windows(2) {
                prop_assert!(pair[0] < pair[1]);
            }

            for (slot, time) in slots.iter().zip(&parsed) {
                prop_assert!(*time >= hours.start);
                prop_assert!(*time + length <= hours.end);
                if b_start < b_end {
                    prop_assert!(!overlaps(*time, length, t(b_start), Duration::minutes(b_end - b_start)));
                }
                if slot.available {
                    for b in &booked {
                        prop_assert!(!overlaps(*time, length, b.start, b.duration));
                    }
                }
            }
        }
    }
}
