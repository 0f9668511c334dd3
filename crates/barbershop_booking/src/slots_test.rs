#[cfg(test)]
mod tests {
    use crate::slots::*;
    use chrono::{Duration, NaiveDate, NaiveTime};

    fn t(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    fn hours(start: NaiveTime, end: NaiveTime) -> WorkingHours {
        WorkingHours {
            weekday: 0,
            start,
            end,
            break_start: None,
            break_end: None,
        }
    }

    fn times(slots: &[Slot]) -> Vec<&str> {
        slots.iter().map(|s| s.time.as_str()).collect()
    }

    fn rules() -> SlotRules {
        SlotRules {
            interval: Duration::minutes(30),
            lead_time: Duration::minutes(60),
        }
    }

    #[test]
    fn test_candidates_fill_window() {
        let candidates =
            generate_candidate_slots(&hours(t(9, 0), t(11, 0)), Duration::minutes(30), Duration::minutes(30));
        assert_eq!(candidates, vec![t(9, 0), t(9, 30), t(10, 0), t(10, 30)]);
    }

    #[test]
    fn test_last_candidate_must_finish_by_closing() {
        let candidates =
            generate_candidate_slots(&hours(t(9, 0), t(11, 0)), Duration::minutes(30), Duration::minutes(45));
        assert_eq!(candidates, vec![t(9, 0), t(9, 30), t(10, 0)]);
    }

    #[test]
    fn test_candidates_skip_break() {
        let mut h = hours(t(9, 0), t(13, 0));
        h.break_start = Some(t(11, 0));
        h.break_end = Some(t(12, 0));
        let candidates = generate_candidate_slots(&h, Duration::minutes(30), Duration::minutes(30));
        assert_eq!(
            candidates,
            vec![t(9, 0), t(9, 30), t(10, 0), t(10, 30), t(12, 0), t(12, 30)]
        );

        // A 60 minute service starting at 10:30 would run into the break
        let long = generate_candidate_slots(&h, Duration::minutes(30), Duration::minutes(60));
        assert_eq!(long, vec![t(9, 0), t(9, 30), t(10, 0), t(12, 0)]);
    }

    #[test]
    fn test_degenerate_inputs_yield_nothing() {
        let h = hours(t(9, 0), t(17, 0));
        assert!(generate_candidate_slots(&h, Duration::zero(), Duration::minutes(30)).is_empty());
        assert!(generate_candidate_slots(&h, Duration::minutes(30), Duration::zero()).is_empty());
        assert!(generate_candidate_slots(&h, Duration::minutes(-5), Duration::minutes(30)).is_empty());
        assert!(
            generate_candidate_slots(&hours(t(17, 0), t(9, 0)), Duration::minutes(30), Duration::minutes(30))
                .is_empty()
        );
        assert!(
            generate_candidate_slots(&hours(t(9, 0), t(9, 0)), Duration::minutes(30), Duration::minutes(30))
                .is_empty()
        );
    }

    #[test]
    fn test_overlaps_is_half_open() {
        let thirty = Duration::minutes(30);
        assert!(!overlaps(t(9, 0), thirty, t(9, 30), thirty));
        assert!(!overlaps(t(9, 30), thirty, t(9, 0), thirty));
        assert!(overlaps(t(9, 0), Duration::minutes(31), t(9, 30), thirty));
        assert!(overlaps(t(9, 0), Duration::minutes(120), t(9, 30), thirty));
    }

    #[test]
    fn test_filter_keeps_taken_slots_in_order() {
        let candidates = vec![t(9, 0), t(9, 30), t(10, 0), t(10, 30)];
        let booked = vec![BookedSlot {
            start: t(9, 30),
            duration: Duration::minutes(45),
        }];
        let slots = filter_available(&candidates, &booked, Duration::minutes(30), None);

        assert_eq!(times(&slots), vec!["09:00", "09:30", "10:00", "10:30"]);
        let available: Vec<bool> = slots.iter().map(|s| s.available).collect();
        assert_eq!(available, vec![true, false, false, true]);
    }

    #[test]
    fn test_filter_respects_not_before() {
        let candidates = vec![t(9, 0), t(9, 30), t(10, 0)];
        let slots = filter_available(&candidates, &[], Duration::minutes(30), Some(t(9, 30)));
        let available: Vec<bool> = slots.iter().map(|s| s.available).collect();
        assert_eq!(available, vec![false, true, true]);
    }

    #[test]
    fn test_past_date_and_day_off_are_empty() {
        let now = NaiveDate::from_ymd_opt(2030, 5, 8).unwrap().and_hms_opt(8, 0, 0).unwrap();
        let h = hours(t(9, 0), t(17, 0));
        let yesterday = NaiveDate::from_ymd_opt(2030, 5, 7).unwrap();
        let tomorrow = NaiveDate::from_ymd_opt(2030, 5, 9).unwrap();

        assert!(compute_day_availability(yesterday, Some(&h), &[], Duration::minutes(30), &rules(), now).is_empty());
        assert!(compute_day_availability(tomorrow, None, &[], Duration::minutes(30), &rules(), now).is_empty());
        assert_eq!(
            compute_day_availability(tomorrow, Some(&h), &[], Duration::minutes(30), &rules(), now).len(),
            16
        );
    }

    #[test]
    fn test_today_applies_lead_time() {
        let date = NaiveDate::from_ymd_opt(2030, 5, 8).unwrap();
        let now = date.and_hms_opt(10, 10, 0).unwrap();
        let h = hours(t(9, 0), t(13, 0));

        let slots = compute_day_availability(date, Some(&h), &[], Duration::minutes(30), &rules(), now);
        let open: Vec<&str> = slots
            .iter()
            .filter(|s| s.available)
            .map(|s| s.time.as_str())
            .collect();
        // now + 60 min = 11:10, so 11:30 is the first bookable start
        assert_eq!(open, vec!["11:30", "12:00", "12:30"]);
        assert_eq!(slots.len(), 8);
    }

    #[test]
    fn test_lead_time_past_midnight_closes_today() {
        let date = NaiveDate::from_ymd_opt(2030, 5, 8).unwrap();
        let now = date.and_hms_opt(23, 30, 0).unwrap();
        let h = hours(t(9, 0), t(23, 0));
        let slots = compute_day_availability(date, Some(&h), &[], Duration::minutes(30), &rules(), now);
        assert!(!slots.is_empty());
        assert!(slots.iter().all(|s| !s.available));
    }

    #[test]
    fn test_time_helpers() {
        assert_eq!(parse_time("09:05"), Some(t(9, 5)));
        assert_eq!(parse_time("09:05:00"), Some(t(9, 5)));
        assert_eq!(parse_time("9h05"), None);
        assert_eq!(parse_slot_time("09:05"), Some(t(9, 5)));
        assert_eq!(parse_slot_time(" 09:05 "), Some(t(9, 5)));
        assert_eq!(parse_slot_time("09:05:45"), None);
        assert_eq!(format_time(t(9, 5)), "09:05");
        assert_eq!(parse_date("2030-02-30"), None);
        // 2030-05-06 is a Monday
        assert_eq!(weekday_index(NaiveDate::from_ymd_opt(2030, 5, 6).unwrap()), 0);
        assert_eq!(weekday_index(NaiveDate::from_ymd_opt(2030, 5, 12).unwrap()), 6);
    }

    #[test]
    fn test_bounded_duration_never_exceeds_a_day() {
        assert_eq!(bounded_duration(45), Duration::minutes(45));
        assert_eq!(bounded_duration(i64::MAX), Duration::minutes(MAX_DURATION_MINUTES));
        assert_eq!(bounded_duration(-30), Duration::zero());
    }
}
