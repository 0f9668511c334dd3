#[cfg(test)]
mod tests {
    use crate::error::AdminError;
    use crate::validation::*;
    use barbershop_common::models::{ServiceInput, ServicePatch};
    use chrono::NaiveDate;

    fn day(weekday: u8, start: &str, end: &str) -> WorkingHoursInput {
        WorkingHoursInput {
            weekday,
            start_time: start.to_string(),
            end_time: end.to_string(),
            break_start: None,
            break_end: None,
        }
    }

    fn with_break(mut d: WorkingHoursInput, bs: &str, be: &str) -> WorkingHoursInput {
        d.break_start = Some(bs.to_string());
        d.break_end = Some(be.to_string());
        d
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_normalize_email() {
        assert_eq!(normalize_email("  Ana@Example.COM ").unwrap(), "ana@example.com");
        assert!(normalize_email("ana").is_err());
        assert!(normalize_email("@example.com").is_err());
        assert!(normalize_email("ana@").is_err());
    }

    #[test]
    fn test_working_hours_normalized_and_sorted() {
        let rows = validate_working_hours(
            "b1",
            &[
                day(4, "10:00", "16:00"),
                with_break(day(0, "9:00", "18:00:00"), "13:00", "14:00"),
            ],
        )
        .unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].weekday, 0);
        assert_eq!(rows[0].start_time, "09:00");
        assert_eq!(rows[0].end_time, "18:00");
        assert_eq!(rows[0].break_start.as_deref(), Some("13:00"));
        assert_eq!(rows[1].weekday, 4);
        assert!(rows[1].break_start.is_none());
        assert!(rows.iter().all(|r| r.barber_id == "b1"));
    }

    #[test]
    fn test_working_hours_rejections() {
        let cases = vec![
            vec![day(0, "18:00", "09:00")],
            vec![day(0, "09:00", "09:00")],
            vec![day(7, "09:00", "17:00")],
            vec![day(1, "09:00", "17:00"), day(1, "10:00", "12:00")],
            vec![day(2, "nine", "17:00")],
            vec![with_break(day(3, "09:00", "17:00"), "08:00", "10:00")],
            vec![with_break(day(3, "09:00", "17:00"), "16:00", "18:00")],
            vec![with_break(day(3, "09:00", "17:00"), "14:00", "13:00")],
            vec![WorkingHoursInput {
                break_start: Some("12:00".to_string()),
                ..day(5, "09:00", "17:00")
            }],
        ];
        for days in cases {
            assert!(
                matches!(
                    validate_working_hours("b1", &days),
                    Err(AdminError::Validation(_))
                ),
                "expected rejection for {:?}",
                days
            );
        }
    }

    #[test]
    fn test_empty_schedule_is_allowed() {
        assert!(validate_working_hours("b1", &[]).unwrap().is_empty());
    }

    #[test]
    fn test_service_validation() {
        let input = ServiceInput {
            name: "  Beard trim ".to_string(),
            description: None,
            price_cents: 900,
            duration_minutes: 20,
            active: true,
        };
        assert_eq!(validate_service_input(input.clone()).unwrap().name, "Beard trim");

        let free = ServiceInput {
            price_cents: 0,
            ..input.clone()
        };
        assert!(validate_service_input(free).is_ok());
        let negative = ServiceInput {
            price_cents: -1,
            ..input.clone()
        };
        assert!(validate_service_input(negative).is_err());
        let zero = ServiceInput {
            duration_minutes: 0,
            ..input.clone()
        };
        assert!(validate_service_input(zero).is_err());
        let endless = ServiceInput {
            duration_minutes: i64::MAX,
            ..input.clone()
        };
        assert!(matches!(
            validate_service_input(endless),
            Err(AdminError::Validation(_))
        ));
        let full_day = ServiceInput {
            duration_minutes: 24 * 60,
            ..input.clone()
        };
        assert!(validate_service_input(full_day).is_ok());

        let patch = ServicePatch {
            name: Some(" ".to_string()),
            ..Default::default()
        };
        assert!(validate_service_patch(patch).is_err());
        assert!(validate_service_patch(ServicePatch::default()).is_ok());
    }

    #[test]
    fn test_report_range_defaults_to_month() {
        let (from, to) = resolve_report_range(None, None, date(2030, 2, 14)).unwrap();
        assert_eq!(from, date(2030, 2, 1));
        assert_eq!(to, date(2030, 2, 28));

        let (from, to) = resolve_report_range(None, Some(""), date(2030, 12, 31)).unwrap();
        assert_eq!(from, date(2030, 12, 1));
        assert_eq!(to, date(2030, 12, 31));
    }

    #[test]
    fn test_report_range_explicit_and_invalid() {
        let today = date(2030, 5, 6);
        let (from, to) =
            resolve_report_range(Some("2030-01-01"), Some("2030-01-01"), today).unwrap();
        assert_eq!(from, to);

        assert!(resolve_report_range(Some("2030-02-01"), Some("2030-01-01"), today).is_err());
        assert!(resolve_report_range(Some("01/02/2030"), None, today).is_err());
        // an explicit from after the default month end is still a bad range
        assert!(resolve_report_range(Some("2030-06-01"), None, today).is_err());
    }
}
