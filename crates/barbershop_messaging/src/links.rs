// --- File: crates/barbershop_messaging/src/links.rs ---

//! Deep links that open WhatsApp or a pre-filled Google Calendar event.
//! Nothing is sent from the server; the client follows the URL.

use crate::error::MessagingError;
use barbershop_booking::slots::bounded_duration;
use chrono::{DateTime, NaiveDate, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;

pub const DEFAULT_WHATSAPP_BASE_URL: &str = "https://wa.me";
pub const DEFAULT_CALENDAR_BASE_URL: &str = "https://calendar.google.com/calendar/render";

/// Google Calendar's compact UTC timestamp, e.g. `20300506T093000Z`.
const CALENDAR_TIME_FORMAT: &str = "%Y%m%dT%H%M%SZ";

#[derive(Debug, Clone, PartialEq)]
pub struct CalendarTemplate {
    pub title: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub details: String,
    pub location: Option<String>,
}

fn trim_base(base_url: &str) -> &str {
    base_url.trim().trim_end_matches('/')
}

/// `<base>/<digits>?text=<percent-encoded text>`. `phone` must already be normalized.
pub fn whatsapp_link(base_url: &str, phone: &str, text: &str) -> String {
    let mut url = format!("{}/{}", trim_base(base_url), phone);
    if !text.is_empty() {
        url.push_str("?text=");
        url.push_str(&urlencoding::encode(text));
    }
    url
}

pub fn google_calendar_link(base_url: &str, template: &CalendarTemplate) -> String {
    let mut url = format!(
        "{}?action=TEMPLATE&text={}&dates={}/{}&details={}",
        trim_base(base_url),
        urlencoding::encode(&template.title),
        template.start.format(CALENDAR_TIME_FORMAT),
        template.end.format(CALENDAR_TIME_FORMAT),
        urlencoding::encode(&template.details),
    );
    if let Some(location) = template.location.as_deref().filter(|l| !l.is_empty()) {
        url.push_str("&location=");
        url.push_str(&urlencoding::encode(location));
    }
    url
}

/// Convert a shop-local appointment slot into a UTC window.
///
/// In a DST gap the local time does not exist and this fails; in an overlap the
/// earlier instant is used.
pub fn appointment_window(
    date: NaiveDate,
    time: NaiveTime,
    duration_minutes: i64,
    tz: Tz,
) -> Result<(DateTime<Utc>, DateTime<Utc>), MessagingError> {
    let local = date.and_time(time);
    let start = tz
        .from_local_datetime(&local)
        .earliest()
        .ok_or_else(|| {
            MessagingError::InvalidTime(format!("{} does not exist in {}", local, tz.name()))
        })?
        .with_timezone(&Utc);
    Ok((start, start + bounded_duration(duration_minutes)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn utc(y: i32, mo: u32, d: u32, h: u32, mi: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, mo, d, h, mi, 0).unwrap()
    }

    #[test]
    fn test_whatsapp_link_encodes_text() {
        assert_eq!(
            whatsapp_link("https://wa.me/", "351912345678", "Olá! 10:00 & até já"),
            "https://wa.me/351912345678?text=Ol%C3%A1%21%2010%3A00%20%26%20at%C3%A9%20j%C3%A1"
        );
        assert_eq!(whatsapp_link("https://wa.me", "351912345678", ""), "https://wa.me/351912345678");
    }

    #[test]
    fn test_google_calendar_link() {
        let template = CalendarTemplate {
            title: "Haircut at Barbershop".to_string(),
            start: utc(2030, 5, 6, 9, 30),
            end: utc(2030, 5, 6, 10, 0),
            details: "With Rui".to_string(),
            location: Some("Rua Augusta 1, Lisboa".to_string()),
        };
        assert_eq!(
            google_calendar_link(DEFAULT_CALENDAR_BASE_URL, &template),
            "https://calendar.google.com/calendar/render?action=TEMPLATE\
             &text=Haircut%20at%20Barbershop\
             &dates=20300506T093000Z/20300506T100000Z\
             &details=With%20Rui\
             &location=Rua%20Augusta%201%2C%20Lisboa"
        );

        let no_location = CalendarTemplate {
            location: None,
            ..template
        };
        assert!(!google_calendar_link(DEFAULT_CALENDAR_BASE_URL, &no_location).contains("location"));
    }

    #[test]
    fn test_appointment_window_converts_to_utc() {
        let date = NaiveDate::from_ymd_opt(2030, 7, 1).unwrap();
        let time = NaiveTime::from_hms_opt(10, 0, 0).unwrap();
        let (start, end) = appointment_window(date, time, 45, chrono_tz::Europe::Lisbon).unwrap();
        // Lisbon is UTC+1 in summer
        assert_eq!(start, utc(2030, 7, 1, 9, 0));
        assert_eq!(end, utc(2030, 7, 1, 9, 45));
    }

    #[test]
    fn test_appointment_window_in_dst_gap() {
        let date = NaiveDate::from_ymd_opt(2030, 3, 31).unwrap();
        let time = NaiveTime::from_hms_opt(1, 30, 0).unwrap();
        assert!(appointment_window(date, time, 30, chrono_tz::Europe::Lisbon).is_err());
    }
}
