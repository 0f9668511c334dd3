// --- File: crates/barbershop_admin/src/validation.rs ---

//! Input checks for admin writes. Each function returns the normalized value it accepted.

use crate::error::AdminError;
use barbershop_booking::slots::{format_time, parse_date, parse_time, MAX_DURATION_MINUTES};
use barbershop_common::models::{
    BarberInput, BarberPatch, ServiceInput, ServicePatch, WorkingHours,
};
use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};

#[cfg(feature = "openapi")]
use utoipa::ToSchema;

/// One day of a barber's weekly schedule as submitted by the admin panel.
#[derive(Deserialize, Serialize, Debug, Clone)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct WorkingHoursInput {
    /// 0 = Monday .. 6 = Sunday
    pub weekday: u8,
    #[cfg_attr(feature = "openapi", schema(example = "09:00"))]
    pub start_time: String,
    #[cfg_attr(feature = "openapi", schema(example = "18:00"))]
    pub end_time: String,
    pub break_start: Option<String>,
    pub break_end: Option<String>,
}

fn invalid(msg: impl Into<String>) -> AdminError {
    AdminError::Validation(msg.into())
}

pub fn normalize_email(raw: &str) -> Result<String, AdminError> {
    let email = raw.trim().to_lowercase();
    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() && !domain.is_empty() => Ok(email),
        _ => Err(invalid("a valid email is required")),
    }
}

fn check_price(price_cents: i64) -> Result<(), AdminError> {
    if price_cents < 0 {
        return Err(invalid("price_cents must not be negative"));
    }
    Ok(())
}

fn check_duration(duration_minutes: i64) -> Result<(), AdminError> {
    if duration_minutes <= 0 {
        return Err(invalid("duration_minutes must be positive"));
    }
    if duration_minutes > MAX_DURATION_MINUTES {
        return Err(AdminError::Validation(format!(
            "duration_minutes must be at most {}",
            MAX_DURATION_MINUTES
        )));
    }
    Ok(())
}

fn required_name(name: &str) -> Result<String, AdminError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(invalid("name is required"));
    }
    Ok(name.to_string())
}

pub fn validate_service_input(mut input: ServiceInput) -> Result<ServiceInput, AdminError> {
    input.name = required_name(&input.name)?;
    check_price(input.price_cents)?;
    check_duration(input.duration_minutes)?;
    Ok(input)
}

pub fn validate_service_patch(mut patch: ServicePatch) -> Result<ServicePatch, AdminError> {
    if let Some(name) = &patch.name {
        patch.name = Some(required_name(name)?);
    }
    if let Some(price) = patch.price_cents {
        check_price(price)?;
    }
    if let Some(duration) = patch.duration_minutes {
        check_duration(duration)?;
    }
    Ok(patch)
}

pub fn validate_barber_input(mut input: BarberInput) -> Result<BarberInput, AdminError> {
    input.name = required_name(&input.name)?;
    Ok(input)
}

pub fn validate_barber_patch(mut patch: BarberPatch) -> Result<BarberPatch, AdminError> {
    if let Some(name) = &patch.name {
        patch.name = Some(required_name(name)?);
    }
    Ok(patch)
}

/// Check a full weekly schedule and convert it to stored rows with `HH:MM` times.
///
/// Each weekday may appear once. `start < end`, and a break needs both ends and must
/// lie inside the working window.
pub fn validate_working_hours(
    barber_id: &str,
    days: &[WorkingHoursInput],
) -> Result<Vec<WorkingHours>, AdminError> {
    let mut seen = [false; 7];
    let mut rows = Vec::with_capacity(days.len());

    for day in days {
        let idx = usize::from(day.weekday);
        if idx > 6 {
            return Err(invalid(format!("weekday {} is out of range 0..=6", day.weekday)));
        }
        if seen[idx] {
            return Err(invalid(format!("weekday {} appears more than once", day.weekday)));
        }
        seen[idx] = true;

        let time = |label: &str, value: &str| {
            parse_time(value).ok_or_else(|| {
                invalid(format!(
                    "{} '{}' on weekday {} must be HH:MM",
                    label, value, day.weekday
                ))
            })
        };
        let start = time("start_time", &day.start_time)?;
        let end = time("end_time", &day.end_time)?;
        if start >= end {
            return Err(invalid(format!(
                "start_time must be before end_time on weekday {}",
                day.weekday
            )));
        }

        let brk = match (day.break_start.as_deref(), day.break_end.as_deref()) {
            (None, None) => None,
            (Some(bs), Some(be)) => {
                let bs = time("break_start", bs)?;
                let be = time("break_end", be)?;
                if bs >= be || bs < start || be > end {
                    return Err(invalid(format!(
                        "break must lie within working hours on weekday {}",
                        day.weekday
                    )));
                }
                Some((bs, be))
            }
            _ => {
                return Err(invalid(format!(
                    "break_start and break_end must be given together on weekday {}",
                    day.weekday
                )))
            }
        };

        rows.push(WorkingHours {
            barber_id: barber_id.to_string(),
            weekday: day.weekday,
            start_time: format_time(start),
            end_time: format_time(end),
            break_start: brk.map(|(bs, _)| format_time(bs)),
            break_end: brk.map(|(_, be)| format_time(be)),
        });
    }

    rows.sort_by_key(|r| r.weekday);
    Ok(rows)
}

fn month_bounds(today: NaiveDate) -> (NaiveDate, NaiveDate) {
    let first = today.with_day(1).unwrap_or(today);
    let next_month = if first.month() == 12 {
        NaiveDate::from_ymd_opt(first.year() + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(first.year(), first.month() + 1, 1)
    };
    let last = next_month.map_or(today, |d| d - Duration::days(1));
    (first, last)
}

/// Resolve an inclusive report range. Missing bounds default to the month containing `today`.
pub fn resolve_report_range(
    from: Option<&str>,
    to: Option<&str>,
    today: NaiveDate,
) -> Result<(NaiveDate, NaiveDate), AdminError> {
    let (month_start, month_end) = month_bounds(today);
    let bound = |label: &str, value: Option<&str>, default: NaiveDate| match value
        .map(str::trim)
        .filter(|v| !v.is_empty())
    {
        Some(v) => parse_date(v).ok_or_else(|| invalid(format!("{} must be YYYY-MM-DD", label))),
        None => Ok(default),
    };

    let from = bound("from", from, month_start)?;
    let to = bound("to", to, month_end)?;
    if from > to {
        return Err(invalid("from must not be after to"));
    }
    Ok((from, to))
}
