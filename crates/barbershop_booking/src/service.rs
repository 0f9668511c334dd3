// --- File: crates/barbershop_booking/src/service.rs ---

//! Booking flow: catalogue reads, availability, booking creation and status changes.

use crate::error::BookingError;
use crate::slots::{
    bounded_duration, compute_day_availability, format_time, parse_date, parse_slot_time,
    parse_time, weekday_index, BookedSlot, Slot, SlotRules, WorkingHours,
};
use crate::status::{validate_transition, AppointmentStatus};
use barbershop_common::events::{TABLE_APPOINTMENTS, TABLE_NOTIFICATIONS};
use barbershop_common::models::{
    self, Appointment, Barber, NewNotification, NotificationKind, Service,
};
use barbershop_common::{ChangeAction, ChangeEvent, ChangeFeed};
use barbershop_config::{AppConfig, ShopConfig};
use barbershop_db::{
    AppointmentRepository, BarberRepository, DbError, NotificationRepository, Repositories,
    ServiceRepository, StatusUpdate,
};
use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info, warn};

#[cfg(feature = "openapi")]
use utoipa::ToSchema;

/// Minimum number of digits in a client phone number.
pub const MIN_PHONE_DIGITS: usize = 7;

#[derive(Deserialize, Serialize, Debug, Clone)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct BookingRequest {
    pub service_id: String,
    pub barber_id: String,
    /// Local date, YYYY-MM-DD
    #[cfg_attr(feature = "openapi", schema(format = "date", example = "2030-05-06"))]
    pub date: String,
    /// Local start time, HH:MM
    #[cfg_attr(feature = "openapi", schema(example = "10:30"))]
    pub time: String,
    pub client_name: String,
    pub client_phone: String,
    pub client_email: Option<String>,
    pub notes: Option<String>,
}

/// A booking request after trimming and parsing.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedBooking {
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub client_name: String,
    pub client_phone: String,
    pub client_email: Option<String>,
    pub notes: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct AvailabilityResponse {
    pub date: String,
    pub barber_id: String,
    pub service_id: Option<String>,
    pub duration_minutes: i64,
    pub slots: Vec<Slot>,
}

fn non_empty(value: Option<&String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Check a booking request against `today` (shop-local) and the booking window.
pub fn validate_booking_request(
    request: &BookingRequest,
    today: NaiveDate,
    max_days_ahead: i64,
) -> Result<ValidatedBooking, BookingError> {
    let client_name = request.client_name.trim();
    if client_name.is_empty() {
        return Err(BookingError::Validation("client_name is required".to_string()));
    }
    let client_phone = request.client_phone.trim();
    if client_phone.is_empty() {
        return Err(BookingError::Validation("client_phone is required".to_string()));
    }
    let digits = client_phone.chars().filter(|c| c.is_ascii_digit()).count();
    if digits < MIN_PHONE_DIGITS {
        return Err(BookingError::Validation(format!(
            "client_phone must contain at least {} digits",
            MIN_PHONE_DIGITS
        )));
    }

    let client_email = non_empty(request.client_email.as_ref());
    if let Some(email) = &client_email {
        if !email.contains('@') {
            return Err(BookingError::Validation("client_email is not valid".to_string()));
        }
    }

    let date = parse_date(&request.date)
        .ok_or_else(|| BookingError::Validation("date must be YYYY-MM-DD".to_string()))?;
    let time = parse_slot_time(&request.time)
        .ok_or_else(|| BookingError::Validation("time must be HH:MM".to_string()))?;

    if date < today {
        return Err(BookingError::Validation("date is in the past".to_string()));
    }
    if date > today + Duration::days(max_days_ahead) {
        return Err(BookingError::Validation(format!(
            "bookings are accepted at most {} days ahead",
            max_days_ahead
        )));
    }

    Ok(ValidatedBooking {
        date,
        time,
        client_name: client_name.to_string(),
        client_phone: client_phone.to_string(),
        client_email,
        notes: non_empty(request.notes.as_ref()),
    })
}

/// The shop's configured time zone. Unknown names fall back to UTC.
pub fn shop_timezone(shop: &ShopConfig) -> Tz {
    shop.time_zone.parse::<Tz>().unwrap_or_else(|_| {
        warn!("Unknown shop time zone '{}', using UTC", shop.time_zone);
        Tz::UTC
    })
}

/// Convert a stored schedule row. Rows with unparsable times count as a day off.
pub fn schedule_from_row(row: &models::WorkingHours) -> Option<WorkingHours> {
    let parsed = (|| {
        Some(WorkingHours {
            weekday: row.weekday,
            start: parse_time(&row.start_time)?,
            end: parse_time(&row.end_time)?,
            break_start: match &row.break_start {
                Some(v) => Some(parse_time(v)?),
                None => None,
            },
            break_end: match &row.break_end {
                Some(v) => Some(parse_time(v)?),
                None => None,
            },
        })
    })();
    if parsed.is_none() {
        warn!(
            "Ignoring unparsable working hours for barber {} weekday {}",
            row.barber_id, row.weekday
        );
    }
    parsed
}

#[derive(Clone)]
pub struct BookingService {
    config: Arc<AppConfig>,
    repos: Repositories,
    feed: ChangeFeed,
}

impl BookingService {
    pub fn new(config: Arc<AppConfig>, repos: Repositories, feed: ChangeFeed) -> Self {
        Self {
            config,
            repos,
            feed,
        }
    }

    pub fn config(&self) -> &Arc<AppConfig> {
        &self.config
    }

    pub fn repos(&self) -> &Repositories {
        &self.repos
    }

    pub fn feed(&self) -> &ChangeFeed {
        &self.feed
    }

    /// Current wall-clock time in the shop's time zone.
    pub fn now_local(&self) -> NaiveDateTime {
        Utc::now()
            .with_timezone(&shop_timezone(&self.config.shop))
            .naive_local()
    }

    fn rules(&self) -> SlotRules {
        SlotRules {
            interval: Duration::try_minutes(self.config.booking.slot_interval_minutes)
                .unwrap_or_else(Duration::zero),
            lead_time: Duration::try_minutes(self.config.booking.lead_time_minutes.max(0))
                .unwrap_or_else(Duration::zero),
        }
    }

    pub async fn list_services(&self) -> Result<Vec<Service>, BookingError> {
        Ok(self.repos.services.list_services(true).await?)
    }

    pub async fn list_barbers(&self) -> Result<Vec<Barber>, BookingError> {
        Ok(self.repos.barbers.list_barbers(true).await?)
    }

    async fn active_service(&self, id: &str) -> Result<Service, BookingError> {
        let service = self
            .repos
            .services
            .find_service(id)
            .await?
            .ok_or_else(|| BookingError::NotFound(format!("service {} not found", id)))?;
        if !service.active {
            return Err(BookingError::Validation(format!(
                "service {} is not offered",
                service.name
            )));
        }
        Ok(service)
    }

    async fn active_barber(&self, id: &str) -> Result<Barber, BookingError> {
        let barber = self
            .repos
            .barbers
            .find_barber(id)
            .await?
            .ok_or_else(|| BookingError::NotFound(format!("barber {} not found", id)))?;
        if !barber.active {
            return Err(BookingError::Validation(format!(
                "barber {} is not taking bookings",
                barber.name
            )));
        }
        Ok(barber)
    }

    async fn day_slots(
        &self,
        barber_id: &str,
        date: NaiveDate,
        duration: Duration,
        now_local: NaiveDateTime,
    ) -> Result<Vec<Slot>, BookingError> {
        let max_date = now_local.date() + Duration::days(self.config.booking.max_days_ahead);
        if date > max_date {
            return Ok(Vec::new());
        }

        let hours = self
            .repos
            .barbers
            .working_hours_for_weekday(barber_id, weekday_index(date))
            .await?
            .as_ref()
            .and_then(schedule_from_row);

        let date_str = date.format("%Y-%m-%d").to_string();
        let booked: Vec<BookedSlot> = self
            .repos
            .appointments
            .booked_times(barber_id, &date_str)
            .await?
            .into_iter()
            .filter_map(|b| {
                Some(BookedSlot {
                    start: parse_time(&b.appointment_time)?,
                    duration: bounded_duration(b.duration_minutes),
                })
            })
            .collect();

        Ok(compute_day_availability(
            date,
            hours.as_ref(),
            &booked,
            duration,
            &self.rules(),
            now_local,
        ))
    }

    /// Slots for a barber on a date. Without a service the configured default duration applies.
    pub async fn get_availability(
        &self,
        barber_id: &str,
        date: &str,
        service_id: Option<&str>,
    ) -> Result<AvailabilityResponse, BookingError> {
        let parsed = parse_date(date)
            .ok_or_else(|| BookingError::Validation("date must be YYYY-MM-DD".to_string()))?;
        self.active_barber(barber_id).await?;

        let duration_minutes = match service_id.filter(|s| !s.is_empty()) {
            Some(id) => self.active_service(id).await?.duration_minutes,
            None => self.config.booking.default_duration_minutes,
        };

        let slots = self
            .day_slots(
                barber_id,
                parsed,
                bounded_duration(duration_minutes),
                self.now_local(),
            )
            .await?;
        debug!(
            "Availability for barber {} on {}: {} slots",
            barber_id,
            date,
            slots.len()
        );

        Ok(AvailabilityResponse {
            date: parsed.format("%Y-%m-%d").to_string(),
            barber_id: barber_id.to_string(),
            service_id: service_id.map(str::to_string),
            duration_minutes,
            slots,
        })
    }

    /// Validate, re-check availability and insert a pending appointment.
    pub async fn create_booking(
        &self,
        request: BookingRequest,
    ) -> Result<Appointment, BookingError> {
        let now_local = self.now_local();
        let booking = validate_booking_request(
            &request,
            now_local.date(),
            self.config.booking.max_days_ahead,
        )?;

        let service = self.active_service(&request.service_id).await?;
        let barber = self.active_barber(&request.barber_id).await?;

        let requested = format_time(booking.time);
        let slots = self
            .day_slots(
                &barber.id,
                booking.date,
                bounded_duration(service.duration_minutes),
                now_local,
            )
            .await?;
        match slots.iter().find(|s| s.time == requested) {
            Some(slot) if slot.available => {}
            Some(_) => {
                return Err(BookingError::Conflict(format!(
                    "{} on {} is no longer available",
                    requested, booking.date
                )))
            }
            None => {
                return Err(BookingError::Conflict(format!(
                    "{} on {} is not a bookable slot for {}",
                    requested, booking.date, barber.name
                )))
            }
        }

        let now = Utc::now().to_rfc3339();
        let appointment = Appointment {
            id: uuid::Uuid::new_v4().to_string(),
            client_name: booking.client_name,
            client_phone: booking.client_phone,
            client_email: booking.client_email,
            service_id: service.id.clone(),
            service_name: service.name.clone(),
            barber_id: barber.id.clone(),
            appointment_date: booking.date.format("%Y-%m-%d").to_string(),
            appointment_time: requested,
            duration_minutes: service.duration_minutes,
            price_cents: service.price_cents,
            status: AppointmentStatus::Pending,
            notes: booking.notes,
            created_at: now.clone(),
            updated_at: now,
        };

        let appointment = match self.repos.appointments.insert_appointment(appointment).await {
            Ok(a) => a,
            Err(DbError::UniqueViolation(_)) => {
                return Err(BookingError::Conflict(
                    "that slot was just booked by someone else".to_string(),
                ))
            }
            Err(e) => return Err(e.into()),
        };

        info!(
            "Booked {} with {} on {} at {} ({})",
            appointment.service_name,
            barber.name,
            appointment.appointment_date,
            appointment.appointment_time,
            appointment.id
        );

        self.feed.publish(ChangeEvent::new(
            TABLE_APPOINTMENTS,
            ChangeAction::Insert,
            appointment.id.clone(),
            &appointment,
        ));
        self.notify(NewNotification {
            kind: NotificationKind::NewAppointment,
            title: "New appointment".to_string(),
            message: format!(
                "{} booked {} with {} on {} at {}",
                appointment.client_name,
                appointment.service_name,
                barber.name,
                appointment.appointment_date,
                appointment.appointment_time
            ),
            email: appointment.client_email.clone(),
            appointment_id: Some(appointment.id.clone()),
        })
        .await;

        Ok(appointment)
    }

    pub async fn get_appointment(&self, id: &str) -> Result<Appointment, BookingError> {
        self.repos
            .appointments
            .find_appointment(id)
            .await?
            .ok_or_else(|| BookingError::NotFound(format!("appointment {} not found", id)))
    }

    /// Apply a lifecycle transition with an optimistic guard on the current status.
    pub async fn change_status(
        &self,
        id: &str,
        to: AppointmentStatus,
        changed_by: &str,
        note: Option<String>,
    ) -> Result<Appointment, BookingError> {
        let current = self.get_appointment(id).await?;
        validate_transition(current.status, to)?;

        let updated = match self
            .repos
            .appointments
            .update_status(id, current.status, to, changed_by, note)
            .await?
        {
            StatusUpdate::Applied(a) => a,
            StatusUpdate::NotFound => {
                return Err(BookingError::NotFound(format!("appointment {} not found", id)))
            }
            StatusUpdate::Stale(now) => {
                return Err(BookingError::Conflict(format!(
                    "appointment was modified concurrently and is now {}",
                    now.status
                )))
            }
        };

        self.feed.publish(ChangeEvent::new(
            TABLE_APPOINTMENTS,
            ChangeAction::Update,
            updated.id.clone(),
            &updated,
        ));
        self.notify(NewNotification {
            kind: NotificationKind::StatusChanged,
            title: format!("Appointment {}", updated.status),
            message: format!(
                "{} on {} at {}: {} -> {} ({})",
                updated.client_name,
                updated.appointment_date,
                updated.appointment_time,
                current.status,
                updated.status,
                changed_by
            ),
            email: None,
            appointment_id: Some(updated.id.clone()),
        })
        .await;

        Ok(updated)
    }

    /// Client-initiated cancellation. Follows the same lifecycle rules as admin changes.
    pub async fn cancel_by_client(&self, id: &str) -> Result<Appointment, BookingError> {
        self.change_status(id, AppointmentStatus::Cancelled, "client", None)
            .await
    }

    /// Record an admin notification. The triggering write is already committed, so a
    /// failure here is logged rather than returned.
    async fn notify(&self, notification: NewNotification) {
        match self
            .repos
            .notifications
            .create_notification(notification)
            .await
        {
            Ok(created) => {
                self.feed.publish(ChangeEvent::new(
                    TABLE_NOTIFICATIONS,
                    ChangeAction::Insert,
                    created.id.clone(),
                    &created,
                ));
            }
            Err(e) => warn!("Failed to record notification: {}", e),
        }
    }
}
