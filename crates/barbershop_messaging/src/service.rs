// --- File: crates/barbershop_messaging/src/service.rs ---

use crate::error::MessagingError;
use crate::links::{appointment_window, google_calendar_link, whatsapp_link, CalendarTemplate};
use crate::phone::normalize_phone;
use crate::templates::{render_message, MessageKind};
use barbershop_booking::service::shop_timezone;
use barbershop_booking::slots::{parse_date, parse_time};
use barbershop_booking::BookingService;
use barbershop_common::models::Appointment;
use barbershop_db::BarberRepository;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

#[derive(Serialize, Deserialize, Debug, Clone)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct WhatsappLink {
    pub url: String,
    pub message: String,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct CalendarLink {
    pub url: String,
}

#[derive(Clone)]
pub struct MessagingService {
    booking: BookingService,
}

impl MessagingService {
    pub fn new(booking: BookingService) -> Self {
        Self { booking }
    }

    pub fn booking(&self) -> &BookingService {
        &self.booking
    }

    async fn barber_name(&self, appointment: &Appointment) -> Option<String> {
        match self
            .booking
            .repos()
            .barbers
            .find_barber(&appointment.barber_id)
            .await
        {
            Ok(barber) => barber.map(|b| b.name),
            Err(e) => {
                warn!("Could not load barber {}: {}", appointment.barber_id, e);
                None
            }
        }
    }

    /// A WhatsApp link that opens a chat with the client, pre-filled with `kind`.
    pub async fn appointment_whatsapp(
        &self,
        appointment_id: &str,
        kind: MessageKind,
    ) -> Result<WhatsappLink, MessagingError> {
        let config = self.booking.config();
        let appointment = self.booking.get_appointment(appointment_id).await?;
        let phone = normalize_phone(
            &appointment.client_phone,
            &config.shop.default_country_code,
        )?;
        let barber = self.barber_name(&appointment).await;
        let message = render_message(kind, &appointment, barber.as_deref(), &config.shop);
        debug!("WhatsApp {} link for appointment {}", kind, appointment.id);

        Ok(WhatsappLink {
            url: whatsapp_link(&config.messaging.whatsapp_base_url, &phone, &message),
            message,
        })
    }

    /// A Google Calendar "add event" link for the appointment, in UTC.
    pub async fn appointment_calendar_link(
        &self,
        appointment_id: &str,
    ) -> Result<CalendarLink, MessagingError> {
        let config = self.booking.config();
        let appointment = self.booking.get_appointment(appointment_id).await?;
        let date = parse_date(&appointment.appointment_date).ok_or_else(|| {
            MessagingError::InvalidTime(format!("bad date '{}'", appointment.appointment_date))
        })?;
        let time = parse_time(&appointment.appointment_time).ok_or_else(|| {
            MessagingError::InvalidTime(format!("bad time '{}'", appointment.appointment_time))
        })?;
        let (start, end) = appointment_window(
            date,
            time,
            appointment.duration_minutes,
            shop_timezone(&config.shop),
        )?;

        let barber = self.barber_name(&appointment).await;
        let mut details = format!("{} for {}", appointment.service_name, appointment.client_name);
        if let Some(name) = &barber {
            details.push_str(&format!(" with {}", name));
        }
        if let Some(notes) = appointment.notes.as_deref().filter(|n| !n.is_empty()) {
            details.push_str(&format!("\n{}", notes));
        }

        let template = CalendarTemplate {
            title: format!("{} at {}", appointment.service_name, config.shop.name),
            start,
            end,
            details,
            location: config.shop.address.clone(),
        };
        Ok(CalendarLink {
            url: google_calendar_link(&config.messaging.calendar_base_url, &template),
        })
    }

    /// Free-form message from the admin panel to any number.
    pub fn direct_whatsapp(
        &self,
        phone: &str,
        message: &str,
    ) -> Result<WhatsappLink, MessagingError> {
        let config = self.booking.config();
        let message = message.trim();
        if message.is_empty() {
            return Err(MessagingError::Validation("message is required".to_string()));
        }
        let phone = normalize_phone(phone, &config.shop.default_country_code)?;
        Ok(WhatsappLink {
            url: whatsapp_link(&config.messaging.whatsapp_base_url, &phone, message),
            message: message.to_string(),
        })
    }
}
