// --- File: crates/barbershop_messaging/src/templates.rs ---

//! Shop-branded message texts for an appointment.

use barbershop_booking::slots::parse_date;
use barbershop_common::models::{Appointment, AppointmentStatus, UnknownVariant};
use barbershop_config::ShopConfig;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "snake_case")]
pub enum MessageKind {
    #[default]
    Confirmation,
    Reminder,
    Cancellation,
    StatusUpdate,
}

impl MessageKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MessageKind::Confirmation => "confirmation",
            MessageKind::Reminder => "reminder",
            MessageKind::Cancellation => "cancellation",
            MessageKind::StatusUpdate => "status_update",
        }
    }
}

impl fmt::Display for MessageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MessageKind {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "confirmation" => Ok(MessageKind::Confirmation),
            "reminder" => Ok(MessageKind::Reminder),
            "cancellation" => Ok(MessageKind::Cancellation),
            "status_update" => Ok(MessageKind::StatusUpdate),
            _ => Err(UnknownVariant {
                kind: "message kind",
                value: s.to_string(),
            }),
        }
    }
}

/// "Tuesday, 06 May 2030", falling back to the stored string.
fn display_date(date: &str) -> String {
    parse_date(date)
        .map(|d| d.format("%A, %d %B %Y").to_string())
        .unwrap_or_else(|| date.to_string())
}

fn status_phrase(status: AppointmentStatus) -> &'static str {
    match status {
        AppointmentStatus::Pending => "is waiting for confirmation",
        AppointmentStatus::Confirmed => "is confirmed",
        AppointmentStatus::Completed => "is complete. Thank you for visiting",
        AppointmentStatus::Cancelled => "has been cancelled",
    }
}

fn signature(shop: &ShopConfig) -> String {
    let mut lines = vec![shop.name.clone()];
    if let Some(address) = shop.address.as_deref().filter(|a| !a.is_empty()) {
        lines.push(address.to_string());
    }
    if let Some(phone) = shop.phone.as_deref().filter(|p| !p.is_empty()) {
        lines.push(phone.to_string());
    }
    lines.join("\n")
}

/// Render `kind` for `appointment`. `barber_name` is omitted from the text when unknown.
pub fn render_message(
    kind: MessageKind,
    appointment: &Appointment,
    barber_name: Option<&str>,
    shop: &ShopConfig,
) -> String {
    let when = format!(
        "{} at {}",
        display_date(&appointment.appointment_date),
        appointment.appointment_time
    );
    let with = barber_name
        .map(|b| format!(" with {}", b))
        .unwrap_or_default();
    let greeting = format!("Hi {},", appointment.client_name);

    let body = match kind {
        MessageKind::Confirmation => format!(
            "your {}{} on {} is booked.",
            appointment.service_name, with, when
        ),
        MessageKind::Reminder => format!(
            "a reminder of your {}{} on {}. See you soon!",
            appointment.service_name, with, when
        ),
        MessageKind::Cancellation => format!(
            "your {}{} on {} has been cancelled. Reply to book a new time.",
            appointment.service_name, with, when
        ),
        MessageKind::StatusUpdate => format!(
            "your {}{} on {} {}.",
            appointment.service_name,
            with,
            when,
            status_phrase(appointment.status)
        ),
    };

    format!("{} {}\n\n{}", greeting, body, signature(shop))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn appointment(status: AppointmentStatus) -> Appointment {
        Appointment {
            id: "a1".to_string(),
            client_name: "Ana".to_string(),
            client_phone: "912345678".to_string(),
            client_email: None,
            service_id: "s1".to_string(),
            service_name: "Haircut".to_string(),
            barber_id: "b1".to_string(),
            appointment_date: "2030-05-07".to_string(),
            appointment_time: "10:30".to_string(),
            duration_minutes: 30,
            price_cents: 1500,
            status,
            notes: None,
            created_at: String::new(),
            updated_at: String::new(),
        }
    }

    fn shop() -> ShopConfig {
        ShopConfig {
            name: "Navalha".to_string(),
            address: Some("Rua Augusta 1".to_string()),
            ..ShopConfig::default()
        }
    }

    #[test]
    fn test_confirmation_text() {
        let text = render_message(
            MessageKind::Confirmation,
            &appointment(AppointmentStatus::Pending),
            Some("Rui"),
            &shop(),
        );
        assert_eq!(
            text,
            "Hi Ana, your Haircut with Rui on Tuesday, 07 May 2030 at 10:30 is booked.\n\nNavalha\nRua Augusta 1"
        );
    }

    #[test]
    fn test_status_update_follows_status() {
        let cancelled = render_message(
            MessageKind::StatusUpdate,
            &appointment(AppointmentStatus::Cancelled),
            None,
            &shop(),
        );
        assert!(cancelled.contains("Haircut on Tuesday"));
        assert!(cancelled.contains("has been cancelled"));

        let confirmed = render_message(
            MessageKind::StatusUpdate,
            &appointment(AppointmentStatus::Confirmed),
            None,
            &shop(),
        );
        assert!(confirmed.contains("is confirmed"));
    }

    #[test]
    fn test_every_kind_is_branded() {
        for kind in [
            MessageKind::Confirmation,
            MessageKind::Reminder,
            MessageKind::Cancellation,
            MessageKind::StatusUpdate,
        ] {
            let text = render_message(kind, &appointment(AppointmentStatus::Pending), None, &shop());
            assert!(text.starts_with("Hi Ana,"), "{}", kind);
            assert!(text.ends_with("Navalha\nRua Augusta 1"), "{}", kind);
        }
    }

    #[test]
    fn test_kind_parsing() {
        assert_eq!("status_update".parse::<MessageKind>().unwrap(), MessageKind::StatusUpdate);
        assert!("sms".parse::<MessageKind>().is_err());
    }
}
