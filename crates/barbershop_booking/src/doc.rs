// File: crates/barbershop_booking/src/doc.rs

#![cfg(feature = "openapi")]
use utoipa::OpenApi;

use crate::handlers::AvailabilityQuery;
use crate::service::{AvailabilityResponse, BookingRequest};
use crate::slots::Slot;
use barbershop_common::models::{Appointment, AppointmentStatus, Barber, Service};

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::handlers::list_services_handler,
        crate::handlers::list_barbers_handler,
        crate::handlers::get_availability_handler,
        crate::handlers::create_appointment_handler,
        crate::handlers::get_appointment_handler,
        crate::handlers::cancel_appointment_handler
    ),
    components(
        schemas(
            AvailabilityQuery,
            AvailabilityResponse,
            BookingRequest,
            Slot,
            Appointment,
            AppointmentStatus,
            Barber,
            Service
        )
    ),
    tags(
        (name = "Booking", description = "Public catalogue, availability and booking API")
    ),
    servers(
        (url = "/api", description = "Barbershop API server")
    )
)]
pub struct BookingApiDoc;
