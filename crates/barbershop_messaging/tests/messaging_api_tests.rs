use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use barbershop_booking::{BookingRequest, BookingService};
use barbershop_common::models::{BarberInput, ServiceInput, WorkingHours};
use barbershop_common::ChangeFeed;
use barbershop_config::AppConfig;
use barbershop_db::{
    init_all_schemas, BarberRepository, DbClient, Repositories, ServiceRepository,
};
use barbershop_messaging::MessagingService;
use chrono::{Duration, Utc};
use serde_json::Value;
use std::sync::Arc;
use tower::ServiceExt;

async fn setup() -> (Router, String, String) {
    let mut config = AppConfig::default();
    config.shop.name = "Navalha".to_string();
    config.shop.address = Some("Rua Augusta 1".to_string());
    config.shop.default_country_code = "351".to_string();
    config.admin.shared_secret = Some("s3cret".to_string());

    let client = DbClient::from_url("sqlite::memory:").await.unwrap();
    let repos = Repositories::new(client);
    init_all_schemas(&repos).await.unwrap();
    let service = repos
        .services
        .create_service(ServiceInput {
            name: "Haircut".to_string(),
            description: None,
            price_cents: 1500,
            duration_minutes: 45,
            active: true,
        })
        .await
        .unwrap();
    let barber = repos
        .barbers
        .create_barber(BarberInput {
            name: "Rui".to_string(),
            phone: None,
            specialties: vec![],
            active: true,
        })
        .await
        .unwrap();
    let week = (0..7)
        .map(|weekday| WorkingHours {
            barber_id: barber.id.clone(),
            weekday,
            start_time: "09:00".to_string(),
            end_time: "17:00".to_string(),
            break_start: None,
            break_end: None,
        })
        .collect();
    repos
        .barbers
        .replace_working_hours(&barber.id, week)
        .await
        .unwrap();

    let booking = BookingService::new(Arc::new(config), repos, ChangeFeed::new(8));
    let date = (Utc::now().date_naive() + Duration::days(2))
        .format("%Y-%m-%d")
        .to_string();
    let appointment = booking
        .create_booking(BookingRequest {
            service_id: service.id,
            barber_id: barber.id,
            date: date.clone(),
            time: "10:00".to_string(),
            client_name: "Ana".to_string(),
            client_phone: "0912 345 678".to_string(),
            client_email: None,
            notes: None,
        })
        .await
        .unwrap();

    let router = barbershop_messaging::routes(MessagingService::new(booking));
    (router, appointment.id, date)
}

async fn get(router: &Router, uri: &str, secret: Option<&str>) -> (StatusCode, Value) {
    let mut builder = Request::builder().uri(uri);
    if let Some(s) = secret {
        builder = builder.header("X-Admin-Secret", s);
    }
    let response = router
        .clone()
        .oneshot(builder.body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
}

#[tokio::test]
async fn test_whatsapp_link_for_appointment() {
    let (router, id, _) = setup().await;

    let (status, body) = get(&router, &format!("/appointments/{}/whatsapp", id), None).await;
    assert_eq!(status, StatusCode::OK);
    let url = body["url"].as_str().unwrap();
    assert!(url.starts_with("https://wa.me/351912345678?text=Hi%20Ana%2C"));
    let message = body["message"].as_str().unwrap();
    assert!(message.contains("Haircut with Rui"));
    assert!(message.ends_with("Navalha\nRua Augusta 1"));

    let (status, body) = get(
        &router,
        &format!("/appointments/{}/whatsapp?kind=reminder", id),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["message"].as_str().unwrap().contains("reminder"));

    let (status, _) = get(
        &router,
        &format!("/appointments/{}/whatsapp?kind=telegram", id),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = get(&router, "/appointments/unknown/whatsapp", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_calendar_link_uses_utc_window() {
    let (router, id, date) = setup().await;
    let (status, body) = get(&router, &format!("/appointments/{}/calendar-link", id), None).await;
    assert_eq!(status, StatusCode::OK);

    // shop time zone defaults to UTC, so 10:00 local is 10:00Z and lasts 45 minutes
    let compact = date.replace('-', "");
    let url = body["url"].as_str().unwrap();
    assert!(url.starts_with("https://calendar.google.com/calendar/render?action=TEMPLATE"));
    assert!(url.contains(&format!(
        "&dates={}T100000Z/{}T104500Z",
        compact, compact
    )));
    assert!(url.contains("&text=Haircut%20at%20Navalha"));
    assert!(url.contains("&location=Rua%20Augusta%201"));
}

#[tokio::test]
async fn test_direct_whatsapp_requires_admin() {
    let (router, _, _) = setup().await;
    let uri = "/admin/whatsapp?phone=%2B351912345678&message=Bom%20dia";

    let (status, _) = get(&router, uri, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, body) = get(&router, uri, Some("s3cret")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["url"], "https://wa.me/351912345678?text=Bom%20dia");

    let (status, _) = get(
        &router,
        "/admin/whatsapp?phone=123&message=hello",
        Some("s3cret"),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}
