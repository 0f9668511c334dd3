#[cfg(test)]
mod tests {
    use crate::repositories::*;
    use crate::{init_all_schemas, DbClient, DbError, Repositories};
    use barbershop_common::models::{
        AccessStatus, Appointment, AppointmentFilter, AppointmentStatus, BarberInput, BarberPatch,
        NewNotification, NotificationKind, ServiceInput, ServicePatch, WorkingHours,
    };

    async fn setup() -> Repositories {
        let client = DbClient::from_url("sqlite::memory:").await.unwrap();
        let repos = Repositories::new(client);
        init_all_schemas(&repos).await.unwrap();
        repos
    }

    fn appointment(id: &str, barber_id: &str, date: &str, time: &str) -> Appointment {
        Appointment {
            id: id.to_string(),
            client_name: "Ana".to_string(),
            client_phone: "+351912345678".to_string(),
            client_email: None,
            service_id: "svc-1".to_string(),
            service_name: "Haircut".to_string(),
            barber_id: barber_id.to_string(),
            appointment_date: date.to_string(),
            appointment_time: time.to_string(),
            duration_minutes: 30,
            price_cents: 1500,
            status: AppointmentStatus::Pending,
            notes: None,
            created_at: "2030-01-01T10:00:00+00:00".to_string(),
            updated_at: "2030-01-01T10:00:00+00:00".to_string(),
        }
    }

    #[tokio::test]
    async fn test_init_all_schemas_is_idempotent() {
        let repos = setup().await;
        init_all_schemas(&repos).await.unwrap();
    }

    #[tokio::test]
    async fn test_service_crud_and_soft_delete() {
        let repos = setup().await;
        let created = repos
            .services
            .create_service(ServiceInput {
                name: "Beard trim".to_string(),
                description: Some("Hot towel".to_string()),
                price_cents: 1000,
                duration_minutes: 20,
                active: true,
            })
            .await
            .unwrap();

        let updated = repos
            .services
            .update_service(
                &created.id,
                ServicePatch {
                    price_cents: Some(1200),
                    ..Default::default()
                },
            )
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.price_cents, 1200);
        assert_eq!(updated.name, "Beard trim");

        repos
            .services
            .set_service_active(&created.id, false)
            .await
            .unwrap()
            .unwrap();
        assert!(repos.services.list_services(true).await.unwrap().is_empty());
        assert_eq!(repos.services.list_services(false).await.unwrap().len(), 1);

        assert!(repos
            .services
            .update_service("missing", ServicePatch::default())
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_barber_toggle_and_working_hours() {
        let repos = setup().await;
        let barber = repos
            .barbers
            .create_barber(BarberInput {
                name: "Rui".to_string(),
                phone: None,
                specialties: vec!["fade".to_string(), " beard ".to_string()],
                active: true,
            })
            .await
            .unwrap();

        let found = repos.barbers.find_barber(&barber.id).await.unwrap().unwrap();
        assert_eq!(found.specialties, vec!["fade", "beard"]);

        let toggled = repos
            .barbers
            .toggle_barber_active(&barber.id)
            .await
            .unwrap()
            .unwrap();
        assert!(!toggled.active);
        assert!(repos.barbers.list_barbers(true).await.unwrap().is_empty());

        let renamed = repos
            .barbers
            .update_barber(
                &barber.id,
                BarberPatch {
                    name: Some("Rui M.".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap()
            .unwrap();
        assert_eq!(renamed.name, "Rui M.");
        assert!(!renamed.active);

        let hours = vec![
            WorkingHours {
                barber_id: barber.id.clone(),
                weekday: 0,
                start_time: "09:00".to_string(),
                end_time: "17:00".to_string(),
                break_start: Some("12:00".to_string()),
                break_end: Some("13:00".to_string()),
            },
            WorkingHours {
                barber_id: barber.id.clone(),
                weekday: 5,
                start_time: "10:00".to_string(),
                end_time: "14:00".to_string(),
                break_start: None,
                break_end: None,
            },
        ];
        let stored = repos
            .barbers
            .replace_working_hours(&barber.id, hours)
            .await
            .unwrap();
        assert_eq!(stored.len(), 2);

        // Replacing drops days that are no longer listed
        let stored = repos
            .barbers
            .replace_working_hours(&barber.id, stored[1..].to_vec())
            .await
            .unwrap();
        assert_eq!(stored.len(), 1);
        assert!(repos
            .barbers
            .working_hours_for_weekday(&barber.id, 0)
            .await
            .unwrap()
            .is_none());
        let saturday = repos
            .barbers
            .working_hours_for_weekday(&barber.id, 5)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(saturday.start_time, "10:00");
    }

    #[tokio::test]
    async fn test_slot_uniqueness_ignores_cancelled() {
        let repos = setup().await;
        repos
            .appointments
            .insert_appointment(appointment("a1", "b1", "2030-05-06", "10:00"))
            .await
            .unwrap();

        let err = repos
            .appointments
            .insert_appointment(appointment("a2", "b1", "2030-05-06", "10:00"))
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::UniqueViolation(_)));

        // Another barber can take the same time
        repos
            .appointments
            .insert_appointment(appointment("a3", "b2", "2030-05-06", "10:00"))
            .await
            .unwrap();

        let outcome = repos
            .appointments
            .update_status(
                "a1",
                AppointmentStatus::Pending,
                AppointmentStatus::Cancelled,
                "client",
                None,
            )
            .await
            .unwrap();
        assert!(matches!(outcome, StatusUpdate::Applied(_)));

        repos
            .appointments
            .insert_appointment(appointment("a4", "b1", "2030-05-06", "10:00"))
            .await
            .unwrap();

        let booked = repos
            .appointments
            .booked_times("b1", "2030-05-06")
            .await
            .unwrap();
        assert_eq!(booked.len(), 1);
        assert_eq!(booked[0].appointment_time, "10:00");
    }

    #[tokio::test]
    async fn test_guarded_status_update_and_history() {
        let repos = setup().await;
        repos
            .appointments
            .insert_appointment(appointment("a1", "b1", "2030-05-06", "10:00"))
            .await
            .unwrap();

        let applied = repos
            .appointments
            .update_status(
                "a1",
                AppointmentStatus::Pending,
                AppointmentStatus::Confirmed,
                "admin",
                Some("called client".to_string()),
            )
            .await
            .unwrap();
        match applied {
            StatusUpdate::Applied(a) => assert_eq!(a.status, AppointmentStatus::Confirmed),
            other => panic!("unexpected outcome: {:?}", other),
        }

        // Second writer still expects pending
        let stale = repos
            .appointments
            .update_status(
                "a1",
                AppointmentStatus::Pending,
                AppointmentStatus::Cancelled,
                "admin",
                None,
            )
            .await
            .unwrap();
        match stale {
            StatusUpdate::Stale(current) => {
                assert_eq!(current.status, AppointmentStatus::Confirmed)
            }
            other => panic!("unexpected outcome: {:?}", other),
        }

        let missing = repos
            .appointments
            .update_status(
                "nope",
                AppointmentStatus::Pending,
                AppointmentStatus::Confirmed,
                "admin",
                None,
            )
            .await
            .unwrap();
        assert!(matches!(missing, StatusUpdate::NotFound));

        let history = repos.appointments.status_history("a1").await.unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].from_status, AppointmentStatus::Pending);
        assert_eq!(history[0].to_status, AppointmentStatus::Confirmed);
        assert_eq!(history[0].note.as_deref(), Some("called client"));
    }

    #[tokio::test]
    async fn test_list_filters_and_delete() {
        let repos = setup().await;
        for (id, barber, date, time) in [
            ("a1", "b1", "2030-05-07", "09:00"),
            ("a2", "b1", "2030-05-06", "11:00"),
            ("a3", "b2", "2030-05-06", "10:00"),
        ] {
            repos
                .appointments
                .insert_appointment(appointment(id, barber, date, time))
                .await
                .unwrap();
        }

        let all = repos
            .appointments
            .list_appointments(AppointmentFilter::default())
            .await
            .unwrap();
        let ids: Vec<_> = all.iter().map(|a| a.id.as_str()).collect();
        assert_eq!(ids, vec!["a3", "a2", "a1"]);

        let filtered = repos
            .appointments
            .list_appointments(AppointmentFilter {
                date: Some("2030-05-06".to_string()),
                status: Some(AppointmentStatus::Pending),
                barber_id: Some("b1".to_string()),
            })
            .await
            .unwrap();
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].id, "a2");

        let deleted = repos.appointments.delete_appointment("a2").await.unwrap();
        assert_eq!(deleted.map(|a| a.id), Some("a2".to_string()));
        assert!(repos.appointments.find_appointment("a2").await.unwrap().is_none());
        assert!(repos.appointments.delete_appointment("a2").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_reports_count_completed_revenue() {
        let repos = setup().await;
        for (id, date, time) in [
            ("a1", "2030-05-06", "09:00"),
            ("a2", "2030-05-06", "10:00"),
            ("a3", "2030-05-07", "09:00"),
            ("a4", "2030-06-01", "09:00"),
        ] {
            repos
                .appointments
                .insert_appointment(appointment(id, "b1", date, time))
                .await
                .unwrap();
        }
        for id in ["a1", "a3"] {
            repos
                .appointments
                .update_status(id, AppointmentStatus::Pending, AppointmentStatus::Confirmed, "t", None)
                .await
                .unwrap();
            repos
                .appointments
                .update_status(id, AppointmentStatus::Confirmed, AppointmentStatus::Completed, "t", None)
                .await
                .unwrap();
        }
        repos
            .appointments
            .update_status("a2", AppointmentStatus::Pending, AppointmentStatus::Cancelled, "t", None)
            .await
            .unwrap();

        let summary = repos.reports.summary("2030-05-01", "2030-05-31").await.unwrap();
        assert_eq!(summary.total_appointments, 3);
        assert_eq!(summary.by_status.completed, 2);
        assert_eq!(summary.by_status.cancelled, 1);
        assert_eq!(summary.revenue_cents, 3000);

        let by_barber = repos.reports.by_barber("2030-05-01", "2030-05-31").await.unwrap();
        assert_eq!(by_barber.len(), 1);
        assert_eq!(by_barber[0].completed_appointments, 2);
        assert_eq!(by_barber[0].revenue_cents, 3000);
        assert_eq!(by_barber[0].barber_name, None);

        let by_service = repos.reports.by_service("2030-05-01", "2030-05-31").await.unwrap();
        assert_eq!(by_service[0].service_name, "Haircut");
        assert_eq!(by_service[0].total_appointments, 3);

        let daily = repos.reports.daily("2030-05-06", "2030-05-07").await.unwrap();
        assert_eq!(daily.len(), 2);
        assert_eq!(daily[0].date, "2030-05-06");
        assert_eq!(daily[0].total_appointments, 2);
        assert_eq!(daily[0].cancelled_appointments, 1);
        assert_eq!(daily[1].completed_appointments, 1);
    }

    #[tokio::test]
    async fn test_access_request_lifecycle() {
        let repos = setup().await;

        let first = repos
            .access
            .request_access("joao@example.com", Some("João".to_string()))
            .await
            .unwrap();
        assert!(first.opened);
        assert_eq!(first.record.status, AccessStatus::Pending);

        let again = repos.access.request_access("joao@example.com", None).await.unwrap();
        assert!(!again.opened);
        assert_eq!(again.record.name.as_deref(), Some("João"));

        let rejected = repos
            .access
            .decide("joao@example.com", AccessStatus::Rejected, "admin")
            .await
            .unwrap();
        assert!(matches!(rejected, Decision::Applied(ref r) if r.status == AccessStatus::Rejected));

        let repeat = repos
            .access
            .decide("joao@example.com", AccessStatus::Rejected, "admin")
            .await
            .unwrap();
        assert!(matches!(repeat, Decision::Unchanged(_)));

        let flip = repos
            .access
            .decide("joao@example.com", AccessStatus::Approved, "admin")
            .await
            .unwrap();
        assert!(matches!(flip, Decision::Conflict(_)));

        // Re-requesting after rejection reopens the review
        let reopened = repos.access.request_access("joao@example.com", None).await.unwrap();
        assert!(reopened.opened);
        assert_eq!(reopened.record.status, AccessStatus::Pending);
        assert!(reopened.record.decided_by.is_none());

        let approved = repos
            .access
            .decide("joao@example.com", AccessStatus::Approved, "admin")
            .await
            .unwrap();
        assert!(matches!(approved, Decision::Applied(_)));

        let unchanged = repos.access.request_access("joao@example.com", None).await.unwrap();
        assert!(!unchanged.opened);
        assert_eq!(unchanged.record.status, AccessStatus::Approved);

        let missing = repos
            .access
            .decide("nobody@example.com", AccessStatus::Approved, "admin")
            .await
            .unwrap();
        assert_eq!(missing, Decision::NotFound);

        assert_eq!(
            repos
                .access
                .list_access(Some(AccessStatus::Approved))
                .await
                .unwrap()
                .len(),
            1
        );
    }

    #[tokio::test]
    async fn test_approve_from_notification() {
        let repos = setup().await;
        repos
            .access
            .request_access("maria@example.com", None)
            .await
            .unwrap();
        let notification = repos
            .notifications
            .create_notification(NewNotification {
                kind: NotificationKind::NewUser,
                title: "New access request".to_string(),
                message: "maria@example.com".to_string(),
                email: Some("maria@example.com".to_string()),
                appointment_id: None,
            })
            .await
            .unwrap();

        let outcome = repos
            .access
            .approve_from_notification(&notification.id, "admin")
            .await
            .unwrap();
        match outcome {
            NotificationApproval::Approved {
                record,
                notification,
            } => {
                assert_eq!(record.status, AccessStatus::Approved);
                assert_eq!(record.decided_by.as_deref(), Some("admin"));
                assert!(notification.read);
            }
            other => panic!("unexpected outcome: {:?}", other),
        }
        assert!(repos
            .notifications
            .list_notifications(true)
            .await
            .unwrap()
            .is_empty());

        let missing = repos
            .access
            .approve_from_notification("nope", "admin")
            .await
            .unwrap();
        assert_eq!(missing, NotificationApproval::NotificationNotFound);

        let no_email = repos
            .notifications
            .create_notification(NewNotification {
                kind: NotificationKind::NewAppointment,
                title: "New appointment".to_string(),
                message: "10:00".to_string(),
                email: None,
                appointment_id: Some("a1".to_string()),
            })
            .await
            .unwrap();
        let outcome = repos
            .access
            .approve_from_notification(&no_email.id, "admin")
            .await
            .unwrap();
        assert_eq!(outcome, NotificationApproval::MissingEmail);
        // Rolled back: still unread
        assert_eq!(repos.notifications.list_notifications(true).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_notifications_read_state() {
        let repos = setup().await;
        for n in 0..3 {
            repos
                .notifications
                .create_notification(NewNotification {
                    kind: NotificationKind::StatusChanged,
                    title: format!("Change {}", n),
                    message: "confirmed".to_string(),
                    email: None,
                    appointment_id: None,
                })
                .await
                .unwrap();
        }
        let all = repos.notifications.list_notifications(false).await.unwrap();
        assert_eq!(all.len(), 3);

        let read = repos.notifications.mark_read(&all[0].id).await.unwrap().unwrap();
        assert!(read.read);
        assert!(repos.notifications.mark_read("missing").await.unwrap().is_none());

        assert_eq!(repos.notifications.mark_all_read().await.unwrap(), 2);
        assert_eq!(repos.notifications.mark_all_read().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_missing_optional_fields_read_back_as_none() {
        let repos = setup().await;

        repos
            .appointments
            .insert_appointment(appointment("a1", "b1", "2030-05-06", "10:00"))
            .await
            .unwrap();
        let found = repos.appointments.find_appointment("a1").await.unwrap().unwrap();
        assert_eq!(found.client_email, None);
        assert_eq!(found.notes, None);

        repos
            .appointments
            .update_status(
                "a1",
                AppointmentStatus::Pending,
                AppointmentStatus::Confirmed,
                "admin",
                None,
            )
            .await
            .unwrap();
        let history = repos.appointments.status_history("a1").await.unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].note, None);

        let service = repos
            .services
            .create_service(ServiceInput {
                name: "Shave".to_string(),
                description: None,
                price_cents: 800,
                duration_minutes: 15,
                active: true,
            })
            .await
            .unwrap();
        let service = repos.services.find_service(&service.id).await.unwrap().unwrap();
        assert_eq!(service.description, None);

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
        assert_eq!(repos.barbers.find_barber(&barber.id).await.unwrap().unwrap().phone, None);
        repos
            .barbers
            .replace_working_hours(
                &barber.id,
                vec![WorkingHours {
                    barber_id: barber.id.clone(),
                    weekday: 1,
                    start_time: "09:00".to_string(),
                    end_time: "17:00".to_string(),
                    break_start: None,
                    break_end: None,
                }],
            )
            .await
            .unwrap();
        let hours = repos
            .barbers
            .working_hours_for_weekday(&barber.id, 1)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(hours.break_start, None);
        assert_eq!(hours.break_end, None);

        let outcome = repos.access.request_access("ana@shop.test", None).await.unwrap();
        assert_eq!(outcome.record.name, None);
        assert_eq!(outcome.record.decided_at, None);
        assert_eq!(outcome.record.decided_by, None);

        let notification = repos
            .notifications
            .create_notification(NewNotification {
                kind: NotificationKind::StatusChanged,
                title: "Change".to_string(),
                message: "confirmed".to_string(),
                email: None,
                appointment_id: None,
            })
            .await
            .unwrap();
        let stored = repos
            .notifications
            .find_notification(&notification.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.email, None);
        assert_eq!(stored.appointment_id, None);

        // Barber rows for appointments with an unknown barber still report
        let rows = repos.reports.by_barber("2030-05-01", "2030-05-31").await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].barber_name, None);
    }
}
