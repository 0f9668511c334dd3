use barbershop_booking::slots::{compute_day_availability, BookedSlot, SlotRules, WorkingHours};
use chrono::{Duration, NaiveDate, NaiveTime};
use criterion::{black_box, criterion_group, criterion_main, Criterion};

fn t(h: u32, m: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(h, m, 0).unwrap()
}

fn full_day() -> WorkingHours {
    WorkingHours {
        weekday: 2,
        start: t(8, 0),
        end: t(20, 0),
        break_start: Some(t(13, 0)),
        break_end: Some(t(14, 0)),
    }
}

// Every other half hour booked
fn busy_day() -> Vec<BookedSlot> {
    (0..12)
        .map(|i| BookedSlot {
            start: t(8 + i, 0),
            duration: Duration::minutes(30),
        })
        .collect()
}

fn benchmark_compute_day_availability(c: &mut Criterion) {
    let mut group = c.benchmark_group("compute_day_availability");
    let date = NaiveDate::from_ymd_opt(2030, 5, 8).unwrap();
    let tomorrow_morning = NaiveDate::from_ymd_opt(2030, 5, 7)
        .unwrap()
        .and_hms_opt(9, 0, 0)
        .unwrap();
    let same_day = date.and_hms_opt(12, 0, 0).unwrap();
    let hours = full_day();

    for (name, interval) in [("interval_30", 30), ("interval_5", 5)] {
        let rules = SlotRules {
            interval: Duration::minutes(interval),
            lead_time: Duration::minutes(60),
        };

        group.bench_function(format!("{}/no_bookings", name), |b| {
            b.iter(|| {
                compute_day_availability(
                    black_box(date),
                    black_box(Some(&hours)),
                    black_box(&[]),
                    black_box(Duration::minutes(45)),
                    black_box(&rules),
                    black_box(tomorrow_morning),
                )
            })
        });

        let booked = busy_day();
        group.bench_function(format!("{}/busy_day", name), |b| {
            b.iter(|| {
                compute_day_availability(
                    black_box(date),
                    black_box(Some(&hours)),
                    black_box(&booked),
                    black_box(Duration::minutes(45)),
                    black_box(&rules),
                    black_box(same_day),
                )
            })
        });
    }

    group.finish();
}

criterion_group!(benches, benchmark_compute_day_availability);
criterion_main!(benches);
