//! Itinerary normalization performance benchmarks

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use flightproxy::config::ProviderKind;
use flightproxy::services::normalizer::{apply_max_stops, normalize};
use serde_json::{json, Value};

/// Skyscanner-shaped payload with `count` round-trip itineraries
fn skyscanner_payload(count: usize) -> Value {
    let itineraries: Vec<Value> = (0..count)
        .map(|i| {
            json!({
                "id": format!("itinerary-{}", i),
                "price": { "raw": 100.0 + i as f64, "formatted": format!("${}", 100 + i) },
                "legs": [
                    {
                        "origin": { "displayCode": "LHR" },
                        "destination": { "displayCode": "JFK" },
                        "departure": "2025-06-01T08:30:00",
                        "arrival": "2025-06-01T11:15:00",
                        "stopCount": i % 3,
                        "durationInMinutes": 465,
                        "carriers": { "marketing": [{ "name": "British Airways" }] }
                    },
                    {
                        "origin": { "displayCode": "JFK" },
                        "destination": { "displayCode": "LHR" },
                        "departure": "2025-06-08T18:00:00",
                        "arrival": "2025-06-09T06:10:00",
                        "stopCount": 0,
                        "durationInMinutes": 430,
                        "carriers": { "marketing": [{ "name": "Virgin Atlantic" }] }
                    }
                ]
            })
        })
        .collect();

    json!({ "status": true, "data": { "itineraries": itineraries } })
}

/// Kiwi-shaped payload with `count` two-hop one-way itineraries
fn kiwi_payload(count: usize) -> Value {
    let data: Vec<Value> = (0..count)
        .map(|i| {
            json!({
                "id": format!("kiwi-{}", i),
                "price": 50 + i,
                "duration": { "departure": 14400 },
                "route": [
                    { "flyFrom": "BCN", "flyTo": "MAD", "airline": "IB", "return": 0,
                      "local_departure": "2025-03-05T07:00:00.000Z", "local_arrival": "2025-03-05T08:10:00.000Z" },
                    { "flyFrom": "MAD", "flyTo": "LIS", "airline": "TP", "return": 0,
                      "local_departure": "2025-03-05T09:00:00.000Z", "local_arrival": "2025-03-05T09:15:00.000Z" }
                ]
            })
        })
        .collect();

    json!({ "currency": "EUR", "data": data })
}

fn bench_normalize(c: &mut Criterion) {
    let mut group = c.benchmark_group("normalize");

    for size in [10, 100, 500] {
        let sky = skyscanner_payload(size);
        group.bench_with_input(BenchmarkId::new("skyscanner", size), &sky, |b, payload| {
            b.iter(|| normalize(ProviderKind::Skyscanner, black_box(payload), "USD"))
        });

        let kiwi = kiwi_payload(size);
        group.bench_with_input(BenchmarkId::new("kiwi", size), &kiwi, |b, payload| {
            b.iter(|| normalize(ProviderKind::Kiwi, black_box(payload), "EUR"))
        });
    }

    group.finish();
}

fn bench_stop_filter(c: &mut Criterion) {
    let itineraries = normalize(ProviderKind::Skyscanner, &skyscanner_payload(500), "USD");

    c.bench_function("apply_max_stops", |b| {
        b.iter(|| apply_max_stops(black_box(itineraries.clone()), Some(1)))
    });
}

criterion_group!(benches, bench_normalize, bench_stop_filter);
criterion_main!(benches);
