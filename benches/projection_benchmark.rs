use attraction_discovery::{
    AttractionProjector, RawAddress, RawAttraction, RawContact, RawImage, SavedItemsRegistry,
};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::{thread_rng, Rng};
use std::sync::Arc;
use std::thread;

fn synthetic_record(index: usize) -> RawAttraction {
    RawAttraction {
        uuid: format!("uuid-{}", index),
        name: format!("Attraction {}", index),
        description: "A popular stop with gardens, galleries, street food and riverside views \
                      that most visitors spend half a day exploring"
            .to_string(),
        rating: Some((index % 6) as f64),
        images: vec![RawImage {
            uuid: format!("media-{}", index),
            url: format!("https://example.com/{}.jpg", index),
        }],
        tags: vec!["Family".to_string(), "Outdoor".to_string()],
        body: "<p>Open daily.</p>".to_string(),
        address: RawAddress {
            building_name: "Visitor Centre".to_string(),
            street_name: format!("{} River Valley Road", index),
            floor_number: "2".to_string(),
            unit_number: format!("{}", index % 40),
            postal_code: "179030".to_string(),
        },
        contact: RawContact {
            primary_contact_no: "+65 6332 1200".to_string(),
        },
        official_email: "hello@example.com".to_string(),
        official_website: "www.example.com".to_string(),
    }
}

// Benchmark for the raw-record to view-model projection
pub fn projection_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("attraction_projection");

    for batch_size in [10, 100, 1000].iter() {
        let records: Vec<RawAttraction> = (0..*batch_size).map(synthetic_record).collect();
        let projector = AttractionProjector::with_word_limit(20);

        group.bench_with_input(
            BenchmarkId::from_parameter(batch_size),
            &records,
            |b, records| {
                b.iter(|| {
                    for record in records {
                        black_box(projector.project(record));
                    }
                });
            },
        );
    }

    group.finish();
}

// Benchmark for concurrent saved-items toggles
pub fn saved_registry_benchmark(c: &mut Criterion) {
    c.bench_function("saved_registry_contended_toggles", |b| {
        b.iter(|| {
            let registry = Arc::new(SavedItemsRegistry::new());

            let mut handles = vec![];
            for _ in 0..4 {
                let registry = Arc::clone(&registry);
                handles.push(thread::spawn(move || {
                    let mut rng = thread_rng();
                    for _ in 0..250 {
                        let id = format!("uuid-{}", rng.gen_range(0..64));
                        registry.toggle(&id);
                        black_box(registry.is_saved(&id));
                    }
                }));
            }
            for handle in handles {
                handle.join().unwrap();
            }
        });
    });
}

criterion_group!(benches, projection_benchmark, saved_registry_benchmark);
criterion_main!(benches);
