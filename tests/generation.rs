mod common;

use common::fixed_schema;
use stream_faker::{
    core::{item::ItemReader, random::RandomSource},
    item::fake::{EventReaderBuilder, EventType, Record, SkuMask, TimestampMode},
};

fn generate(seed: u64, count: usize, time_mode: TimestampMode) -> Vec<Record> {
    let random = RandomSource::seeded(seed);
    let reader = EventReaderBuilder::new()
        .number_of_items(count)
        .schema(fixed_schema().time_mode(time_mode))
        .random(&random)
        .build()
        .unwrap();

    let mut records = Vec::new();
    while let Some(record) = reader.read().unwrap() {
        records.push(record);
    }
    records
}

#[test]
fn generates_exactly_the_requested_count() {
    for count in [0, 1, 9, 10, 11, 57] {
        assert_eq!(generate(47, count, TimestampMode::BeforeNow).len(), count);
    }
}

#[test]
fn same_seed_generates_same_records() {
    let first = generate(47, 40, TimestampMode::BeforeNow);
    let second = generate(47, 40, TimestampMode::BeforeNow);
    assert_eq!(first, second);

    let other = generate(48, 40, TimestampMode::BeforeNow);
    assert_ne!(first, other);
}

#[test]
fn every_field_stays_in_its_domain() {
    let mask = SkuMask::default();
    let users = ["user-875", "user-190", "user-646", "user-033", "user-672"];

    for record in generate(7, 500, TimestampMode::BeforeNow) {
        assert!(users.contains(&record.user_id.as_str()));
        assert!([489, 715, 283].contains(&record.site_id));
        assert!(EventType::ALL.contains(&record.event));
        assert!((1..=10).contains(&record.amount));
        assert!(mask.matches(&record.sku), "bad sku {}", record.sku);
        assert_eq!(record.event_time.len(), "2024-05-17 13:45:30".len());
        assert!(record.event_time.starts_with("2024-05-17 "));
        assert!(record.event_time.as_str() <= "2024-05-17 13:45:30");
    }
}

#[test]
fn after_now_mode_never_goes_back_in_time() {
    for record in generate(11, 200, TimestampMode::AfterNow) {
        assert!(record.event_time.starts_with("2024-05-17 "));
        assert!(record.event_time.as_str() >= "2024-05-17 13:45:30");
    }
}

#[test]
fn records_serialize_with_all_six_fields() {
    let record = generate(47, 1, TimestampMode::BeforeNow).remove(0);
    let json = serde_json::to_value(&record).unwrap();
    let object = json.as_object().unwrap();

    for field in ["user_id", "site_id", "event", "sku", "amount", "event_time"] {
        assert!(object.contains_key(field), "missing {field}");
    }
    assert_eq!(object.len(), 6);
}
