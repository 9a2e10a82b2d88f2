use criterion::{black_box, criterion_group, criterion_main, Criterion};
use crowdfund_core::{normalize_amount, normalize_campaigns};
use serde_json::{json, Value};

const NOW: u64 = 1_700_000_000;

fn campaign_list(len: u64) -> Value {
    Value::Array(
        (0..len)
            .map(|id| {
                if id % 2 == 0 {
                    json!([
                        id,
                        format!("Campaign {}", id),
                        "desc",
                        "Technology",
                        "0x1111111111111111111111111111111111111111",
                        "5000000000000000000000",
                        format!("{}000000000000000000", id),
                        NOW + id * 3600,
                        false
                    ])
                } else {
                    json!({
                        "id": id,
                        "title": format!("Campaign {}", id),
                        "category": "Education",
                        "goal": {"hex": "0x10f0cf064dd59200000"},
                        "pledged": "1200000000000000000000",
                        "endAt": NOW - id,
                        "claimed": true
                    })
                }
            })
            .collect(),
    )
}

fn bench_normalize(c: &mut Criterion) {
    let list = campaign_list(500);
    c.bench_function("normalize_campaigns/500", |b| {
        b.iter(|| normalize_campaigns(black_box(&list), NOW))
    });

    c.bench_function("normalize_amount/long", |b| {
        b.iter(|| normalize_amount(black_box("123456789012345678901234567890")))
    });
}

criterion_group!(benches, bench_normalize);
criterion_main!(benches);
