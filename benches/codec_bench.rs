//! Benchmarks for the remoting codec

use std::collections::HashMap;

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rmq_remoting::protocol::{decode_bytes, encode, Command, RequestCode};

fn sample_request() -> Command {
    let fields: HashMap<String, String> = [
        ("topic", "BenchTopic"),
        ("readQueueNums", "16"),
        ("writeQueueNums", "16"),
        ("perm", "6"),
        ("topicFilterType", "SINGLE_TAG"),
    ]
    .iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect();

    Command::request(RequestCode::UPDATE_AND_CREATE_TOPIC, fields).with_body(vec![b'x'; 4096])
}

fn codec_benchmarks(c: &mut Criterion) {
    let request = sample_request();
    let frame = encode(&request).unwrap();
    let payload = frame.slice(4..);

    c.bench_function("encode_request_4k_body", |b| {
        b.iter(|| encode(black_box(&request)).unwrap())
    });

    c.bench_function("decode_request_4k_body", |b| {
        b.iter(|| decode_bytes(black_box(payload.clone())).unwrap())
    });
}

criterion_group!(benches, codec_benchmarks);
criterion_main!(benches);
