//! Protocol encoding/decoding benchmarks.

use bytes::Bytes;
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use prbp_protocol::{Command, Decoder, Operation, PutPayload};

fn create_put_request(content_size: usize) -> Command {
    let content = vec![0x42u8; content_size];
    let payload = PutPayload::new("bench.dat", &content).encode();
    Command::request(Operation::Put).with_payload(payload)
}

fn bench_command_encode(c: &mut Criterion) {
    let mut group = c.benchmark_group("command_encode");

    for size in [100, 1000, 10000] {
        let command = create_put_request(size);

        group.throughput(Throughput::Bytes(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &command, |b, command| {
            b.iter(|| black_box(command.encode()));
        });
    }

    group.finish();
}

fn bench_command_decode(c: &mut Criterion) {
    let mut group = c.benchmark_group("command_decode");

    for size in [100, 1000, 10000] {
        let encoded = create_put_request(size).encode().freeze();

        group.throughput(Throughput::Bytes(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &encoded, |b, encoded| {
            b.iter(|| {
                let mut decoder = Decoder::new();
                decoder.extend(encoded);
                black_box(decoder.decode_request().unwrap())
            });
        });
    }

    group.finish();
}

fn bench_put_payload_parse(c: &mut Criterion) {
    let mut group = c.benchmark_group("put_payload_parse");

    for size in [100, 1000, 10000] {
        let content = vec![0x42u8; size];
        let payload: Bytes = PutPayload::new("bench.dat", &content).encode();

        group.throughput(Throughput::Bytes(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &payload, |b, payload| {
            b.iter(|| black_box(PutPayload::parse(payload).unwrap()));
        });
    }

    group.finish();
}

fn bench_streaming_decode(c: &mut Criterion) {
    let mut group = c.benchmark_group("streaming_decode");

    // Many small frames arriving back to back in one buffer.
    for count in [10, 100, 1000] {
        let mut wire = Vec::new();
        for _ in 0..count {
            wire.extend_from_slice(&create_put_request(64).encode());
        }

        group.throughput(Throughput::Elements(count as u64));
        group.bench_with_input(BenchmarkId::from_parameter(count), &wire, |b, wire| {
            b.iter(|| {
                let mut decoder = Decoder::new();
                decoder.extend(wire);
                while let Some(command) = decoder.decode_request().unwrap() {
                    black_box(command);
                }
            });
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_command_encode,
    bench_command_decode,
    bench_put_payload_parse,
    bench_streaming_decode,
);

criterion_main!(benches);
