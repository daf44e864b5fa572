//! Performance benchmarks for the multi-ping monitor
//!
//! These benchmarks measure the hot paths that run once per probe: parsing
//! the ping output and folding the sample into the per-target metrics state.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use multi_ping_monitor::{engine::MetricsEngine, models::MetricRecord, parser::LatencyParser};

const WINDOWS_REPLY: &str = "Reply from 8.8.8.8: bytes=32 time=14ms TTL=117";
const UNIX_REPLY: &str = "64 bytes from 8.8.8.8: icmp_seq=1 ttl=117 time=14.2 ms";
const TIMEOUT_OUTPUT: &str = "Request timed out.";
const SUMMARY_BLOCK: &str = "\
Pinging 8.8.8.8 with 32 bytes of data:
Request timed out.

Ping statistics for 8.8.8.8:
    Packets: Sent = 1, Received = 1, Lost = 0 (0% loss),
Approximate round trip times in milli-seconds:
    Minimum = 10ms, Maximum = 20ms, Average = 15ms";

/// Benchmark latency extraction from ping output
fn benchmark_parser(c: &mut Criterion) {
    let parser = LatencyParser::new();
    let mut group = c.benchmark_group("parser");

    for (name, output) in [
        ("windows_reply", WINDOWS_REPLY),
        ("unix_reply", UNIX_REPLY),
        ("timeout", TIMEOUT_OUTPUT),
        ("summary_fallback", SUMMARY_BLOCK),
    ] {
        group.bench_with_input(BenchmarkId::from_parameter(name), output, |b, output| {
            b.iter(|| black_box(parser.parse(black_box(output))));
        });
    }

    group.finish();
}

/// Benchmark folding samples into per-target metrics state
fn benchmark_engine(c: &mut Criterion) {
    let mut group = c.benchmark_group("engine");

    group.bench_function("record_reply", |b| {
        let mut engine = MetricsEngine::new(900, 100);
        let mut ts = 0.0;
        b.iter(|| {
            ts += 1.0;
            black_box(engine.record("8.8.8.8", ts, Some(14.2)));
        });
    });

    group.bench_function("record_miss", |b| {
        let mut engine = MetricsEngine::new(900, 100);
        let mut ts = 0.0;
        b.iter(|| {
            ts += 1.0;
            black_box(engine.record("8.8.8.8", ts, None));
        });
    });

    group.bench_function("record_across_10_targets", |b| {
        let mut engine = MetricsEngine::new(900, 100);
        let targets: Vec<String> = (0..10).map(|i| format!("10.0.0.{}", i)).collect();
        let mut ts = 0.0;
        b.iter(|| {
            ts += 1.0;
            for target in &targets {
                black_box(engine.record(target, ts, Some(14.2)));
            }
        });
    });

    group.finish();
}

/// Benchmark record formatting for the console and CSV sinks
fn benchmark_record_formatting(c: &mut Criterion) {
    let record = MetricRecord {
        target: "8.8.8.8".to_string(),
        timestamp: 1_700_000_000.25,
        rtt_ms: Some(14.2),
        sent: 100,
        received: 97,
        window_loss_pct: 3.0,
        jitter_ms: 0.84,
    };
    let mut group = c.benchmark_group("formatting");

    group.bench_function("event_line", |b| {
        b.iter(|| black_box(record.event_line()));
    });

    group.bench_function("csv_row", |b| {
        b.iter(|| black_box(record.csv_row()));
    });

    group.finish();
}

criterion_group!(
    benches,
    benchmark_parser,
    benchmark_engine,
    benchmark_record_formatting
);
criterion_main!(benches);
