use criterion::{Criterion, black_box, criterion_group, criterion_main};
use keyview::{ResultValue, render_lines};

fn create_flat_reply(len: usize) -> ResultValue {
    ResultValue::Sequence(
        (0..len)
            .map(|i| ResultValue::Scalar(format!("member:{i}")))
            .collect(),
    )
}

fn create_nested_reply(depth: usize, width: usize) -> ResultValue {
    if depth == 0 {
        return ResultValue::Scalar("leaf".to_string());
    }
    ResultValue::Sequence(
        (0..width)
            .map(|_| create_nested_reply(depth - 1, width))
            .collect(),
    )
}

fn benchmark_flat_reply(c: &mut Criterion) {
    let reply = create_flat_reply(10_000);

    c.bench_function("render_flat_10000", |b| {
        b.iter(|| render_lines(black_box(&reply), "", true));
    });
}

fn benchmark_nested_reply(c: &mut Criterion) {
    let reply = create_nested_reply(5, 6);

    c.bench_function("render_nested_5x6", |b| {
        b.iter(|| render_lines(black_box(&reply), "", true));
    });
}

criterion_group!(benches, benchmark_flat_reply, benchmark_nested_reply);
criterion_main!(benches);
