use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use relay::{Operation, Pipeline, Recovery, ScopeTimer};
use std::sync::Arc;
use tokio::runtime::Runtime; // To drive run_async within Criterion

// --- Helper: CPU-bound operation ---
fn busy_increment(iterations: u64) -> Operation<u64, u64> {
  Operation::from_fn(move |mut value: u64| {
    for _i in 0..iterations {
      value = value.wrapping_add(1);
    }
    value
  })
}

fn build_pipeline(num_operations: usize, iterations: u64) -> Pipeline<u64, u64> {
  let mut pipeline = Pipeline::<u64, u64>::new();
  for i in 0..num_operations {
    pipeline.add_operation(busy_increment(iterations).named(format!("op_{}", i)));
  }
  pipeline
}

// --- Benchmark Functions ---

fn bench_blocking_run(c: &mut Criterion) {
  let mut group = c.benchmark_group("BlockingRun");

  for num_operations in [1usize, 5, 10] {
    for iterations in [1u64, 10, 100] {
      let pipeline = build_pipeline(num_operations, iterations);

      group.throughput(Throughput::Elements(num_operations as u64 * iterations));
      group.bench_with_input(
        BenchmarkId::new(format!("{}ops_{}iter", num_operations, iterations), num_operations),
        &pipeline,
        |b, pipeline| b.iter(|| criterion::black_box(pipeline.run(0).unwrap())),
      );
    }
  }
  group.finish();
}

fn bench_async_run(c: &mut Criterion) {
  let mut group = c.benchmark_group("AsyncRun");
  let rt = Runtime::new().unwrap();

  for num_operations in [1usize, 5, 10] {
    let pipeline = Arc::new(build_pipeline(num_operations, 10));

    group.throughput(Throughput::Elements(num_operations as u64));
    group.bench_with_input(
      BenchmarkId::new(format!("{}ops", num_operations), num_operations),
      &num_operations,
      |b, _| {
        b.to_async(&rt).iter(|| {
          let p_clone = pipeline.clone();
          async move { p_clone.run_async(0, Some(relay::CancellationToken::new())).await.unwrap() }
        });
      },
    );
  }
  group.finish();
}

// Cost of the erased hand-off when most operations are skipped or recover.
fn bench_skip_and_recovery_overhead(c: &mut Criterion) {
  let mut group = c.benchmark_group("SkipAndRecoveryOverhead");

  for num_operations in [1usize, 5, 10] {
    let mut skipping = Pipeline::<u64, u64>::new();
    for _ in 0..num_operations {
      skipping.add_operation(busy_increment(1).when(|| false));
    }
    skipping.add_operation(busy_increment(1));

    let mut recovering = Pipeline::<u64, u64>::new();
    for _ in 0..num_operations {
      recovering.add_operation(
        Operation::new(|_: u64| -> anyhow::Result<u64> { Err(anyhow::anyhow!("bench failure")) })
          .recover_with(|_: &anyhow::Error| Recovery::RecoveredWith(0)),
      );
    }

    group.bench_with_input(BenchmarkId::new("skipped", num_operations), &skipping, |b, pipeline| {
      b.iter(|| criterion::black_box(pipeline.run(0).unwrap()))
    });
    group.bench_with_input(BenchmarkId::new("recovered", num_operations), &recovering, |b, pipeline| {
      b.iter(|| criterion::black_box(pipeline.run(0).unwrap()))
    });
  }
  group.finish();
}

fn bench_scope_timer(c: &mut Criterion) {
  let mut group = c.benchmark_group("ScopeTimer");
  group.bench_function("with_start", |b| {
    b.iter(|| {
      let _timer = ScopeTimer::with_start(
        |at| {
          criterion::black_box(at);
        },
        |elapsed: std::time::Duration| {
          criterion::black_box(elapsed);
        },
      );
    })
  });
  group.finish();
}

criterion_group!(
  benches,
  bench_blocking_run,
  bench_async_run,
  bench_skip_and_recovery_overhead,
  bench_scope_timer
);
criterion_main!(benches);
