//! Criterion benchmarks for the backtest pipeline.
//!
//! Benchmarks:
//! 1. Indicator precompute (crossover + RSI)
//! 2. Full pipeline at increasing series lengths

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use rsilab_core::domain::{PriceBar, RawBar};
use rsilab_core::engine::precompute::precompute_indicators;
use rsilab_core::{run_pipeline, StrategyParams};

fn make_bars(n: usize) -> Vec<PriceBar> {
    let base_date = chrono::NaiveDate::from_ymd_opt(2000, 1, 3).unwrap();
    let raw: Vec<RawBar> = (0..n)
        .map(|i| {
            let close = 100.0 + (i as f64 * 0.05).sin() * 15.0 + i as f64 * 0.01;
            RawBar {
                date: base_date + chrono::Duration::days(i as i64),
                open: close - 0.3,
                high: close + 1.5,
                low: close - 1.5,
                close,
                volume: 1_000_000.0 + (i % 500_000) as f64,
            }
        })
        .collect();
    PriceBar::series_from_raw(&raw)
}

fn bench_precompute(c: &mut Criterion) {
    let bars = make_bars(5_000);
    let params = StrategyParams::default();
    c.bench_function("precompute_indicators_5000", |b| {
        b.iter(|| precompute_indicators(black_box(&bars), black_box(&params)))
    });
}

fn bench_pipeline(c: &mut Criterion) {
    let mut group = c.benchmark_group("run_pipeline");
    let params = StrategyParams {
        buy_rsi_min: 55.0,
        sell_rsi_min: 45.0,
        ..Default::default()
    };
    for n in [1_000usize, 5_000, 20_000] {
        let bars = make_bars(n);
        group.bench_with_input(BenchmarkId::from_parameter(n), &bars, |b, bars| {
            b.iter(|| run_pipeline(black_box(bars), black_box(&params)))
        });
    }
    group.finish();
}

criterion_group!(benches, bench_precompute, bench_pipeline);
criterion_main!(benches);
