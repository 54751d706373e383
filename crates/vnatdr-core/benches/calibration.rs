//! Benchmarks for calibration
//!
//! Tests performance of solving error terms and correcting raw sweeps.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use num_complex::Complex64;
use vnatdr_core::sweep::apply_calibration;
use vnatdr_core::{CalibrationStore, Datapoint, Standard, Sweep};

fn raw_sweep(nfreq: usize, gamma: Complex64) -> Sweep {
    (0..nfreq)
        .map(|i| {
            let f = 50e3 + i as f64 * 1e6;
            let x = f / 1e9;
            let e00 = Complex64::new(0.05, -0.01 * x);
            let e11 = Complex64::new(0.1, 0.02 * x);
            let et = Complex64::from_polar(0.9, -x);
            let sm = e00 + et * gamma / (Complex64::new(1.0, 0.0) - e11 * gamma);
            Datapoint::from_complex(f, sm)
        })
        .collect()
}

fn create_store(nfreq: usize) -> CalibrationStore {
    let c = |re: f64| Complex64::new(re, 0.0);
    let mut store = CalibrationStore::new();
    store.insert(Standard::Short, raw_sweep(nfreq, c(-1.0)));
    store.insert(Standard::Open, raw_sweep(nfreq, c(1.0)));
    store.insert(Standard::Load, raw_sweep(nfreq, c(0.0)));
    store.insert(Standard::Through, raw_sweep(nfreq, c(0.8)));
    store.insert(Standard::Isolation, raw_sweep(nfreq, c(0.001)));
    store
}

fn bench_compute_corrections(c: &mut Criterion) {
    let mut group = c.benchmark_group("compute_corrections");

    for nfreq in [101, 401, 1024].iter() {
        let store = create_store(*nfreq);
        let id = BenchmarkId::from_parameter(nfreq);

        group.bench_with_input(id, nfreq, |b, _| {
            b.iter(|| {
                let mut store = store.clone();
                black_box(store.compute_corrections().map(|cal| cal.is_valid_2port()))
            })
        });
    }

    group.finish();
}

fn bench_apply_calibration(c: &mut Criterion) {
    let mut group = c.benchmark_group("apply_calibration");

    for nfreq in [101, 401, 1024].iter() {
        let mut store = create_store(*nfreq);
        let Ok(cal) = store.compute_corrections().cloned() else {
            continue;
        };
        let dut = raw_sweep(*nfreq, Complex64::new(0.3, -0.2));
        let id = BenchmarkId::from_parameter(nfreq);

        group.bench_with_input(id, nfreq, |b, _| {
            b.iter(|| black_box(apply_calibration(&cal, dut.clone(), dut.clone())))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_compute_corrections, bench_apply_calibration);
criterion_main!(benches);
