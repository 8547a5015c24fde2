use criterion::{BatchSize, Criterion, black_box, criterion_group, criterion_main};
use injector_core::{Calibrator, ChartOptions, Field, characterize};

// Synthetic calibration sweep: linear flow with small-pulse droop and noise
fn synth_session(n: usize, noise_amp: f64, seed: u32) -> Calibrator {
    // tiny PRNG
    let mut state = seed.max(1);
    let mut next_f64 = || {
        let mut x = state;
        x ^= x << 13;
        x ^= x >> 17;
        x ^= x << 5;
        state = x;
        f64::from(x) / (f64::from(u32::MAX) + 1.0)
    };
    let mut cal = Calibrator::new();
    for i in 0..n {
        let pw = 0.5 + (i % 40) as f64 * 0.25;
        let droop = if pw < 1.5 { 0.3 * (1.5 - pw) } else { 0.0 };
        let mpp = 2.0 * (pw - 0.9 - droop) + (next_f64() * 2.0 - 1.0) * noise_amp;
        let injections = 1000.0;
        let total_g = (mpp * injections / 1000.0).max(1e-4);
        let id = cal.store().last_id();
        let _ = cal.update(id, Field::Injections, &injections.to_string());
        let _ = cal.update(id, Field::PulseWidthMs, &pw.to_string());
        let _ = cal.update(id, Field::TotalMassG, &total_g.to_string());
        if pw < 1.5 {
            let _ = cal.set_include(id, false);
        }
    }
    cal
}

pub fn bench_recompute(c: &mut Criterion) {
    let mut g = c.benchmark_group("recompute");
    // Allow quick tweaking without CLI flags (Criterion 0.5):
    //   BENCH_SAMPLE_SIZE=10 BENCH_MEAS_MS=50 cargo bench -p injector_core --bench recompute
    if let Ok(ss) = std::env::var("BENCH_SAMPLE_SIZE") {
        if let Ok(n) = ss.parse::<usize>() {
            g.sample_size(n.max(1));
        }
    } else {
        g.sample_size(50);
    }
    if let Ok(ms) = std::env::var("BENCH_MEAS_MS") {
        if let Ok(ms_u64) = ms.parse::<u64>() {
            g.measurement_time(std::time::Duration::from_millis(ms_u64));
        }
    }

    for &n in &[16usize, 256, 4096] {
        let cal = synth_session(n, 0.02, 0xC0FFEE);
        let rows = cal.rows().to_vec();
        g.bench_function(format!("rows_{n}"), |b| {
            b.iter_batched(
                || rows.clone(),
                |r| {
                    let rep = characterize(black_box(&r), &ChartOptions::default());
                    black_box(rep.summary.deadtime_ms);
                },
                BatchSize::SmallInput,
            )
        });
    }
    g.finish();
}

criterion_group!(recompute, bench_recompute);
criterion_main!(recompute);
