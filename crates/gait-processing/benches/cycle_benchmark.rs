//! Throughput of valley detection, normalization and the full trial pipeline

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use gait_core::{ChannelKind, LegSide};
use gait_processing::{
    find_peaks, process_trial, CycleNormalizer, NormalizationConfig, ProcessingConfig,
};
use gait_simulation::{simulate_session, SprintSessionConfig};

fn bench_peak_detection(c: &mut Criterion) {
    let mut group = c.benchmark_group("peak_detection");

    for &bouts in &[1usize, 3, 6] {
        let session = simulate_session(SprintSessionConfig {
            bouts,
            ..SprintSessionConfig::default()
        })
        .unwrap();
        let time = session.trial.time().to_vec();
        let gyro = session.trial.channel(LegSide::Right, ChannelKind::Gyro).to_vec();

        group.bench_with_input(
            BenchmarkId::new("find_peaks", format!("{}samples", gyro.len())),
            &(time, gyro),
            |b, (time, gyro)| {
                b.iter(|| find_peaks(black_box(time), black_box(gyro), 20, 50, -200.0));
            },
        );
    }

    group.finish();
}

fn bench_normalization(c: &mut Criterion) {
    let session = simulate_session(SprintSessionConfig::default()).unwrap();
    let time = session.trial.time();
    let emg = session.trial.channel(LegSide::Left, ChannelKind::EmgSt);
    let peaks = &session.valleys(LegSide::Left)[..10];

    let mut group = c.benchmark_group("normalization");
    for &num_points in &[101usize, 1001] {
        let normalizer = CycleNormalizer::new(NormalizationConfig {
            num_points,
            ..NormalizationConfig::default()
        })
        .unwrap();

        group.bench_function(BenchmarkId::new("ten_cycles", num_points), |b| {
            b.iter(|| normalizer.normalize(black_box(time), black_box(emg), black_box(peaks)));
        });
    }
    group.finish();
}

fn bench_full_trial(c: &mut Criterion) {
    let session = simulate_session(SprintSessionConfig::default()).unwrap();
    let config = ProcessingConfig::default();

    c.bench_function("process_trial", |b| {
        b.iter(|| process_trial(black_box(&session.trial), black_box(&config)));
    });
}

criterion_group!(benches, bench_peak_detection, bench_normalization, bench_full_trial);
criterion_main!(benches);
