//! Serve Analysis Benchmarks
//!
//! Measures full-pipeline and segmentation throughput over synthetic serves.
//!
//! # Running Benchmarks
//! ```bash
//! cargo bench --package serve-analysis --bench pipeline
//! ```

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use std::time::Duration;

use serve_analysis::{PhaseSegmenter, ServeAnalyzer, TrajectorySet};
use serve_models::{FramePose, Landmark, LandmarkSample, PoseSequence};

/// Synthetic full-body serve with wrist peaks at 30% and 65% of the clip.
fn synthetic_serve(total: usize) -> PoseSequence {
    let toss = total as f64 * 0.3;
    let contact = total as f64 * 0.65;
    let frames = (0..total)
        .map(|i| {
            let t = i as f64;
            let bend = (t / total as f64 * std::f64::consts::PI).sin();
            let landmarks = [
                (Landmark::Nose, LandmarkSample::new(0.5, 0.15)),
                (Landmark::LeftShoulder, LandmarkSample::new(0.45, 0.3 + 0.02 * bend)),
                (Landmark::RightShoulder, LandmarkSample::new(0.55, 0.32 - 0.02 * bend)),
                (Landmark::LeftElbow, LandmarkSample::new(0.42, 0.4)),
                (Landmark::RightElbow, LandmarkSample::new(0.6, 0.35 - 0.05 * bend)),
                (Landmark::LeftWrist, LandmarkSample::new(0.4, 0.2 + 0.004 * (t - toss).abs())),
                (Landmark::RightWrist, LandmarkSample::new(0.62, 0.1 + 0.004 * (t - contact).abs())),
                (Landmark::LeftHip, LandmarkSample::new(0.46, 0.55)),
                (Landmark::RightHip, LandmarkSample::new(0.54, 0.56)),
                (Landmark::LeftKnee, LandmarkSample::new(0.45 + 0.03 * bend, 0.72)),
                (Landmark::RightKnee, LandmarkSample::new(0.56 + 0.03 * bend, 0.72)),
                (Landmark::LeftAnkle, LandmarkSample::new(0.44, 0.9)),
                (Landmark::RightAnkle, LandmarkSample::new(0.57, 0.9)),
            ];
            FramePose::detected(i as u64, t / 30.0, landmarks)
        })
        .collect();
    PoseSequence::new(frames).with_fps(30.0)
}

/// Benchmark the complete analysis.
fn bench_analyze(c: &mut Criterion) {
    let mut group = c.benchmark_group("analyze");
    group.warm_up_time(Duration::from_secs(1));
    group.measurement_time(Duration::from_secs(3));

    let analyzer = ServeAnalyzer::default();
    for frames in [60, 150, 600] {
        let sequence = synthetic_serve(frames);
        group.throughput(Throughput::Elements(frames as u64));
        group.bench_with_input(BenchmarkId::new("frames", frames), &sequence, |b, seq| {
            b.iter(|| black_box(analyzer.analyze(black_box(seq))))
        });
    }

    group.finish();
}

/// Benchmark trajectory extraction plus segmentation.
fn bench_segment(c: &mut Criterion) {
    let mut group = c.benchmark_group("segment");
    group.warm_up_time(Duration::from_secs(1));
    group.measurement_time(Duration::from_secs(3));

    let segmenter = PhaseSegmenter::default();
    for frames in [150, 600] {
        let sequence = synthetic_serve(frames);
        group.throughput(Throughput::Elements(frames as u64));
        group.bench_with_input(BenchmarkId::new("frames", frames), &sequence, |b, seq| {
            b.iter(|| {
                let trajectories = TrajectorySet::extract(black_box(seq));
                black_box(segmenter.segment(&trajectories, 30.0))
            })
        });
    }

    group.finish();
}

/// Benchmark parallel batch analysis.
fn bench_batch(c: &mut Criterion) {
    let mut group = c.benchmark_group("analyze_batch");
    group.warm_up_time(Duration::from_secs(1));
    group.measurement_time(Duration::from_secs(5));

    let analyzer = ServeAnalyzer::default();
    let batch: Vec<PoseSequence> = (0..32).map(|_| synthetic_serve(150)).collect();
    group.throughput(Throughput::Elements(batch.len() as u64));
    group.bench_function("32x150", |b| {
        b.iter(|| black_box(analyzer.analyze_batch(black_box(&batch))))
    });

    group.finish();
}

criterion_group!(benches, bench_analyze, bench_segment, bench_batch);
criterion_main!(benches);
