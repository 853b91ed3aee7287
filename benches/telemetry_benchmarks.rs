
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use emg_monitor::config::{MonitorConfig, SignalConfig};
use emg_monitor::prediction::{
    Classifier, EnergyRuleClassifier, FeatureExtractor, RandomStubClassifier,
};
use emg_monitor::signal::BatchAssembler;
use emg_monitor::telemetry::{SequencePolicy, StateAggregator};

const BATCH_SIZES: &[usize] = &[50, 100, 200, 400];
const CHANNEL_COUNTS: &[usize] = &[1, 2, 4, 8];

fn signal_config(batch_size: usize, channel_count: usize) -> SignalConfig {
    SignalConfig {
        sample_rate_hz: 2000,
        batch_size,
        channel_ids: (1..=channel_count as u32).collect(),
    }
}

fn benchmark_batch_assembly(c: &mut Criterion) {
    let mut group = c.benchmark_group("batch_assembly");

    for &batch_size in BATCH_SIZES {
        for &channel_count in CHANNEL_COUNTS {
            group.throughput(Throughput::Elements((batch_size * channel_count) as u64));

            group.bench_with_input(
                BenchmarkId::new("assemble", format!("{}x{}ch", batch_size, channel_count)),
                &(batch_size, channel_count),
                |b, &(batch_size, channel_count)| {
                    let config = signal_config(batch_size, channel_count);
                    let mut assembler = BatchAssembler::with_seed("bench_device", &config, 42);
                    let mut sequence = 0u64;

                    b.iter(|| {
                        let batch = assembler.assemble(black_box(sequence));
                        sequence += 1;
                        batch
                    });
                },
            );
        }
    }

    group.finish();
}

fn benchmark_feature_digest(c: &mut Criterion) {
    let mut group = c.benchmark_group("feature_digest");

    for &batch_size in BATCH_SIZES {
        group.throughput(Throughput::Elements((batch_size * 2) as u64));

        group.bench_with_input(
            BenchmarkId::new("digest", format!("{}samples", batch_size * 2)),
            &batch_size,
            |b, &batch_size| {
                let config = signal_config(batch_size, 2);
                let mut assembler = BatchAssembler::with_seed("bench_device", &config, 42);
                let batch = assembler.assemble(0);
                let mut extractor = FeatureExtractor::new(2000);

                b.iter(|| extractor.digest(black_box(&batch)));
            },
        );
    }

    group.finish();
}

fn benchmark_state_aggregation(c: &mut Criterion) {
    let mut group = c.benchmark_group("state_aggregation");

    for &batch_size in BATCH_SIZES {
        group.throughput(Throughput::Elements((batch_size * 2) as u64));

        group.bench_with_input(
            BenchmarkId::new("apply", format!("{}samples", batch_size * 2)),
            &batch_size,
            |b, &batch_size| {
                let mut config = MonitorConfig::default();
                config.signal = signal_config(batch_size, 2);
                config.aggregator.sequence_policy = SequencePolicy::Accept;

                let mut assembler = BatchAssembler::with_seed("bench_device", &config.signal, 42);
                let batch = assembler.assemble(0);
                let mut aggregator = StateAggregator::new(&config);

                b.iter(|| aggregator.apply(black_box(&batch)));
            },
        );
    }

    group.finish();
}

fn benchmark_classification(c: &mut Criterion) {
    let mut group = c.benchmark_group("classification");

    let config = signal_config(100, 2);
    let mut assembler = BatchAssembler::with_seed("bench_device", &config, 42);
    let batch = assembler.assemble(0);
    let mut extractor = FeatureExtractor::new(2000);
    let digest = extractor.digest(&batch);

    group.bench_function("random_stub", |b| {
        let mut classifier = RandomStubClassifier::with_seed(42);
        b.iter(|| classifier.classify(black_box(&batch), black_box(&digest)));
    });

    group.bench_function("energy_rule", |b| {
        let mut classifier = EnergyRuleClassifier::new();
        b.iter(|| classifier.classify(black_box(&batch), black_box(&digest)));
    });

    group.finish();
}

fn benchmark_monitoring_cycle(c: &mut Criterion) {
    let mut group = c.benchmark_group("monitoring_cycle");

    // One full consumer step: assemble, aggregate, digest, classify
    group.bench_function("assemble_to_prediction", |b| {
        let mut config = MonitorConfig::default();
        config.aggregator.sequence_policy = SequencePolicy::Accept;

        let mut assembler = BatchAssembler::with_seed("bench_device", &config.signal, 42);
        let mut aggregator = StateAggregator::new(&config);
        let mut extractor = FeatureExtractor::new(config.signal.sample_rate_hz);
        let mut classifier = RandomStubClassifier::with_seed(42);
        let mut sequence = 0u64;

        b.iter(|| {
            let batch = assembler.assemble(sequence);
            sequence += 1;
            let snapshot = aggregator.apply(black_box(&batch));
            let digest = extractor.digest(&batch);
            let prediction = classifier.classify(&batch, &digest);
            (snapshot, prediction)
        });
    });

    group.finish();
}

criterion_group!(
    benches,
    benchmark_batch_assembly,
    benchmark_feature_digest,
    benchmark_state_aggregation,
    benchmark_classification,
    benchmark_monitoring_cycle
);
criterion_main!(benches);
