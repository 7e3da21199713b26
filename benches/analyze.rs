use std::{fs, hint::black_box, io::Cursor, path::PathBuf, time::Duration};

use criterion::{BatchSize, BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use hound::{SampleFormat, WavReader, WavSpec};
use wav_input_source::{WavInputSource, create_input_source};

const SAMPLE_RATES: &[u32] = &[44_100, 96_000];
const CHANNEL_OPTIONS: &[u16] = &[1, 2];
const ASSET_DIR: &str = "target/bench_assets";
const SIGNAL_DURATION_MS: u64 = 250;
const BLOCKS_PER_READ: usize = 4096;

#[derive(Clone)]
struct Scenario {
    path: PathBuf,
    bytes: Vec<u8>,
    block_align: usize,
}

fn bench_analyze(c: &mut Criterion) {
    let mut group = c.benchmark_group("analyze");
    configure_group(&mut group);

    for &sample_rate in SAMPLE_RATES {
        for &channels in CHANNEL_OPTIONS {
            let scenario = prepare_scenario(sample_rate, channels);
            let label = case_label(sample_rate, channels);

            let bytes = scenario.bytes.clone();
            group.bench_function(BenchmarkId::new("cursor", &label), move |b| {
                b.iter_batched(
                    || Cursor::new(bytes.clone()),
                    |cursor| black_box(WavInputSource::new(cursor).expect("analyse wav")),
                    BatchSize::SmallInput,
                );
            });

            let path = scenario.path.clone();
            group.bench_function(BenchmarkId::new("file", &label), move |b| {
                b.iter(|| black_box(create_input_source(&path).expect("open wav")));
            });
        }
    }

    group.finish();
}

fn bench_read_blocks(c: &mut Criterion) {
    let mut group = c.benchmark_group("read_blocks");
    configure_group(&mut group);

    for &sample_rate in SAMPLE_RATES {
        for &channels in CHANNEL_OPTIONS {
            let scenario = prepare_scenario(sample_rate, channels);
            let label = case_label(sample_rate, channels);
            group.throughput(Throughput::Bytes(scenario.bytes.len() as u64));

            let input = scenario.clone();
            group.bench_function(BenchmarkId::new("input-source", &label), move |b| {
                let mut buffer = vec![0u8; BLOCKS_PER_READ * input.block_align];
                b.iter_batched(
                    || WavInputSource::new(Cursor::new(input.bytes.clone())).expect("analyse wav"),
                    |mut source| {
                        let mut total = 0;
                        loop {
                            let read = source
                                .read_blocks(&mut buffer, BLOCKS_PER_READ)
                                .expect("read blocks");
                            if read.blocks == 0 {
                                break;
                            }
                            total += read.bytes;
                        }
                        black_box(total);
                    },
                    BatchSize::SmallInput,
                );
            });

            let hound_input = scenario.bytes.clone();
            group.bench_function(BenchmarkId::new("hound", &label), move |b| {
                b.iter_batched(
                    || WavReader::new(Cursor::new(hound_input.clone())).expect("open wav"),
                    |mut reader| {
                        let samples: Vec<i16> = reader
                            .samples::<i16>()
                            .map(|result| result.expect("hound read"))
                            .collect();
                        black_box(samples);
                    },
                    BatchSize::SmallInput,
                );
            });
        }
    }

    group.finish();
}

fn configure_group(group: &mut criterion::BenchmarkGroup<'_, criterion::measurement::WallTime>) {
    group.sample_size(30);
    group.measurement_time(Duration::from_secs(5));
}

fn prepare_scenario(sample_rate: u32, channels: u16) -> Scenario {
    let spec = WavSpec {
        channels,
        sample_rate,
        bits_per_sample: 16,
        sample_format: SampleFormat::Int,
    };
    let frames = sample_rate as u64 * SIGNAL_DURATION_MS / 1000;

    let mut cursor = Cursor::new(Vec::new());
    {
        let mut writer = hound::WavWriter::new(&mut cursor, spec).expect("create writer");
        for frame in 0..frames {
            let value = ((frame as f32 * 440.0 / sample_rate as f32).sin() * 8_000.0) as i16;
            for _ in 0..channels {
                writer.write_sample(value).expect("write sample");
            }
        }
        writer.finalize().expect("finalize wav");
    }
    let bytes = cursor.into_inner();

    let path = assets_dir().join(format!("{}.wav", case_label(sample_rate, channels)));
    fs::write(&path, &bytes).expect("write bench asset");

    Scenario {
        path,
        bytes,
        block_align: channels as usize * 2,
    }
}

fn assets_dir() -> PathBuf {
    let dir = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join(ASSET_DIR);
    fs::create_dir_all(&dir).expect("Failed to create asset directory");
    dir
}

fn case_label(sample_rate: u32, channels: u16) -> String {
    format!("{}hz_{}ch", sample_rate, channels)
}

criterion_group!(
    name = input_source_benches;
    config = Criterion::default()
        .warm_up_time(Duration::from_secs(2))
        .configure_from_args();
    targets = bench_analyze, bench_read_blocks
);
criterion_main!(input_source_benches);
