use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use repcode::{ExpandingCode, Recovery};

const BASIS_SIZE: u32 = 64;
const MESSAGE_LEN: usize = 4096;

fn message(seed: u64) -> Vec<u32> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    (0..MESSAGE_LEN)
        .map(|_| rng.gen_range(0..BASIS_SIZE))
        .collect()
}

fn bench_encode(c: &mut Criterion) {
    let mut group = c.benchmark_group("expanding_code_encode");
    group.throughput(Throughput::Elements(MESSAGE_LEN as u64));
    let input = message(1);

    for distance in [1, 3, 7] {
        let code = ExpandingCode::new((0..BASIS_SIZE).collect(), distance).unwrap();
        group.bench_with_input(BenchmarkId::from_parameter(distance), &input, |b, input| {
            b.iter(|| code.encode(black_box(input)).unwrap())
        });
    }
    group.finish();
}

fn bench_decode(c: &mut Criterion) {
    let mut group = c.benchmark_group("expanding_code_decode");
    group.throughput(Throughput::Elements(MESSAGE_LEN as u64));
    let input = message(2);

    for distance in [1, 3, 7] {
        let code = ExpandingCode::new((0..BASIS_SIZE).collect(), distance).unwrap();
        let encoded = code.encode(&input).unwrap();
        group.bench_with_input(BenchmarkId::from_parameter(distance), &encoded, |b, encoded| {
            b.iter(|| code.decode(black_box(encoded)).unwrap())
        });
    }
    group.finish();
}

fn bench_decode_corrupted(c: &mut Criterion) {
    let mut group = c.benchmark_group("expanding_code_decode_corrupted");
    group.throughput(Throughput::Elements(MESSAGE_LEN as u64));
    let input = message(3);
    let mut rng = ChaCha8Rng::seed_from_u64(4);

    for distance in [3, 7] {
        let code = ExpandingCode::new((0..BASIS_SIZE).collect(), distance).unwrap();
        let mut encoded = code.encode(&input).unwrap();
        for chunk in 0..MESSAGE_LEN {
            let offset = rng.gen_range(0..code.chunk_len());
            encoded.flip(chunk * code.chunk_len() + offset).unwrap();
        }

        for recovery in [Recovery::Disabled, Recovery::Enabled] {
            group.bench_with_input(
                BenchmarkId::new(format!("{:?}", recovery), distance),
                &encoded,
                |b, encoded| b.iter(|| code.decode_with(black_box(encoded), recovery).unwrap()),
            );
        }
    }
    group.finish();
}

criterion_group!(benches, bench_encode, bench_decode, bench_decode_corrupted);
criterion_main!(benches);
