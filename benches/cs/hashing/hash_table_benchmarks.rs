use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use hashlab::cs::hashing::{
    bucket_distribution, ChainedHashTableBuilder, HashAlgorithm, OpenAddressingBuilder,
    ProbeStrategy,
};
use rand::distributions::Alphanumeric;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const INITIAL_SIZE: usize = 1000;
const LOAD_FACTORS: [f64; 4] = [0.1, 0.5, 0.7, 0.9];

fn random_keys(count: usize, len: usize, seed: u64) -> Vec<String> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..count)
        .map(|_| {
            (&mut rng)
                .sample_iter(&Alphanumeric)
                .take(len)
                .map(char::from)
                .collect()
        })
        .collect()
}

/// Engine under test, so one loop can drive chaining and both probe strategies.
#[derive(Clone, Copy)]
enum Engine {
    Chaining,
    Open(ProbeStrategy),
}

impl Engine {
    const ALL: [Engine; 3] = [
        Engine::Chaining,
        Engine::Open(ProbeStrategy::Linear),
        Engine::Open(ProbeStrategy::Double),
    ];

    fn label(&self) -> &'static str {
        match self {
            Engine::Chaining => "chaining",
            Engine::Open(ProbeStrategy::Linear) => "linear",
            Engine::Open(ProbeStrategy::Double) => "double",
        }
    }

    /// Inserts, looks up, then deletes every key.
    /// Returns a value derived from the table so the work is not optimized away.
    fn run(&self, hash: HashAlgorithm, load_factor: f64, keys: &[String]) -> usize {
        match *self {
            Engine::Chaining => {
                let mut table = ChainedHashTableBuilder::new()
                    .with_capacity(INITIAL_SIZE)
                    .with_max_load_factor(load_factor)
                    .with_hash_function(hash)
                    .build()
                    .expect("valid benchmark configuration");
                for (i, key) in keys.iter().enumerate() {
                    table.insert(key.as_str(), i);
                }
                let hits = keys.iter().filter(|k| table.find(k).is_some()).count();
                let collisions = table.collision_statistics().total_collisions;
                for key in keys {
                    table.delete(key);
                }
                hits + collisions
            }
            Engine::Open(strategy) => {
                let mut table = OpenAddressingBuilder::new()
                    .with_capacity(INITIAL_SIZE)
                    .with_max_load_factor(load_factor)
                    .with_probe_strategy(strategy)
                    .with_hash_function(hash)
                    .build()
                    .expect("valid benchmark configuration");
                for (i, key) in keys.iter().enumerate() {
                    table.insert(key.as_str(), i);
                }
                let hits = keys.iter().filter(|k| table.find(k).is_some()).count();
                let probes = table.probe_statistics().total_probes;
                for key in keys {
                    table.delete(key);
                }
                hits + probes
            }
        }
    }
}

fn bench_hash_tables(c: &mut Criterion) {
    for engine in Engine::ALL {
        let mut group = c.benchmark_group(format!("hash_table/{}", engine.label()));
        for hash in HashAlgorithm::ALL {
            for load_factor in LOAD_FACTORS {
                let count = (INITIAL_SIZE as f64 * load_factor) as usize;
                let keys = random_keys(count, 10, 42);
                group.bench_with_input(
                    BenchmarkId::new(hash.name(), load_factor),
                    &keys,
                    |b, keys| b.iter(|| black_box(engine.run(hash, load_factor, keys))),
                );
            }
        }
        group.finish();
    }
}

fn bench_hash_functions(c: &mut Criterion) {
    let keys = random_keys(1000, 10, 7);
    let mut group = c.benchmark_group("hash_distribution");
    for hash in HashAlgorithm::ALL {
        let id = BenchmarkId::from_parameter(hash.name());
        group.bench_with_input(id, &keys, |b, keys| {
            b.iter(|| {
                bucket_distribution(&hash, black_box(keys), 100)
                    .expect("non-zero capacity")
                    .std_dev
            })
        });
    }
    group.finish();
}

criterion_group!(benches, bench_hash_tables, bench_hash_functions);
criterion_main!(benches);
