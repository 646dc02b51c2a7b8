//! Ledger and roster aggregation benchmarks.
//!
//! Run with: `cargo bench`
//! Covers rating churn on one ledger and the "also chosen by" scan over a full party.

use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion, Throughput};
use gumshoe::creation::{usage_for, Character};
use gumshoe::data::AbilityCategory;
use gumshoe::rules::AbilityLedger;

const ABILITIES: [&str; 12] = [
    "Accounting",
    "Archaeology",
    "Assess Honesty",
    "Bargain",
    "Cop Talk",
    "Cryptography",
    "Forensics",
    "History",
    "Law",
    "Locksmith",
    "Occult Studies",
    "Research",
];

fn full_party() -> Vec<Character> {
    (1..=6u32)
        .map(|id| {
            let mut character = Character::new(id);
            character.name = format!("Investigator {id}");
            for (offset, ability) in ABILITIES.iter().enumerate() {
                let rating = (offset as u32 + id) % 4;
                character.set_rating(AbilityCategory::Investigative, ability, rating);
            }
            character
        })
        .collect()
}

fn bench_ledger(c: &mut Criterion) {
    let mut group = c.benchmark_group("ledger");
    group.throughput(Throughput::Elements(ABILITIES.len() as u64));

    group.bench_function("increase_to_budget", |b| {
        b.iter_batched(
            AbilityLedger::default,
            |mut ledger| {
                for ability in ABILITIES {
                    while ledger.increase(black_box(ability), 32) {
                        if ledger.rating(ability) >= 3 {
                            break;
                        }
                    }
                }
                ledger
            },
            BatchSize::SmallInput,
        )
    });

    group.bench_function("set_and_clear", |b| {
        b.iter_batched(
            AbilityLedger::default,
            |mut ledger| {
                for (rating, ability) in ABILITIES.iter().enumerate() {
                    ledger.set_rating(ability, rating as u32);
                }
                for ability in ABILITIES {
                    ledger.set_rating(ability, 0);
                }
                ledger
            },
            BatchSize::SmallInput,
        )
    });

    group.finish();
}

fn bench_usage(c: &mut Criterion) {
    let roster = full_party();
    let mut group = c.benchmark_group("usage");
    group.throughput(Throughput::Elements(roster.len() as u64));

    group.bench_function("usage_for_six_players", |b| {
        b.iter(|| usage_for(black_box(&roster), 2, AbilityCategory::Investigative))
    });

    group.finish();
}

criterion_group!(benches, bench_ledger, bench_usage);
criterion_main!(benches);
