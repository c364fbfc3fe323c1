//! Criterion micro-benchmarks for object creation and destruction in both
//! allocation modes.

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, Criterion};
use tessera_bench::{churn_schedule, reference_config, tight_config, ChurnOp};
use tessera_core::StructureKind;
use tessera_pool::{LifecycleConfig, ObjectLifecycle, StructureTypeRegistry};
use tessera_test_utils::{TestSocket, TestWindow};

fn registry() -> StructureTypeRegistry {
    StructureTypeRegistry::new()
        .with::<TestSocket>()
        .unwrap()
        .with::<TestWindow>()
        .unwrap()
}

/// Create then destroy one socket, reusing the same base slot each time.
fn bench_create_destroy(c: &mut Criterion) {
    for (name, config) in [
        ("create_destroy_individual", LifecycleConfig::individual()),
        ("create_destroy_pool", reference_config()),
    ] {
        let mut lifecycle = ObjectLifecycle::new(&config, registry()).unwrap();
        c.bench_function(name, |b| {
            b.iter(|| {
                let h = lifecycle.create(TestSocket { port: 80 }).unwrap();
                black_box(lifecycle.get(&h).unwrap().port);
                lifecycle.destroy(h).unwrap();
            });
        });
    }
}

/// Run a 1K-step churn schedule on windows from a fresh lifecycle.
fn bench_churn_1k(c: &mut Criterion) {
    let schedule = churn_schedule(42, 1_000);
    for (name, config) in [
        ("churn_1k_individual", LifecycleConfig::individual()),
        ("churn_1k_pool", reference_config()),
        ("churn_1k_pool_tight", tight_config(&[StructureKind::Window])),
    ] {
        c.bench_function(name, |b| {
            b.iter(|| {
                let mut lifecycle = ObjectLifecycle::new(&config, registry()).unwrap();
                let mut live = Vec::new();
                for (i, op) in schedule.iter().enumerate() {
                    match *op {
                        ChurnOp::Create => {
                            live.push(lifecycle.create(TestWindow::new(i as u32)).unwrap());
                        }
                        ChurnOp::Destroy(at) => {
                            let h = live.swap_remove(at);
                            lifecycle.destroy(h).unwrap();
                        }
                    }
                }
                for h in live {
                    lifecycle.destroy(h).unwrap();
                }
            });
        });
    }
}

criterion_group!(benches, bench_create_destroy, bench_churn_1k);
criterion_main!(benches);
