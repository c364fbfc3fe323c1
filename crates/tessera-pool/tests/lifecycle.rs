//! End-to-end lifecycle tests across both allocation modes.

use std::mem::size_of;

use tessera_core::StructureKind;
use tessera_pool::{
    AllocMode, LifecycleConfig, ObjectLifecycle, PoolError, StructureTypeRegistry,
};
use tessera_test_utils::{DropCounter, TestBuffer, TestLogger, TestSocket, TestWindow};

fn registry() -> StructureTypeRegistry {
    StructureTypeRegistry::new()
        .with::<TestWindow>()
        .unwrap()
        .with::<TestLogger>()
        .unwrap()
        .with::<TestBuffer>()
        .unwrap()
        .with::<TestSocket>()
        .unwrap()
        .with::<DropCounter>()
        .unwrap()
}

#[test]
fn third_window_allocates_exactly_one_overflow_block() {
    let config = LifecycleConfig::pool()
        .with_base(StructureKind::Window, 2)
        .with_overflow(StructureKind::Window, 3);
    let mut lifecycle = ObjectLifecycle::new(&config, registry()).unwrap();

    let windows: Vec<_> = (0..3)
        .map(|i| lifecycle.create(TestWindow::new(i)).unwrap())
        .collect();

    let pool = lifecycle.pool().unwrap();
    let stats = pool.stats(StructureKind::Window).unwrap();
    assert_eq!(stats.chain_len, 2);
    assert_eq!(stats.overflow_blocks, 1);
    assert_eq!(stats.slot_capacity, 5);
    assert_eq!(stats.live, 3);
    assert_eq!(
        pool.overflow_block_sizes(StructureKind::Window),
        vec![3 * size_of::<TestWindow>()]
    );

    // Two more fit in the overflow block without another allocation.
    let more: Vec<_> = (3..5)
        .map(|i| lifecycle.create(TestWindow::new(i)).unwrap())
        .collect();
    assert_eq!(
        lifecycle
            .pool()
            .unwrap()
            .stats(StructureKind::Window)
            .unwrap()
            .overflow_blocks,
        1
    );

    for (i, w) in windows.iter().chain(&more).enumerate() {
        assert_eq!(lifecycle.get(w).unwrap().id, i as u32);
    }
    for w in windows.into_iter().chain(more) {
        lifecycle.destroy(w).unwrap();
    }
    assert_eq!(lifecycle.total_live(), 0);
}

#[test]
fn create_then_destroy_restores_free_count() {
    let mut lifecycle = ObjectLifecycle::new(&LifecycleConfig::pool(), registry()).unwrap();
    let before = lifecycle.pool().unwrap().free_slots(StructureKind::Socket);

    let socket = lifecycle.create(TestSocket { port: 9000 }).unwrap();
    assert_eq!(
        lifecycle.pool().unwrap().free_slots(StructureKind::Socket),
        before - 1
    );
    lifecycle.destroy(socket).unwrap();
    assert_eq!(
        lifecycle.pool().unwrap().free_slots(StructureKind::Socket),
        before
    );
}

#[test]
fn base_block_holds_every_registered_kind() {
    let config = LifecycleConfig::pool()
        .with_base(StructureKind::Window, 2)
        .with_base(StructureKind::Logger, 1)
        .with_base(StructureKind::Buffer, 1)
        .with_base(StructureKind::Sound, 1)
        .with_base(StructureKind::Socket, 4);
    let lifecycle = ObjectLifecycle::new(&config, registry()).unwrap();
    let pool = lifecycle.pool().unwrap();

    let payload = 2 * size_of::<TestWindow>()
        + size_of::<TestLogger>()
        + size_of::<TestBuffer>()
        + size_of::<DropCounter>()
        + 4 * size_of::<TestSocket>();
    assert!(pool.base_size() >= payload);
    for kind in pool.registry().kinds() {
        assert_eq!(pool.stats(kind).unwrap().chain_len, 1);
    }
}

#[test]
fn toml_config_drives_the_pool() {
    let config = LifecycleConfig::from_toml_str(
        r#"
        mode = "pool"

        [[base_reservations]]
        kind = "socket"
        count = 1

        [[overflow_reservations]]
        kind = "socket"
        count = 2
        "#,
    )
    .unwrap();
    assert_eq!(config.mode, AllocMode::Pool);

    let mut lifecycle = ObjectLifecycle::new(&config, registry()).unwrap();
    let a = lifecycle.create(TestSocket { port: 1 }).unwrap();
    let b = lifecycle.create(TestSocket { port: 2 }).unwrap();
    let pool = lifecycle.pool().unwrap();
    assert_eq!(
        pool.overflow_block_sizes(StructureKind::Socket),
        vec![2 * size_of::<TestSocket>()]
    );
    lifecycle.destroy(a).unwrap();
    lifecycle.destroy(b).unwrap();
}

#[test]
fn zero_count_in_toml_fails_creation() {
    let config = LifecycleConfig::from_toml_str(
        r#"
        mode = "pool"

        [[overflow_reservations]]
        kind = "window"
        count = 0
        "#,
    )
    .unwrap();
    let err = ObjectLifecycle::new(&config, registry()).unwrap_err();
    assert!(matches!(err, PoolError::Config(_)));
    assert!(err.to_string().contains("window"));
}

#[test]
fn every_object_is_dropped_exactly_once() {
    for config in [LifecycleConfig::individual(), LifecycleConfig::pool()] {
        let tally = DropCounter::tally();
        {
            let mut lifecycle = ObjectLifecycle::new(&config, registry()).unwrap();
            let kept = lifecycle.create(DropCounter::new(&tally)).unwrap();
            let taken = lifecycle.create(DropCounter::new(&tally)).unwrap();
            let _leaked = lifecycle.create(DropCounter::new(&tally)).unwrap();

            lifecycle.destroy(kept).unwrap();
            assert_eq!(DropCounter::count(&tally), 1);

            let value = lifecycle.take(taken).unwrap();
            assert_eq!(DropCounter::count(&tally), 1);
            drop(value);
            assert_eq!(DropCounter::count(&tally), 2);
            assert_eq!(lifecycle.total_live(), 1);
        }
        // The leaked object is dropped with the lifecycle.
        assert_eq!(DropCounter::count(&tally), 3, "mode {:?}", config.mode);
    }
}

#[test]
fn pooled_values_survive_chain_growth() {
    let config = LifecycleConfig::pool()
        .with_base(StructureKind::Logger, 1)
        .with_overflow(StructureKind::Logger, 1);
    let mut lifecycle = ObjectLifecycle::new(&config, registry()).unwrap();

    let loggers: Vec<_> = (0..4)
        .map(|i| {
            lifecycle
                .create(TestLogger {
                    name: format!("log{i}"),
                    patterns: vec!["[%l] %v".to_owned(); i],
                })
                .unwrap()
        })
        .collect();
    assert_eq!(
        lifecycle
            .pool()
            .unwrap()
            .stats(StructureKind::Logger)
            .unwrap()
            .chain_len,
        4
    );
    for (i, logger) in loggers.iter().enumerate() {
        let value = lifecycle.get(logger).unwrap();
        assert_eq!(value.name, format!("log{i}"));
        assert_eq!(value.patterns.len(), i);
    }
    for logger in loggers {
        lifecycle.destroy(logger).unwrap();
    }
}

#[test]
fn freed_overflow_slot_is_reused_before_growing() {
    let config = LifecycleConfig::pool()
        .with_base(StructureKind::Buffer, 1)
        .with_overflow(StructureKind::Buffer, 1);
    let mut lifecycle = ObjectLifecycle::new(&config, registry()).unwrap();

    let a = lifecycle.create(TestBuffer { size: 1, usage: 0 }).unwrap();
    let b = lifecycle.create(TestBuffer { size: 2, usage: 0 }).unwrap();
    lifecycle.destroy(b).unwrap();
    let c = lifecycle.create(TestBuffer { size: 3, usage: 0 }).unwrap();

    let stats = lifecycle
        .pool()
        .unwrap()
        .stats(StructureKind::Buffer)
        .unwrap();
    assert_eq!(stats.overflow_blocks, 1);
    assert_eq!(stats.live, 2);
    lifecycle.destroy(a).unwrap();
    lifecycle.destroy(c).unwrap();
}
