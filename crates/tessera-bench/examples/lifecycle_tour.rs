//! Walk through the object lifecycle in both allocation modes.
//!
//! Demonstrates: load a config from TOML → register types → create past
//! the base reservation → inspect chain growth → destroy → teardown.
//!
//! Run with `RUST_LOG=tessera_pool=debug` to see overflow blocks being
//! allocated.

use tessera_core::StructureKind;
use tessera_pool::{LifecycleConfig, ObjectLifecycle, StructureTypeRegistry};
use tessera_test_utils::{TestLogger, TestSocket, TestWindow};
use tracing_subscriber::EnvFilter;

const CONFIG: &str = r#"
mode = "pool"

[[base_reservations]]
kind = "window"
count = 2

[[overflow_reservations]]
kind = "window"
count = 3
"#;

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("tessera_pool=info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(false)
        .init();
}

fn registry() -> StructureTypeRegistry {
    StructureTypeRegistry::new()
        .with::<TestWindow>()
        .unwrap()
        .with::<TestLogger>()
        .unwrap()
        .with::<TestSocket>()
        .unwrap()
}

fn main() {
    init_tracing();
    println!("=== Tessera Lifecycle Tour ===\n");

    let config = LifecycleConfig::from_toml_str(CONFIG).unwrap();
    let registry = registry();

    println!("Structure table:");
    for row in registry.structure_table(&config) {
        println!(
            "  {:<8} {:>4} bytes  base {:>3}  overflow {:>3}",
            row.kind.name(),
            row.instance_size,
            row.reserved_count,
            row.overflow_count
        );
    }

    let mut lifecycle = ObjectLifecycle::new(&config, registry).unwrap();
    println!(
        "\nBase block: {} bytes",
        lifecycle.pool().unwrap().base_size()
    );

    // --- Windows: 2 in the base block, the rest spill into overflow ---
    let windows: Vec<_> = (0..6)
        .map(|i| lifecycle.create(TestWindow::new(i)).unwrap())
        .collect();
    let stats = lifecycle.pool().unwrap().stats(StructureKind::Window).unwrap();
    println!(
        "6 windows: chain_len={} overflow_blocks={} capacity={} free={}",
        stats.chain_len, stats.overflow_blocks, stats.slot_capacity, stats.free_slots
    );

    for w in windows {
        lifecycle.destroy(w).unwrap();
    }
    let stats = lifecycle.pool().unwrap().stats(StructureKind::Window).unwrap();
    println!(
        "after destroy: live={} free={} (blocks are kept)",
        stats.live, stats.free_slots
    );

    // --- Same calls in individual mode ---
    let mut heap = ObjectLifecycle::new(&LifecycleConfig::individual(), StructureTypeRegistry::new())
        .unwrap();
    let socket = heap.create(TestSocket { port: 7777 }).unwrap();
    println!(
        "\nIndividual mode: socket on port {} (pooled: {})",
        heap.get(&socket).unwrap().port,
        socket.is_pooled()
    );
    heap.destroy(socket).unwrap();

    // --- A leaked logger is reported and dropped at teardown ---
    let _leaked = lifecycle
        .create(TestLogger {
            name: "leaky".into(),
            patterns: vec![],
        })
        .unwrap();
    println!("\nDropping lifecycle with {} live object(s)", lifecycle.total_live());
    drop(lifecycle);

    println!("\n=== Done ===");
}
