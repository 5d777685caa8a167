//! Frame loop example for frame-toolbox.
//!
//! Demonstrates:
//! - A process-wide toolbox declared with `define_toolbox!`
//! - Singletons created on first `get()` and reused afterwards
//! - Plain objects registered on construction and disposed explicitly
//! - A faulting update hook aborting only the rest of its pass
//!
//! Run with: `RUST_LOG=frame_toolbox=debug cargo run --example frame_loop`

use frame_toolbox::{
    define_toolbox, Behaviour, EngineBound, ObjectCore, PlainObject, Scope, Singleton,
};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

define_toolbox!(game);

struct Score {
    core: ObjectCore,
    points: AtomicU32,
}

impl Behaviour for Score {
    fn core(&self) -> &ObjectCore {
        &self.core
    }

    fn game_update(&self) -> anyhow::Result<()> {
        self.points.fetch_add(10, Ordering::Relaxed);
        Ok(())
    }
}

impl EngineBound for Score {}

impl Singleton for Score {
    fn create(core: ObjectCore) -> anyhow::Result<Self> {
        Ok(Score {
            core,
            points: AtomicU32::new(0),
        })
    }
}

struct Enemy {
    core: ObjectCore,
    health: AtomicU32,
}

impl Behaviour for Enemy {
    fn core(&self) -> &ObjectCore {
        &self.core
    }

    fn game_update(&self) -> anyhow::Result<()> {
        let before = self.health.load(Ordering::Relaxed);
        if before == 0 {
            anyhow::bail!("updated after death");
        }
        self.health.store(before - 1, Ordering::Relaxed);
        Ok(())
    }
}

impl PlainObject for Enemy {
    fn dispose(self: &Arc<Self>, scope: &Scope) {
        self.log("despawned");
        self.unregister_instance(scope);
    }
}

fn main() -> anyhow::Result<()> {
    frame_toolbox::logger::init()?;

    println!("=== frame-toolbox: Frame Loop ===\n");

    let score = game::get::<Score>().expect("score singleton");
    let again = game::get::<Score>().expect("score singleton");
    println!("1. Same Score instance on second get(): {}", Arc::ptr_eq(&score, &again));

    let grunt = game::scope().spawn(Enemy {
        core: ObjectCore::plain::<Enemy>(),
        health: AtomicU32::new(1),
    });
    let brute = game::scope().spawn(Enemy {
        core: ObjectCore::plain::<Enemy>(),
        health: AtomicU32::new(3),
    });
    println!("2. Registered objects: {}", game::scope().instances().len());

    println!("\n3. Running frames...");
    for frame_no in 1..=3 {
        let frame = game::on_update();
        println!(
            "   frame {frame_no}: singletons visited {}, instances visited {}, faults {}",
            frame.singletons.visited,
            frame.instances.visited,
            frame.faults().count()
        );
    }

    println!("\n4. Disposing the grunt...");
    grunt.dispose(game::scope());
    let frame = game::on_update();
    println!("   faults after dispose: {}", frame.faults().count());

    println!("\n=== Example Complete ===");
    println!("Score: {}", score.points.load(Ordering::Relaxed));
    println!("Brute health: {}", brute.health.load(Ordering::Relaxed));
    Ok(())
}
