//! Roast Arena entry point
//!
//! The browser build is driven entirely by the exported hooks in the
//! library. Natively this runs one headless volley against a stand-in
//! server so the engine can be exercised without a page.

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Roast Arena (native) starting...");
    log::info!("The web build is driven by the page hooks; running a headless volley");

    let summary = headless::volley(3000.0);
    println!(
        "Fired for {:.0}ms: {} hit reports, {} confirmed hits, {} misses, damage level {}",
        summary.duration_ms, summary.reports, summary.hits, summary.misses, summary.damage
    );
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is `web::wasm_start`, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use glam::Vec2;
    use roast_arena::platform::headless::{CountingSound, HeadlessStage, RecordingChannel};
    use roast_arena::sim::{Rect, TargetGeometry};
    use roast_arena::{Arena, Hook, Inbound, Outbound, Tuning};

    /// Frame period of the simulated page
    const FRAME_MS: f64 = 16.0;
    /// The stand-in server rejects every Nth report
    const MISS_EVERY: usize = 4;

    pub struct Summary {
        pub duration_ms: f64,
        pub reports: usize,
        pub hits: u32,
        pub misses: usize,
        pub damage: u8,
    }

    pub fn volley(duration_ms: f64) -> Summary {
        let surface = Rect::new(0.0, 0.0, 800.0, 600.0);
        let body = Rect::centered(Vec2::new(400.0, 200.0), Vec2::new(100.0, 80.0));
        let core = Rect::centered(Vec2::new(400.0, 215.0), Vec2::new(15.0, 12.0));
        let mut stage = HeadlessStage::new(surface, Some(TargetGeometry { body, core: Some(core) }));
        stage.intensity = 2;

        let mut arena = Arena::new(
            stage,
            RecordingChannel::default(),
            CountingSound::default(),
            Tuning::default(),
            7,
        );
        arena.attach(0.0);
        arena.pointer_move(core.center());
        arena.pointer_enter();

        let mut answered = 0;
        let mut misses = 0;
        let mut now = 0.0;
        while now < duration_ms {
            now += FRAME_MS;
            arena.advance(now);

            // Answer every new report the way the server would
            let sent = arena.channel().sent.len();
            for i in answered..sent {
                if !matches!(arena.channel().sent[i], Outbound::HitAttempt(_)) {
                    continue;
                }
                if (i + 1) % MISS_EVERY == 0 {
                    misses += 1;
                    arena.on_event(Inbound::Miss);
                } else {
                    arena.on_event(Inbound::Hit);
                }
            }
            answered = sent;
        }

        arena.pointer_leave();
        let summary = Summary {
            duration_ms,
            reports: arena.channel().sent.len(),
            hits: arena.hits(),
            misses,
            damage: arena.stage().damage,
        };
        arena.detach();
        log::info!(
            "Volley done; {} timers left after detach",
            arena.scheduler().len()
        );
        summary
    }
}
