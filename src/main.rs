//! Balloon Hop entry point
//!
//! On the web the page drives the core through the wasm exports in
//! `platform`. Natively this plays a scripted round headless and logs what
//! happens, which is handy for tuning.
//!
//! Usage: `balloon-hop [config.json]`

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use balloon_hop::sim::{EngineConfig, GamePhase};
    use balloon_hop::{Engine, InputState, platform};

    platform::init_logging();
    log::info!("Balloon Hop (native) starting...");

    let config = match std::env::args().nth(1) {
        Some(path) => match EngineConfig::load(&path) {
            Ok(config) => config,
            Err(err) => {
                log::error!("Failed to load {}: {}", path, err);
                std::process::exit(1);
            }
        },
        None => EngineConfig::default(),
    };

    const DT: f32 = 1.0 / 60.0;
    let mut engine = Engine::new(config);
    engine.init();

    let mut input = InputState::released();
    let mut frame: u64 = 0;

    while engine.phase() != GamePhase::Ended && frame < 60 * 600 {
        // Scripted play: tap action every second, pace left and right
        let second = frame / 60;
        let tap = frame % 60 == 0;
        let going_right = (second / 3) % 2 == 0;
        input.action = input.action.update(tap);
        input.left = input.left.update(!going_right);
        input.right = input.right.update(going_right);

        if let Some(event) = engine.step(DT, input) {
            log::debug!("frame {}: {:?}", frame, event);
        }
        input.settle();
        frame += 1;

        if frame % 600 == 0 {
            log::info!(
                "t={}s score={} timer={:.1} balloons={}",
                frame / 60,
                engine.score(),
                engine.settings().game_timer(),
                engine.store().active_count().saturating_sub(1)
            );
        }
    }

    log::info!("Final score: {} after {} frames", engine.score(), frame);
    match engine.snapshot_json() {
        Ok(json) => log::debug!("Final state: {}", json),
        Err(err) => log::warn!("Snapshot failed: {}", err),
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is platform::start, this is just to satisfy the compiler
}
