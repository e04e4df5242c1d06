//! Brain Gym entry point
//!
//! Handles platform-specific initialization and starts the app shell.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    brain_gym::app::run().await;
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Brain Gym (native) starting...");
    log::info!("The browser shell needs a DOM - run with `trunk serve` for the web version");

    // Run a quick headless round as a smoke check
    println!("\nRunning headless whack-a-mole round...");
    run_headless_round();
}

#[cfg(not(target_arch = "wasm32"))]
fn run_headless_round() {
    use brain_gym::games::whack_mole::WhackMoleGame;
    use brain_gym::Difficulty;

    let mut game = WhackMoleGame::new(Difficulty::Medium, 42);
    game.start(0.0);

    let mut now = 0.0;
    for second in 0..game.settings().duration_secs {
        for _ in 0..60 {
            now += 1000.0 / 60.0;
            game.advance(now);
            // Whack every mole the moment it shows
            let pending: Vec<usize> = game
                .moles()
                .filter(|m| m.is_pending())
                .map(|m| m.payload.hole)
                .collect();
            for hole in pending {
                game.whack(hole, now);
            }
        }
        if game.tick_second() {
            println!("round over after {} seconds", second + 1);
        }
    }

    println!("hits: {}, misses: {}", game.hits(), game.misses());
    assert!(game.result().is_some());
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
