//! Tower Flap entry point
//!
//! On the web: canvas setup, asset preload, input and the animation frame
//! loop. Natively: a headless run driven by a simple autopilot.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::HtmlCanvasElement;

    use tower_flap::platform::CanvasSurface;
    use tower_flap::{Game, GameConfig};

    /// Page-lifetime state. `game` is `None` once torn down.
    struct App {
        game: Option<Game>,
        surface: CanvasSurface,
        raf_handle: Option<i32>,
    }

    pub async fn run() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        let _ = console_log::init_with_level(log::Level::Info);

        log::info!("Tower Flap starting...");

        let window = web_sys::window().ok_or("no window")?;
        let document = window.document().ok_or("no document")?;

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .ok_or("no canvas")?
            .dyn_into()?;
        canvas.set_width(canvas.client_width().max(1) as u32);
        canvas.set_height(canvas.client_height().max(1) as u32);

        let config = GameConfig::load();
        let mut surface =
            CanvasSurface::new(&canvas).map_err(|e| JsValue::from_str(&e.to_string()))?;

        // Nothing is attached or scheduled until the sprite is decoded
        surface
            .preload(&config.body_texture)
            .await
            .map_err(|e| JsValue::from_str(&e.to_string()))?;

        let seed = js_sys::Date::now() as u64;
        let game = Game::init(config, seed, &mut surface)
            .map_err(|e| JsValue::from_str(&e.to_string()))?;
        log::info!("Game initialized with seed: {}", seed);

        if let Some(loading) = document.get_element_by_id("loading") {
            let _ = loading.set_attribute("class", "hidden");
        }

        let app = Rc::new(RefCell::new(App {
            game: Some(game),
            surface,
            raf_handle: None,
        }));

        setup_input_handlers(&canvas, app.clone());
        setup_teardown(app.clone());
        request_animation_frame(app);

        log::info!("Tower Flap running!");
        Ok(())
    }

    fn setup_input_handlers(canvas: &HtmlCanvasElement, app: Rc<RefCell<App>>) {
        // Mouse, touch and pen all arrive as pointerdown; every press counts
        let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::Event| {
            event.prevent_default();
            if let Some(game) = app.borrow_mut().game.as_mut() {
                game.pointer_down();
            }
        });
        let _ = canvas
            .add_event_listener_with_callback("pointerdown", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn setup_teardown(app: Rc<RefCell<App>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let window_clone = window.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            let mut guard = app.borrow_mut();
            let App {
                game,
                surface,
                raf_handle,
            } = &mut *guard;

            // No frame may run against released nodes
            if let Some(handle) = raf_handle.take() {
                let _ = window_clone.cancel_animation_frame(handle);
            }
            if let Some(game) = game.take() {
                game.teardown(surface);
            }
        });
        let _ = window.add_event_listener_with_callback("pagehide", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn request_animation_frame(app: Rc<RefCell<App>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let app_clone = app.clone();
        let closure = Closure::once(move |time: f64| {
            game_loop(app_clone, time);
        });
        match window.request_animation_frame(closure.as_ref().unchecked_ref()) {
            Ok(handle) => app.borrow_mut().raf_handle = Some(handle),
            Err(e) => log::error!("requestAnimationFrame failed: {:?}", e),
        }
        closure.forget();
    }

    fn game_loop(app: Rc<RefCell<App>>, time: f64) {
        {
            let mut guard = app.borrow_mut();
            let App {
                game,
                surface,
                raf_handle,
            } = &mut *guard;
            *raf_handle = None;

            let Some(game) = game.as_mut() else {
                return;
            };
            game.frame(time, surface);
            surface.draw();
        }

        request_animation_frame(app);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    if let Err(e) = wasm_game::run().await {
        log::error!("Startup failed: {:?}", e);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use tower_flap::renderer::HeadlessSurface;
    use tower_flap::sim::{GameEvent, Simulation};
    use tower_flap::{Game, GameConfig, GameError};

    const FRAME_MS: f64 = 1000.0 / 60.0;
    /// Frames to wait on the game-over screen before tapping again
    const RESTART_DELAY: u32 = 30;

    #[derive(Debug, Default)]
    pub struct Summary {
        pub frames: u32,
        pub runs: u32,
        pub best_score: u32,
        pub jumps: u32,
    }

    /// Tap when the body has sunk below where it needs to be for the next
    /// gap and is still falling
    fn wants_tap(sim: &Simulation) -> bool {
        let body = &sim.body;
        let target = sim
            .obstacles
            .iter()
            .find(|o| o.right() >= body.pos.x - body.size / 2.0)
            .map(|o| o.gap_center + o.gap * 0.15)
            .unwrap_or(sim.ground_y() * 0.5);
        body.pos.y > target && body.velocity >= 0.0
    }

    pub fn run(frames: u32, seed: u64, config: GameConfig) -> Result<Summary, GameError> {
        let mut surface = HeadlessSurface::new(400.0, 800.0);
        let mut game = Game::init(config, seed, &mut surface)?;
        let mut summary = Summary {
            runs: 1,
            ..Summary::default()
        };
        let mut dead_frames = 0;

        for frame in 0..frames {
            if game.state().is_dead() {
                dead_frames += 1;
                if dead_frames >= RESTART_DELAY {
                    game.pointer_down();
                    dead_frames = 0;
                }
            } else if wants_tap(game.simulation()) {
                game.pointer_down();
            }

            for event in game.frame(frame as f64 * FRAME_MS, &mut surface) {
                match event {
                    GameEvent::Jumped { .. } => summary.jumps += 1,
                    GameEvent::Restarted => summary.runs += 1,
                    GameEvent::Died { cause, score } => {
                        log::info!("Run {} over: {:?}, score {}", summary.runs, cause, score);
                        summary.best_score = summary.best_score.max(score);
                    }
                    GameEvent::Scored { score } => {
                        summary.best_score = summary.best_score.max(score);
                    }
                    GameEvent::ObstacleSpawned { .. } => {}
                }
            }
            summary.frames += 1;
        }

        game.teardown(&mut surface);
        debug_assert_eq!(surface.node_count(), 0);
        Ok(summary)
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Tower Flap (native) starting...");

    let mut args = std::env::args().skip(1);
    let frames = parse_arg(args.next(), "frames", 3600u32);
    let seed = parse_arg(args.next(), "seed", 42u64);
    let config = match args.next() {
        Some(path) => match tower_flap::GameConfig::load_from_path(&path) {
            Ok(config) => config,
            Err(e) => {
                log::error!("Failed to load {}: {}", path, e);
                std::process::exit(1);
            }
        },
        None => tower_flap::GameConfig::default(),
    };

    match native::run(frames, seed, config) {
        Ok(summary) => println!(
            "{} frames, {} runs, {} jumps, best score {}",
            summary.frames, summary.runs, summary.jumps, summary.best_score
        ),
        Err(e) => {
            log::error!("Startup failed: {}", e);
            std::process::exit(1);
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn parse_arg<T: std::str::FromStr>(arg: Option<String>, name: &str, default: T) -> T {
    match arg {
        Some(raw) => raw.parse().unwrap_or_else(|_| {
            log::warn!("Ignoring invalid {} `{}`", name, raw);
            default
        }),
        None => default,
    }
}
