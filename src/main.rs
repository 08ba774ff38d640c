//! Neon Breakdown entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{HtmlCanvasElement, KeyboardEvent, MouseEvent, TouchEvent};

    use neon_breakdown::renderer::RenderState;
    use neon_breakdown::sim::GameEvent;
    use neon_breakdown::{FrameDriver, GameConfig};

    /// Game instance holding all state
    struct Game {
        driver: FrameDriver,
        render_state: Option<RenderState>,
        canvas: HtmlCanvasElement,
        /// Pending requestAnimationFrame handle
        raf_id: Option<i32>,
        last_fps_log: f64,
    }

    impl Game {
        fn new(canvas: HtmlCanvasElement, config: GameConfig) -> Self {
            Self {
                driver: FrameDriver::new(config),
                render_state: None,
                canvas,
                raf_id: None,
                last_fps_log: 0.0,
            }
        }

        /// Track where the canvas is displayed so pointer input scales
        fn update_viewport(&mut self) {
            let rect = self.canvas.get_bounding_client_rect();
            self.driver.viewport_mut().set_display_rect(
                rect.left() as f32,
                rect.top() as f32,
                rect.width() as f32,
                rect.height() as f32,
            );
        }

        /// One display refresh: simulate, react to events, draw
        fn step(&mut self, time: f64) {
            let output = self.driver.frame(time);
            for event in output.events {
                self.handle_event(event);
            }

            if time - self.last_fps_log > 5000.0 {
                self.last_fps_log = time;
                log::debug!("FPS: {}", self.driver.fps());
            }

            self.render();
        }

        fn handle_event(&mut self, event: GameEvent) {
            let state = self.driver.state();
            match event {
                GameEvent::PaddleHit | GameEvent::BrickHit => {
                    log::trace!("{:?} (score {})", event, state.score);
                }
                GameEvent::BallOut => log::info!("Ball out"),
                GameEvent::LifeLost => log::info!("Lives: {}", state.lives),
                GameEvent::GameOver => {
                    log::info!("Game over - score {} on level {} (R to restart)", state.score, state.level)
                }
                GameEvent::LevelComplete => {
                    log::info!("Level {} complete - score {}", state.level, state.score);
                    self.driver.next_level();
                }
            }
        }

        /// Render the current frame
        fn render(&mut self) {
            if let Some(ref mut render_state) = self.render_state {
                match render_state.draw_game(self.driver.state()) {
                    Ok(_) => {}
                    Err(wgpu::SurfaceError::Lost) => {
                        render_state.resize(render_state.size.0, render_state.size.1);
                    }
                    Err(wgpu::SurfaceError::OutOfMemory) => {
                        log::error!("Out of memory!");
                    }
                    Err(e) => log::warn!("Render error: {:?}", e),
                }
            }
        }

        /// Stop the loop and cancel the scheduled frame
        fn teardown(&mut self) {
            self.driver.teardown();
            if let (Some(id), Some(window)) = (self.raf_id.take(), web_sys::window()) {
                let _ = window.cancel_animation_frame(id);
            }
        }
    }

    pub async fn run() -> Result<(), JsValue> {
        log::info!("Neon Breakdown starting...");

        let window = web_sys::window().ok_or("no window")?;
        let document = window.document().ok_or("no document")?;

        // Hide loading indicator
        if let Some(loading) = document.get_element_by_id("loading") {
            let _ = loading.set_attribute("class", "hidden");
        }

        let canvas: HtmlCanvasElement = match document.get_element_by_id("canvas") {
            Some(el) => el.dyn_into()?,
            None => {
                let el: HtmlCanvasElement = document.create_element("canvas")?.dyn_into()?;
                el.set_id("canvas");
                document.body().ok_or("no body")?.append_child(&el)?;
                el
            }
        };

        // Fixed logical resolution; CSS may stretch it
        let config = GameConfig {
            seed: js_sys::Date::now() as u64,
            ..Default::default()
        };
        let width = config.canvas_width as u32;
        let height = config.canvas_height as u32;
        canvas.set_width(width);
        canvas.set_height(height);

        let canvas_size = (config.canvas_width, config.canvas_height);
        let seed = config.seed;
        let game = Rc::new(RefCell::new(Game::new(canvas.clone(), config)));
        game.borrow_mut().update_viewport();
        log::info!("Game initialized with seed: {}", seed);

        // Initialize WebGPU
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU | wgpu::Backends::GL,
            ..Default::default()
        });

        let surface = instance
            .create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone()))
            .map_err(|e| JsValue::from_str(&e.to_string()))?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .map_err(|e| JsValue::from_str(&e.to_string()))?;

        log::info!("Using adapter: {:?}", adapter.get_info().name);

        let render_state = RenderState::new(surface, &adapter, width, height, canvas_size)
            .await
            .map_err(|e| JsValue::from_str(&e.to_string()))?;
        game.borrow_mut().render_state = Some(render_state);

        setup_input_handlers(game.clone())?;

        // Start game loop
        request_animation_frame(game);

        log::info!("Neon Breakdown running!");
        Ok(())
    }

    fn setup_input_handlers(game: Rc<RefCell<Game>>) -> Result<(), JsValue> {
        let window = web_sys::window().ok_or("no window")?;

        // Pointer listeners live on the window so the paddle keeps tracking
        // (and clamps) after the pointer leaves the canvas
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                let mut g = game.borrow_mut();
                g.update_viewport();
                g.driver.pointer_moved(event.client_x() as f32);
            });
            window.add_event_listener_with_callback("mousemove", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        // Touch start and move; non-passive so scrolling can be suppressed
        let options = web_sys::AddEventListenerOptions::new();
        options.set_passive(false);
        for kind in ["touchstart", "touchmove"] {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                if let Some(touch) = event.touches().get(0) {
                    let mut g = game.borrow_mut();
                    g.update_viewport();
                    g.driver.pointer_moved(touch.client_x() as f32);
                }
            });
            window.add_event_listener_with_callback_and_add_event_listener_options(
                kind,
                closure.as_ref().unchecked_ref(),
                &options,
            )?;
            closure.forget();
        }

        // Keyboard
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let restart_loop = {
                    let mut g = game.borrow_mut();
                    match event.key().as_str() {
                        "Escape" => {
                            g.driver.toggle_pause();
                            false
                        }
                        "r" | "R" => {
                            g.driver.restart();
                            g.raf_id.is_none()
                        }
                        "q" | "Q" => {
                            g.teardown();
                            false
                        }
                        _ => false,
                    }
                };
                if restart_loop {
                    request_animation_frame(game.clone());
                }
            });
            window.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        Ok(())
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let loop_game = game.clone();
        let closure = Closure::once(move |time: f64| {
            game_loop(loop_game, time);
        });
        match window.request_animation_frame(closure.as_ref().unchecked_ref()) {
            Ok(id) => game.borrow_mut().raf_id = Some(id),
            Err(e) => log::error!("requestAnimationFrame failed: {:?}", e),
        }
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>, time: f64) {
        let running = {
            let mut g = game.borrow_mut();
            g.raf_id = None;
            g.step(time);
            g.driver.is_running()
        };

        if running {
            request_animation_frame(game);
        }
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Info);

    if let Err(e) = wasm_game::run().await {
        log::error!("Failed to start: {:?}", e);
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> anyhow::Result<()> {
    env_logger::init();
    headless::run(std::env::args().skip(1))
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Headless autopilot run for smoke testing the simulation natively
#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use anyhow::{Context, bail};

    use neon_breakdown::sim::{GameEvent, GamePhase};
    use neon_breakdown::{FrameDriver, GameConfig};

    /// Ten minutes at 60 Hz
    const DEFAULT_MAX_FRAMES: u64 = 36_000;
    const FRAME_MS: f64 = 1000.0 / 60.0;

    struct Options {
        config_path: Option<String>,
        max_frames: u64,
        dump_state: bool,
    }

    fn parse_args(args: impl Iterator<Item = String>) -> anyhow::Result<Options> {
        let mut options = Options {
            config_path: None,
            max_frames: DEFAULT_MAX_FRAMES,
            dump_state: false,
        };
        let mut args = args;
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--frames" => {
                    let value = args.next().context("--frames needs a value")?;
                    options.max_frames = value
                        .parse()
                        .with_context(|| format!("invalid frame count: {}", value))?;
                }
                "--dump" => options.dump_state = true,
                flag if flag.starts_with("--") => bail!("unknown flag: {}", flag),
                path => options.config_path = Some(path.to_string()),
            }
        }
        Ok(options)
    }

    fn load_config(path: Option<&str>) -> anyhow::Result<GameConfig> {
        let Some(path) = path else {
            return Ok(GameConfig::default());
        };
        let json = std::fs::read_to_string(path).with_context(|| format!("reading config {}", path))?;
        GameConfig::from_json(&json).with_context(|| format!("loading config {}", path))
    }

    pub fn run(args: impl Iterator<Item = String>) -> anyhow::Result<()> {
        let options = parse_args(args)?;
        let config = load_config(options.config_path.as_deref())?;
        log::info!("Neon Breakdown (native, headless) starting with seed {}", config.seed);

        let mut driver = FrameDriver::new(config);
        let mut levels_cleared = 0u32;
        let mut bricks_hit = 0u64;
        let mut frame = 0u64;

        while frame < options.max_frames {
            frame += 1;
            let now = frame as f64 * FRAME_MS;

            // Track the ball with a slow wobble so rebound angles vary
            let state = driver.state();
            if let Some(ball) = state.ball {
                let time_factor = state.time_ticks as f32 * 0.02;
                let offset = time_factor.sin() * 0.3 * state.paddle.width;
                driver.set_pointer_canvas_x(ball.pos.x + offset);
            }

            let output = driver.frame(now);
            for event in output.events {
                match event {
                    GameEvent::BrickHit => bricks_hit += 1,
                    GameEvent::LifeLost => log::info!("Frame {}: life lost, {} left", frame, driver.state().lives),
                    GameEvent::LevelComplete => {
                        levels_cleared += 1;
                        log::info!("Frame {}: level {} cleared", frame, driver.state().level);
                        driver.next_level();
                    }
                    _ => {}
                }
            }

            if driver.state().phase == GamePhase::GameOver {
                break;
            }
        }

        let state = driver.state();
        println!(
            "frames={} level={} levels_cleared={} score={} lives={} brick_hits={} phase={:?}",
            frame, state.level, levels_cleared, state.score, state.lives, bricks_hit, state.phase
        );

        if options.dump_state {
            let json = serde_json::to_string_pretty(state).context("serializing game state")?;
            println!("{}", json);
        }

        driver.teardown();
        Ok(())
    }
}
