//! Stage Runner entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{HtmlCanvasElement, KeyboardEvent};

    use stage_runner::driver::{FrameDriver, FrameStatus};
    use stage_runner::platform::{AlertNotifier, SystemClock, backing_size};
    use stage_runner::renderer::RenderState;
    use stage_runner::sim::{GameState, StageRegistry};
    use stage_runner::{KeyBindings, Settings};

    type Driver = FrameDriver<RenderState, SystemClock, AlertNotifier>;

    /// Game instance holding the driver and host-side state
    struct Game {
        driver: Driver,
        keys: KeyBindings,
        /// Pending requestAnimationFrame handle
        frame_id: Option<i32>,
    }

    fn js_err(e: impl std::fmt::Display) -> JsValue {
        JsValue::from_str(&e.to_string())
    }

    pub async fn run() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        // The logger passes everything; the max level does the filtering
        console_log::init_with_level(log::Level::Trace).map_err(js_err)?;
        log::set_max_level(log::LevelFilter::Info);

        log::info!("Stage Runner starting...");

        let settings = Settings::load();
        if let Some(level) = settings.log_level() {
            log::set_max_level(level);
        }

        let window = web_sys::window().ok_or("no window")?;
        let document = window.document().ok_or("no document")?;

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("gameCanvas")
            .ok_or("no canvas")?
            .dyn_into()?;

        // On-page size in CSS pixels matches the simulation; the backing
        // store is scaled by the pixel ratio
        let tuning = settings.tuning.clone();
        let style = canvas.style();
        style.set_property("width", &format!("{}px", tuning.canvas_width))?;
        style.set_property("height", &format!("{}px", tuning.canvas_height))?;
        let (width, height) = backing_size(
            (tuning.canvas_width, tuning.canvas_height),
            window.device_pixel_ratio(),
        );
        canvas.set_width(width);
        canvas.set_height(height);
        log::info!("Canvas backing store {}x{}", width, height);

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU | wgpu::Backends::GL,
            ..Default::default()
        });

        let surface = instance
            .create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone()))
            .map_err(js_err)?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .map_err(js_err)?;

        log::info!("Using adapter: {:?}", adapter.get_info().name);

        let render_state = RenderState::new(
            surface,
            &adapter,
            width,
            height,
            (tuning.canvas_width, tuning.canvas_height),
        )
        .await
        .map_err(js_err)?;

        let stages = StageRegistry::builtin(&tuning);
        let state = GameState::new(tuning, stages);
        let driver = FrameDriver::new(state, render_state, SystemClock, AlertNotifier);

        let game = Rc::new(RefCell::new(Game {
            driver,
            keys: settings.key_bindings,
            frame_id: None,
        }));

        setup_input_handlers(game.clone())?;
        setup_teardown(game.clone())?;

        request_animation_frame(game)?;

        log::info!("Stage Runner running!");
        Ok(())
    }

    fn setup_input_handlers(game: Rc<RefCell<Game>>) -> Result<(), JsValue> {
        let window = web_sys::window().ok_or("no window")?;

        // Key down: move or jump
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let mut g = game.borrow_mut();
                if let Some(intent) = g.keys.on_key_down(&event.key()) {
                    event.prevent_default();
                    g.driver.push_intent(intent);
                }
            });
            window.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        // Key up: stop
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let mut g = game.borrow_mut();
                if let Some(intent) = g.keys.on_key_up(&event.key()) {
                    g.driver.push_intent(intent);
                }
            });
            window.add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        Ok(())
    }

    /// Cancel the pending frame when the page goes away
    fn setup_teardown(game: Rc<RefCell<Game>>) -> Result<(), JsValue> {
        let window = web_sys::window().ok_or("no window")?;
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            let mut g = game.borrow_mut();
            if let (Some(id), Some(window)) = (g.frame_id.take(), web_sys::window()) {
                let _ = window.cancel_animation_frame(id);
            }
            g.driver.cancel();
        });
        window.add_event_listener_with_callback("pagehide", closure.as_ref().unchecked_ref())?;
        closure.forget();
        Ok(())
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) -> Result<(), JsValue> {
        let window = web_sys::window().ok_or("no window")?;
        let handle = game.clone();
        let closure = Closure::once(move |_time: f64| {
            game_loop(handle);
        });
        let id = window.request_animation_frame(closure.as_ref().unchecked_ref())?;
        closure.forget();
        game.borrow_mut().frame_id = Some(id);
        Ok(())
    }

    fn game_loop(game: Rc<RefCell<Game>>) {
        let status = {
            let mut g = game.borrow_mut();
            g.frame_id = None;
            g.driver.frame()
        };

        if status == FrameStatus::Continue {
            if let Err(e) = request_animation_frame(game) {
                log::error!("Failed to schedule frame: {:?}", e);
            }
        }
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    if let Err(e) = wasm_game::run().await {
        log::error!("Stage Runner failed to start: {:?}", e);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use glam::Vec2;

    use stage_runner::driver::{Clock, FrameDriver, FrameStatus, Renderer};
    use stage_runner::platform::AlertNotifier;
    use stage_runner::sim::{GameState, Intent, StageRegistry};
    use stage_runner::{Settings, aabb_overlap};

    /// Frames to simulate (about two minutes at 60 Hz)
    const HEADLESS_FRAMES: u32 = 60 * 120;
    /// Simulated frame duration
    const FRAME_MS: f64 = 1000.0 / 60.0;
    /// How far ahead the autopilot looks for obstacles
    const LOOKAHEAD: f32 = 40.0;

    /// Clock advanced by the loop instead of the wall
    #[derive(Default)]
    struct FrameClock {
        now: f64,
    }

    impl Clock for FrameClock {
        fn now_ms(&self) -> f64 {
            self.now
        }
    }

    /// Renderer that only tracks what it was asked to draw
    #[derive(Default)]
    struct HeadlessRenderer {
        frames: u64,
        last_stage: Option<usize>,
    }

    impl Renderer for HeadlessRenderer {
        fn clear(&mut self) {}

        fn draw(&mut self, state: &GameState) {
            self.frames += 1;
            if self.last_stage != Some(state.stage_index) {
                log::info!(
                    "Drawing stage {} at frame {}: {} obstacles",
                    state.stage_index + 1,
                    self.frames,
                    state.obstacles.len()
                );
                self.last_stage = Some(state.stage_index);
            }
            log::trace!(
                "player {:?}, {} projectiles",
                state.player.pos,
                state.projectiles.len()
            );
        }
    }

    /// Jump when something lethal is just ahead or a projectile is incoming
    fn autopilot(state: &GameState) -> Option<Intent> {
        let player = &state.player;
        let probe_pos = Vec2::new(player.pos.x + player.size.x, player.pos.y);
        let probe_size = Vec2::new(LOOKAHEAD, player.size.y);

        let obstacle_ahead = state
            .obstacles
            .iter()
            .filter(|o| !o.platform)
            .any(|o| aabb_overlap(probe_pos, probe_size, o.pos, o.size));
        // Projectiles close in on their own, so look further
        let wide_probe = probe_size * Vec2::new(3.0, 1.0);
        let projectile_ahead = state
            .projectiles
            .iter()
            .any(|p| aabb_overlap(probe_pos, wide_probe, p.bounds_pos(), p.bounds_size()));
        let threat = obstacle_ahead || projectile_ahead;

        (threat && player.vel.y >= 0.0).then_some(Intent::Jump)
    }

    pub fn run() {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
        log::info!("Stage Runner (native) starting...");
        log::info!("Native mode runs headless - build for wasm32 and serve for the web version");

        let settings = Settings::load();
        let tuning = settings.tuning.clone();
        let stages = StageRegistry::builtin(&tuning);
        let state = GameState::new(tuning, stages);

        let mut driver = FrameDriver::new(
            state,
            HeadlessRenderer::default(),
            FrameClock::default(),
            AlertNotifier,
        );
        driver.push_intent(Intent::MoveRight);

        for _ in 0..HEADLESS_FRAMES {
            if let Some(intent) = autopilot(&driver.state) {
                driver.push_intent(intent);
            }
            if driver.frame() == FrameStatus::Stopped {
                break;
            }
            driver.clock.now += FRAME_MS;
        }
        driver.cancel();

        log::info!(
            "Headless run finished: {} frames drawn, stage {}, player at {:?}",
            driver.renderer.frames,
            driver.state.stage_index + 1,
            driver.state.player.pos
        );
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    headless::run();
}
