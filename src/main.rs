//! Nova Defense entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, HtmlCanvasElement, KeyboardEvent, MouseEvent, TouchEvent};

    use nova_defense::audio::AudioManager;
    use nova_defense::platform::{FrameScheduler, screen_to_playfield};
    use nova_defense::renderer::{RenderState, build_scene};
    use nova_defense::sim::{Autopilot, GameEvent, GameState, GameStatus, fire, tick};
    use nova_defense::{Settings, Tuning, TuningError};

    /// Game instance holding all state
    struct Game {
        state: GameState,
        settings: Settings,
        audio: AudioManager,
        render_state: Option<RenderState>,
        scheduler: FrameScheduler,
        autopilot: Autopilot,
        idle_mode: bool,
        canvas: HtmlCanvasElement,
        // FPS tracking
        frame_times: [f64; 60],
        frame_index: usize,
        fps: u32,
    }

    impl Game {
        fn new(seed: u64, tuning: Tuning, canvas: HtmlCanvasElement) -> Self {
            let settings = Settings::default();
            Self {
                state: GameState::with_tuning(seed, tuning),
                audio: AudioManager::new(&settings),
                settings,
                render_state: None,
                scheduler: FrameScheduler::new(),
                autopilot: Autopilot::default(),
                idle_mode: false,
                canvas,
                frame_times: [0.0; 60],
                frame_index: 0,
                fps: 0,
            }
        }

        /// One display frame: optional autopilot, one tick, side effects
        fn frame(&mut self, time: f64) {
            if self.idle_mode {
                self.autopilot.update(&mut self.state);
            }
            tick(&mut self.state, time);
            self.process_events();
            self.track_fps(time);
            self.render();
            self.update_hud();
        }

        fn track_fps(&mut self, time: f64) {
            self.frame_times[self.frame_index] = time;
            self.frame_index = (self.frame_index + 1) % 60;

            // Oldest sample sits at the slot just overwritten next
            let oldest_time = self.frame_times[self.frame_index];
            if oldest_time > 0.0 {
                let elapsed = time - oldest_time;
                if elapsed > 0.0 {
                    self.fps = (59_000.0 / elapsed).round() as u32;
                }
            }
        }

        /// Route drained sim events to audio
        fn process_events(&mut self) {
            for event in self.state.drain_events() {
                match event {
                    GameEvent::Explosion { .. } => self.audio.play_explosion(),
                    GameEvent::RoundStarted { .. } => self.audio.start_music(),
                    GameEvent::RoundComplete { .. } | GameEvent::Lost { .. } => {
                        self.audio.stop_music()
                    }
                    GameEvent::CityDestroyed { .. } | GameEvent::LauncherDestroyed { .. } => {}
                }
            }
        }

        /// Render the current frame
        fn render(&mut self) {
            let Some(render_state) = self.render_state.as_mut() else {
                return;
            };

            let width = self.canvas.width();
            let height = self.canvas.height();
            if (width, height) != render_state.size {
                render_state.resize(width, height);
            }

            let vertices = build_scene(&self.state);
            match render_state.render(&vertices) {
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

        /// Update HUD elements in DOM
        fn update_hud(&self) {
            let Some(document) = web_sys::window().and_then(|w| w.document()) else {
                return;
            };
            let state = &self.state;

            set_text(&document, "hud-score", &state.total_score.to_string());
            set_text(&document, "hud-round", &state.round.to_string());
            set_text(
                &document,
                "hud-target",
                &format!("{} / {}", state.round_score, state.tuning.round_score_target),
            );
            if self.settings.show_fps {
                set_text(&document, "hud-fps", &format!("{} fps", self.fps));
            } else {
                set_text(&document, "hud-fps", "");
            }

            let overlay = match state.status {
                GameStatus::Start => Some((
                    "NOVA DEFENSE".to_string(),
                    "Click to launch interceptors. Protect the cities.".to_string(),
                    "Start",
                )),
                GameStatus::RoundComplete => Some((
                    format!("ROUND {} COMPLETE", state.round),
                    format!("Score {}", state.total_score),
                    "Next Round",
                )),
                GameStatus::Lost => Some((
                    "THE END".to_string(),
                    format!("Final score {} in round {}", state.total_score, state.round),
                    "Play Again",
                )),
                GameStatus::Playing => None,
            };

            if let Some(el) = document.get_element_by_id("overlay") {
                let class = if overlay.is_some() { "" } else { "hidden" };
                let _ = el.set_attribute("class", class);
            }
            if let Some((title, detail, button)) = overlay {
                set_text(&document, "overlay-title", &title);
                set_text(&document, "overlay-detail", &detail);
                set_text(&document, "action-btn", button);
            }
        }

        /// Start / Next Round / Play Again, depending on status.
        /// Returns true when play (re)started.
        fn action(&mut self) -> bool {
            self.audio.resume();
            match self.state.status {
                GameStatus::Start | GameStatus::Lost => {
                    self.state.start_new_game();
                    true
                }
                GameStatus::RoundComplete => self.state.start_next_round(),
                GameStatus::Playing => false,
            }
        }

        fn fire_at_client(&mut self, client_x: f32, client_y: f32) {
            self.audio.resume();
            if self.state.status != GameStatus::Playing {
                return;
            }
            let rect = self.canvas.get_bounding_client_rect();
            let target = screen_to_playfield(
                client_x,
                client_y,
                rect.left() as f32,
                rect.top() as f32,
                rect.width() as f32,
                rect.height() as f32,
            );
            if fire(&mut self.state, target).is_none() {
                log::debug!("Shot at ({:.0}, {:.0}) dropped", target.x, target.y);
            }
        }
    }

    fn set_text(document: &Document, id: &str, text: &str) {
        if let Some(el) = document.get_element_by_id(id) {
            el.set_text_content(Some(text));
        }
    }

    /// Balance override from `<script id="tuning-override" type="application/json">`
    fn load_tuning(document: &Document) -> Result<Tuning, TuningError> {
        let json = document
            .get_element_by_id("tuning-override")
            .and_then(|el| el.text_content())
            .unwrap_or_default();
        if json.trim().is_empty() {
            return Ok(Tuning::default());
        }
        let tuning = Tuning::from_json(&json)?;
        log::info!("Loaded tuning override");
        Ok(tuning)
    }

    pub async fn run() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info)
            .map_err(|e| JsValue::from_str(&e.to_string()))?;

        log::info!("Nova Defense starting...");

        let window = web_sys::window().ok_or("no window")?;
        let document = window.document().ok_or("no document")?;

        if let Some(loading) = document.get_element_by_id("loading") {
            let _ = loading.set_attribute("class", "hidden");
        }

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .ok_or("no canvas")?
            .dyn_into()?;

        // Set canvas size
        let dpr = window.device_pixel_ratio();
        let width = (canvas.client_width() as f64 * dpr) as u32;
        let height = (canvas.client_height() as f64 * dpr) as u32;
        canvas.set_width(width);
        canvas.set_height(height);

        let tuning = load_tuning(&document).unwrap_or_else(|e| {
            log::warn!("Ignoring tuning override: {}", e);
            Tuning::default()
        });

        let seed = js_sys::Date::now() as u64;
        let game = Rc::new(RefCell::new(Game::new(seed, tuning, canvas.clone())));
        log::info!("Game initialized with seed: {}", seed);

        // Initialize WebGPU (WebGL fallback)
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

        let render_state = RenderState::new(surface, &adapter, width, height)
            .await
            .map_err(|e| JsValue::from_str(&e.to_string()))?;
        game.borrow_mut().render_state = Some(render_state);

        setup_input_handlers(&canvas, game.clone())?;
        setup_action_button(&document, game.clone());

        // Draw the start screen; the loop only runs while playing
        {
            let mut g = game.borrow_mut();
            g.render();
            g.update_hud();
        }

        log::info!("Nova Defense ready");
        Ok(())
    }

    /// Start (or restart) the frame loop, cancelling any pending frame
    fn start_loop(game: &Rc<RefCell<Game>>) {
        let next = game.clone();
        let result = game
            .borrow_mut()
            .scheduler
            .request(move |time| game_loop(next, time));
        if let Err(e) = result {
            log::error!("requestAnimationFrame failed: {:?}", e);
        }
    }

    fn game_loop(game: Rc<RefCell<Game>>, time: f64) {
        let keep_running = {
            let mut g = game.borrow_mut();
            g.scheduler.mark_fired();
            g.frame(time);
            g.state.status.is_running()
        };

        if keep_running {
            start_loop(&game);
        } else {
            game.borrow_mut().scheduler.cancel();
        }
    }

    fn run_action(game: &Rc<RefCell<Game>>) {
        let started = game.borrow_mut().action();
        if started {
            start_loop(game);
        }
    }

    fn setup_input_handlers(
        canvas: &HtmlCanvasElement,
        game: Rc<RefCell<Game>>,
    ) -> Result<(), JsValue> {
        // Mouse click - fire
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                game.borrow_mut()
                    .fire_at_client(event.client_x() as f32, event.client_y() as f32);
            });
            canvas.add_event_listener_with_callback("mousedown", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        // Touch start - fire at each new touch
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                let touches = event.changed_touches();
                let mut g = game.borrow_mut();
                for i in 0..touches.length() {
                    if let Some(touch) = touches.get(i) {
                        g.fire_at_client(touch.client_x() as f32, touch.client_y() as f32);
                    }
                }
            });
            canvas
                .add_event_listener_with_callback("touchstart", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        // Keyboard
        {
            let window = web_sys::window().ok_or("no window")?;
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                match event.key().as_str() {
                    " " | "Enter" => {
                        event.prevent_default();
                        run_action(&game);
                    }
                    "i" | "I" => {
                        let mut g = game.borrow_mut();
                        g.idle_mode = !g.idle_mode;
                        log::info!("Idle mode: {}", g.idle_mode);
                    }
                    "m" | "M" => {
                        let mut g = game.borrow_mut();
                        let muted = g.settings.toggle_mute();
                        let settings = g.settings.clone();
                        g.audio.apply_settings(&settings);
                        log::info!("Muted: {}", muted);
                    }
                    _ => {}
                }
            });
            window.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        Ok(())
    }

    fn setup_action_button(document: &Document, game: Rc<RefCell<Game>>) {
        if let Some(btn) = document.get_element_by_id("action-btn") {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                run_action(&game);
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() -> Result<(), JsValue> {
    wasm_game::run().await
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use nova_defense::consts::FRAME_MS;
    use nova_defense::sim::{Autopilot, GameState, GameStatus, tick};

    /// Rounds the demo plays before stopping on its own
    const MAX_ROUNDS: u32 = 10;
    /// Safety cap on virtual frames (about an hour of play)
    const MAX_FRAMES: u64 = 60 * 60 * 60;

    env_logger::init();
    log::info!("Nova Defense (native) starting...");
    log::info!("Running headless autopilot demo - run with `trunk serve` for the web version");

    let seed = std::env::args()
        .nth(1)
        .and_then(|s| s.parse().ok())
        .unwrap_or(0x5eed);

    let mut state = GameState::new(seed);
    let mut autopilot = Autopilot::default();
    state.start_new_game();

    let mut frames = 0u64;
    while frames < MAX_FRAMES {
        frames += 1;
        let now_ms = frames as f64 * FRAME_MS;

        autopilot.update(&mut state);
        tick(&mut state, now_ms);
        state.drain_events();

        match state.status {
            GameStatus::Playing => {}
            GameStatus::RoundComplete if state.round < MAX_ROUNDS => {
                state.start_next_round();
            }
            _ => break,
        }
    }

    let summary = serde_json::json!({
        "seed": seed,
        "status": format!("{:?}", state.status),
        "round": state.round,
        "total_score": state.total_score,
        "cities_left": state.active_city_count(),
        "launchers_left": state.active_launcher_count(),
        "frames": frames,
    });
    println!("{}", summary);
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
