//! Breakout entry point
//!
//! The browser build runs the touch-driven game on a canvas. The native
//! build has no window; it plays a headless autoplay round and logs what
//! happened.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;

    use glam::Vec2;
    use wasm_bindgen::prelude::*;
    use web_sys::{HtmlCanvasElement, MouseEvent, Touch, TouchEvent};

    use breakout::consts::*;
    use breakout::renderer::{RenderState, Viewport, scene_vertices};
    use breakout::sim::{GameEvent, GameScene, TickInput, TouchInput, tick};
    use breakout::Settings;

    /// Game instance holding all state
    struct Game {
        scene: GameScene,
        render_state: Option<RenderState>,
        /// Maps canvas CSS pixels to scene points for input
        input_viewport: Viewport,
        accumulator: f32,
        last_time: f64,
        input: TickInput,
        /// Location of the active touch or held mouse button
        last_touch: Option<Vec2>,
    }

    impl Game {
        fn new(scene: GameScene, client_w: f32, client_h: f32) -> Self {
            let arena = scene.settings().arena_size();
            Self {
                scene,
                render_state: None,
                input_viewport: Viewport::new(client_w, client_h, arena),
                accumulator: 0.0,
                last_time: 0.0,
                input: TickInput::default(),
                last_touch: None,
            }
        }

        fn pointer_down(&mut self, x: f32, y: f32) {
            let location = self.input_viewport.screen_to_scene(x, y);
            self.last_touch = Some(location);
            self.input.push(TouchInput::Began { location });
        }

        fn pointer_moved(&mut self, x: f32, y: f32) {
            let location = self.input_viewport.screen_to_scene(x, y);
            if let Some(previous) = self.last_touch.replace(location) {
                self.input.push(TouchInput::Moved { location, previous });
            } else {
                // Mouse hover without a button held
                self.last_touch = None;
            }
        }

        fn pointer_up(&mut self, cancelled: bool) {
            if self.last_touch.take().is_some() {
                self.input.push(if cancelled {
                    TouchInput::Cancelled
                } else {
                    TouchInput::Ended
                });
            }
        }

        /// Run simulation ticks
        fn update(&mut self, dt: f32) {
            let dt = dt.min(0.1);
            self.accumulator += dt;

            let mut substeps = 0;
            while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
                tick(&mut self.scene, &self.input, SIM_DT);
                self.accumulator -= SIM_DT;
                substeps += 1;

                // Touches apply once
                self.input.clear();
            }

            for event in self.scene.drain_events() {
                if let GameEvent::BlockBroken { .. } = event {
                    log::debug!("{} blocks left", self.scene.block_count());
                }
            }
        }

        /// Render the current frame
        fn render(&mut self) {
            let Some(render_state) = self.render_state.as_mut() else {
                return;
            };
            let vertices = scene_vertices(&self.scene);
            match render_state.render(&vertices) {
                Ok(_) => {}
                Err(wgpu::SurfaceError::Lost) => {
                    let (w, h) = (render_state.config.width, render_state.config.height);
                    render_state.resize(w, h);
                }
                Err(wgpu::SurfaceError::OutOfMemory) => {
                    log::error!("Out of memory!");
                }
                Err(e) => log::warn!("Render error: {:?}", e),
            }
        }
    }

    fn js_error(message: impl std::fmt::Display) -> JsValue {
        JsValue::from_str(&message.to_string())
    }

    pub async fn run() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).map_err(js_error)?;

        log::info!("Breakout starting...");

        let window = web_sys::window().ok_or_else(|| js_error("no window"))?;
        let document = window.document().ok_or_else(|| js_error("no document"))?;

        // Hide loading indicator
        if let Some(loading) = document.get_element_by_id("loading") {
            let _ = loading.set_attribute("class", "hidden");
        }

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .ok_or_else(|| js_error("no canvas"))?
            .dyn_into()?;

        // Set canvas size
        let dpr = window.device_pixel_ratio();
        let client_w = canvas.client_width();
        let client_h = canvas.client_height();
        let width = (client_w as f64 * dpr) as u32;
        let height = (client_h as f64 * dpr) as u32;
        canvas.set_width(width);
        canvas.set_height(height);

        let settings = Settings::load();
        settings.save();
        let arena = settings.arena_size();
        let scene = GameScene::new(settings).map_err(js_error)?;
        let game = Rc::new(RefCell::new(Game::new(
            scene,
            client_w as f32,
            client_h as f32,
        )));

        // Initialize WebGPU
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU,
            ..Default::default()
        });

        let surface = instance
            .create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone()))
            .map_err(js_error)?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .map_err(js_error)?;

        log::info!("Using adapter: {:?}", adapter.get_info().name);

        let render_state = RenderState::new(surface, &adapter, width, height, arena)
            .await
            .map_err(js_error)?;
        game.borrow_mut().render_state = Some(render_state);

        setup_input_handlers(&canvas, game.clone());

        // Start game loop
        request_animation_frame(game);

        log::info!("Breakout running!");
        Ok(())
    }

    /// Touch position relative to the canvas, in CSS pixels
    fn canvas_offset(canvas: &HtmlCanvasElement, client_x: i32, client_y: i32) -> (f32, f32) {
        let rect = canvas.get_bounding_client_rect();
        (
            client_x as f32 - rect.left() as f32,
            client_y as f32 - rect.top() as f32,
        )
    }

    fn touch_offset(canvas: &HtmlCanvasElement, touch: &Touch) -> (f32, f32) {
        canvas_offset(canvas, touch.client_x(), touch.client_y())
    }

    fn setup_input_handlers(canvas: &HtmlCanvasElement, game: Rc<RefCell<Game>>) {
        // Touch start
        {
            let game = game.clone();
            let canvas_clone = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                if let Some(touch) = event.changed_touches().get(0) {
                    let (x, y) = touch_offset(&canvas_clone, &touch);
                    game.borrow_mut().pointer_down(x, y);
                }
            });
            let _ = canvas
                .add_event_listener_with_callback("touchstart", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Touch move
        {
            let game = game.clone();
            let canvas_clone = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                if let Some(touch) = event.touches().get(0) {
                    let (x, y) = touch_offset(&canvas_clone, &touch);
                    game.borrow_mut().pointer_moved(x, y);
                }
            });
            let _ = canvas
                .add_event_listener_with_callback("touchmove", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Touch end / cancel
        for (name, cancelled) in [("touchend", false), ("touchcancel", true)] {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                game.borrow_mut().pointer_up(cancelled);
            });
            let _ = canvas.add_event_listener_with_callback(name, closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Mouse fallback for desktop browsers
        {
            let game = game.clone();
            let canvas_clone = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                let (x, y) = canvas_offset(&canvas_clone, event.client_x(), event.client_y());
                game.borrow_mut().pointer_down(x, y);
            });
            let _ = canvas
                .add_event_listener_with_callback("mousedown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        {
            let game = game.clone();
            let canvas_clone = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                let (x, y) = canvas_offset(&canvas_clone, event.client_x(), event.client_y());
                game.borrow_mut().pointer_moved(x, y);
            });
            let _ = canvas
                .add_event_listener_with_callback("mousemove", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        for name in ["mouseup", "mouseleave"] {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                game.borrow_mut().pointer_up(false);
            });
            let _ = canvas.add_event_listener_with_callback(name, closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once(move |time: f64| {
            game_loop(game, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>, time: f64) {
        {
            let mut g = game.borrow_mut();

            // Calculate delta time
            let dt = if g.last_time > 0.0 {
                ((time - g.last_time) / 1000.0) as f32
            } else {
                SIM_DT
            };
            g.last_time = time;

            g.update(dt);
            g.render();
        }

        request_animation_frame(game);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    if let Err(e) = wasm_game::run().await {
        log::error!("Breakout failed to start: {:?}", e);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
mod autoplay {
    use glam::Vec2;

    use breakout::consts::SIM_DT;
    use breakout::sim::{GameEvent, GameScene, TickInput, TouchInput, tick};
    use breakout::{SceneError, Settings};

    /// Furthest the demo finger drags per tick, in scene points
    const MAX_DRAG: f32 = 12.0;

    #[derive(Debug, Default, Clone, PartialEq, Eq)]
    pub struct Summary {
        pub ticks: u64,
        pub paddle_touches: usize,
        pub bottom_hits: usize,
        pub blocks_broken: usize,
        pub blocks_left: usize,
    }

    /// Play for `seconds` with a finger dragging the paddle under the ball
    pub fn run(settings: Settings, seconds: f32) -> Result<Summary, SceneError> {
        let mut scene = GameScene::new(settings)?;
        let mut input = TickInput::default();
        let mut finger: Option<Vec2> = None;
        let mut summary = Summary::default();

        for _ in 0..(seconds / SIM_DT) as u64 {
            input.clear();
            let paddle = scene.paddle().position;
            match finger {
                None => {
                    input.push(TouchInput::Began { location: paddle });
                    finger = Some(paddle);
                }
                Some(previous) => {
                    let dx = (scene.ball().position.x - paddle.x).clamp(-MAX_DRAG, MAX_DRAG);
                    let location = previous + Vec2::new(dx, 0.0);
                    input.push(TouchInput::Moved { location, previous });
                    finger = Some(location);
                }
            }

            tick(&mut scene, &input, SIM_DT);
            for event in scene.drain_events() {
                match event {
                    GameEvent::TouchBeganOnPaddle => summary.paddle_touches += 1,
                    GameEvent::BallReachedBottom => summary.bottom_hits += 1,
                    GameEvent::BlockBroken { .. } => summary.blocks_broken += 1,
                }
            }
        }

        input.clear();
        input.push(TouchInput::Ended);
        tick(&mut scene, &input, SIM_DT);

        summary.ticks = scene.time_ticks();
        summary.blocks_left = scene.block_count();
        Ok(summary)
    }

    #[cfg(test)]
    mod tests {
        use super::*;
        use breakout::consts::BLOCK_COUNT;

        #[test]
        fn test_autoplay_accounts_for_every_block() {
            let summary = run(Settings::default(), 5.0).unwrap();

            assert_eq!(summary.paddle_touches, 1);
            assert_eq!(summary.blocks_broken + summary.blocks_left, BLOCK_COUNT);
            assert_eq!(summary.ticks, (5.0 / SIM_DT) as u64 + 1);
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
const DEMO_SECONDS: f32 = 20.0;

#[cfg(not(target_arch = "wasm32"))]
fn main() -> Result<(), breakout::SceneError> {
    use breakout::Settings;

    env_logger::init();
    log::info!("Breakout (native) starting...");
    log::info!("Native mode is a headless demo - run with `trunk serve` for the web version");

    // Optional settings file; written with defaults if it does not exist yet
    let settings = match std::env::args().nth(1) {
        Some(path) if std::path::Path::new(&path).exists() => Settings::load_from(&path)?,
        Some(path) => {
            let settings = Settings::default();
            settings.save_to(&path)?;
            log::info!("Wrote default settings to {path}");
            settings
        }
        None => Settings::default(),
    };

    let summary = autoplay::run(settings, DEMO_SECONDS)?;
    println!(
        "{} ticks: {} blocks broken, {} left, ball reached bottom {} times",
        summary.ticks, summary.blocks_broken, summary.blocks_left, summary.bottom_hits
    );
    Ok(())
}
