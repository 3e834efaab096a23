//! Flappy 3D entry point
//!
//! The browser build runs the interactive game; the native build runs a
//! headless autopilot session that exercises the same simulation.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{HtmlCanvasElement, KeyboardEvent, MouseEvent};

    use flappy3d::Tuning;
    use flappy3d::input::{InputEvent, InputQueue};
    use flappy3d::renderer::{RenderState, Scene, SceneSync};
    use flappy3d::sim::{TickInput, World, activate, tick};
    use flappy3d::ui::{self, DomHud};

    /// Game instance holding all state
    struct Game {
        world: World,
        render_state: Option<RenderState>,
        sync: SceneSync,
        hud: DomHud,
        input: InputQueue,
        autopilot: bool,
    }

    impl Game {
        fn new(world: World, hud: DomHud) -> Self {
            Self {
                world,
                render_state: None,
                sync: SceneSync::new(),
                hud,
                input: InputQueue::new(),
                autopilot: false,
            }
        }

        /// Feed queued input, then advance one tick
        fn update(&mut self) {
            let mut tick_input = TickInput::default();
            for event in self.input.drain() {
                if event.is_autopilot_toggle() {
                    self.autopilot = !self.autopilot;
                    log::info!("Autopilot: {}", self.autopilot);
                } else if event.is_activation() {
                    activate(&mut self.world);
                }
            }
            tick_input.autopilot = self.autopilot;
            tick(&mut self.world, &tick_input);

            let events = self.world.drain_events();
            ui::apply_events(&mut self.hud, &events);
            if let Some(ref mut render_state) = self.render_state {
                self.sync.apply(render_state, &self.world, &events);
            }
        }

        /// Render the current frame
        fn render(&mut self) {
            if let Some(ref mut render_state) = self.render_state {
                match render_state.render() {
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
    }

    pub async fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Flappy 3D starting...");

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .expect("no canvas")
            .dyn_into()
            .expect("not a canvas");

        let (width, height) = canvas_size(&window, &canvas);
        canvas.set_width(width);
        canvas.set_height(height);

        let tuning = Tuning::load();
        let seed = tuning.seed.unwrap_or_else(|| js_sys::Date::now() as u64);
        let world = World::new(tuning, seed);
        log::info!("Game initialized with seed: {}", world.seed);

        let game = Rc::new(RefCell::new(Game::new(world, DomHud::new(document))));

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU | wgpu::Backends::GL,
            ..Default::default()
        });

        let surface = instance
            .create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone()))
            .expect("Failed to create surface");

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .expect("Failed to get adapter");

        log::info!("Using adapter: {:?}", adapter.get_info().name);

        let tuning = game.borrow().world.tuning.clone();
        match RenderState::new(surface, &adapter, width, height, &tuning).await {
            Ok(render_state) => {
                let mut g = game.borrow_mut();
                // Boundary checks and drawing must agree on the visible range
                let drawn = render_state.visible_half_height(tuning.camera_z);
                let simulated = g.world.visible_half_height();
                if (drawn - simulated).abs() > 1e-4 {
                    log::warn!("View mismatch: drawn {} vs simulated {}", drawn, simulated);
                }
                g.render_state = Some(render_state);
            }
            Err(e) => log::error!("Failed to create device: {}", e),
        }

        // Show the start prompt and the pre-start scene before the first tick
        {
            let mut g = game.borrow_mut();
            let g = &mut *g;
            let events = g.world.drain_events();
            ui::apply_events(&mut g.hud, &events);
            if let Some(ref mut render_state) = g.render_state {
                g.sync.apply(render_state, &g.world, &events);
            }
        }

        setup_input_handlers(game.clone());
        setup_resize_handler(&canvas, game.clone());

        request_animation_frame(game);

        log::info!("Flappy 3D running!");
    }

    fn canvas_size(window: &web_sys::Window, canvas: &HtmlCanvasElement) -> (u32, u32) {
        let dpr = window.device_pixel_ratio();
        let w = (canvas.client_width() as f64 * dpr) as u32;
        let h = (canvas.client_height() as f64 * dpr) as u32;
        (w.max(1), h.max(1))
    }

    fn setup_input_handlers(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };

        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                if event.code() == flappy3d::input::ACTIVATION_KEY {
                    // Keep the page from scrolling
                    event.prevent_default();
                }
                game.borrow_mut()
                    .input
                    .push(InputEvent::KeyDown { code: event.code() });
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                game.borrow_mut().input.push(InputEvent::PointerDown {
                    button: event.button(),
                });
            });
            let _ = window
                .add_event_listener_with_callback("mousedown", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_resize_handler(canvas: &HtmlCanvasElement, game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let canvas = canvas.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            let Some(window) = web_sys::window() else {
                return;
            };
            let (w, h) = canvas_size(&window, &canvas);
            canvas.set_width(w);
            canvas.set_height(h);
            if let Some(ref mut render_state) = game.borrow_mut().render_state {
                render_state.resize(w, h);
            }
        });
        let _ = window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once(move |_time: f64| {
            game_loop(game);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>) {
        {
            let mut g = game.borrow_mut();
            g.update();
            g.render();
        }

        request_animation_frame(game);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    wasm_game::run().await;
}

#[cfg(target_arch = "wasm32")]
fn main() {}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use flappy3d::Tuning;
    use flappy3d::sim::{GameEvent, TickInput, World, tick};
    use flappy3d::ui::{self, LogHud};

    env_logger::init();
    log::info!("Flappy 3D (native) starting...");
    log::info!("Running a headless autopilot session - build for wasm32 to play");

    let ticks: u64 = match std::env::var("FLAPPY3D_TICKS") {
        Ok(value) => value.parse().unwrap_or_else(|e| {
            log::warn!("Bad FLAPPY3D_TICKS {:?}: {}", value, e);
            3600
        }),
        Err(_) => 3600,
    };

    let tuning = Tuning::load();
    let seed = tuning.seed.unwrap_or_else(|| {
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or_default()
    });
    let mut world = World::new(tuning, seed);
    let mut hud = LogHud::default();
    let input = TickInput {
        activate: false,
        autopilot: true,
    };

    let mut episodes = 0u32;
    let mut best = 0u32;
    for _ in 0..ticks {
        tick(&mut world, &input);
        let events = world.drain_events();
        for event in &events {
            if let GameEvent::GameOver { score, cause } = event {
                episodes += 1;
                best = best.max(*score);
                log::info!("Episode {} ended by {:?}", episodes, cause);
            }
        }
        ui::apply_events(&mut hud, &events);
    }

    log::info!(
        "Ran {} ticks (seed {}): {} finished episodes, best score {}, current score {}",
        ticks,
        world.seed,
        episodes,
        best.max(world.score),
        world.score
    );
}
