//! Shard Runner entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, HtmlImageElement, KeyboardEvent};

    use shard_runner::{
        AssetKind, DrawCommand, DrawList, FrameLoop, FrameStatus, GameSession, InputState,
        Settings, SharedViewport, Viewport, ViewportProvider,
    };

    /// Loaded (or loading) sprite images
    struct Sprites {
        player: HtmlImageElement,
        shard: HtmlImageElement,
        enemy: HtmlImageElement,
    }

    impl Sprites {
        fn new() -> Result<Self, JsValue> {
            Ok(Self {
                player: HtmlImageElement::new()?,
                shard: HtmlImageElement::new()?,
                enemy: HtmlImageElement::new()?,
            })
        }

        fn get(&self, kind: AssetKind) -> &HtmlImageElement {
            match kind {
                AssetKind::Player => &self.player,
                AssetKind::Shard => &self.shard,
                AssetKind::Enemy => &self.enemy,
            }
        }
    }

    /// Game instance holding all state
    struct Game {
        session: GameSession<SharedViewport>,
        frame_loop: FrameLoop,
        draw_list: DrawList,
        ctx: CanvasRenderingContext2d,
        sprites: Sprites,
    }

    impl Game {
        /// Run one refresh and paint if the simulation ticked
        fn frame(&mut self, time: f64) -> FrameStatus {
            match self
                .frame_loop
                .on_frame(time, &mut self.session, &mut self.draw_list)
            {
                Ok(FrameStatus::Ticked) => {
                    self.paint();
                    FrameStatus::Ticked
                }
                Ok(status) => status,
                Err(e) => {
                    log::error!("Frame loop failed: {}", e);
                    FrameStatus::Stopped
                }
            }
        }

        /// Replay the recorded draw list onto the canvas
        fn paint(&self) {
            for cmd in self.draw_list.commands() {
                match cmd {
                    DrawCommand::Clear { width, height } => {
                        self.ctx.clear_rect(0.0, 0.0, *width as f64, *height as f64);
                    }
                    DrawCommand::Sprite { asset, pos, size } => {
                        if let Err(e) = self.ctx.draw_image_with_html_image_element_and_dw_and_dh(
                            self.sprites.get(*asset),
                            pos.x as f64,
                            pos.y as f64,
                            size.x as f64,
                            size.y as f64,
                        ) {
                            log::warn!("Failed to draw {} sprite: {:?}", asset, e);
                        }
                    }
                    DrawCommand::Text {
                        text,
                        pos,
                        font,
                        color,
                    } => {
                        self.ctx.set_font(font);
                        self.ctx.set_fill_style_str(color);
                        let _ = self.ctx.fill_text(text, pos.x as f64, pos.y as f64);
                    }
                }
            }
        }
    }

    fn window_size(window: &web_sys::Window) -> Viewport {
        let width = window
            .inner_width()
            .ok()
            .and_then(|v| v.as_f64())
            .unwrap_or(800.0);
        let height = window
            .inner_height()
            .ok()
            .and_then(|v| v.as_f64())
            .unwrap_or(600.0);
        Viewport::new(width as f32, height as f32)
    }

    fn fit_canvas(canvas: &HtmlCanvasElement, viewport: Viewport) {
        canvas.set_width(viewport.width as u32);
        canvas.set_height(viewport.height as u32);
    }

    pub fn run() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info)
            .map_err(|e| JsValue::from_str(&e.to_string()))?;
        log::info!("Shard Runner starting...");

        let window = web_sys::window().ok_or("no window")?;
        let document = window.document().ok_or("no document")?;
        let canvas: HtmlCanvasElement = document
            .get_element_by_id("gameCanvas")
            .ok_or("missing #gameCanvas element")?
            .dyn_into()?;
        let ctx: CanvasRenderingContext2d = canvas
            .get_context("2d")?
            .ok_or("2d canvas context unavailable")?
            .dyn_into()?;

        let settings = Settings::load();

        let viewport = SharedViewport::new(window_size(&window));
        fit_canvas(&canvas, viewport.viewport());

        let game = Rc::new(RefCell::new(Game {
            session: GameSession::new(viewport.clone(), InputState::new()),
            frame_loop: FrameLoop::new(settings.startup_timeout_ms()),
            draw_list: DrawList::new(settings.hud_label.clone()),
            ctx,
            sprites: Sprites::new()?,
        }));

        setup_resize_handler(&window, canvas, viewport);
        setup_input_handlers(&document, game.clone());
        load_sprites(&settings, game.clone());

        request_animation_frame(game);
        log::info!("Shard Runner waiting for assets");
        Ok(())
    }

    fn setup_resize_handler(window: &web_sys::Window, canvas: HtmlCanvasElement, viewport: SharedViewport) {
        let closure = Closure::<dyn FnMut()>::new(move || {
            let Some(window) = web_sys::window() else {
                return;
            };
            let size = window_size(&window);
            fit_canvas(&canvas, size);
            viewport.resize(size.width, size.height);
        });
        let _ = window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn setup_input_handlers(document: &web_sys::Document, game: Rc<RefCell<Game>>) {
        for (event_type, pressed) in [("keydown", true), ("keyup", false)] {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                game.borrow_mut()
                    .session
                    .input_mut()
                    .handle_key(&event.code(), pressed);
            });
            let _ = document.add_event_listener_with_callback(event_type, closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn load_sprites(settings: &Settings, game: Rc<RefCell<Game>>) {
        for kind in AssetKind::ALL {
            let onload = {
                let game = game.clone();
                Closure::<dyn FnMut()>::new(move || {
                    game.borrow_mut().frame_loop.asset_ready(kind);
                })
            };

            let g = game.borrow();
            let img = g.sprites.get(kind);
            img.set_onload(Some(onload.as_ref().unchecked_ref::<js_sys::Function>()));
            img.set_src(settings.image_path(kind));
            onload.forget();
            log::info!("Loading {} sprite from {}", kind, settings.image_path(kind));
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
        let status = game.borrow_mut().frame(time);
        if status != FrameStatus::Stopped {
            request_animation_frame(game);
        }
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() -> Result<(), JsValue> {
    wasm_game::run()
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Shard Runner (native) starting...");
    log::info!("Native mode runs a headless demo - build for wasm32 to play in the browser");

    let settings = shard_runner::Settings::load();
    if let Err(e) = demo::run(&settings) {
        log::error!("Demo failed: {}", e);
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Scripted headless play-through on a simulated 60 Hz clock
#[cfg(not(target_arch = "wasm32"))]
mod demo {
    use shard_runner::{
        Action, AssetKind, DrawList, FrameLoop, FrameStatus, GameSession, InputState, Settings,
        SharedViewport, Viewport,
    };

    const FRAME_MS: f64 = 1000.0 / 60.0;
    /// Hard stop in case the script never reaches game over
    const MAX_FRAMES: u64 = 60 * 60;
    /// Frames to keep rendering the game-over screen
    const GAME_OVER_LINGER: u64 = 60;
    /// Jump under each shard while running right
    const JUMP_FRAMES: [u64; 2] = [40, 93];
    const RESIZE_FRAME: u64 = 150;

    pub fn run(settings: &Settings) -> Result<(), Box<dyn std::error::Error>> {
        let viewport = SharedViewport::new(Viewport::new(800.0, 600.0));
        let mut session = GameSession::new(viewport.clone(), InputState::new());
        let mut frame_loop = FrameLoop::new(settings.startup_timeout_ms());
        let cancel = frame_loop.cancel_token();
        let mut sink = DrawList::new(settings.hud_label.clone());

        // Nothing to load headless
        for kind in AssetKind::ALL {
            frame_loop.asset_ready(kind);
        }

        session.input_mut().set_key(Action::MoveRight, true);

        let mut frame = 0u64;
        let mut game_over_at = None;
        loop {
            let jump = JUMP_FRAMES.contains(&frame);
            session.input_mut().set_key(Action::Jump, jump);

            if frame == RESIZE_FRAME {
                viewport.resize(1024.0, 700.0);
            }

            if session.is_game_over() && game_over_at.is_none() {
                game_over_at = Some(frame);
            }
            let lingered = game_over_at.is_some_and(|f| frame - f >= GAME_OVER_LINGER);
            if lingered || frame >= MAX_FRAMES {
                cancel.cancel();
            }

            if frame_loop.on_frame(frame as f64 * FRAME_MS, &mut session, &mut sink)?
                == FrameStatus::Stopped
            {
                break;
            }
            frame += 1;
        }

        log::info!(
            "Demo finished after {} frames: score {}, health {}",
            frame_loop.frames(),
            session.score(),
            session.health()
        );
        log::debug!("Last frame: {:?}", sink.commands());
        println!("{}", serde_json::to_string_pretty(&session.snapshot())?);
        Ok(())
    }
}
