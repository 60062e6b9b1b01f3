//! WebAssembly entry point and DOM wiring.

use crate::params::UrlParams;
use crate::session::{BoardSession, Effect};
use crate::shortcuts::ShortcutRegistry;
use brainsketch_core::DEFAULT_USER_ID;
use brainsketch_core::canvas::CanvasAction;
use brainsketch_core::input::{MouseButton, PointerEvent};
use brainsketch_core::storage::{RemoteStorage, load_or_empty, save_best_effort};
use brainsketch_core::tools::{EraserMode, ToolKind};
use brainsketch_render::{Canvas2dSurface, DEFAULT_BACKGROUND, render};
use kurbo::Point;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;
use web_sys::{Event, EventTarget, HtmlCanvasElement, KeyboardEvent, MouseEvent};

/// Session plus the surface it paints on.
struct Board {
    session: BoardSession,
    surface: Canvas2dSurface,
}

impl Board {
    fn redraw(&mut self) {
        render(
            &mut self.surface,
            self.session.canvas().shapes_for_render(),
            DEFAULT_BACKGROUND,
        );
    }

    fn apply_effect(&mut self, effect: Effect) {
        if effect == Effect::Repaint {
            self.redraw();
        }
    }
}

type Listener = Closure<dyn FnMut(Event)>;

/// A sketch board bound to a `<canvas>` element.
///
/// Listens for mouse events on the canvas and shortcuts on the window. Persistence is
/// best effort: failures are logged and the board keeps working.
#[wasm_bindgen]
pub struct SketchBoard {
    board: Rc<RefCell<Board>>,
    storage: Option<Rc<RemoteStorage>>,
    listeners: Vec<(EventTarget, &'static str, Listener)>,
}

#[wasm_bindgen]
impl SketchBoard {
    /// `api_base` and `user_id` fall back to the `api` and `userId` URL parameters.
    /// Without an API base the board works offline.
    #[wasm_bindgen(constructor)]
    pub fn new(
        canvas: HtmlCanvasElement,
        api_base: Option<String>,
        user_id: Option<String>,
        erase_on_contact: Option<bool>,
    ) -> Result<SketchBoard, JsValue> {
        let params = url_params();
        let user_id = user_id
            .or(params.user_id)
            .unwrap_or_else(|| DEFAULT_USER_ID.to_string());
        let eraser_mode = if erase_on_contact.unwrap_or(false) {
            EraserMode::Contact
        } else {
            EraserMode::Stroke
        };

        let storage = match api_base.or(params.api) {
            Some(base) => Some(Rc::new(
                RemoteStorage::new(&base).map_err(|e| JsValue::from_str(&e.to_string()))?,
            )),
            None => {
                log::warn!("No API base configured; drawings will not be saved");
                None
            }
        };

        let surface = Canvas2dSurface::new(canvas.clone())
            .map_err(|e| JsValue::from_str(&e.to_string()))?;
        let board = Rc::new(RefCell::new(Board {
            session: BoardSession::new(user_id, eraser_mode),
            surface,
        }));
        board.borrow_mut().redraw();

        let mut sketch = SketchBoard {
            board,
            storage,
            listeners: Vec::new(),
        };
        sketch.attach(canvas.unchecked_ref(), &web_sys_window()?)?;
        sketch.load();
        Ok(sketch)
    }

    /// Select a tool by name (`pen`, `line`, `rect`, `circle`, `triangle`, `arrow`, `eraser`).
    #[wasm_bindgen(js_name = setTool)]
    pub fn set_tool(&self, name: &str) -> Result<(), JsValue> {
        let tool: ToolKind = name.parse().map_err(|e: String| JsValue::from_str(&e))?;
        self.apply(CanvasAction::SelectTool(tool));
        Ok(())
    }

    #[wasm_bindgen(getter)]
    pub fn tool(&self) -> String {
        self.board.borrow().session.canvas().tool().as_str().to_string()
    }

    pub fn undo(&self) {
        self.apply(CanvasAction::Undo);
    }

    pub fn clear(&self) {
        self.apply(CanvasAction::Clear);
    }

    #[wasm_bindgen(js_name = isDirty)]
    pub fn is_dirty(&self) -> bool {
        self.board.borrow().session.is_dirty()
    }

    /// Save the current drawing in the background.
    pub fn save(&self) {
        if let Some(storage) = &self.storage {
            spawn_save(Rc::clone(&self.board), Rc::clone(storage));
        }
    }

    /// Reload the drawing from the server in the background.
    pub fn load(&self) {
        if let Some(storage) = &self.storage {
            spawn_load(Rc::clone(&self.board), Rc::clone(storage));
        }
    }

    pub fn redraw(&self) {
        self.board.borrow_mut().redraw();
    }
}

impl SketchBoard {
    fn apply(&self, action: CanvasAction) {
        let mut board = self.board.borrow_mut();
        let effect = board.session.apply(action);
        board.apply_effect(effect);
    }

    fn listen(
        &mut self,
        target: &EventTarget,
        event: &'static str,
        handler: impl FnMut(Event) + 'static,
    ) -> Result<(), JsValue> {
        let closure: Listener = Closure::new(handler);
        target.add_event_listener_with_callback(event, closure.as_ref().unchecked_ref())?;
        self.listeners.push((target.clone(), event, closure));
        Ok(())
    }

    fn attach(&mut self, canvas: &EventTarget, window: &EventTarget) -> Result<(), JsValue> {
        self.listen(canvas, "mousedown", pointer_listener(Rc::clone(&self.board), |e| {
            MouseButton::from_dom(e.button()).map(|button| PointerEvent::Down {
                position: offset(e),
                button,
            })
        }))?;
        self.listen(canvas, "mousemove", pointer_listener(Rc::clone(&self.board), |e| {
            Some(PointerEvent::Move { position: offset(e) })
        }))?;
        self.listen(canvas, "mouseup", pointer_listener(Rc::clone(&self.board), |e| {
            Some(PointerEvent::Up { position: offset(e) })
        }))?;
        self.listen(canvas, "mouseleave", pointer_listener(Rc::clone(&self.board), |_| {
            Some(PointerEvent::Leave)
        }))?;

        let board = Rc::clone(&self.board);
        let storage = self.storage.clone();
        self.listen(window, "keydown", move |event: Event| {
            let Some(key) = event.dyn_ref::<KeyboardEvent>() else {
                return;
            };
            let ctrl = key.ctrl_key() || key.meta_key();
            let effect = board
                .borrow_mut()
                .session
                .handle_key(&key.key(), ctrl, key.shift_key());
            match effect {
                Effect::None => return,
                Effect::Repaint => board.borrow_mut().redraw(),
                Effect::Save => {
                    if let Some(storage) = &storage {
                        spawn_save(Rc::clone(&board), Rc::clone(storage));
                    }
                }
            }
            event.prevent_default();
        })?;

        Ok(())
    }
}

impl Drop for SketchBoard {
    fn drop(&mut self) {
        for (target, event, closure) in self.listeners.drain(..) {
            // Nothing to recover if removal fails; the closure is dropped either way.
            let _ = target.remove_event_listener_with_callback(event, closure.as_ref().unchecked_ref());
        }
    }
}

/// Listener that maps a mouse event to a pointer event and feeds it to the session.
fn pointer_listener(
    board: Rc<RefCell<Board>>,
    map: fn(&MouseEvent) -> Option<PointerEvent>,
) -> impl FnMut(Event) + 'static {
    move |event: Event| {
        let Some(pointer) = event.dyn_ref::<MouseEvent>().and_then(map) else {
            return;
        };
        let mut board = board.borrow_mut();
        let effect = board.session.handle_pointer(pointer);
        board.apply_effect(effect);
    }
}

fn offset(event: &MouseEvent) -> Point {
    Point::new(f64::from(event.offset_x()), f64::from(event.offset_y()))
}

fn web_sys_window() -> Result<EventTarget, JsValue> {
    web_sys::window()
        .map(Into::into)
        .ok_or_else(|| JsValue::from_str("no window"))
}

fn url_params() -> UrlParams {
    let Some(window) = web_sys::window() else {
        return UrlParams::default();
    };
    let location = window.location();
    UrlParams::parse(
        &location.search().unwrap_or_default(),
        &location.hash().unwrap_or_default(),
    )
}

fn spawn_save(board: Rc<RefCell<Board>>, storage: Rc<RemoteStorage>) {
    let (document, revision, user_id) = {
        let board = board.borrow();
        let (document, revision) = board.session.snapshot();
        (document, revision, board.session.user_id().to_string())
    };
    spawn_local(async move {
        if save_best_effort(storage.as_ref(), &user_id, &document).await {
            log::info!("Saved {} shape(s) for {}", document.len(), user_id);
            board.borrow_mut().session.mark_saved(revision);
        }
    });
}

fn spawn_load(board: Rc<RefCell<Board>>, storage: Rc<RemoteStorage>) {
    let (user_id, revision) = {
        let board = board.borrow();
        (
            board.session.user_id().to_string(),
            board.session.canvas().revision(),
        )
    };
    spawn_local(async move {
        let document = load_or_empty(storage.as_ref(), &user_id).await;
        let shapes = document.len();
        let mut board = board.borrow_mut();
        if board.session.load_if_unchanged(document, revision) {
            log::info!("Loaded {} shape(s) for {}", shapes, user_id);
            board.redraw();
        }
    });
}

/// Initialize logging for the WASM module.
#[wasm_bindgen(start)]
pub fn start() {
    // Set up panic hook for better error messages
    console_error_panic_hook::set_once();

    // Initialize logging
    if console_log::init_with_level(log::Level::Info).is_err() {
        web_sys::console::warn_1(&"Logger already initialized".into());
    }

    log::info!("Starting BrainSketch (WASM)");
    ShortcutRegistry::log_all();
}
