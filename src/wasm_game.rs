// Wordsnap – A word fragment puzzle
// Copyright (C) 2024  Neil Roberts
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program.  If not, see <http://www.gnu.org/licenses/>.

use wasm_bindgen::prelude::*;
use js_sys::Reflect;
use super::analytics::{self, CloseMethod};
use super::config::Config;
use super::effects::{self, ConfettiShape};
use super::geometry::Orientation;
use super::puzzle_data::PuzzleData;
use super::session::{Landing, Session};

const PUZZLE_FILENAME: &'static str = "puzzle.json";
const CONFIG_FILENAME: &'static str = "config.json";
const GAME_AREA_ID: &'static str = "game-area";
const LOAD_ERROR_MESSAGE: &'static str =
    "Error loading puzzle. Please refresh the page.";
const DRAG_Z_INDEX: &'static str = "1000";

fn show_error(message: &str) {
    log::error!("{}", message);

    let Some(window) = web_sys::window()
    else {
        return;
    };

    let Some(document) = window.document()
    else {
        return;
    };

    let Some(game_area) = document.get_element_by_id(GAME_AREA_ID)
    else {
        return;
    };

    game_area.set_inner_html(
        &format!("<div class=\"loading\">{}</div>", LOAD_ERROR_MESSAGE),
    );
}

struct Context {
    document: web_sys::HtmlDocument,
    window: web_sys::Window,
    game_area: web_sys::HtmlElement,
}

impl Context {
    fn new() -> Result<Context, String> {
        let Some(window) = web_sys::window()
        else {
            return Err("failed to get window".to_string());
        };

        let Some(document) = window.document()
            .and_then(|d| d.dyn_into::<web_sys::HtmlDocument>().ok())
        else {
            return Err("failed to get document".to_string());
        };

        let Some(game_area) = document.get_element_by_id(GAME_AREA_ID)
            .and_then(|c| c.dyn_into::<web_sys::HtmlElement>().ok())
        else {
            return Err("failed to get game area".to_string());
        };

        Ok(Context {
            document,
            window,
            game_area,
        })
    }

    fn fetch(&self, filename: &str) -> js_sys::Promise {
        let mut request_init = web_sys::RequestInit::new();
        request_init.cache(web_sys::RequestCache::NoCache);

        self.window.fetch_with_str_and_init(filename, &request_init)
    }

    fn set_timeout<F>(&self, delay: u32, func: F)
        where F: FnOnce() + 'static
    {
        let callback = Closure::once_into_js(func);

        let _ = self.window.set_timeout_with_callback_and_timeout_and_arguments_0(
            callback.unchecked_ref(),
            delay as i32,
        );
    }

    fn puzzle_name(&self) -> String {
        self.document.title()
    }

    // Analytics are optional so any failure here is ignored
    fn send_analytics(&self, event: analytics::Event) {
        let Some(gtag) = Reflect::get(&self.window, &"gtag".into())
            .ok()
            .and_then(|v| v.dyn_into::<js_sys::Function>().ok())
        else {
            return;
        };

        let Ok(params) = js_sys::JSON::parse(&event.params().to_string())
        else {
            return;
        };

        let _ = gtag.call3(
            &JsValue::NULL,
            &"event".into(),
            &event.name().into(),
            &params,
        );
    }
}

type PromiseClosure = Closure::<dyn FnMut(JsValue)>;

struct Loader {
    context: Context,
    puzzle: Option<PuzzleData>,

    puzzle_response_closure: Option<PromiseClosure>,
    puzzle_content_closure: Option<PromiseClosure>,
    puzzle_error_closure: Option<PromiseClosure>,

    config_response_closure: Option<PromiseClosure>,
    config_content_closure: Option<PromiseClosure>,
    config_error_closure: Option<PromiseClosure>,

    floating_pointer: Option<*mut Loader>,
}

impl Loader {
    fn new(context: Context) -> Loader {
        Loader {
            context,
            puzzle: None,
            puzzle_response_closure: None,
            puzzle_content_closure: None,
            puzzle_error_closure: None,
            config_response_closure: None,
            config_content_closure: None,
            config_error_closure: None,
            floating_pointer: None,
        }
    }

    fn start_floating(self) -> *mut Loader {
        assert!(self.floating_pointer.is_none());

        let floating_pointer = Box::into_raw(Box::new(self));

        unsafe {
            (*floating_pointer).floating_pointer = Some(floating_pointer);
        }

        floating_pointer
    }

    fn stop_floating(&mut self) -> Loader {
        match self.floating_pointer {
            Some(floating_pointer) => unsafe {
                // This should end up destroying the loader and
                // invalidating any closures that it holds
                *Box::from_raw(floating_pointer)
            },
            None => unreachable!(),
        }
    }

    fn fail(&mut self, message: &str) {
        show_error(message);
        self.stop_floating();
    }

    fn queue_puzzle_load(&mut self) {
        let floating_pointer = self.floating_pointer.unwrap();

        let response_closure = PromiseClosure::new(move |v: JsValue| {
            let loader = unsafe { &mut *floating_pointer };

            let Ok(response) = v.dyn_into::<web_sys::Response>()
            else {
                loader.fail("Puzzle fetch didn’t return a response");
                return;
            };

            if !response.ok() {
                loader.fail(&format!(
                    "HTTP error loading {}: status {}",
                    PUZZLE_FILENAME,
                    response.status(),
                ));
                return;
            }

            let promise = match response.text() {
                Ok(p) => p,
                Err(_) => {
                    loader.fail("Error fetching text from puzzle data");
                    return;
                },
            };

            let (Some(content_closure), Some(error_closure)) = (
                loader.puzzle_content_closure.as_ref(),
                loader.puzzle_error_closure.as_ref(),
            ) else {
                unreachable!();
            };

            let _ = promise.then2(content_closure, error_closure);
        });

        let content_closure = PromiseClosure::new(move |v: JsValue| {
            unsafe {
                (*floating_pointer).puzzle_loaded(v);
            }
        });

        let error_closure = PromiseClosure::new(move |_| {
            unsafe {
                (*floating_pointer).fail("Error loading puzzle data");
            }
        });

        let promise = self.context.fetch(PUZZLE_FILENAME);

        let _ = promise.then2(&response_closure, &error_closure);

        self.puzzle_response_closure = Some(response_closure);
        self.puzzle_content_closure = Some(content_closure);
        self.puzzle_error_closure = Some(error_closure);
    }

    fn puzzle_loaded(&mut self, data: JsValue) {
        let Some(text) = data.as_string()
        else {
            self.fail("Puzzle data is not text");
            return;
        };

        match text.parse::<PuzzleData>() {
            Ok(puzzle) => {
                log::info!(
                    "puzzle loaded: {} ({} words)",
                    puzzle.title,
                    puzzle.words.len(),
                );
                self.puzzle = Some(puzzle);
                self.queue_config_load();
            },
            Err(e) => self.fail(&format!("{}: {}", PUZZLE_FILENAME, e)),
        }
    }

    fn queue_config_load(&mut self) {
        let floating_pointer = self.floating_pointer.unwrap();

        let response_closure = PromiseClosure::new(move |v: JsValue| {
            let loader = unsafe { &mut *floating_pointer };

            let Some(promise) = v.dyn_into::<web_sys::Response>()
                .ok()
                .filter(|response| response.ok())
                .and_then(|response| response.text().ok())
            else {
                loader.config_loaded(None);
                return;
            };

            let (Some(content_closure), Some(error_closure)) = (
                loader.config_content_closure.as_ref(),
                loader.config_error_closure.as_ref(),
            ) else {
                unreachable!();
            };

            let _ = promise.then2(content_closure, error_closure);
        });

        let content_closure = PromiseClosure::new(move |v: JsValue| {
            unsafe {
                (*floating_pointer).config_loaded(v.as_string());
            }
        });

        let error_closure = PromiseClosure::new(move |_| {
            unsafe {
                (*floating_pointer).config_loaded(None);
            }
        });

        let promise = self.context.fetch(CONFIG_FILENAME);

        let _ = promise.then2(&response_closure, &error_closure);

        self.config_response_closure = Some(response_closure);
        self.config_content_closure = Some(content_closure);
        self.config_error_closure = Some(error_closure);
    }

    fn config_loaded(&mut self, text: Option<String>) {
        let config = match text.map(|text| text.parse::<Config>()) {
            Some(Ok(config)) => {
                log::info!("config overrides loaded from {}", CONFIG_FILENAME);
                config
            },
            Some(Err(e)) => {
                log::warn!("{}: {}, using defaults", CONFIG_FILENAME, e);
                Config::defaults()
            },
            None => {
                log::info!("no {} found, using defaults", CONFIG_FILENAME);
                Config::defaults()
            },
        };

        self.start_game(config);
    }

    fn start_game(&mut self, config: Config) {
        let Loader { context, puzzle, .. } = self.stop_floating();

        let Some(puzzle) = puzzle
        else {
            show_error("Config loaded before the puzzle");
            return;
        };

        match Wordsnap::new(context, puzzle, config) {
            Ok(wordsnap) => {
                // Leak the main wordsnap object so that it will live as
                // long as the web page
                std::mem::forget(wordsnap);
            },
            Err(e) => show_error(&e),
        }
    }
}

struct Drag {
    piece: usize,
    pointer_id: i32,
    // Position of the pointer within the piece
    offset_x: f32,
    offset_y: f32,
}

struct Wordsnap {
    context: Context,
    pointerdown_closure: Option<Closure::<dyn Fn(JsValue)>>,
    pointerup_closure: Option<Closure::<dyn Fn(JsValue)>>,
    pointermove_closure: Option<Closure::<dyn Fn(JsValue)>>,
    pointercancel_closure: Option<Closure::<dyn Fn(JsValue)>>,
    help_closure: Option<Closure::<dyn Fn(JsValue)>>,
    close_instructions_closure: Option<Closure::<dyn Fn(JsValue)>>,
    close_victory_closure: Option<Closure::<dyn Fn(JsValue)>>,
    victory_backdrop_closure: Option<Closure::<dyn Fn(JsValue)>>,
    victory_modal: web_sys::HtmlElement,
    facts_list: web_sys::Element,
    success_sound: Option<web_sys::HtmlAudioElement>,
    config: Config,
    session: Session,
    piece_elements: Vec<web_sys::HtmlElement>,
    drag: Option<Drag>,
}

impl Wordsnap {
    fn new(
        context: Context,
        puzzle: PuzzleData,
        config: Config,
    ) -> Result<Box<Wordsnap>, String> {
        let Some(victory_modal) =
            context.document.get_element_by_id("victory-modal")
            .and_then(|c| c.dyn_into::<web_sys::HtmlElement>().ok())
        else {
            return Err("failed to get victory modal".to_string());
        };

        let Some(facts_list) = context.document.get_element_by_id("facts-list")
        else {
            return Err("failed to get facts list".to_string());
        };

        let success_sound = context.document.get_element_by_id("success-sound")
            .and_then(|c| c.dyn_into::<web_sys::HtmlAudioElement>().ok());

        if let Some(description) =
            context.document.get_element_by_id("puzzle-description")
        {
            description.set_text_content(Some(&puzzle.description));
        }

        let viewport_width = context.window.inner_width()
            .ok()
            .and_then(|w| w.as_f64())
            .unwrap_or(0.0) as f32;
        let cell_size = config.game_settings.cell_size.for_viewport(
            viewport_width,
        );

        let area_width = context.game_area.offset_width() as f32;
        let area_height = context.game_area.offset_height() as f32;

        log::info!(
            "cell size: {}px | viewport width: {}px | game area: {}x{}px",
            cell_size,
            viewport_width,
            area_width,
            area_height,
        );

        let session = Session::new(
            puzzle,
            &config.game_settings,
            cell_size,
            area_width,
            area_height,
            &mut || js_sys::Math::random() as f32,
        );

        let mut wordsnap = Box::new(Wordsnap {
            context,
            pointerdown_closure: None,
            pointerup_closure: None,
            pointermove_closure: None,
            pointercancel_closure: None,
            help_closure: None,
            close_instructions_closure: None,
            close_victory_closure: None,
            victory_backdrop_closure: None,
            victory_modal,
            facts_list,
            success_sound,
            config,
            session,
            piece_elements: Vec::new(),
            drag: None,
        });

        wordsnap.apply_theme();
        wordsnap.create_pieces()?;
        wordsnap.create_closures();
        wordsnap.set_up_help_buttons();
        wordsnap.set_up_victory_modal();

        log::info!("game initialized");

        Ok(wordsnap)
    }

    fn apply_theme(&self) {
        let Ok(style) = self.context.document.create_element("style")
        else {
            return;
        };

        style.set_text_content(Some(&self.config.theme.stylesheet()));

        if let Some(head) = self.context.document.head() {
            let _ = head.append_with_node_1(&style);
        }

        log::info!("theme applied: {}", self.config.theme.name);
    }

    fn create_div(&self, class: &str) -> Result<web_sys::HtmlElement, String> {
        let Some(div) = self.context.document.create_element("div").ok()
            .and_then(|d| d.dyn_into::<web_sys::HtmlElement>().ok())
        else {
            return Err("error creating div".to_string());
        };

        div.set_class_name(class);

        Ok(div)
    }

    fn create_pieces(&mut self) -> Result<(), String> {
        clear_element(&self.context.game_area);

        let cell_size = format!("{}px", self.session.cell_size());

        for (index, piece) in self.session.pieces().iter().enumerate() {
            let element = self.create_div("piece")?;

            let _ = element.set_attribute("data-piece-index", &index.to_string());
            let _ = element.set_attribute("data-fragment", &piece.fragment);
            let _ = element.set_attribute(
                "data-word-index",
                &piece.word_index.to_string(),
            );
            let _ = element.set_attribute(
                "data-fragment-index",
                &piece.fragment_index.to_string(),
            );
            let _ = element.set_attribute(
                "data-orientation",
                piece.orientation.name(),
            );

            let style = element.style();
            let _ = style.set_property("width", &format!("{}px", piece.width));
            let _ = style.set_property("height", &format!("{}px", piece.height));
            let _ = style.set_property(
                "flex-direction",
                match piece.orientation {
                    Orientation::Horizontal => "row",
                    Orientation::Vertical => "column",
                },
            );

            for letter in piece.fragment.chars() {
                let letter_div = self.create_div("letter")?;
                let letter_style = letter_div.style();

                let _ = letter_style.set_property("width", &cell_size);
                let _ = letter_style.set_property("height", &cell_size);
                let _ = letter_style.set_property("display", "flex");
                let _ = letter_style.set_property("align-items", "center");
                let _ = letter_style.set_property("justify-content", "center");

                set_element_text(&letter_div, &letter.to_string());

                let _ = element.append_with_node_1(&letter_div);
            }

            set_element_position(&element, piece.x, piece.y);

            let _ = self.context.game_area.append_with_node_1(&element);

            self.piece_elements.push(element);
        }

        log::info!("created {} pieces", self.piece_elements.len());

        Ok(())
    }

    fn create_closures(&mut self) {
        let wordsnap_pointer = self as *mut Wordsnap;

        let pointerdown_closure = Closure::<dyn Fn(JsValue)>::new(
            move |event: JsValue| {
                let wordsnap = unsafe { &mut *wordsnap_pointer };
                let event: web_sys::PointerEvent = event.dyn_into().unwrap();
                wordsnap.handle_pointerdown_event(event);
            }
        );

        let _ = self.context.game_area.add_event_listener_with_callback(
            "pointerdown",
            pointerdown_closure.as_ref().unchecked_ref(),
        );

        self.pointerdown_closure = Some(pointerdown_closure);

        let pointerup_closure = Closure::<dyn Fn(JsValue)>::new(
            move |event: JsValue| {
                let wordsnap = unsafe { &mut *wordsnap_pointer };
                let event: web_sys::PointerEvent = event.dyn_into().unwrap();
                wordsnap.handle_pointerup_event(event);
            }
        );

        let _ = self.context.game_area.add_event_listener_with_callback(
            "pointerup",
            pointerup_closure.as_ref().unchecked_ref(),
        );

        self.pointerup_closure = Some(pointerup_closure);

        let pointermove_closure = Closure::<dyn Fn(JsValue)>::new(
            move |event: JsValue| {
                let wordsnap = unsafe { &mut *wordsnap_pointer };
                let event: web_sys::PointerEvent = event.dyn_into().unwrap();
                wordsnap.handle_pointermove_event(event);
            }
        );

        let _ = self.context.game_area.add_event_listener_with_callback(
            "pointermove",
            pointermove_closure.as_ref().unchecked_ref(),
        );

        self.pointermove_closure = Some(pointermove_closure);

        let pointercancel_closure = Closure::<dyn Fn(JsValue)>::new(
            move |event: JsValue| {
                let wordsnap = unsafe { &mut *wordsnap_pointer };
                let event: web_sys::PointerEvent = event.dyn_into().unwrap();
                wordsnap.handle_pointercancel_event(event);
            }
        );

        let _ = self.context.game_area.add_event_listener_with_callback(
            "pointercancel",
            pointercancel_closure.as_ref().unchecked_ref(),
        );

        self.pointercancel_closure = Some(pointercancel_closure);
    }

    fn get_element(&self, id: &str) -> Option<web_sys::HtmlElement> {
        self.context.document.get_element_by_id(id)
            .and_then(|c| c.dyn_into::<web_sys::HtmlElement>().ok())
    }

    fn set_up_help_buttons(&mut self) {
        let (Some(help_button), Some(close_button)) = (
            self.get_element("help-btn"),
            self.get_element("close-instructions"),
        ) else {
            return;
        };

        if self.get_element("instructions-panel").is_none() {
            return;
        }

        let wordsnap_pointer = self as *mut Wordsnap;

        let help_closure = Closure::<dyn Fn(JsValue)>::new(
            move |_event: JsValue| {
                let wordsnap = unsafe { &*wordsnap_pointer };
                wordsnap.set_instructions_visible(true);
                wordsnap.context.send_analytics(analytics::Event::HelpClicked {
                    puzzle: &wordsnap.context.puzzle_name(),
                });
            }
        );

        let _ = help_button.add_event_listener_with_callback(
            "click",
            help_closure.as_ref().unchecked_ref(),
        );

        self.help_closure = Some(help_closure);

        let close_instructions_closure = Closure::<dyn Fn(JsValue)>::new(
            move |_event: JsValue| {
                let wordsnap = unsafe { &*wordsnap_pointer };
                wordsnap.set_instructions_visible(false);
            }
        );

        let _ = close_button.add_event_listener_with_callback(
            "click",
            close_instructions_closure.as_ref().unchecked_ref(),
        );

        self.close_instructions_closure = Some(close_instructions_closure);
    }

    fn set_instructions_visible(&self, visible: bool) {
        if let Some(panel) = self.get_element("instructions-panel") {
            let _ = if visible {
                panel.class_list().add_1("show")
            } else {
                panel.class_list().remove_1("show")
            };
        }

        if let Some(help_button) = self.get_element("help-btn") {
            let _ = help_button.style().set_property(
                "display",
                if visible { "none" } else { "flex" },
            );
        }
    }

    fn set_up_victory_modal(&mut self) {
        let wordsnap_pointer = self as *mut Wordsnap;

        if let Some(close_button) = self.get_element("close-victory") {
            let close_victory_closure = Closure::<dyn Fn(JsValue)>::new(
                move |event: JsValue| {
                    let wordsnap = unsafe { &*wordsnap_pointer };

                    if let Some(event) = event.dyn_ref::<web_sys::Event>() {
                        event.stop_propagation();
                    }

                    wordsnap.close_victory_modal(CloseMethod::Button);
                }
            );

            let _ = close_button.add_event_listener_with_callback(
                "click",
                close_victory_closure.as_ref().unchecked_ref(),
            );

            self.close_victory_closure = Some(close_victory_closure);
        }

        let victory_backdrop_closure = Closure::<dyn Fn(JsValue)>::new(
            move |event: JsValue| {
                let wordsnap = unsafe { &*wordsnap_pointer };

                let on_backdrop = event.dyn_ref::<web_sys::Event>()
                    .and_then(|event| event.target())
                    .and_then(|target| target.dyn_into::<web_sys::HtmlElement>().ok())
                    .map_or(false, |target| target == wordsnap.victory_modal);

                if on_backdrop {
                    wordsnap.close_victory_modal(CloseMethod::Backdrop);
                }
            }
        );

        let _ = self.victory_modal.add_event_listener_with_callback(
            "click",
            victory_backdrop_closure.as_ref().unchecked_ref(),
        );

        self.victory_backdrop_closure = Some(victory_backdrop_closure);
    }

    fn close_victory_modal(&self, method: CloseMethod) {
        log::info!("closing victory modal ({})", method.name());

        let _ = self.victory_modal.class_list().remove_1("show");

        self.context.send_analytics(analytics::Event::VictoryModalClosed {
            puzzle: &self.context.puzzle_name(),
            method,
        });
    }

    // Position of the dragged piece within the game area, kept inside
    // the area
    fn drag_position(
        &self,
        drag: &Drag,
        event: &web_sys::PointerEvent,
    ) -> (f32, f32) {
        let area_rect = self.context.game_area.get_bounding_client_rect();
        let piece = &self.session.pieces()[drag.piece];

        let x = event.client_x() as f32 - area_rect.left() as f32 - drag.offset_x;
        let y = event.client_y() as f32 - area_rect.top() as f32 - drag.offset_y;

        (
            x.min(area_rect.width() as f32 - piece.width).max(0.0),
            y.min(area_rect.height() as f32 - piece.height).max(0.0),
        )
    }

    fn piece_for_event(&self, event: &web_sys::PointerEvent) -> Option<usize> {
        let element = event.target()?.dyn_into::<web_sys::Element>().ok()?;
        let piece_element = element.closest(".piece").ok()??;

        piece_element.get_attribute("data-piece-index")?.parse::<usize>().ok()
    }

    fn handle_pointerdown_event(&mut self, event: web_sys::PointerEvent) {
        if !event.is_primary() || event.button() != 0 || self.drag.is_some() {
            return;
        }

        let Some(index) = self.piece_for_event(&event)
        else {
            return;
        };

        event.prevent_default();

        let Some(piece) = self.session.pieces().get(index)
        else {
            return;
        };

        if piece.completed {
            return;
        }

        let element = &self.piece_elements[index];
        let rect = element.get_bounding_client_rect();

        let _ = element.class_list().add_1("dragging");
        let _ = element.style().set_property("z-index", DRAG_Z_INDEX);
        let _ = element.set_pointer_capture(event.pointer_id());

        log::debug!("drag started: “{}”", piece.fragment);

        self.drag = Some(Drag {
            piece: index,
            pointer_id: event.pointer_id(),
            offset_x: event.client_x() as f32 - rect.left() as f32,
            offset_y: event.client_y() as f32 - rect.top() as f32,
        });
    }

    fn handle_pointermove_event(&mut self, event: web_sys::PointerEvent) {
        let Some(drag) = self.drag.as_ref()
            .filter(|drag| drag.pointer_id == event.pointer_id())
        else {
            return;
        };

        event.prevent_default();

        let (x, y) = self.drag_position(drag, &event);
        let element = &self.piece_elements[drag.piece];

        let _ = element.style().set_property("transition", "none");
        set_element_position(element, x, y);
    }

    fn end_drag(&mut self, pointer_id: i32) -> Option<Drag> {
        if self.drag.as_ref()?.pointer_id != pointer_id {
            return None;
        }

        let drag = self.drag.take()?;
        let element = &self.piece_elements[drag.piece];

        let _ = element.class_list().remove_1("dragging");
        let _ = element.style().remove_property("transition");
        let _ = element.style().remove_property("z-index");
        let _ = element.release_pointer_capture(pointer_id);

        Some(drag)
    }

    fn handle_pointerup_event(&mut self, event: web_sys::PointerEvent) {
        let Some(drag) = self.end_drag(event.pointer_id())
        else {
            return;
        };

        event.prevent_default();

        let (x, y) = self.drag_position(&drag, &event);

        match self.session.release_piece(drag.piece, x, y) {
            Ok(landing) => {
                let (x, y) = landing.position();

                set_element_position(&self.piece_elements[drag.piece], x, y);

                if let Landing::Snapped(_) = landing {
                    self.show_snap(drag.piece);
                }
            },
            Err(e) => log::warn!("{}", e),
        }

        self.queue_completion_effects();
    }

    fn handle_pointercancel_event(&mut self, event: web_sys::PointerEvent) {
        let Some(drag) = self.end_drag(event.pointer_id())
        else {
            return;
        };

        // Put the piece back where it was before the drag
        let piece = &self.session.pieces()[drag.piece];
        set_element_position(&self.piece_elements[drag.piece], piece.x, piece.y);
    }

    fn show_snap(&self, index: usize) {
        let element = self.piece_elements[index].clone();
        let _ = element.class_list().add_1("snapping");

        self.context.set_timeout(effects::SNAPPING_CLASS_DURATION, move || {
            let _ = element.class_list().remove_1("snapping");
        });

        let (center_x, center_y) = self.session.pieces()[index].rect().center();
        let ripple = effects::ripple(center_x, center_y);

        let Ok(ripple_div) = self.create_div("ripple-effect")
        else {
            return;
        };

        let style = ripple_div.style();
        let _ = style.set_property("width", &format!("{}px", ripple.width));
        let _ = style.set_property("height", &format!("{}px", ripple.height));
        set_element_position(&ripple_div, ripple.left, ripple.top);

        self.add_transient_element(ripple_div, effects::RIPPLE_DURATION);
    }

    fn add_transient_element(&self, element: web_sys::HtmlElement, duration: u32) {
        let _ = self.context.game_area.append_with_node_1(&element);

        self.context.set_timeout(duration, move || element.remove());
    }

    // The words have already been checked and locked by the session.
    // Showing the effects is delayed slightly to give the snap
    // animation time to finish.
    fn queue_completion_effects(&mut self) {
        let completed_words = self.session.changed_completed_words()
            .collect::<Vec<_>>();
        let victory = self.session.pending_victory();

        if completed_words.is_empty() && !victory {
            return;
        }

        let wordsnap_pointer = self as *mut Wordsnap;
        let delay = self.config.game_settings.completion_delay.max(0.0);

        self.context.set_timeout(
            delay.round() as u32,
            move || {
                let wordsnap = unsafe { &*wordsnap_pointer };

                for word_index in completed_words {
                    wordsnap.show_completed_word(word_index);
                }

                if victory {
                    wordsnap.show_victory();
                }
            },
        );
    }

    fn show_completed_word(&self, word_index: usize) {
        let Some(bounds) = effects::word_bounds(
            self.session.word_pieces(word_index).map(|(_, piece)| piece)
        ) else {
            return;
        };

        for (index, piece) in self.session.word_pieces(word_index) {
            let element = &self.piece_elements[index];
            let background = effects::shared_background(&bounds, piece);

            let _ = element.class_list().add_2("completed", "locked");

            let style = element.style();
            let _ = style.set_property(
                "background-size",
                &format!("{}px {}px", background.width, background.height),
            );
            let _ = style.set_property(
                "background-position",
                &format!("-{}px -{}px", background.offset_x, background.offset_y),
            );
        }

        let word = &self.session.puzzle().words[word_index].word;

        log::info!("word locked: {}", word);

        if let Some((x, y)) = effects::centroid(
            self.session.word_pieces(word_index).map(|(_, piece)| piece)
        ) {
            self.show_celebration(x, y);
        }

        self.context.send_analytics(analytics::Event::WordCompleted {
            word,
            puzzle: &self.context.puzzle_name(),
        });

        self.play_success_sound();
    }

    fn show_celebration(&self, x: f32, y: f32) {
        let mut random = || js_sys::Math::random() as f32;

        for particle in effects::particle_burst(
            x,
            y,
            effects::N_PARTICLES,
            &mut random,
        ) {
            let Ok(div) = self.create_div("particle")
            else {
                continue;
            };

            let style = div.style();
            set_element_position(&div, particle.x, particle.y);
            let _ = style.set_property("background-color", particle.color);
            let _ = style.set_property("--tx", &format!("{}px", particle.tx));
            let _ = style.set_property("--ty", &format!("{}px", particle.ty));

            self.add_transient_element(div, effects::PARTICLE_DURATION);
        }

        for confetti in effects::confetti(
            x,
            y,
            effects::N_CONFETTI,
            &mut random,
        ) {
            let Ok(div) = self.create_div("confetti")
            else {
                continue;
            };

            let style = div.style();
            set_element_position(&div, confetti.x, confetti.y);
            let _ = style.set_property("background-color", confetti.color);
            let _ = style.set_property(
                "border-radius",
                match confetti.shape {
                    ConfettiShape::Circle => "50%",
                    ConfettiShape::Square => "0",
                },
            );
            let _ = style.set_property(
                "animation-delay",
                &format!("{}s", confetti.delay),
            );
            let _ = style.set_property(
                "animation-duration",
                &format!("{}s", confetti.duration),
            );

            self.add_transient_element(div, effects::CONFETTI_DURATION);
        }
    }

    fn play_success_sound(&self) {
        let Some(sound) = self.success_sound.as_ref()
        else {
            return;
        };

        // Rewind in case several words are completed in quick succession
        sound.set_current_time(0.0);

        if let Ok(promise) = sound.play() {
            // Browsers may block autoplay, which is fine
            let catch_closure = PromiseClosure::new(|e: JsValue| {
                log::info!("audio play prevented: {:?}", e);
            });

            let _ = promise.catch(&catch_closure);

            catch_closure.forget();
        }
    }

    fn show_victory(&self) {
        log::info!("showing victory screen");

        self.context.send_analytics(analytics::Event::PuzzleCompleted {
            puzzle: &self.context.puzzle_name(),
            total_words: self.session.puzzle().words.len(),
        });

        clear_element(&self.facts_list);

        for (word, fact) in self.session.summary() {
            let (Ok(li), Ok(strong)) = (
                self.context.document.create_element("li"),
                self.context.document.create_element("strong"),
            ) else {
                continue;
            };

            set_element_text(&strong, &format!("{}:", word));
            let _ = li.append_with_node_1(&strong);

            let fact = self.context.document.create_text_node(
                &format!(" {}", fact),
            );
            let _ = li.append_with_node_1(&fact);

            let _ = self.facts_list.append_with_node_1(&li);
        }

        let _ = self.victory_modal.class_list().add_1("show");
    }
}

fn set_element_position(element: &web_sys::HtmlElement, x: f32, y: f32) {
    let style = element.style();
    let _ = style.set_property("left", &format!("{}px", x));
    let _ = style.set_property("top", &format!("{}px", y));
}

fn clear_element(element: &web_sys::Element) {
    while let Some(child) = element.first_child() {
        let _ = element.remove_child(&child);
    }
}

fn set_element_text(element: &web_sys::Element, text: &str) {
    clear_element(element);

    if let Some(document) = element.owner_document() {
        let text = document.create_text_node(text);
        let _ = element.append_with_node_1(&text);
    }
}

#[wasm_bindgen]
pub fn init_wordsnap() {
    std::panic::set_hook(Box::new(console_error_panic_hook::hook));
    let _ = console_log::init_with_level(log::Level::Info);

    let context = match Context::new() {
        Ok(c) => c,
        Err(e) => {
            show_error(&e);
            return;
        }
    };

    let loader = Loader::new(context);

    let floating_pointer = loader.start_floating();

    unsafe {
        (*floating_pointer).queue_puzzle_load();
    }
}
