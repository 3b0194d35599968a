// Deck event bindings: quit keys and media playback.

use std::cell::RefCell;
use std::rc::Rc;

use quiz_display::role::DisplayRole;
use quiz_display::slides::{
    KeyPress, MediaCommand, MediaState, QuitKeys, SlideKeyBinder, SlideMedia, plan_slide_change,
};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;

use crate::web_document::{navigate, query_selector_all, web_document};
use crate::web_error_handling::{JsResult, describe_js_error};


const PLAYABLE_SELECTOR: &str = ".playable";
const AUTO_PLAY_CLASS: &str = "av";

#[wasm_bindgen]
extern "C" {
    // Adapter over the slide deck library, supplied by the page as
    // `{ go(index), getSlide(index) }`.
    #[derive(Clone, Debug)]
    pub type SlideDeck;

    #[wasm_bindgen(method)]
    pub fn go(this: &SlideDeck, index: i32);

    #[wasm_bindgen(method, js_name = getSlide)]
    pub fn get_slide(this: &SlideDeck, index: i32) -> Option<web_sys::Element>;
}

type KeyListener = Closure<dyn FnMut(web_sys::KeyboardEvent)>;

#[wasm_bindgen]
pub struct WebSlideBinder {
    binder: Rc<SlideKeyBinder>,
    deck: SlideDeck,
    key_listener: RefCell<Option<KeyListener>>,
}

#[wasm_bindgen]
impl WebSlideBinder {
    // `quit_keys` are `KeyboardEvent.key` names; Escape, "q" and "x" when omitted.
    #[wasm_bindgen(constructor)]
    pub fn new(role_flag: &str, deck: SlideDeck, quit_keys: Option<Vec<String>>) -> Self {
        let quit_keys = quit_keys.map_or_else(QuitKeys::default, QuitKeys::new);
        let binder = SlideKeyBinder::new(DisplayRole::from_flag(role_flag), quit_keys);
        WebSlideBinder {
            binder: Rc::new(binder),
            deck,
            key_listener: RefCell::new(None),
        }
    }

    // To be called on every deck init. A repeated init replaces the listener.
    pub fn on_deck_init(&self) -> JsResult<()> {
        let document = web_document()?;
        let target = document.event_target();
        if let Some(old) = self.key_listener.borrow_mut().take() {
            target.remove_event_listener_with_callback("keydown", old.as_ref().unchecked_ref())?;
        }
        let binder = Rc::clone(&self.binder);
        let listener: KeyListener = Closure::new(move |event: web_sys::KeyboardEvent| {
            if let Err(err) = on_key_down(&binder, &event) {
                log::error!("Key handler failed: {}", describe_js_error(&err));
            }
        });
        target.add_event_listener_with_callback("keydown", listener.as_ref().unchecked_ref())?;
        *self.key_listener.borrow_mut() = Some(listener);
        log::debug!("Quit keys bound for {:?}", self.binder.role());
        Ok(())
    }

    pub fn on_slide_change(&self, from: i32, to: i32) -> JsResult<()> {
        let (from_media, from_elements) = slide_media(self.deck.get_slide(from).as_ref())?;
        let (to_media, to_elements) = slide_media(self.deck.get_slide(to).as_ref())?;
        for command in plan_slide_change(&from_media, &to_media) {
            match command {
                MediaCommand::Pause(i) => from_elements[i].pause()?,
                MediaCommand::Play(i) => play(&to_elements[i])?,
            }
        }
        Ok(())
    }
}

fn on_key_down(binder: &SlideKeyBinder, event: &web_sys::KeyboardEvent) -> JsResult<()> {
    let key = KeyPress {
        key: event.key(),
        ctrl: event.ctrl_key(),
        alt: event.alt_key(),
        meta: event.meta_key(),
        shift: event.shift_key(),
    };
    if let Some(href) = binder.on_key(&key) {
        event.prevent_default();
        navigate(href)?;
    }
    Ok(())
}

fn slide_media(
    slide: Option<&web_sys::Element>,
) -> JsResult<(SlideMedia, Vec<web_sys::HtmlMediaElement>)> {
    let Some(slide) = slide else {
        return Ok((SlideMedia::default(), vec![]));
    };
    let elements: Vec<web_sys::HtmlMediaElement> =
        query_selector_all(slide, PLAYABLE_SELECTOR)?.elements().collect();
    let media = elements
        .iter()
        .map(|e| MediaState {
            current_time: e.current_time(),
            ready_state: e.ready_state(),
        })
        .collect();
    let auto_play = slide.class_list().contains(AUTO_PLAY_CLASS);
    Ok((SlideMedia { auto_play, media }, elements))
}

// Browsers may refuse autoplay; that is not worth more than a debug line.
fn play(element: &web_sys::HtmlMediaElement) -> JsResult<()> {
    let promise = element.play()?;
    wasm_bindgen_futures::spawn_local(async move {
        if let Err(err) = JsFuture::from(promise).await {
            log::debug!("Playback refused: {}", describe_js_error(&err));
        }
    });
    Ok(())
}
