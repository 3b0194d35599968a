// Presentation and controller pages: server polling and slide sync.

use std::cell::RefCell;
use std::rc::Rc;

use gloo_timers::callback::Interval;
use quiz_display::control::{ControlClient, PollAction};
use quiz_display::error::PollError;
use quiz_display::poller;
use quiz_display::session::ClientSession;
use wasm_bindgen::prelude::*;

use crate::rust_error;
use crate::web_document::{navigate, web_document};
use crate::web_error_handling::{JsResult, describe_js_error};
use crate::web_slides::SlideDeck;
use crate::web_transport::WebTransport;


const TICK_CLASS: &str = "tick";

#[wasm_bindgen]
pub struct WebControl {
    client: Rc<RefCell<ControlClient>>,
    transport: Rc<WebTransport>,
    deck: SlideDeck,
    timer: RefCell<Option<Interval>>,
}

// All methods take `&self`: `deck.go` fires the deck change handler, which calls back into
// `on_slide_change` while the caller may still be on the stack.
#[wasm_bindgen]
impl WebControl {
    #[wasm_bindgen(constructor)]
    pub fn new(page_config: &str, deck: SlideDeck) -> JsResult<WebControl> {
        let session =
            ClientSession::from_page_json(page_config).map_err(|err| rust_error!("{err}"))?;
        log::info!(
            "Display role {:?}, polling every {:?}",
            session.role,
            session.poll_interval
        );
        Ok(WebControl {
            client: Rc::new(RefCell::new(ControlClient::new(session))),
            transport: Rc::new(WebTransport),
            deck,
            timer: RefCell::new(None),
        })
    }

    // To be called once the deck is initialised: restores the slide the server rendered the page
    // for and starts the poll timer. Calling it again restarts the timer.
    pub fn start(&self) -> JsResult<()> {
        let initial_slide = self.client.borrow().initial_slide();
        if let Some(index) = initial_slide {
            self.deck.go(index);
        }
        let millis = self.client.borrow().session().poll_interval.as_millis();
        let millis = u32::try_from(millis).map_err(|_| rust_error!("Poll interval too long"))?;
        let client = Rc::clone(&self.client);
        let transport = Rc::clone(&self.transport);
        let deck = self.deck.clone();
        let timer = Interval::new(millis, move || {
            spawn_poll(Rc::clone(&client), Rc::clone(&transport), deck.clone());
        });
        // Replacing the handle cancels the previous timer.
        *self.timer.borrow_mut() = Some(timer);
        Ok(())
    }

    pub fn stop(&self) { self.timer.borrow_mut().take(); }

    // Deck change handler. Only the controller tells the server.
    pub fn on_slide_change(&self, index: i32) {
        let client = Rc::clone(&self.client);
        let transport = Rc::clone(&self.transport);
        wasm_bindgen_futures::spawn_local(async move {
            let result = poller::report_slide_change(&client, transport.as_ref(), index).await;
            if let Err(err) = result {
                log::warn!("Slide change not reported: {err}");
            }
        });
    }

    // Controller's "next"/"previous" buttons.
    pub fn step(&self, next: bool) {
        let client = Rc::clone(&self.client);
        let transport = Rc::clone(&self.transport);
        let deck = self.deck.clone();
        wasm_bindgen_futures::spawn_local(async move {
            let result = poller::step(&client, transport.as_ref(), next).await;
            handle_poll_result(result, &deck);
        });
    }

    pub fn index(&self) -> i32 { self.client.borrow().session().index }
    pub fn tick(&self) -> String { self.client.borrow().session().tick.clone() }
}

fn spawn_poll(client: Rc<RefCell<ControlClient>>, transport: Rc<WebTransport>, deck: SlideDeck) {
    wasm_bindgen_futures::spawn_local(async move {
        let result = poller::poll_control(&client, transport.as_ref()).await;
        handle_poll_result(result, &deck);
    });
}

// A failed poll changes nothing; the next tick tries again.
fn handle_poll_result(result: Result<PollAction, PollError>, deck: &SlideDeck) {
    match result {
        Ok(action) => {
            if let Err(err) = apply_action(action, deck) {
                log::error!("Cannot apply server update: {}", describe_js_error(&err));
            }
        }
        Err(err) => log::warn!("Poll failed: {err}"),
    }
}

fn apply_action(action: PollAction, deck: &SlideDeck) -> JsResult<()> {
    match action {
        PollAction::Navigate(href) => navigate(&href)?,
        PollAction::UpdateTick(tick) => {
            for element in web_document()?.get_elements_by_class_name(TICK_CLASS) {
                element.set_text_content(Some(&tick));
            }
        }
        PollAction::GoToSlide(index) => deck.go(index),
        PollAction::Noop | PollAction::Stale => {}
    }
    Ok(())
}
