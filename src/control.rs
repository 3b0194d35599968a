// Controller/puppet synchronization.
//
// Every display mirrors a slide index owned by the server. The controller pushes its index on
// each slide change; puppets poll for it. Both also poll for page changes (new round, scores
// available) and for the tick text.
//
// `ControlClient` is purely synchronous: `begin_*` produces the request to send, `finish_*`
// consumes the reply and says what the page should do. The async glue lives in `poller`.

use log::{debug, info};

use crate::protocol::{
    ControlChangeRequest, PuppetRequest, PuppetResponse, StepRequest, StepResponse, UpdateRequest,
    UpdateResponse,
};
use crate::role::DisplayRole;
use crate::sequencer::{RequestSequencer, RequestTicket};
use crate::session::ClientSession;


#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum PollKind {
    // Puppets follow the shared index.
    Puppet,
    // The controller owns the index and only asks whether the page must be refreshed.
    ControllerRefresh,
}

// What the page should do after a reply. At most one action per reply.
#[must_use]
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum PollAction {
    // Leave the page. An empty target reloads the current page.
    Navigate(String),
    // Replace the text of every tick element.
    UpdateTick(String),
    // Drive the slide deck to the given slide.
    GoToSlide(i32),
    // Nothing changed.
    Noop,
    // A newer reply has already been applied; this one was dropped.
    Stale,
}

#[derive(Clone, Debug)]
pub struct PendingRequest<R> {
    pub ticket: RequestTicket,
    pub request: R,
}

pub struct ControlClient {
    session: ClientSession,
    puppet_sequencer: RequestSequencer,
    update_sequencer: RequestSequencer,
    step_sequencer: RequestSequencer,
}

impl ControlClient {
    pub fn new(session: ClientSession) -> Self {
        ControlClient {
            session,
            puppet_sequencer: RequestSequencer::new(),
            update_sequencer: RequestSequencer::new(),
            step_sequencer: RequestSequencer::new(),
        }
    }

    pub fn session(&self) -> &ClientSession { &self.session }
    pub fn role(&self) -> &DisplayRole { &self.session.role }

    pub fn poll_kind(&self) -> PollKind {
        if self.session.role.is_controller() {
            PollKind::ControllerRefresh
        } else {
            PollKind::Puppet
        }
    }

    // Slide to show once the deck is ready. A controller page reloaded after a score update must
    // return to where it was; for puppets this avoids a visible jump on the first poll.
    pub fn initial_slide(&self) -> Option<i32> {
        (self.session.index != 0).then_some(self.session.index)
    }

    // Records a local slide change. Only the controller reports it to the server.
    pub fn slide_changed(&mut self, index: i32) -> Option<ControlChangeRequest> {
        self.session.index = index;
        if !self.session.role.is_controller() {
            return None;
        }
        Some(ControlChangeRequest {
            index,
            touch_nav: self.session.touch_nav,
            csrf_token: self.session.csrf_token.clone(),
        })
    }

    pub fn begin_puppet_poll(&mut self) -> PendingRequest<PuppetRequest> {
        let s = &self.session;
        let request = PuppetRequest {
            puppet: s.role.flag().to_owned(),
            access: s.access.clone(),
            page: s.page,
            param: s.param,
            index: s.index,
            update: s.update,
            monitor: s.monitor,
            csrf_token: s.csrf_token.clone(),
        };
        PendingRequest { ticket: self.puppet_sequencer.issue(), request }
    }

    // Precedence: navigation, then tick, then slide index.
    pub fn finish_puppet_poll(
        &mut self, ticket: RequestTicket, response: &PuppetResponse,
    ) -> PollAction {
        if !self.puppet_sequencer.accept(ticket) {
            debug!("Dropping stale puppet reply #{}", ticket.seq());
            return PollAction::Stale;
        }
        if let Some(action) = self.navigate_or_tick(&response.new_href, &response.new_tick) {
            return action;
        }
        if response.new_index != self.session.index {
            debug!("Slide {} -> {}", self.session.index, response.new_index);
            self.session.index = response.new_index;
            return PollAction::GoToSlide(response.new_index);
        }
        PollAction::Noop
    }

    pub fn begin_update_poll(&mut self) -> PendingRequest<UpdateRequest> {
        self.session.second += 1;
        let s = &self.session;
        let request = UpdateRequest {
            page: s.page,
            access: s.access.clone(),
            param: s.param,
            index: s.index,
            update: s.update,
            second: s.second,
            monitor: s.monitor,
            csrf_token: s.csrf_token.clone(),
        };
        PendingRequest { ticket: self.update_sequencer.issue(), request }
    }

    // The controller is the source of truth for the index, so there is no index sync here.
    pub fn finish_update_poll(
        &mut self, ticket: RequestTicket, response: &UpdateResponse,
    ) -> PollAction {
        if !self.update_sequencer.accept(ticket) {
            debug!("Dropping stale update reply #{}", ticket.seq());
            return PollAction::Stale;
        }
        self.navigate_or_tick(&response.new_href, &response.new_tick)
            .unwrap_or(PollAction::Noop)
    }

    pub fn begin_step(&mut self, next: bool) -> PendingRequest<StepRequest> {
        let request = StepRequest {
            next,
            csrf_token: self.session.csrf_token.clone(),
        };
        PendingRequest { ticket: self.step_sequencer.issue(), request }
    }

    // A step always leaves the page: the server answers with the page for the next or previous
    // set of slides.
    pub fn finish_step(&mut self, ticket: RequestTicket, response: &StepResponse) -> PollAction {
        if !self.step_sequencer.accept(ticket) {
            return PollAction::Stale;
        }
        info!("Stepping to {:?}", response.new_href);
        PollAction::Navigate(response.new_href.clone())
    }

    fn navigate_or_tick(&mut self, new_href: &str, new_tick: &str) -> Option<PollAction> {
        if !new_href.is_empty() {
            info!("Navigating to {new_href}");
            return Some(PollAction::Navigate(new_href.to_owned()));
        }
        if !new_tick.is_empty() && new_tick != self.session.tick {
            debug!("Tick {:?} -> {:?}", self.session.tick, new_tick);
            self.session.tick = new_tick.to_owned();
            return Some(PollAction::UpdateTick(new_tick.to_owned()));
        }
        None
    }
}
