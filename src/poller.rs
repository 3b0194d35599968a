// Async drivers that connect the synchronous clients to a transport.
//
// Several polls may be in flight at once (the timer does not wait for replies), so client state
// is shared through `RefCell` and never borrowed across an `.await`.

use std::cell::RefCell;
use std::time::Duration;

use instant::Instant;

use crate::control::{ControlClient, PollAction, PollKind};
use crate::error::PollError;
use crate::monitor::{MonitorClient, MonitorTable};
use crate::transport::{self, Transport};


// One timer tick on a presentation page: a puppet poll or a controller refresh depending on role.
pub async fn poll_control(
    client: &RefCell<ControlClient>, transport: &(impl Transport + ?Sized),
) -> Result<PollAction, PollError> {
    let kind = client.borrow().poll_kind();
    let timeout = client.borrow().session().request_timeout;
    match kind {
        PollKind::Puppet => {
            let pending = client.borrow_mut().begin_puppet_poll();
            let response = transport::send(transport, &pending.request, timeout).await?;
            Ok(client.borrow_mut().finish_puppet_poll(pending.ticket, &response))
        }
        PollKind::ControllerRefresh => {
            let pending = client.borrow_mut().begin_update_poll();
            let response = transport::send(transport, &pending.request, timeout).await?;
            Ok(client.borrow_mut().finish_update_poll(pending.ticket, &response))
        }
    }
}

// Records a slide change made locally and, on the controller, reports it to the server.
pub async fn report_slide_change(
    client: &RefCell<ControlClient>, transport: &(impl Transport + ?Sized), index: i32,
) -> Result<(), PollError> {
    let request = client.borrow_mut().slide_changed(index);
    let Some(request) = request else {
        return Ok(());
    };
    let timeout = client.borrow().session().request_timeout;
    transport::fire(transport, &request, timeout).await
}

// Moves the controller to the next or previous set of slides.
pub async fn step(
    client: &RefCell<ControlClient>, transport: &(impl Transport + ?Sized), next: bool,
) -> Result<PollAction, PollError> {
    let pending = client.borrow_mut().begin_step(next);
    let timeout = client.borrow().session().request_timeout;
    let response = transport::send(transport, &pending.request, timeout).await?;
    Ok(client.borrow_mut().finish_step(pending.ticket, &response))
}

// Returns `None` if the reply was superseded by a newer one.
pub async fn poll_monitor(
    client: &RefCell<MonitorClient>, transport: &(impl Transport + ?Sized),
    timeout: Duration,
) -> Result<Option<MonitorTable>, PollError> {
    let pending = client.borrow_mut().begin_poll();
    let response = transport::send(transport, &pending.request, timeout).await?;
    Ok(client.borrow_mut().finish_poll(pending.ticket, &response, Instant::now()))
}
