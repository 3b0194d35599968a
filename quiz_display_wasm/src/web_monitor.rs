// Monitor page: display health table and a liveness indicator for the monitor's own connection.

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use gloo_timers::callback::Interval;
use instant::Instant;
use quiz_display::liveness::LIVENESS_CHECK_INTERVAL;
use quiz_display::monitor::{MonitorClient, MonitorTable};
use quiz_display::poller;
use quiz_display::session::ClientSession;
use wasm_bindgen::prelude::*;

use crate::rust_error;
use crate::web_document::web_document;
use crate::web_element_ext::WebElementExt;
use crate::web_error_handling::{JsResult, describe_js_error};
use crate::web_transport::WebTransport;


#[wasm_bindgen]
pub struct WebMonitor {
    client: Rc<RefCell<MonitorClient>>,
    transport: Rc<WebTransport>,
    table: web_sys::Element,
    liveness: web_sys::Element,
    poll_interval: Duration,
    request_timeout: Duration,
    timers: RefCell<Vec<Interval>>,
}

#[wasm_bindgen]
impl WebMonitor {
    #[wasm_bindgen(constructor)]
    pub fn new(page_config: &str, table_id: &str, liveness_id: &str) -> JsResult<WebMonitor> {
        let session =
            ClientSession::from_page_json(page_config).map_err(|err| rust_error!("{err}"))?;
        let document = web_document()?;
        Ok(WebMonitor {
            client: Rc::new(RefCell::new(MonitorClient::new(session.csrf_token, Instant::now()))),
            transport: Rc::new(WebTransport),
            table: document.get_existing_element_by_id(table_id)?,
            liveness: document.get_existing_element_by_id(liveness_id)?,
            poll_interval: session.poll_interval,
            request_timeout: session.request_timeout,
            timers: RefCell::new(vec![]),
        })
    }

    pub fn start(&self) -> JsResult<()> {
        let poll_timer = {
            let client = Rc::clone(&self.client);
            let transport = Rc::clone(&self.transport);
            let table = self.table.clone();
            let timeout = self.request_timeout;
            Interval::new(to_millis(self.poll_interval)?, move || {
                spawn_poll(Rc::clone(&client), Rc::clone(&transport), table.clone(), timeout);
            })
        };
        let liveness_timer = {
            let client = Rc::clone(&self.client);
            let liveness = self.liveness.clone();
            Interval::new(to_millis(LIVENESS_CHECK_INTERVAL)?, move || {
                show_liveness(&client.borrow(), &liveness);
            })
        };
        show_liveness(&self.client.borrow(), &self.liveness);
        *self.timers.borrow_mut() = vec![poll_timer, liveness_timer];
        Ok(())
    }

    pub fn stop(&self) { self.timers.borrow_mut().clear(); }
}

fn to_millis(duration: Duration) -> JsResult<u32> {
    u32::try_from(duration.as_millis()).map_err(|_| rust_error!("Interval too long: {duration:?}"))
}

fn spawn_poll(
    client: Rc<RefCell<MonitorClient>>, transport: Rc<WebTransport>, table: web_sys::Element,
    timeout: Duration,
) {
    wasm_bindgen_futures::spawn_local(async move {
        match poller::poll_monitor(&client, transport.as_ref(), timeout).await {
            Ok(Some(rows)) => {
                if let Err(err) = render_table(&table, &rows) {
                    log::error!("Cannot render monitor table: {}", describe_js_error(&err));
                }
            }
            Ok(None) => {}
            Err(err) => log::warn!("Monitor poll failed: {err}"),
        }
    });
}

fn render_table(table: &web_sys::Element, rows: &MonitorTable) -> JsResult<()> {
    table.remove_all_children();
    for row in &rows.rows {
        let tr = table.append_new_element("tr")?;
        for cell in &row.cells {
            tr.append_new_element("td")?
                .with_classes([cell.class.as_str()])?
                .with_text_content(&cell.text);
        }
    }
    Ok(())
}

fn show_liveness(client: &MonitorClient, element: &web_sys::Element) {
    let reading = client.liveness(Instant::now());
    element.set_text_content(Some(&reading.elapsed_secs.to_string()));
    element.set_class_name_if_changed(reading.liveness.css_class());
}
