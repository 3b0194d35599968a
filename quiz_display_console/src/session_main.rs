// Headless display sessions: the same polling a browser page does, reported to the terminal.
//
// Polls are sequential here; a poll that outlives the interval delays the next one instead of
// overlapping with it.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::time::Duration;

use async_std::task;
use instant::Instant;
use log::{debug, info, warn};
use quiz_display::control::{ControlClient, PollAction, PollKind};
use quiz_display::meter::{Meter, MeterBox, MeterStats};
use quiz_display::monitor::MonitorClient;
use quiz_display::poller;
use quiz_display::protocol::{FormRequest, MonitorRequest, PuppetRequest, UpdateRequest};
use quiz_display::role::DisplayRole;

use crate::console_config::ConsoleConfig;
use crate::monitor_view;
use crate::reqwest_transport::ReqwestTransport;


// Stops after `max_polls` polls if given, otherwise runs until interrupted.
pub struct RunLimits {
    pub max_polls: Option<u64>,
}

fn make_transport(config: &ConsoleConfig) -> anyhow::Result<ReqwestTransport> {
    let cookie = config.session_cookie.as_ref().map(|source| source.get()).transpose()?;
    ReqwestTransport::new(&config.server_url, cookie)
}

struct StatsReporter {
    meters: MeterBox,
    interval: Duration,
    last_report: Instant,
}

impl StatsReporter {
    fn new(interval: Duration) -> Self {
        StatsReporter {
            meters: MeterBox::new(),
            interval,
            last_report: Instant::now(),
        }
    }

    fn meter(&mut self, name: &str) -> Meter { self.meters.meter(name) }

    // Returns what was logged, if it was time to.
    fn maybe_report(&mut self, now: Instant) -> Option<BTreeMap<String, MeterStats>> {
        if now.duration_since(self.last_report) < self.interval {
            return None;
        }
        self.last_report = now;
        let stats = self.meters.consume_stats();
        for (name, stats) in &stats {
            info!("{name}: {stats}");
        }
        Some(stats)
    }
}

fn polls(limits: &RunLimits) -> impl Iterator<Item = u64> {
    (1..).take_while(move |n| limits.max_polls.is_none_or(|max| *n <= max))
}

pub async fn run_display(
    config: ConsoleConfig, role: DisplayRole, limits: RunLimits,
) -> anyhow::Result<()> {
    let transport = make_transport(&config)?;
    let client = RefCell::new(ControlClient::new(config.client_session(role)?));
    let mut stats = StatsReporter::new(config.stats_interval);
    let path = match client.borrow().poll_kind() {
        PollKind::Puppet => PuppetRequest::PATH,
        PollKind::ControllerRefresh => UpdateRequest::PATH,
    };
    let meter = stats.meter(path);
    if let Some(index) = client.borrow().initial_slide() {
        info!("Starting at slide {index}");
    }
    info!(
        "Polling {} as {:?} every {}",
        path,
        client.borrow().role(),
        humantime::format_duration(config.poll_interval)
    );
    for _ in polls(&limits) {
        let start = Instant::now();
        match poller::poll_control(&client, &transport).await {
            Ok(action) => {
                meter.record_duration(start.elapsed());
                report_action(&action);
            }
            Err(err) => warn!("Poll failed: {err}"),
        }
        stats.maybe_report(Instant::now());
        task::sleep(config.poll_interval).await;
    }
    Ok(())
}

fn report_action(action: &PollAction) {
    match action {
        PollAction::Navigate(href) if href.is_empty() => info!("Server asks to reload the page"),
        PollAction::Navigate(href) => info!("Server sends the display to {href}"),
        PollAction::UpdateTick(tick) => info!("Tick is now {tick}"),
        PollAction::GoToSlide(index) => info!("Slide {index}"),
        PollAction::Noop => debug!("No change"),
        PollAction::Stale => debug!("Superseded reply"),
    }
}

pub async fn run_monitor(config: ConsoleConfig, limits: RunLimits) -> anyhow::Result<()> {
    let transport = make_transport(&config)?;
    let client = RefCell::new(MonitorClient::new(config.csrf_token.get()?, Instant::now()));
    let mut stats = StatsReporter::new(config.stats_interval);
    let meter = stats.meter(MonitorRequest::PATH);
    for _ in polls(&limits) {
        let start = Instant::now();
        match poller::poll_monitor(&client, &transport, config.request_timeout).await {
            Ok(Some(table)) => {
                meter.record_duration(start.elapsed());
                println!("{}", monitor_view::render_table(&table));
            }
            Ok(None) => {}
            Err(err) => warn!("Monitor poll failed: {err}"),
        }
        let reading = client.borrow().liveness(Instant::now());
        println!("{}\n", monitor_view::render_liveness(&reading));
        stats.maybe_report(Instant::now());
        task::sleep(config.poll_interval).await;
    }
    Ok(())
}

// Moves the controller one set of slides forward or back and prints where it went.
pub async fn run_step(config: ConsoleConfig, next: bool) -> anyhow::Result<()> {
    let transport = make_transport(&config)?;
    let client = RefCell::new(ControlClient::new(config.client_session(DisplayRole::Controller)?));
    match poller::step(&client, &transport, next).await? {
        PollAction::Navigate(href) => println!("{href}"),
        other => warn!("Unexpected step result: {other:?}"),
    }
    Ok(())
}
