// Display health dashboard.
//
// Each reply fully describes the current set of live displays, so the table is rebuilt from
// scratch every time instead of being patched.

use instant::Instant;
use itertools::Itertools;
use log::debug;

use crate::control::PendingRequest;
use crate::liveness::{LivenessMonitor, LivenessReading};
use crate::protocol::{DisplayHealth, HealthPeriod, MonitorRequest, MonitorResponse};
use crate::sequencer::{RequestSequencer, RequestTicket};


pub const NAME_CELL_CLASS: &str = "clientName";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TableCell {
    pub text: String,
    pub class: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TableRow {
    pub cells: Vec<TableCell>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MonitorTable {
    pub rows: Vec<TableRow>,
}

pub struct MonitorClient {
    csrf_token: String,
    sequencer: RequestSequencer,
    liveness: LivenessMonitor,
}

impl TableCell {
    pub fn new(text: impl Into<String>, class: impl Into<String>) -> Self {
        TableCell { text: text.into(), class: class.into() }
    }
}

impl TableRow {
    // Name first, then one cell per reporting period, oldest first as sent by the server.
    pub fn for_display(display: &DisplayHealth) -> Self {
        let mut cells = vec![TableCell::new(display.name.clone(), NAME_CELL_CLASS)];
        cells.extend(display.periods.iter().map(period_cell));
        TableRow { cells }
    }
}

impl MonitorTable {
    pub fn from_displays(displays: Option<&[DisplayHealth]>) -> Self {
        MonitorTable {
            rows: displays.unwrap_or_default().iter().map(TableRow::for_display).collect(),
        }
    }

    pub fn from_response(response: &MonitorResponse) -> Self {
        Self::from_displays(response.displays.as_deref())
    }

    pub fn is_empty(&self) -> bool { self.rows.is_empty() }

    // Plain-text rendering for logs and the console client.
    pub fn to_text(&self) -> String {
        self.rows
            .iter()
            .map(|row| row.cells.iter().map(|cell| cell.text.as_str()).join(" | "))
            .join("\n")
    }
}

fn period_cell(period: &HealthPeriod) -> TableCell {
    TableCell::new(
        format!("{} : {}", period.total_failures(), period.longest),
        period.status.css_class(),
    )
}

impl MonitorClient {
    pub fn new(csrf_token: String, now: Instant) -> Self {
        MonitorClient {
            csrf_token,
            sequencer: RequestSequencer::new(),
            liveness: LivenessMonitor::new(now),
        }
    }

    pub fn begin_poll(&mut self) -> PendingRequest<MonitorRequest> {
        PendingRequest {
            ticket: self.sequencer.issue(),
            request: MonitorRequest { csrf_token: self.csrf_token.clone() },
        }
    }

    // Returns the table to show, or `None` if a newer reply has already been shown.
    pub fn finish_poll(
        &mut self, ticket: RequestTicket, response: &MonitorResponse, now: Instant,
    ) -> Option<MonitorTable> {
        if !self.sequencer.accept(ticket) {
            debug!("Dropping stale monitor reply #{}", ticket.seq());
            return None;
        }
        self.liveness.register_response(now);
        Some(MonitorTable::from_response(response))
    }

    pub fn liveness(&self, now: Instant) -> LivenessReading { self.liveness.reading(now) }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use pretty_assertions::assert_eq;

    use super::*;
    use crate::liveness::Liveness;
    use crate::protocol::PeriodStatus;

    fn period(lost: i64, missed: i64, longest: f64, status: PeriodStatus) -> HealthPeriod {
        HealthPeriod { lost, missed, longest, status }
    }

    #[test]
    fn period_cell_text() {
        let row = TableRow::for_display(&DisplayHealth {
            name: "stage".to_owned(),
            periods: vec![
                period(0, 0, 0.0, PeriodStatus::Good),
                period(2, 1, 4.5, PeriodStatus::Bad),
            ],
        });
        assert_eq!(row.cells, vec![
            TableCell::new("stage", "clientName"),
            TableCell::new("0 : 0", "periodG"),
            TableCell::new("3 : 4.5", "periodR"),
        ]);
    }

    #[test]
    fn stale_reply_keeps_liveness() {
        let start = Instant::now();
        let mut client = MonitorClient::new("t".to_owned(), start);
        let first = client.begin_poll();
        let second = client.begin_poll();
        let later = start + Duration::from_secs(9);
        assert!(client.finish_poll(second.ticket, &MonitorResponse::default(), later).is_some());
        assert!(client.finish_poll(first.ticket, &MonitorResponse::default(), later).is_none());
        assert_eq!(client.liveness(later).liveness, Liveness::Fresh);
    }

    #[test]
    fn liveness_ages_without_replies() {
        let start = Instant::now();
        let client = MonitorClient::new("t".to_owned(), start);
        assert_eq!(client.liveness(start + Duration::from_secs(8)).liveness, Liveness::Aging);
    }
}
