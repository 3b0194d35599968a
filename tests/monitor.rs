use std::cell::RefCell;
use std::time::Duration;

use instant::Instant;
use quiz_display::liveness::Liveness;
use quiz_display::monitor::{MonitorClient, MonitorTable};
use quiz_display::poller;
use quiz_display::protocol::MonitorResponse;
use quiz_display::test_util::FakeTransport;


const TWO_DISPLAYS: &str = r#"{"Displays": [
    {"Name": "Hall", "Periods": [
        {"Lost": 0, "Missed": 0, "Longest": 1, "Status": "G"},
        {"Lost": 1, "Missed": 0, "Longest": 3, "Status": "A"},
        {"Lost": 2, "Missed": 2, "Longest": 14, "Status": "R"}
    ]},
    {"Name": "Bar", "Periods": [
        {"Lost": 0, "Missed": 1, "Longest": 2, "Status": "G"}
    ]}
]}"#;

#[test]
fn null_displays_give_empty_table() {
    let response: MonitorResponse = serde_json::from_str(r#"{"Displays": null}"#).unwrap();
    let table = MonitorTable::from_response(&response);
    assert!(table.is_empty());
}

#[test]
fn one_row_per_display() {
    let response: MonitorResponse = serde_json::from_str(TWO_DISPLAYS).unwrap();
    let table = MonitorTable::from_response(&response);
    assert_eq!(table.rows.len(), 2);
    assert_eq!(table.rows[0].cells.len(), 1 + 3);
    assert_eq!(table.rows[1].cells.len(), 1 + 1);
    assert_eq!(table.rows[0].cells[3].text, "4 : 14");
    assert_eq!(table.rows[0].cells[3].class, "periodR");
    assert_eq!(table.to_text(), "Hall | 0 : 1 | 1 : 3 | 4 : 14\nBar | 1 : 2");
}

#[async_std::test]
async fn poll_rebuilds_table_and_refreshes_liveness() {
    let start = Instant::now();
    let client = RefCell::new(MonitorClient::new("tok".to_owned(), start));
    let transport = FakeTransport::new();
    transport.reply_json(TWO_DISPLAYS);
    transport.reply_json(r#"{"Displays": null}"#);

    let table = poller::poll_monitor(&client, &transport, Duration::from_secs(1)).await.unwrap();
    assert_eq!(table.unwrap().rows.len(), 2);
    let table = poller::poll_monitor(&client, &transport, Duration::from_secs(1)).await.unwrap();
    assert!(table.unwrap().is_empty());

    let sent = transport.sent();
    assert_eq!(sent.len(), 2);
    assert_eq!(sent[0].path, "/monitor-update");
    assert_eq!(sent[0].body, "csrf_token=tok");
    assert_eq!(client.borrow().liveness(Instant::now()).liveness, Liveness::Fresh);
}

#[async_std::test]
async fn failed_poll_lets_liveness_age() {
    let start = Instant::now();
    let client = RefCell::new(MonitorClient::new("tok".to_owned(), start));
    let transport = FakeTransport::new();
    transport.reply_error("connection refused");
    assert!(poller::poll_monitor(&client, &transport, Duration::from_secs(1)).await.is_err());
    let reading = client.borrow().liveness(start + Duration::from_secs(13));
    assert_eq!(reading.elapsed_secs, 13);
    assert_eq!(reading.liveness, Liveness::Stale);
    assert_eq!(reading.liveness.css_class(), "periodR");
}
