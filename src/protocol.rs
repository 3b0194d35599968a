// Wire format of the quiz server display endpoints.
//
// Requests are sent as url-encoded forms, because that is what the server parses. Responses are
// JSON. The server omits nothing in practice, but every response field defaults to its empty value
// so that a partial reply degrades to "no action" instead of a decode failure.

use serde::de::{DeserializeOwned, IgnoredAny};
use serde::{Deserialize, Serialize};
use strum::IntoStaticStr;
use url::form_urlencoded;


pub trait FormRequest {
    const PATH: &'static str;
    type Response: DeserializeOwned;

    fn form_fields(&self) -> Vec<(&'static str, String)>;

    fn encode(&self) -> String {
        form_urlencoded::Serializer::new(String::new())
            .extend_pairs(self.form_fields())
            .finish()
    }
}

fn flag(value: bool) -> String { (if value { "1" } else { "0" }).to_owned() }


// Controller reports its current slide. The reply carries nothing the controller needs.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ControlChangeRequest {
    pub index: i32,
    pub touch_nav: bool,
    pub csrf_token: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PuppetRequest {
    pub puppet: String,
    pub access: String,
    pub page: i64,
    pub param: i64,
    pub index: i32,
    pub update: i64,
    pub monitor: i64,
    pub csrf_token: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StepRequest {
    pub next: bool,
    pub csrf_token: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UpdateRequest {
    pub page: i64,
    pub access: String,
    pub param: i64,
    pub index: i32,
    pub update: i64,
    pub second: i64,
    pub monitor: i64,
    pub csrf_token: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MonitorRequest {
    pub csrf_token: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PuppetResponse {
    #[serde(rename = "newHRef")]
    pub new_href: String,
    #[serde(rename = "newTick")]
    pub new_tick: String,
    #[serde(rename = "newIndex")]
    pub new_index: i32,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StepResponse {
    #[serde(rename = "newHRef")]
    pub new_href: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UpdateResponse {
    #[serde(rename = "newHRef")]
    pub new_href: String,
    #[serde(rename = "newTick")]
    pub new_tick: String,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct MonitorResponse {
    // `null` when no display is live.
    #[serde(rename = "Displays", default)]
    pub displays: Option<Vec<DisplayHealth>>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DisplayHealth {
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Periods", default)]
    pub periods: Vec<HealthPeriod>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HealthPeriod {
    #[serde(rename = "Lost")]
    pub lost: i64,
    #[serde(rename = "Missed")]
    pub missed: i64,
    // Longest gap between polls, as reported by the server.
    #[serde(rename = "Longest")]
    pub longest: f64,
    #[serde(rename = "Status")]
    pub status: PeriodStatus,
}

// Traffic-light health grade. The wire names double as CSS class suffixes.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize, IntoStaticStr)]
pub enum PeriodStatus {
    #[serde(rename = "G")]
    #[strum(serialize = "periodG")]
    Good,
    #[serde(rename = "A")]
    #[strum(serialize = "periodA")]
    Warning,
    #[serde(rename = "R")]
    #[strum(serialize = "periodR")]
    Bad,
}

impl PeriodStatus {
    pub fn css_class(self) -> &'static str { self.into() }
}

impl HealthPeriod {
    // Polls that never made it, whatever the reason.
    pub fn total_failures(&self) -> i64 { self.lost + self.missed }
}

impl FormRequest for ControlChangeRequest {
    const PATH: &'static str = "/control-change";
    type Response = IgnoredAny;

    fn form_fields(&self) -> Vec<(&'static str, String)> {
        vec![
            ("index", self.index.to_string()),
            ("touchNav", flag(self.touch_nav)),
            ("csrf_token", self.csrf_token.clone()),
        ]
    }
}

impl FormRequest for PuppetRequest {
    const PATH: &'static str = "/control-puppet/";
    type Response = PuppetResponse;

    fn form_fields(&self) -> Vec<(&'static str, String)> {
        vec![
            ("puppet", self.puppet.clone()),
            ("access", self.access.clone()),
            ("page", self.page.to_string()),
            ("param", self.param.to_string()),
            ("index", self.index.to_string()),
            ("update", self.update.to_string()),
            ("monitor", self.monitor.to_string()),
            ("csrf_token", self.csrf_token.clone()),
        ]
    }
}

impl FormRequest for StepRequest {
    const PATH: &'static str = "/control-step";
    type Response = StepResponse;

    fn form_fields(&self) -> Vec<(&'static str, String)> {
        vec![("next", flag(self.next)), ("csrf_token", self.csrf_token.clone())]
    }
}

impl FormRequest for UpdateRequest {
    const PATH: &'static str = "/control-update";
    type Response = UpdateResponse;

    fn form_fields(&self) -> Vec<(&'static str, String)> {
        vec![
            ("page", self.page.to_string()),
            ("access", self.access.clone()),
            ("param", self.param.to_string()),
            ("index", self.index.to_string()),
            ("update", self.update.to_string()),
            ("second", self.second.to_string()),
            ("monitor", self.monitor.to_string()),
            ("csrf_token", self.csrf_token.clone()),
        ]
    }
}

impl FormRequest for MonitorRequest {
    const PATH: &'static str = "/monitor-update";
    type Response = MonitorResponse;

    fn form_fields(&self) -> Vec<(&'static str, String)> {
        vec![("csrf_token", self.csrf_token.clone())]
    }
}
