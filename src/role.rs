use serde::{Deserialize, Serialize};


const CONTROLLER_FLAG: &str = "C";

// The role is fixed at page load. It decides which poller runs and where the quit key leads.
#[derive(Clone, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum DisplayRole {
    // Source of truth for the slide index. Reports every slide change to the server and only
    // polls for page refreshes and tick updates.
    Controller,

    // Mirrors the controller. The flag is opaque to the client: it is reported back to the server
    // verbatim so that the server can tell different puppet displays apart.
    Puppet(String),
}

impl DisplayRole {
    pub fn from_flag(flag: &str) -> Self {
        if flag == CONTROLLER_FLAG {
            DisplayRole::Controller
        } else {
            DisplayRole::Puppet(flag.to_owned())
        }
    }

    pub fn flag(&self) -> &str {
        match self {
            DisplayRole::Controller => CONTROLLER_FLAG,
            DisplayRole::Puppet(flag) => flag,
        }
    }

    pub fn is_controller(&self) -> bool { matches!(self, DisplayRole::Controller) }

    // Page to go to when a presentation is quit.
    pub fn exit_href(&self) -> &'static str {
        match self {
            DisplayRole::Controller => "/controller",
            DisplayRole::Puppet(_) => "/displays",
        }
    }
}

impl From<String> for DisplayRole {
    fn from(flag: String) -> Self { DisplayRole::from_flag(&flag) }
}

impl From<DisplayRole> for String {
    fn from(role: DisplayRole) -> Self { role.flag().to_owned() }
}
