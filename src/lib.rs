#![forbid(unsafe_code)]
#![cfg_attr(feature = "strict", deny(warnings))]

pub mod control;
pub mod error;
pub mod liveness;
pub mod meter;
pub mod monitor;
pub mod poller;
pub mod protocol;
pub mod repeater;
pub mod role;
pub mod sequencer;
pub mod session;
pub mod slides;
pub mod test_util;
pub mod transport;
