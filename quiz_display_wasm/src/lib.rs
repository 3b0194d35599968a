// Browser side of the quiz display pages. The page script creates one of the exported objects
// (`WebControl` with `WebSlideBinder` on presentation and controller pages, `WebMonitor` on the
// monitor page, `WebRepeater` on setup pages) after calling `set_panic_hook` and `init_logging`.

#![forbid(unsafe_code)]
#![cfg_attr(feature = "strict", deny(warnings))]

pub mod web_control;
pub mod web_document;
pub mod web_element_ext;
pub mod web_error_handling;
pub mod web_iterators;
pub mod web_logger;
pub mod web_monitor;
pub mod web_repeater;
pub mod web_slides;
pub mod web_transport;

pub use web_control::WebControl;
pub use web_monitor::WebMonitor;
pub use web_repeater::WebRepeater;
pub use web_slides::{SlideDeck, WebSlideBinder};
