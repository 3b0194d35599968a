use std::cmp;
use std::time::Duration;

use instant::Instant;

use crate::protocol::PeriodStatus;


pub const LIVENESS_CHECK_INTERVAL: Duration = Duration::from_secs(1);
pub const AGING_THRESHOLD_SECS: u64 = 7;
pub const STALE_THRESHOLD_SECS: u64 = 12;

// How recently the monitor heard from the server. Computed from the last accepted reply rather
// than from the poll schedule, so a slow or failing server shows up as growing staleness.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Liveness {
    Fresh,
    Aging,
    Stale,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct LivenessReading {
    // Whole seconds since the latest reply, rounded to nearest.
    pub elapsed_secs: u64,
    pub liveness: Liveness,
}

pub struct LivenessMonitor {
    latest_response: Instant,
}

impl Liveness {
    pub fn from_elapsed_secs(secs: u64) -> Self {
        if secs < AGING_THRESHOLD_SECS {
            Liveness::Fresh
        } else if secs < STALE_THRESHOLD_SECS {
            Liveness::Aging
        } else {
            Liveness::Stale
        }
    }

    // The indicator reuses display health colours.
    pub fn status(self) -> PeriodStatus {
        match self {
            Liveness::Fresh => PeriodStatus::Good,
            Liveness::Aging => PeriodStatus::Warning,
            Liveness::Stale => PeriodStatus::Bad,
        }
    }

    pub fn css_class(self) -> &'static str { self.status().css_class() }
}

impl LivenessMonitor {
    // Until the first reply, staleness counts from page load.
    pub fn new(now: Instant) -> Self { LivenessMonitor { latest_response: now } }

    pub fn latest_response(&self) -> Instant { self.latest_response }

    pub fn register_response(&mut self, now: Instant) {
        self.latest_response = cmp::max(self.latest_response, now);
    }

    pub fn reading(&self, now: Instant) -> LivenessReading {
        let elapsed = now.saturating_duration_since(self.latest_response);
        let elapsed_secs = rounded_secs(elapsed);
        LivenessReading {
            elapsed_secs,
            liveness: Liveness::from_elapsed_secs(elapsed_secs),
        }
    }
}

fn rounded_secs(d: Duration) -> u64 {
    let millis = cmp::min(d.as_millis(), u64::MAX.into()) as u64;
    millis.saturating_add(500) / 1000
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn liveness_bands() {
        let start = Instant::now();
        let monitor = LivenessMonitor::new(start);
        let class_at = |secs| monitor.reading(start + Duration::from_secs(secs)).liveness.css_class();
        assert_eq!(class_at(0), "periodG");
        assert_eq!(class_at(6), "periodG");
        assert_eq!(class_at(7), "periodA");
        assert_eq!(class_at(8), "periodA");
        assert_eq!(class_at(11), "periodA");
        assert_eq!(class_at(12), "periodR");
        assert_eq!(class_at(13), "periodR");
    }

    #[test]
    fn elapsed_is_rounded() {
        let start = Instant::now();
        let monitor = LivenessMonitor::new(start);
        let reading = monitor.reading(start + Duration::from_millis(6_499));
        assert_eq!(reading, LivenessReading { elapsed_secs: 6, liveness: Liveness::Fresh });
        let reading = monitor.reading(start + Duration::from_millis(6_500));
        assert_eq!(reading, LivenessReading { elapsed_secs: 7, liveness: Liveness::Aging });
    }

    #[test]
    fn response_resets_to_fresh() {
        let start = Instant::now();
        let mut monitor = LivenessMonitor::new(start);
        let later = start + Duration::from_secs(20);
        assert_eq!(monitor.reading(later).liveness, Liveness::Stale);
        monitor.register_response(later);
        assert_eq!(monitor.reading(later + Duration::from_secs(1)).liveness, Liveness::Fresh);
    }

    #[test]
    fn older_response_does_not_move_timestamp_back() {
        let start = Instant::now();
        let mut monitor = LivenessMonitor::new(start + Duration::from_secs(5));
        monitor.register_response(start);
        assert_eq!(monitor.latest_response(), start + Duration::from_secs(5));
    }
}
