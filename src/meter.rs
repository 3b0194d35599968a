// Poll round-trip statistics. Single-threaded, like the rest of the client.

use std::cell::RefCell;
use std::cmp;
use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;
use std::time::Duration;

use hdrhistogram::Histogram;
use serde::{Deserialize, Serialize};


#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MeterStats {
    pub p50: u64,
    pub p90: u64,
    pub p99: u64,
    pub num_values: u64,
}

impl fmt::Display for MeterStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let n = self.num_values;
        if n == 0 {
            write!(f, "- (N={n})")
        } else {
            write!(f, "P50={}ms, P90={}ms, P99={}ms (N={n})", self.p50, self.p90, self.p99)
        }
    }
}


// One meter per endpoint.
pub struct MeterBox {
    meters: BTreeMap<String, Meter>,
}

impl MeterBox {
    pub fn new() -> Self { MeterBox { meters: BTreeMap::new() } }

    pub fn meter(&mut self, name: &str) -> Meter {
        self.meters.entry(name.to_owned()).or_insert_with(Meter::new).clone()
    }

    pub fn read_stats(&self) -> BTreeMap<String, MeterStats> {
        self.meters.iter().map(|(name, meter)| (name.clone(), meter.stats())).collect()
    }
    // Returns stats since the previous call. Meters handed out earlier stay connected.
    pub fn consume_stats(&mut self) -> BTreeMap<String, MeterStats> {
        let stats = self.read_stats();
        for meter in self.meters.values() {
            meter.histogram.borrow_mut().reset();
        }
        stats
    }
}

impl Default for MeterBox {
    fn default() -> Self { Self::new() }
}


#[derive(Clone)]
pub struct Meter {
    histogram: Rc<RefCell<Histogram<u64>>>,
}

impl Meter {
    fn new() -> Self {
        // Auto-resizing histogram with 3 significant digits cannot fail to construct.
        let mut histogram = Histogram::new(3).unwrap();
        histogram.auto(true);
        Meter { histogram: Rc::new(RefCell::new(histogram)) }
    }

    pub fn record_duration(&self, duration: Duration) {
        let millis = cmp::min(duration.as_millis(), u64::MAX.into()) as u64;
        // With auto-resize the only error left is a value above `u64::MAX`.
        let _ = self.histogram.borrow_mut().record(millis);
    }

    fn stats(&self) -> MeterStats {
        let histogram = self.histogram.borrow();
        MeterStats {
            p50: histogram.value_at_quantile(0.5),
            p90: histogram.value_at_quantile(0.9),
            p99: histogram.value_at_quantile(0.99),
            num_values: histogram.len(),
        }
    }
}
