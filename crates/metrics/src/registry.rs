//! Metric registry.

use std::collections::BTreeMap;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::{Clock, Counter, Gauge, Histogram, Meter, SystemClock, Timer};

/// Name-based predicate selecting which registry entries participate in a
/// reporting cycle.
pub type MetricFilter = Arc<dyn Fn(&str) -> bool + Send + Sync>;

/// A filter accepting every metric
pub fn accept_all() -> MetricFilter {
    Arc::new(|_| true)
}

#[derive(Default)]
struct Inner {
    gauges: BTreeMap<String, Arc<dyn Gauge>>,
    counters: BTreeMap<String, Arc<Counter>>,
    histograms: BTreeMap<String, Arc<Histogram>>,
    meters: BTreeMap<String, Arc<Meter>>,
    timers: BTreeMap<String, Arc<Timer>>,
}

/// Holds all metrics of a process, keyed by dotted name.
///
/// Registration is get-or-create: asking for a counter that already exists
/// returns the existing instance, so call sites can look metrics up by name
/// without wiring handles through the program.
///
/// Accessors return ordered maps filtered by a [`MetricFilter`]; the
/// returned `Arc`s stay valid however long the caller keeps them.
pub struct MetricRegistry {
    inner: RwLock<Inner>,
    clock: Arc<dyn Clock>,
}

impl Default for MetricRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl MetricRegistry {
    /// Create a registry on the system clock
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    /// Create a registry whose meters and timers read `clock`
    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            inner: RwLock::new(Inner::default()),
            clock,
        }
    }

    /// Register (or replace) a gauge under `name`
    pub fn register_gauge<G>(&self, name: impl Into<String>, gauge: G)
    where
        G: Gauge + 'static,
    {
        self.inner.write().gauges.insert(name.into(), Arc::new(gauge));
    }

    /// Get or create the counter named `name`
    pub fn counter(&self, name: &str) -> Arc<Counter> {
        if let Some(counter) = self.inner.read().counters.get(name) {
            return Arc::clone(counter);
        }
        let mut inner = self.inner.write();
        Arc::clone(
            inner
                .counters
                .entry(name.to_string())
                .or_insert_with(|| Arc::new(Counter::new())),
        )
    }

    /// Get or create the histogram named `name`
    pub fn histogram(&self, name: &str) -> Arc<Histogram> {
        if let Some(histogram) = self.inner.read().histograms.get(name) {
            return Arc::clone(histogram);
        }
        let mut inner = self.inner.write();
        Arc::clone(
            inner
                .histograms
                .entry(name.to_string())
                .or_insert_with(|| Arc::new(Histogram::new())),
        )
    }

    /// Get or create the meter named `name`
    pub fn meter(&self, name: &str) -> Arc<Meter> {
        if let Some(meter) = self.inner.read().meters.get(name) {
            return Arc::clone(meter);
        }
        let mut inner = self.inner.write();
        let clock = Arc::clone(&self.clock);
        Arc::clone(
            inner
                .meters
                .entry(name.to_string())
                .or_insert_with(|| Arc::new(Meter::new(clock))),
        )
    }

    /// Get or create the timer named `name`
    pub fn timer(&self, name: &str) -> Arc<Timer> {
        if let Some(timer) = self.inner.read().timers.get(name) {
            return Arc::clone(timer);
        }
        let mut inner = self.inner.write();
        let clock = Arc::clone(&self.clock);
        Arc::clone(
            inner
                .timers
                .entry(name.to_string())
                .or_insert_with(|| Arc::new(Timer::new(clock))),
        )
    }

    /// Gauges passing `filter`, ordered by name
    pub fn gauges(&self, filter: &MetricFilter) -> BTreeMap<String, Arc<dyn Gauge>> {
        let keep = filter.as_ref();
        self.inner
            .read()
            .gauges
            .iter()
            .filter(|(name, _)| keep(name.as_str()))
            .map(|(name, gauge)| (name.clone(), Arc::clone(gauge)))
            .collect()
    }

    /// Counters passing `filter`, ordered by name
    pub fn counters(&self, filter: &MetricFilter) -> BTreeMap<String, Arc<Counter>> {
        let keep = filter.as_ref();
        self.inner
            .read()
            .counters
            .iter()
            .filter(|(name, _)| keep(name.as_str()))
            .map(|(name, counter)| (name.clone(), Arc::clone(counter)))
            .collect()
    }

    /// Histograms passing `filter`, ordered by name
    pub fn histograms(&self, filter: &MetricFilter) -> BTreeMap<String, Arc<Histogram>> {
        let keep = filter.as_ref();
        self.inner
            .read()
            .histograms
            .iter()
            .filter(|(name, _)| keep(name.as_str()))
            .map(|(name, histogram)| (name.clone(), Arc::clone(histogram)))
            .collect()
    }

    /// Meters passing `filter`, ordered by name
    pub fn meters(&self, filter: &MetricFilter) -> BTreeMap<String, Arc<Meter>> {
        let keep = filter.as_ref();
        self.inner
            .read()
            .meters
            .iter()
            .filter(|(name, _)| keep(name.as_str()))
            .map(|(name, meter)| (name.clone(), Arc::clone(meter)))
            .collect()
    }

    /// Timers passing `filter`, ordered by name
    pub fn timers(&self, filter: &MetricFilter) -> BTreeMap<String, Arc<Timer>> {
        let keep = filter.as_ref();
        self.inner
            .read()
            .timers
            .iter()
            .filter(|(name, _)| keep(name.as_str()))
            .map(|(name, timer)| (name.clone(), Arc::clone(timer)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MetricValue;

    #[test]
    fn test_counter_get_or_create_returns_same_instance() {
        let registry = MetricRegistry::new();
        registry.counter("requests").inc();
        registry.counter("requests").inc();

        assert_eq!(registry.counter("requests").count(), 2);
    }

    #[test]
    fn test_register_gauge_replaces() {
        let registry = MetricRegistry::new();
        registry.register_gauge("version", || MetricValue::Integer(1));
        registry.register_gauge("version", || MetricValue::Integer(2));

        let gauges = registry.gauges(&accept_all());
        assert_eq!(gauges.len(), 1);
        assert_eq!(gauges["version"].value(), MetricValue::Integer(2));
    }

    #[test]
    fn test_accessors_are_ordered_by_name() {
        let registry = MetricRegistry::new();
        registry.counter("b");
        registry.counter("a");
        registry.counter("c");

        let names: Vec<String> = registry.counters(&accept_all()).into_keys().collect();
        assert_eq!(names, ["a", "b", "c"]);
    }

    #[test]
    fn test_filter_excludes_entries() {
        let registry = MetricRegistry::new();
        registry.counter("keep.this");
        registry.counter("drop.this");

        let filter: MetricFilter = Arc::new(|name| name.starts_with("keep"));
        let counters = registry.counters(&filter);
        assert_eq!(counters.len(), 1);
        assert!(counters.contains_key("keep.this"));
    }

    #[test]
    fn test_kinds_are_namespaced_separately() {
        let registry = MetricRegistry::new();
        registry.counter("x");
        registry.histogram("x");
        registry.meter("x");
        registry.timer("x");

        let filter = accept_all();
        assert_eq!(registry.counters(&filter).len(), 1);
        assert_eq!(registry.histograms(&filter).len(), 1);
        assert_eq!(registry.meters(&filter).len(), 1);
        assert_eq!(registry.timers(&filter).len(), 1);
    }
}
