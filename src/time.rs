use ordered_float::OrderedFloat;
use std::ops::Add;

/// An instant on the simulation clock, in seconds since simulation start.
///
/// Simulation time is logical: it advances only when the [`Scheduler`] moves
/// to the next scheduled event, never by observing a wall clock. The wrapped
/// [`OrderedFloat`] provides the total order that event sequencing requires,
/// which plain [`f64`] cannot (NaN values sort after every real instant
/// rather than poisoning comparisons).
///
/// [`Scheduler`]: crate::Scheduler
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SimTime(OrderedFloat<f64>);

impl SimTime {
    /// The zero-point of simulation time.
    pub const ZERO: SimTime = SimTime(OrderedFloat(0.0));

    /// Construct an instant from raw seconds since simulation start.
    #[inline]
    pub fn from_secs(secs: f64) -> Self {
        SimTime(OrderedFloat(secs))
    }

    /// The raw number of seconds since simulation start.
    #[inline]
    pub fn as_secs(self) -> f64 {
        self.0.into_inner()
    }

    /// The instant `delta` seconds after `self`.
    #[inline]
    pub fn offset(self, delta: f64) -> Self {
        SimTime(OrderedFloat(self.0.into_inner() + delta))
    }

    /// Seconds elapsed from `earlier` to `self`. Negative if `earlier` is
    /// actually later than `self`.
    #[inline]
    pub fn seconds_since(self, earlier: SimTime) -> f64 {
        self.0.into_inner() - earlier.0.into_inner()
    }
}

impl From<f64> for SimTime {
    fn from(secs: f64) -> Self {
        SimTime::from_secs(secs)
    }
}

impl Add<f64> for SimTime {
    type Output = SimTime;

    fn add(self, delta: f64) -> SimTime {
        self.offset(delta)
    }
}

impl std::fmt::Display for SimTime {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}s", self.0)
    }
}
