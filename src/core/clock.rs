use crate::core::moment::{CalendarDate, Moment};
use chrono::Local;
use std::sync::{Arc, Mutex, PoisonError};

/// Source of "now" for disabling rules and default values.
pub trait Clock: Send + Sync {
    fn now(&self) -> Moment;

    fn today(&self) -> CalendarDate {
        self.now().date()
    }
}

/// Local wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Moment {
        let local = Local::now().naive_local();
        // Only reachable with a system clock outside years 0..=9999.
        Moment::from_naive(&local).unwrap_or(Moment::EPOCH)
    }
}

/// A clock that only moves when told to. Clones share the same instant.
#[derive(Debug, Clone)]
pub struct FixedClock {
    now: Arc<Mutex<Moment>>,
}

impl FixedClock {
    pub fn new(now: Moment) -> Self {
        Self {
            now: Arc::new(Mutex::new(now)),
        }
    }

    pub fn set(&self, now: Moment) {
        *self.now.lock().unwrap_or_else(PoisonError::into_inner) = now;
    }
}

impl Clock for FixedClock {
    fn now(&self) -> Moment {
        *self.now.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
