use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

pub trait Clock: Send + Sync {
	fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
	fn now(&self) -> DateTime<Utc> {
		Utc::now()
	}
}

/// A clock that only moves when told to.
#[derive(Debug)]
pub struct FixedClock {
	time: Mutex<DateTime<Utc>>,
}

impl FixedClock {
	pub fn new(time: DateTime<Utc>) -> Self {
		FixedClock {
			time: Mutex::new(time),
		}
	}

	pub fn advance(&self, by: Duration) {
		let mut time = self.time.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
		*time += by;
	}
}

impl Clock for FixedClock {
	fn now(&self) -> DateTime<Utc> {
		*self.time.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
	}
}

pub trait IdGenerator: Send + Sync {
	fn next_id(&self) -> Uuid;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct RandomIds;

impl IdGenerator for RandomIds {
	fn next_id(&self) -> Uuid {
		Uuid::new_v4()
	}
}

/// Monotonic ids, so ordering by id follows creation order.
#[derive(Debug, Default)]
pub struct SequentialIds {
	next: AtomicU64,
}

impl IdGenerator for SequentialIds {
	fn next_id(&self) -> Uuid {
		let n = self.next.fetch_add(1, Ordering::Relaxed) + 1;
		Uuid::from_u128(u128::from(n))
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use chrono::TimeZone;

	#[test]
	fn fixed_clock_advances_on_demand() {
		let start = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
		let clock = FixedClock::new(start);
		assert_eq!(clock.now(), start);

		clock.advance(Duration::days(2));
		assert_eq!(clock.now(), start + Duration::days(2));
	}

	#[test]
	fn sequential_ids_increase() {
		let ids = SequentialIds::default();
		let first = ids.next_id();
		let second = ids.next_id();
		assert!(first < second);
		assert_eq!(first, Uuid::from_u128(1));
	}
}
