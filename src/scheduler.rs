//! Deterministic tick scheduler
//!
//! The reference cadences are two wall-clock timers: a 250 ms scan tick
//! and a 500 ms poll tick. Here both cadences are explicit and driven by a
//! caller-supplied millisecond clock, so replays and tests advance time
//! exactly and the tick handlers stay independent of any timer mechanism.

/// A due tick, in firing order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tick {
    Scan,
    Poll,
}

#[derive(Debug, Clone)]
pub struct Scheduler {
    scan_interval_ms: u64,
    poll_interval_ms: u64,
    now_ms: u64,
    next_scan_ms: u64,
    next_poll_ms: u64,
}

impl Scheduler {
    pub fn new(scan_interval_ms: u64, poll_interval_ms: u64) -> Self {
        // a zero interval would spin the due-tick loop forever
        assert!(scan_interval_ms > 0 && poll_interval_ms > 0);
        Self {
            scan_interval_ms,
            poll_interval_ms,
            now_ms: 0,
            next_scan_ms: scan_interval_ms,
            next_poll_ms: poll_interval_ms,
        }
    }

    pub fn now_ms(&self) -> u64 {
        self.now_ms
    }

    /// Advance the clock, returning every due tick in timestamp order.
    /// When a scan and a poll land on the same instant the scan fires
    /// first, so newly installed hooks exist before the fold that would
    /// consume their observations.
    pub fn advance_to(&mut self, now_ms: u64) -> Vec<Tick> {
        let now_ms = now_ms.max(self.now_ms);
        let mut due = Vec::new();
        loop {
            let next = self.next_scan_ms.min(self.next_poll_ms);
            if next > now_ms {
                break;
            }
            if self.next_scan_ms == next {
                due.push(Tick::Scan);
                self.next_scan_ms += self.scan_interval_ms;
            } else {
                due.push(Tick::Poll);
                self.next_poll_ms += self.poll_interval_ms;
            }
        }
        self.now_ms = now_ms;
        due
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_cadence_ordering() {
        let mut scheduler = Scheduler::new(250, 500);
        assert_eq!(
            scheduler.advance_to(500),
            vec![Tick::Scan, Tick::Scan, Tick::Poll]
        );
        assert_eq!(scheduler.now_ms(), 500);
    }

    #[test]
    fn test_no_tick_before_first_interval() {
        let mut scheduler = Scheduler::new(250, 500);
        assert!(scheduler.advance_to(249).is_empty());
        assert_eq!(scheduler.advance_to(250), vec![Tick::Scan]);
    }

    #[test]
    fn test_catches_up_after_long_gap() {
        let mut scheduler = Scheduler::new(250, 500);
        let ticks = scheduler.advance_to(1000);
        let scans = ticks.iter().filter(|t| **t == Tick::Scan).count();
        let polls = ticks.iter().filter(|t| **t == Tick::Poll).count();
        assert_eq!(scans, 4);
        assert_eq!(polls, 2);
    }

    #[test]
    fn test_scan_fires_before_poll_on_collision() {
        let mut scheduler = Scheduler::new(500, 500);
        assert_eq!(scheduler.advance_to(500), vec![Tick::Scan, Tick::Poll]);
    }

    #[test]
    fn test_clock_never_moves_backwards() {
        let mut scheduler = Scheduler::new(250, 500);
        scheduler.advance_to(600);
        assert!(scheduler.advance_to(300).is_empty());
        assert_eq!(scheduler.now_ms(), 600);
    }
}
