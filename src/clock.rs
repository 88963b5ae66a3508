/// A tick countdown. Idle until started; fires once when it runs out.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Countdown {
    remaining: Option<u32>,
}

impl Countdown {
    /// (Re)start with `ticks` to go, replacing any countdown in progress.
    pub fn start(&mut self, ticks: u32) {
        self.remaining = Some(ticks.max(1));
    }

    pub fn stop(&mut self) {
        self.remaining = None;
    }

    pub fn remaining(&self) -> Option<u32> {
        self.remaining
    }

    pub fn is_running(&self) -> bool {
        self.remaining.is_some()
    }

    /// Advance one tick. Returns true exactly once, on the tick that
    /// reaches zero.
    pub fn advance(&mut self) -> bool {
        match self.remaining {
            Some(n) if n <= 1 => {
                self.remaining = None;
                true
            }
            Some(n) => {
                self.remaining = Some(n - 1);
                false
            }
            None => false,
        }
    }
}

/// Tick counter plus the global frighten countdown.
#[derive(Debug, Clone)]
pub struct SimulationClock {
    tick_ms: u64,
    ticks: u64,
    frighten: Countdown,
}

impl SimulationClock {
    pub fn new(tick_ms: u64) -> Self {
        Self {
            tick_ms,
            ticks: 0,
            frighten: Countdown::default(),
        }
    }

    /// Count one tick. Returns true when the frighten countdown expired on it.
    pub fn advance(&mut self) -> bool {
        self.ticks += 1;
        self.frighten.advance()
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Simulated time, not wall-clock.
    pub fn elapsed_ms(&self) -> u64 {
        self.ticks.saturating_mul(self.tick_ms)
    }

    pub fn start_frighten(&mut self, ticks: u32) {
        self.frighten.start(ticks);
    }

    pub fn frighten_remaining(&self) -> Option<u32> {
        self.frighten.remaining()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn countdown_fires_once() {
        let mut c = Countdown::default();
        assert!(!c.advance());
        c.start(3);
        assert!(!c.advance());
        assert!(!c.advance());
        assert!(c.advance());
        assert!(!c.is_running());
        assert!(!c.advance());
    }

    #[test]
    fn restart_overrides_running_countdown() {
        let mut c = Countdown::default();
        c.start(2);
        c.advance();
        c.start(5);
        assert_eq!(c.remaining(), Some(5));
        c.stop();
        assert_eq!(c.remaining(), None);
    }

    #[test]
    fn clock_tracks_ticks_and_frighten() {
        let mut clock = SimulationClock::new(200);
        clock.start_frighten(2);
        assert!(!clock.advance());
        assert_eq!(clock.frighten_remaining(), Some(1));
        assert!(clock.advance());
        assert_eq!(clock.ticks(), 2);
        assert_eq!(clock.elapsed_ms(), 400);
    }

    #[test]
    fn elapsed_saturates_on_huge_tick() {
        let mut clock = SimulationClock::new(u64::MAX / 2);
        clock.advance();
        clock.advance();
        clock.advance();
        assert_eq!(clock.elapsed_ms(), u64::MAX);
    }
}
