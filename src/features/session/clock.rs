//! Session countdowns
//!
//! Two independent one-second countdowns: the whole-debate budget and the
//! per-reply budget. Starting a countdown resets it and bumps its
//! generation, which is how the driver knows to replace the live timer.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimerKind {
    Total,
    Reply,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Countdown is not running; the tick was stale
    Idle,
    /// Seconds left after this tick
    Running(u32),
    /// This tick took the countdown to zero
    Expired,
}

#[derive(Debug, Clone)]
pub struct Countdown {
    budget: u32,
    remaining: u32,
    running: bool,
    generation: u64,
}

impl Countdown {
    pub fn new(budget: u32) -> Self {
        Countdown {
            budget,
            remaining: budget,
            running: false,
            generation: 0,
        }
    }

    /// (Re)start from the full budget, cancelling any previous run
    pub fn start(&mut self) {
        self.remaining = self.budget;
        self.running = true;
        self.generation += 1;
    }

    pub fn stop(&mut self) {
        self.running = false;
    }

    pub fn tick(&mut self) -> TickOutcome {
        if !self.running {
            return TickOutcome::Idle;
        }
        self.remaining = self.remaining.saturating_sub(1);
        if self.remaining == 0 {
            self.running = false;
            TickOutcome::Expired
        } else {
            TickOutcome::Running(self.remaining)
        }
    }

    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// What the view needs to draw both clocks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClockSnapshot {
    pub total_remaining: u32,
    pub reply_remaining: u32,
    pub total_running: bool,
    pub reply_running: bool,
}

#[derive(Debug, Clone)]
pub struct SessionClock {
    total: Countdown,
    reply: Countdown,
}

impl SessionClock {
    pub fn new(total_budget_secs: u32, reply_budget_secs: u32) -> Self {
        SessionClock {
            total: Countdown::new(total_budget_secs),
            reply: Countdown::new(reply_budget_secs),
        }
    }

    pub fn start_all(&mut self) {
        self.total.start();
        self.reply.start();
    }

    pub fn stop_all(&mut self) {
        self.total.stop();
        self.reply.stop();
    }

    pub fn restart_reply(&mut self) {
        self.reply.start();
    }

    pub fn stop_reply(&mut self) {
        self.reply.stop();
    }

    pub fn tick(&mut self, kind: TimerKind) -> TickOutcome {
        self.countdown_mut(kind).tick()
    }

    pub fn countdown(&self, kind: TimerKind) -> &Countdown {
        match kind {
            TimerKind::Total => &self.total,
            TimerKind::Reply => &self.reply,
        }
    }

    fn countdown_mut(&mut self, kind: TimerKind) -> &mut Countdown {
        match kind {
            TimerKind::Total => &mut self.total,
            TimerKind::Reply => &mut self.reply,
        }
    }

    pub fn snapshot(&self) -> ClockSnapshot {
        ClockSnapshot {
            total_remaining: self.total.remaining(),
            reply_remaining: self.reply.remaining(),
            total_running: self.total.is_running(),
            reply_running: self.reply.is_running(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_countdown_expires_on_reaching_zero() {
        let mut c = Countdown::new(3);
        c.start();
        assert_eq!(c.tick(), TickOutcome::Running(2));
        assert_eq!(c.tick(), TickOutcome::Running(1));
        assert_eq!(c.tick(), TickOutcome::Expired);
        assert!(!c.is_running());
        // Expiry is reported once
        assert_eq!(c.tick(), TickOutcome::Idle);
    }

    #[test]
    fn test_stopped_countdown_ignores_ticks() {
        let mut c = Countdown::new(10);
        assert_eq!(c.tick(), TickOutcome::Idle);
        c.start();
        c.tick();
        c.stop();
        assert_eq!(c.tick(), TickOutcome::Idle);
        assert_eq!(c.remaining(), 9);
    }

    #[test]
    fn test_restart_resets_and_bumps_generation() {
        let mut c = Countdown::new(30);
        c.start();
        let first = c.generation();
        for _ in 0..10 {
            c.tick();
        }
        c.start();
        assert_eq!(c.remaining(), 30);
        assert_eq!(c.generation(), first + 1);
    }

    #[test]
    fn test_clocks_are_independent() {
        let mut clock = SessionClock::new(600, 30);
        clock.start_all();
        clock.tick(TimerKind::Total);
        clock.stop_reply();
        clock.tick(TimerKind::Reply);

        let snap = clock.snapshot();
        assert_eq!(snap.total_remaining, 599);
        assert_eq!(snap.reply_remaining, 30);
        assert!(snap.total_running);
        assert!(!snap.reply_running);
    }
}
