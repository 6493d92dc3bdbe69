//! The seam between the turn engine and whatever produces one-second ticks.
//!
//! The engine never reads wall-clock time. It tells a [`TurnClock`] when to start,
//! pause, resume and cancel, and receives [`ClockTick`]s back through
//! `Game::clock_tick`. Each start/resume is stamped with a fresh [`ClockTicket`];
//! ticks carrying any other ticket are stale and dropped.

use std::sync::{Arc, Mutex, PoisonError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ClockTicket(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClockTick {
    pub ticket: ClockTicket,
    pub remaining: u32,
}

pub trait TurnClock {
    /// Count down from `remaining`, stopping any countdown already running.
    fn start(&mut self, ticket: ClockTicket, remaining: u32);
    fn pause(&mut self);
    /// Continue from exactly `remaining`, under a new ticket.
    fn resume(&mut self, ticket: ClockTicket, remaining: u32);
    fn cancel(&mut self);
}

/// A clock that never ticks, for headless use.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopClock;

impl TurnClock for NoopClock {
    fn start(&mut self, _ticket: ClockTicket, _remaining: u32) {}
    fn pause(&mut self) {}
    fn resume(&mut self, _ticket: ClockTicket, _remaining: u32) {}
    fn cancel(&mut self) {}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClockCommand {
    Start(u32),
    Pause,
    Resume(u32),
    Cancel,
}

#[derive(Debug, Default)]
struct ManualClockState {
    running: Option<ClockTick>,
    paused: bool,
    commands: Vec<ClockCommand>,
}

/// Hand-cranked clock. Clones share state, so a test can keep one handle while
/// the game owns another.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    state: Arc<Mutex<ManualClockState>>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    fn with_state<R>(&self, f: impl FnOnce(&mut ManualClockState) -> R) -> R {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut state)
    }

    /// Advance one second. Returns the tick to deliver, or `None` when stopped.
    pub fn tick(&self) -> Option<ClockTick> {
        self.with_state(|state| {
            if state.paused {
                return None;
            }
            let current = state.running?;
            let tick = ClockTick {
                ticket: current.ticket,
                remaining: current.remaining.saturating_sub(1),
            };
            state.running = (tick.remaining > 0).then_some(tick);
            Some(tick)
        })
    }

    /// The ticket of the countdown in progress, paused or not.
    pub fn ticket(&self) -> Option<ClockTicket> {
        self.with_state(|state| state.running.map(|tick| tick.ticket))
    }

    pub fn is_running(&self) -> bool {
        self.with_state(|state| state.running.is_some() && !state.paused)
    }

    pub fn commands(&self) -> Vec<ClockCommand> {
        self.with_state(|state| state.commands.clone())
    }
}

impl TurnClock for ManualClock {
    fn start(&mut self, ticket: ClockTicket, remaining: u32) {
        self.with_state(|state| {
            state.running = Some(ClockTick { ticket, remaining });
            state.paused = false;
            state.commands.push(ClockCommand::Start(remaining));
        });
    }

    fn pause(&mut self) {
        self.with_state(|state| {
            state.paused = true;
            state.commands.push(ClockCommand::Pause);
        });
    }

    fn resume(&mut self, ticket: ClockTicket, remaining: u32) {
        self.with_state(|state| {
            state.running = Some(ClockTick { ticket, remaining });
            state.paused = false;
            state.commands.push(ClockCommand::Resume(remaining));
        });
    }

    fn cancel(&mut self) {
        self.with_state(|state| {
            state.running = None;
            state.paused = false;
            state.commands.push(ClockCommand::Cancel);
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manual_clock_counts_down_and_stops() {
        let mut clock = ManualClock::new();
        clock.start(ClockTicket(1), 2);

        assert_eq!(clock.tick().map(|t| t.remaining), Some(1));
        assert_eq!(clock.tick().map(|t| t.remaining), Some(0));
        assert_eq!(clock.tick(), None);
        assert!(!clock.is_running());
    }

    #[test]
    fn test_manual_clock_pause_and_resume() {
        let mut clock = ManualClock::new();
        let handle = clock.clone();
        clock.start(ClockTicket(1), 10);
        handle.tick();

        clock.pause();
        assert_eq!(handle.tick(), None);

        clock.resume(ClockTicket(2), 9);
        let tick = handle.tick().unwrap();
        assert_eq!(tick.ticket, ClockTicket(2));
        assert_eq!(tick.remaining, 8);

        clock.cancel();
        assert_eq!(handle.tick(), None);
        assert_eq!(
            handle.commands(),
            vec![
                ClockCommand::Start(10),
                ClockCommand::Pause,
                ClockCommand::Resume(9),
                ClockCommand::Cancel
            ]
        );
    }

    #[test]
    fn test_restart_replaces_running_countdown() {
        let mut clock = ManualClock::new();
        clock.start(ClockTicket(1), 3);
        clock.start(ClockTicket(2), 60);
        let tick = clock.tick().unwrap();
        assert_eq!(tick.ticket, ClockTicket(2));
        assert_eq!(tick.remaining, 59);
    }
}
