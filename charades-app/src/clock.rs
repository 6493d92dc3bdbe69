use charades_core::{ClockTick, ClockTicket, TurnClock};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{self, MissedTickBehavior};
use tracing::debug;

/// One-second countdown on the tokio runtime. Ticks arrive on the receiver
/// returned by [`TokioClock::new`]. At most one countdown task exists at a time.
pub struct TokioClock {
    sender: mpsc::UnboundedSender<ClockTick>,
    period: Duration,
    task: Option<JoinHandle<()>>,
}

impl TokioClock {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<ClockTick>) {
        Self::with_period(Duration::from_secs(1))
    }

    pub fn with_period(period: Duration) -> (Self, mpsc::UnboundedReceiver<ClockTick>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        let clock = Self {
            sender,
            period,
            task: None,
        };
        (clock, receiver)
    }

    pub fn is_running(&self) -> bool {
        self.task.as_ref().is_some_and(|task| !task.is_finished())
    }

    fn stop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }

    fn spawn(&mut self, ticket: ClockTicket, remaining: u32) {
        self.stop();

        let sender = self.sender.clone();
        let period = self.period;
        self.task = Some(tokio::spawn(async move {
            let mut interval = time::interval_at(time::Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

            let mut remaining = remaining;
            while remaining > 0 {
                interval.tick().await;
                remaining -= 1;
                if sender.send(ClockTick { ticket, remaining }).is_err() {
                    debug!("Clock receiver dropped, stopping countdown");
                    break;
                }
            }
        }));
    }
}

impl TurnClock for TokioClock {
    fn start(&mut self, ticket: ClockTicket, remaining: u32) {
        self.spawn(ticket, remaining);
    }

    fn pause(&mut self) {
        self.stop();
    }

    fn resume(&mut self, ticket: ClockTicket, remaining: u32) {
        self.spawn(ticket, remaining);
    }

    fn cancel(&mut self) {
        self.stop();
    }
}

impl Drop for TokioClock {
    fn drop(&mut self) {
        self.stop();
    }
}
