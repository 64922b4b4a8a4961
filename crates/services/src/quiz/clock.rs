use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};

use super::controller::SessionId;

pub const TICK_PERIOD: Duration = Duration::from_secs(1);

/// Drives exam countdowns by sending the armed session's id once per period.
///
/// At most one countdown runs at a time. Arming again or stopping aborts the
/// previous task, so a replaced session stops receiving ticks; any tick
/// already queued is filtered out by the controller's id check.
pub struct ExamClock {
    tx: mpsc::Sender<SessionId>,
    period: Duration,
    task: Option<(SessionId, JoinHandle<()>)>,
}

impl ExamClock {
    /// A clock with the default one-second period and its tick receiver.
    #[must_use]
    pub fn channel() -> (Self, mpsc::Receiver<SessionId>) {
        Self::with_period(TICK_PERIOD)
    }

    #[must_use]
    pub fn with_period(period: Duration) -> (Self, mpsc::Receiver<SessionId>) {
        let (tx, rx) = mpsc::channel(8);
        (
            Self {
                tx,
                period,
                task: None,
            },
            rx,
        )
    }

    /// Starts ticking for `id`, replacing any running countdown.
    ///
    /// Must be called from within a tokio runtime.
    pub fn arm(&mut self, id: SessionId) {
        self.stop();

        let tx = self.tx.clone();
        let period = self.period;
        let handle = tokio::spawn(async move {
            let mut interval = tokio::time::interval_at(Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                interval.tick().await;
                if tx.send(id).await.is_err() {
                    break;
                }
            }
        });
        tracing::debug!(session = %id, "exam clock armed");
        self.task = Some((id, handle));
    }

    /// Aborts the running countdown, if any.
    pub fn stop(&mut self) {
        if let Some((id, handle)) = self.task.take() {
            handle.abort();
            tracing::debug!(session = %id, "exam clock stopped");
        }
    }

    /// Id of the session currently being ticked.
    #[must_use]
    pub fn armed_for(&self) -> Option<SessionId> {
        self.task.as_ref().map(|(id, _)| *id)
    }
}

impl Drop for ExamClock {
    fn drop(&mut self) {
        if let Some((_, handle)) = self.task.take() {
            handle.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn ticks_carry_the_armed_id_once_per_period() {
        let (mut clock, mut rx) = ExamClock::channel();
        let id = SessionId::new(3);
        clock.arm(id);

        let start = Instant::now();
        assert_eq!(rx.recv().await, Some(id));
        assert_eq!(start.elapsed(), TICK_PERIOD);
        assert_eq!(rx.recv().await, Some(id));
        assert_eq!(start.elapsed(), TICK_PERIOD * 2);
    }

    #[tokio::test(start_paused = true)]
    async fn rearming_switches_to_the_new_id() {
        let (mut clock, mut rx) = ExamClock::channel();
        clock.arm(SessionId::new(1));
        assert_eq!(rx.recv().await, Some(SessionId::new(1)));

        clock.arm(SessionId::new(2));
        assert_eq!(clock.armed_for(), Some(SessionId::new(2)));
        assert_eq!(rx.recv().await, Some(SessionId::new(2)));
        assert_eq!(rx.recv().await, Some(SessionId::new(2)));
    }

    #[tokio::test(start_paused = true)]
    async fn stopped_clock_sends_nothing() {
        let (mut clock, mut rx) = ExamClock::channel();
        clock.arm(SessionId::new(1));
        clock.stop();
        assert_eq!(clock.armed_for(), None);

        tokio::time::sleep(TICK_PERIOD * 5).await;
        assert!(rx.try_recv().is_err());
    }
}
