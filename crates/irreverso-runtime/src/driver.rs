//! Async frame driver
//!
//! Pumps a [`BootSequencer`] from a tokio task. Each tick maps wall time
//! since the driver started onto sequence time and forwards whatever the
//! sequencer emits. The task ends on completion, on an unmount request,
//! or when the host stops listening.

use std::time::Duration;

use irreverso_core::SeqTime;
use tokio::sync::{mpsc, oneshot};
use tokio::time::{interval, Instant, MissedTickBehavior};

use crate::{BootSequencer, BootSignal};

/// Why the driver stopped
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BootOutcome {
    /// Completion fired and `on_finish` ran
    Finished,
    /// The host asked to unmount first
    Unmounted,
    /// The signal receiver or the unmount handle was dropped
    HostGone,
}

#[derive(Clone, Copy, Debug)]
pub struct BootDriver {
    frame_interval: Duration,
}

impl BootDriver {
    pub fn new(frame_interval: Duration) -> Self {
        BootDriver {
            frame_interval: frame_interval.max(Duration::from_millis(1)),
        }
    }

    pub fn frame_interval(&self) -> Duration {
        self.frame_interval
    }

    /// Drive `sequencer` to an end. Anything but `Finished` unmounts it,
    /// so no timer outlives the task.
    pub async fn run(
        &self,
        sequencer: BootSequencer,
        signals: mpsc::UnboundedSender<BootSignal>,
        unmount: oneshot::Receiver<()>,
    ) -> BootOutcome {
        self.run_observed(sequencer, signals, unmount, |_| {}).await
    }

    /// Like [`BootDriver::run`], handing the sequencer to `observe` after
    /// every tick so a host can paint it.
    pub async fn run_observed<F>(
        &self,
        mut sequencer: BootSequencer,
        signals: mpsc::UnboundedSender<BootSignal>,
        mut unmount: oneshot::Receiver<()>,
        mut observe: F,
    ) -> BootOutcome
    where
        F: FnMut(&BootSequencer),
    {
        let origin = Instant::now();
        let mut ticker = interval(self.frame_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        let outcome = loop {
            tokio::select! {
                biased;

                request = &mut unmount => {
                    break match request {
                        Ok(()) => BootOutcome::Unmounted,
                        Err(_) => BootOutcome::HostGone,
                    };
                }

                _ = ticker.tick() => {
                    let now = SeqTime::from_duration(origin.elapsed());
                    let mut host_gone = false;
                    for signal in sequencer.advance_to(now) {
                        if signals.send(signal).is_err() {
                            host_gone = true;
                            break;
                        }
                    }
                    observe(&sequencer);
                    if sequencer.is_finished() {
                        break BootOutcome::Finished;
                    }
                    if host_gone {
                        break BootOutcome::HostGone;
                    }
                }
            }
        };

        if outcome != BootOutcome::Finished {
            sequencer.unmount();
        }
        tracing::debug!(?outcome, frames = sequencer.renderer().frames_drawn(), "boot driver stopped");
        outcome
    }
}

impl Default for BootDriver {
    fn default() -> Self {
        BootDriver::new(Duration::from_millis(16))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::BootConfig;
    use irreverso_core::{Phase, Seed};
    use irreverso_visual::{SoftwareBackend, Viewport};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn mount(finished: Arc<AtomicUsize>, viewport: &Viewport) -> BootSequencer {
        let config = BootConfig::default().with_seed(Seed::from_label("DRIVER1"));
        BootSequencer::mount(
            config,
            &SoftwareBackend::new(),
            viewport,
            Box::new(move || {
                finished.fetch_add(1, Ordering::SeqCst);
            }),
        )
    }

    #[tokio::test(start_paused = true)]
    async fn test_runs_to_completion() {
        let finished = Arc::new(AtomicUsize::new(0));
        let viewport = Viewport::new(8.0, 8.0, 1.0);
        let sequencer = mount(Arc::clone(&finished), &viewport);
        let finish_at = sequencer.finish_at();

        let (tx, mut rx) = mpsc::unbounded_channel();
        let (_unmount_tx, unmount_rx) = oneshot::channel();
        let started = Instant::now();
        let outcome = BootDriver::default().run(sequencer, tx, unmount_rx).await;

        assert_eq!(outcome, BootOutcome::Finished);
        assert_eq!(finished.load(Ordering::SeqCst), 1);
        assert!(started.elapsed() >= finish_at.since(SeqTime::ZERO));
        assert_eq!(viewport.listener_count(), 0);

        let mut phases = Vec::new();
        let mut last = None;
        while let Ok(signal) = rx.try_recv() {
            if let BootSignal::PhaseChanged(phase) = signal {
                phases.push(phase);
            }
            last = Some(signal);
        }
        assert_eq!(phases, vec![Phase::Breach, Phase::Reset, Phase::Deploy]);
        assert_eq!(last, Some(BootSignal::Finished));
    }

    #[tokio::test(start_paused = true)]
    async fn test_unmount_request_stops_early() {
        let finished = Arc::new(AtomicUsize::new(0));
        let viewport = Viewport::new(8.0, 8.0, 1.0);
        let sequencer = mount(Arc::clone(&finished), &viewport);

        let (tx, _rx) = mpsc::unbounded_channel();
        let (unmount_tx, unmount_rx) = oneshot::channel();
        let task = tokio::spawn(async move { BootDriver::default().run(sequencer, tx, unmount_rx).await });

        tokio::time::sleep(Duration::from_secs(4)).await;
        assert_eq!(viewport.listener_count(), 1);
        unmount_tx.send(()).unwrap();

        assert_eq!(task.await.unwrap(), BootOutcome::Unmounted);
        assert_eq!(finished.load(Ordering::SeqCst), 0);
        assert_eq!(viewport.listener_count(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_dropped_receiver_ends_run() {
        let finished = Arc::new(AtomicUsize::new(0));
        let viewport = Viewport::new(8.0, 8.0, 1.0);
        let sequencer = mount(Arc::clone(&finished), &viewport);

        let (tx, rx) = mpsc::unbounded_channel();
        drop(rx);
        let (_unmount_tx, unmount_rx) = oneshot::channel();
        let outcome = BootDriver::default().run(sequencer, tx, unmount_rx).await;

        assert_eq!(outcome, BootOutcome::HostGone);
        assert_eq!(finished.load(Ordering::SeqCst), 0);
        assert_eq!(viewport.listener_count(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_observer_sees_every_tick() {
        let finished = Arc::new(AtomicUsize::new(0));
        let viewport = Viewport::new(8.0, 8.0, 1.0);
        let sequencer = mount(Arc::clone(&finished), &viewport);

        let (tx, _rx) = mpsc::unbounded_channel();
        let (_unmount_tx, unmount_rx) = oneshot::channel();
        let mut ticks = 0u32;
        let mut saw_deploy_lines = false;
        let outcome = BootDriver::new(Duration::from_millis(50))
            .run_observed(sequencer, tx, unmount_rx, |seq| {
                ticks += 1;
                if seq.phase() == Phase::Deploy && !seq.visible_lines().is_empty() {
                    saw_deploy_lines = true;
                }
            })
            .await;

        assert_eq!(outcome, BootOutcome::Finished);
        assert!(ticks > 200);
        assert!(saw_deploy_lines);
    }

    #[test]
    fn test_zero_interval_is_bumped() {
        assert_eq!(BootDriver::new(Duration::ZERO).frame_interval(), Duration::from_millis(1));
    }
}
