//! Timer task driving auto-play.

use crate::lock;
use flashcard_core::{PlayTick, PlaybackSettings, Session};
use std::sync::{Arc, Mutex};
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};

/// Called with the session locked after every visible auto-play step.
pub type StepHook = Arc<dyn Fn(&mut Session) + Send + Sync>;

/// Owns the auto-play timer task.
///
/// Each interval tick runs the session's reveal/hide step; a hide is followed
/// by a delayed advance gated on the session's playback generation, so a step
/// scheduled before a stop never fires.
#[derive(Default)]
pub struct AutoPlayer {
    task: Option<JoinHandle<()>>,
}

impl AutoPlayer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_running(&self) -> bool {
        self.task.as_ref().is_some_and(|task| !task.is_finished())
    }

    /// Spawn the timer. Any previous timer is cancelled first.
    pub fn start(
        &mut self,
        session: Arc<Mutex<Session>>,
        settings: &PlaybackSettings,
        on_step: Option<StepHook>,
    ) {
        self.stop();

        let period = settings.interval();
        let delay = settings.advance_delay();

        self.task = Some(tokio::spawn(async move {
            let mut ticker = interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                ticker.tick().await;

                let tick = {
                    let mut session = lock(&session);
                    let tick = session.on_tick();
                    if tick != PlayTick::Stopped {
                        notify(&on_step, &mut session);
                    }
                    tick
                };

                match tick {
                    PlayTick::Stopped => break,
                    PlayTick::Revealed => {}
                    PlayTick::Advance(ticket) => {
                        tokio::time::sleep(delay).await;
                        let mut session = lock(&session);
                        if session.advance(ticket) {
                            notify(&on_step, &mut session);
                        }
                    }
                }
            }

            tracing::debug!("auto-play timer finished");
        }));
    }

    /// Cancel the timer task, including a pending delayed advance.
    pub fn stop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

impl Drop for AutoPlayer {
    fn drop(&mut self) {
        self.stop();
    }
}

fn notify(on_step: &Option<StepHook>, session: &mut Session) {
    if let Some(hook) = on_step {
        hook(session);
    }
}
