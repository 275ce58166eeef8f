//! A table running in virtual time.
//!
//! `Session` wraps a `GameEngine` and a `Scheduler`. Every transition's
//! effects are turned into queued events, and due events are fed back into
//! the engine as intents. The countdown is one self re-arming tick chain;
//! restarting the timer starts a new chain and orphans the old one, so
//! ticks never pile up.

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::ai::{GreedyPolicy, MovePolicy};
use crate::core::action::Intent;
use crate::core::config::GameConfig;
use crate::core::error::ConfigError;
use crate::core::state::{GameState, GameStatus};
use crate::rules::{Effect, GameEngine, GameEvent, GameResult, Transition};

use super::scheduler::{Event, Scheduler};

/// An applied event and the virtual time it happened at.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimedEvent {
    pub at_ms: u64,
    pub event: GameEvent,
}

/// One table plus the clock that drives it.
pub struct Session<P = GreedyPolicy> {
    engine: GameEngine<P>,
    scheduler: Scheduler,
    /// Generation of the live tick chain, `None` while stopped.
    live_timer: Option<u64>,
    timer_generation: u64,
    log: Vec<TimedEvent>,
}

impl<P: MovePolicy> Session<P> {
    pub fn new(config: GameConfig, policy: P) -> Result<Self, ConfigError> {
        Ok(Self::from_engine(GameEngine::with_policy(config, policy)?))
    }

    /// Drive an existing engine. Nothing is scheduled until the first
    /// transition.
    #[must_use]
    pub fn from_engine(engine: GameEngine<P>) -> Self {
        Self {
            engine,
            scheduler: Scheduler::new(),
            live_timer: None,
            timer_generation: 0,
            log: Vec::new(),
        }
    }

    #[must_use]
    pub fn engine(&self) -> &GameEngine<P> {
        &self.engine
    }

    #[must_use]
    pub fn state(&self) -> &GameState {
        self.engine.state()
    }

    #[must_use]
    pub fn now_ms(&self) -> u64 {
        self.scheduler.now_ms()
    }

    /// Events still queued.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.scheduler.len()
    }

    /// Applied events so far, oldest first.
    #[must_use]
    pub fn log(&self) -> &[TimedEvent] {
        &self.log
    }

    /// Deal and open the first game.
    pub fn start(&mut self) -> Transition {
        self.submit(Intent::Start)
    }

    /// Apply an intent now and carry out its effects.
    pub fn submit(&mut self, intent: Intent) -> Transition {
        let transition = self.engine.apply(intent);
        self.absorb(&transition);
        transition
    }

    /// Move the clock forward by `ms`, firing everything that falls due.
    /// Returns the number of events fired.
    pub fn advance(&mut self, ms: u64) -> usize {
        let until = self.now_ms().saturating_add(ms);
        let mut fired = 0;
        while let Some(event) = self.scheduler.pop_due(until) {
            self.fire(event);
            fired += 1;
        }
        self.scheduler.advance_to(until);
        fired
    }

    /// Fire the next queued event if it is due by `limit_ms`.
    /// Returns `false` when nothing was fired.
    pub fn step(&mut self, limit_ms: u64) -> bool {
        match self.scheduler.pop_due(limit_ms) {
            Some(event) => {
                self.fire(event);
                true
            }
            None => false,
        }
    }

    /// Fire events until the game ends, the queue drains, or the clock
    /// would pass `limit_ms`.
    pub fn run_until_ended(&mut self, limit_ms: u64) -> Option<GameResult> {
        while self.state().status != GameStatus::Ended {
            if !self.step(limit_ms) {
                break;
            }
        }
        self.engine.result()
    }

    /// Let `policy` take the human seat's turn, if it is on turn.
    ///
    /// Returns `None` when the human is not the seat to act.
    pub fn play_human_with<H: MovePolicy + ?Sized>(&mut self, policy: &H) -> Option<Transition> {
        let state = self.state();
        if !state.is_playing() || !state.current().is_human {
            return None;
        }
        let player = state.current_player;
        let intent = match policy.choose(state.current().hand.tiles(), state.ends()) {
            Some(m) => Intent::Play {
                player,
                tile: m.tile,
                side: m.side,
            },
            None => Intent::Skip { player },
        };
        Some(self.submit(intent))
    }

    /// Like `run_until_ended`, with `policy` answering for the human seat
    /// as soon as it comes on turn.
    pub fn run_with_human<H: MovePolicy + ?Sized>(
        &mut self,
        policy: &H,
        limit_ms: u64,
    ) -> Option<GameResult> {
        while self.state().status != GameStatus::Ended {
            let acted = self
                .play_human_with(policy)
                .is_some_and(|t| t.outcome.is_applied());
            if acted {
                continue;
            }
            if !self.step(limit_ms) {
                break;
            }
        }
        self.engine.result()
    }

    fn fire(&mut self, event: Event) {
        match event {
            Event::Tick { timer } => {
                if self.live_timer != Some(timer) {
                    trace!(timer, "orphaned tick dropped");
                    return;
                }
                let transition = self.engine.update_timer();
                self.absorb(&transition);
                // Re-arm only if the tick did not replace or stop the chain.
                if self.live_timer == Some(timer) {
                    let interval = self.engine.config().tick_interval_ms;
                    self.scheduler.schedule(interval, Event::Tick { timer });
                }
            }
            Event::ComputerMove { player, epoch } => {
                self.submit(Intent::ComputerMove { player, epoch });
            }
            Event::Start => {
                self.submit(Intent::Start);
            }
        }
    }

    fn absorb(&mut self, transition: &Transition) {
        if let Some(event) = transition.outcome.event() {
            self.log.push(TimedEvent {
                at_ms: self.now_ms(),
                event,
            });
        }
        for effect in &transition.effects {
            self.execute(*effect);
        }
    }

    fn execute(&mut self, effect: Effect) {
        match effect {
            Effect::RestartTimer { epoch } => {
                self.timer_generation += 1;
                let timer = self.timer_generation;
                self.live_timer = Some(timer);
                let interval = self.engine.config().tick_interval_ms;
                self.scheduler.schedule(interval, Event::Tick { timer });
                trace!(timer, epoch, "timer restarted");
            }
            Effect::StopTimer => {
                self.live_timer = None;
                trace!("timer stopped");
            }
            Effect::ScheduleComputerMove {
                player,
                epoch,
                delay_ms,
            } => {
                debug!(%player, epoch, delay_ms, "computer move scheduled");
                self.scheduler
                    .schedule(delay_ms, Event::ComputerMove { player, epoch });
            }
            Effect::ScheduleStart { delay_ms } => {
                debug!(delay_ms, "start scheduled");
                self.scheduler.schedule(delay_ms, Event::Start);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session(seed: u64) -> Session {
        Session::new(GameConfig::default().with_seed(seed), GreedyPolicy).unwrap()
    }

    #[test]
    fn test_start_arms_one_timer() {
        let mut s = session(5);
        assert!(s.start().outcome.is_applied());
        assert_eq!(s.state().status, GameStatus::Playing);
        assert!(s.live_timer.is_some());
        assert!(s.pending() >= 1);
    }

    #[test]
    fn test_advance_moves_clock() {
        let mut s = session(5);
        s.advance(250);
        assert_eq!(s.now_ms(), 250);
        s.advance(0);
        assert_eq!(s.now_ms(), 250);
    }

    #[test]
    fn test_log_records_applied_only() {
        let mut s = session(8);
        s.start();
        s.start();
        assert_eq!(s.log().len(), 1);
        assert!(matches!(s.log()[0].event, GameEvent::Started { .. }));
    }
}
