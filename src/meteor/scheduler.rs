use std::collections::BTreeMap;
use std::time::Duration;

use rand::Rng;

use crate::config::{MeteorConfig, SceneConfig, ShowerConfig, StreamConfig};
use crate::foundation::core::MillisRange;
use crate::meteor::keyframes::CurveId;
use crate::meteor::timers::TimerQueue;
use crate::meteor::trajectory::{DistanceTier, MeteorTrajectoryEngine, StartPosition};

/// Scheduler-assigned meteor id, unique for the scheduler's lifetime.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct MeteorId(pub u64);

/// Registry state of one instance.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MeteorState {
    /// Animating.
    Active,
    /// The host has been told to retire it; dropped from the registry on the next tick.
    PendingRemoval,
}

/// Which cadence spawned an instance.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum MeteorOrigin {
    /// Spawned by a steady-stream lane.
    Stream {
        /// Lane index.
        lane: usize,
    },
    /// Spawned as part of a shower.
    Shower {
        /// Shower sequence number.
        burst: u64,
    },
}

/// One transient meteor occurrence.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct MeteorInstance {
    /// Unique id.
    pub id: MeteorId,
    /// Start position as viewport percentages.
    pub start: StartPosition,
    /// Motion curve the host applies.
    pub curve: CurveId,
    /// Animation length.
    pub duration: Duration,
    /// Spawn time since the scene epoch.
    pub created_at: Duration,
    /// Registry state.
    pub state: MeteorState,
    /// Spawning cadence.
    pub origin: MeteorOrigin,
}

impl MeteorInstance {
    /// Host-facing name of [`MeteorInstance::curve`].
    pub fn curve_name(&self) -> String {
        self.curve.name()
    }

    /// Time at which the instance is retired.
    pub fn expires_at(&self) -> Duration {
        self.created_at + self.duration
    }

    /// Animation progress in `[0,1]` at `now`.
    pub fn progress(&self, now: Duration) -> f64 {
        if self.duration.is_zero() {
            return 1.0;
        }
        let elapsed = now.saturating_sub(self.created_at).as_secs_f64();
        (elapsed / self.duration.as_secs_f64()).clamp(0.0, 1.0)
    }
}

/// Lifecycle change reported by [`MeteorScheduler::tick`] and `suspend`.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
#[serde(rename_all = "snake_case", tag = "event")]
pub enum MeteorEvent {
    /// A new instance the host should start animating.
    Spawned(MeteorInstance),
    /// An instance the host should remove.
    Retired {
        /// Retired instance.
        id: MeteorId,
        /// Expiry or suspension time.
        at: Duration,
    },
}

#[derive(Clone, Copy, Debug, PartialEq)]
enum Task {
    Stream { lane: usize },
    ShowerStart,
    ShowerMeteor { burst: u64, seed_deg: f64 },
    ShowerEnd { burst: u64 },
}

/// Steady-stream and shower cadences over a virtual-time timer queue.
///
/// Every scheduled unit of work lives in one [`TimerQueue`], so suspension is a single
/// `cancel_all`. The scheduler also owns the live-instance registry and retires instances once
/// their duration has elapsed.
pub struct MeteorScheduler {
    engine: MeteorTrajectoryEngine,
    duration: MillisRange,
    stream: StreamConfig,
    shower: ShowerConfig,
    timers: TimerQueue<Task>,
    live: BTreeMap<MeteorId, MeteorInstance>,
    next_id: u64,
    next_burst: u64,
    shower_active: bool,
    running: bool,
    disposed: bool,
}

impl MeteorScheduler {
    /// Idle scheduler for the scene's meteor config.
    pub fn new(config: &SceneConfig) -> Self {
        Self::from_meteor_config(&config.meteors)
    }

    /// Idle scheduler for a bare meteor config.
    pub fn from_meteor_config(config: &MeteorConfig) -> Self {
        Self {
            engine: MeteorTrajectoryEngine::new(config),
            duration: config.duration_ms,
            stream: config.stream.clone(),
            shower: config.shower.clone(),
            timers: TimerQueue::new(),
            live: BTreeMap::new(),
            next_id: 0,
            next_burst: 0,
            shower_active: false,
            running: false,
            disposed: false,
        }
    }

    /// Arm both cadences from `now`. No-op while already running or once disposed.
    pub fn start<R: Rng + ?Sized>(&mut self, now: Duration, rng: &mut R) {
        if self.running || self.disposed {
            return;
        }
        self.running = true;
        for lane in 0..self.stream.lanes {
            let at = now + self.stream.interval_ms.sample(rng);
            self.timers.schedule(at, Task::Stream { lane });
        }
        if self.shower.enabled {
            let at = now + self.shower.interval_ms.sample(rng);
            self.timers.schedule(at, Task::ShowerStart);
        }
        tracing::debug!(
            lanes = self.stream.lanes,
            shower = self.shower.enabled,
            "meteor cadences armed"
        );
    }

    /// Fire every timer due at or before `now` and retire expired instances, in time order.
    pub fn tick<R: Rng + ?Sized>(&mut self, now: Duration, rng: &mut R) -> Vec<MeteorEvent> {
        let mut events = Vec::new();
        self.live.retain(|_, m| m.state == MeteorState::Active);
        if !self.running {
            return events;
        }
        while let Some((due, task)) = self.timers.pop_due(now) {
            self.retire_expired(due, &mut events);
            self.run_task(due, task, rng, &mut events);
        }
        self.retire_expired(now, &mut events);
        events
    }

    /// Cancel all timers, clear shower state, and retire every live instance at `now`.
    pub fn suspend(&mut self, now: Duration) -> Vec<MeteorEvent> {
        self.timers.cancel_all();
        self.shower_active = false;
        self.running = false;
        let events = self
            .live
            .values()
            .filter(|m| m.state == MeteorState::Active)
            .map(|m| MeteorEvent::Retired { id: m.id, at: now })
            .collect::<Vec<_>>();
        self.live.clear();
        tracing::debug!(retired = events.len(), "meteor scheduler suspended");
        events
    }

    /// Restart both cadences from a cold state.
    pub fn resume<R: Rng + ?Sized>(&mut self, now: Duration, rng: &mut R) {
        self.start(now, rng);
    }

    /// Suspend for good: later `start`, `resume`, and `tick` calls do nothing.
    pub fn dispose(&mut self, now: Duration) -> Vec<MeteorEvent> {
        let events = self.suspend(now);
        self.disposed = true;
        events
    }

    /// Return `true` while cadences are armed.
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Return `true` after [`MeteorScheduler::dispose`].
    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    /// Return `true` between a shower's start and its end plus grace.
    pub fn shower_in_progress(&self) -> bool {
        self.shower_active
    }

    /// Pending timers across both cadences.
    pub fn outstanding_timers(&self) -> usize {
        self.timers.outstanding()
    }

    /// Active instances in creation order.
    pub fn live(&self) -> impl Iterator<Item = &MeteorInstance> + '_ {
        self.live
            .values()
            .filter(|m| m.state == MeteorState::Active)
    }

    /// Number of active instances.
    pub fn live_count(&self) -> usize {
        self.live().count()
    }

    /// Engine used for headings and start positions.
    pub fn engine(&self) -> &MeteorTrajectoryEngine {
        &self.engine
    }

    fn run_task<R: Rng + ?Sized>(
        &mut self,
        due: Duration,
        task: Task,
        rng: &mut R,
        events: &mut Vec<MeteorEvent>,
    ) {
        match task {
            Task::Stream { lane } => {
                let angle = self.engine.random_angle(rng);
                events.push(self.spawn(due, angle, MeteorOrigin::Stream { lane }, rng));
                let next = due + self.stream.interval_ms.sample(rng);
                self.timers.schedule(next, Task::Stream { lane });
            }
            Task::ShowerStart if self.shower_active => {
                let next = due + self.shower.interval_ms.sample(rng);
                self.timers.schedule(next, Task::ShowerStart);
            }
            Task::ShowerStart => self.begin_shower(due, rng),
            Task::ShowerMeteor { burst, seed_deg } => {
                let angle = self.engine.shower_angle(seed_deg, rng);
                events.push(self.spawn(due, angle, MeteorOrigin::Shower { burst }, rng));
            }
            Task::ShowerEnd { burst } => {
                tracing::debug!(burst, "shower finished");
                self.shower_active = false;
                let next = due + self.shower.interval_ms.sample(rng);
                self.timers.schedule(next, Task::ShowerStart);
            }
        }
    }

    fn begin_shower<R: Rng + ?Sized>(&mut self, due: Duration, rng: &mut R) {
        self.shower_active = true;
        let burst = self.next_burst;
        self.next_burst += 1;

        let seed_deg = self.engine.shower_seed(rng);
        let count = self.shower.count.sample(rng);
        let mut offset = Duration::ZERO;
        for i in 0..count {
            if i > 0 {
                offset += self.shower.stagger_ms.sample(rng);
            }
            self.timers
                .schedule(due + offset, Task::ShowerMeteor { burst, seed_deg });
        }
        let grace = Duration::from_millis(self.shower.grace_ms);
        self.timers
            .schedule(due + offset + grace, Task::ShowerEnd { burst });
        tracing::debug!(burst, count, seed_deg, "shower started");
    }

    fn spawn<R: Rng + ?Sized>(
        &mut self,
        at: Duration,
        angle_deg: u16,
        origin: MeteorOrigin,
        rng: &mut R,
    ) -> MeteorEvent {
        let id = MeteorId(self.next_id);
        self.next_id += 1;
        let instance = MeteorInstance {
            id,
            start: self.engine.start_position(rng),
            curve: CurveId::new(angle_deg, DistanceTier::random(rng)),
            duration: self.duration.sample(rng),
            created_at: at,
            state: MeteorState::Active,
            origin,
        };
        self.live.insert(id, instance);
        MeteorEvent::Spawned(instance)
    }

    fn retire_expired(&mut self, upto: Duration, events: &mut Vec<MeteorEvent>) {
        for m in self.live.values_mut() {
            if m.state == MeteorState::Active && m.expires_at() <= upto {
                m.state = MeteorState::PendingRemoval;
                events.push(MeteorEvent::Retired {
                    id: m.id,
                    at: m.expires_at(),
                });
            }
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/meteor/scheduler.rs"]
mod tests;
