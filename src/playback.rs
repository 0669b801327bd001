use std::time::Duration;

use serde::{Deserialize, Serialize};

/// What each scheduler tick drives
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PlaybackMode {
    /// Ticks sample the live pointer while a gesture is in progress
    #[default]
    Drawing,
    /// Ticks cycle through the frames
    Playing,
}

/// Work due at a tick boundary
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tick {
    SamplePointer,
    AdvanceFrame,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SchedulerState {
    Stopped,
    Running { last_tick: Duration },
}

/// Single fixed-rate driver for drawing and playback.
///
/// The caller polls it with a monotonic clock. At most one tick fires per poll; time that
/// piled up beyond one interval is dropped and only the remainder is carried forward.
#[derive(Debug, Clone)]
pub struct PlaybackScheduler {
    state: SchedulerState,
    mode: PlaybackMode,
    tick_rate: Duration,
    drawing_rate: Duration,
    playing_rate: Duration,
}

impl PlaybackScheduler {
    pub fn new(drawing_rate: Duration, playing_rate: Duration) -> Self {
        let drawing_rate = drawing_rate.max(MIN_TICK);
        Self {
            state: SchedulerState::Stopped,
            mode: PlaybackMode::Drawing,
            tick_rate: drawing_rate,
            drawing_rate,
            playing_rate: playing_rate.max(MIN_TICK),
        }
    }

    /// Start ticking from `now`. Already running schedulers keep their phase.
    pub fn start(&mut self, now: Duration) {
        if self.state == SchedulerState::Stopped {
            log::info!("Scheduler started in {:?} mode", self.mode);
            self.state = SchedulerState::Running { last_tick: now };
        }
    }

    /// Cancel any pending tick. Idempotent.
    pub fn stop(&mut self) {
        if self.state != SchedulerState::Stopped {
            log::info!("Scheduler stopped");
        }
        self.state = SchedulerState::Stopped;
    }

    pub fn is_running(&self) -> bool {
        matches!(self.state, SchedulerState::Running { .. })
    }

    pub fn mode(&self) -> PlaybackMode {
        self.mode
    }

    /// Switch mode and the matching fixed rate; the new rate applies from the next tick
    pub fn set_mode(&mut self, mode: PlaybackMode) {
        if self.mode != mode {
            log::info!("Scheduler mode {:?} -> {:?}", self.mode, mode);
        }
        self.mode = mode;
        self.tick_rate = match mode {
            PlaybackMode::Drawing => self.drawing_rate,
            PlaybackMode::Playing => self.playing_rate,
        };
    }

    pub fn set_tick_rate(&mut self, rate: Duration) {
        self.tick_rate = rate.max(MIN_TICK);
    }

    pub fn tick_rate(&self) -> Duration {
        self.tick_rate
    }

    /// Returns the tick due at `now`, if any
    pub fn poll(&mut self, now: Duration) -> Option<Tick> {
        let SchedulerState::Running { last_tick } = self.state else {
            return None;
        };
        // Mode and rate are read once, at the tick boundary.
        let rate = self.tick_rate;
        let mode = self.mode;
        let elapsed = now.saturating_sub(last_tick);
        if elapsed < rate {
            return None;
        }
        let carried = Duration::from_nanos((elapsed.as_nanos() % rate.as_nanos()) as u64);
        self.state = SchedulerState::Running {
            last_tick: now - carried,
        };
        Some(match mode {
            PlaybackMode::Drawing => Tick::SamplePointer,
            PlaybackMode::Playing => Tick::AdvanceFrame,
        })
    }
}

const MIN_TICK: Duration = Duration::from_millis(1);

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(ms: u64) -> Duration {
        Duration::from_millis(ms)
    }

    fn scheduler() -> PlaybackScheduler {
        PlaybackScheduler::new(ms(16), ms(100))
    }

    #[test]
    fn test_stopped_scheduler_never_ticks() {
        let mut scheduler = scheduler();
        assert_eq!(scheduler.poll(ms(1000)), None);
    }

    #[test]
    fn test_drawing_ticks_sample_pointer() {
        let mut scheduler = scheduler();
        scheduler.start(ms(0));
        assert_eq!(scheduler.poll(ms(10)), None);
        assert_eq!(scheduler.poll(ms(16)), Some(Tick::SamplePointer));
        assert_eq!(scheduler.poll(ms(20)), None);
    }

    #[test]
    fn test_one_tick_per_poll_after_stall() {
        let mut scheduler = scheduler();
        scheduler.set_mode(PlaybackMode::Playing);
        scheduler.start(ms(0));
        assert_eq!(scheduler.poll(ms(350)), Some(Tick::AdvanceFrame));
        // Only the 50ms remainder was carried forward.
        assert_eq!(scheduler.poll(ms(360)), None);
        assert_eq!(scheduler.poll(ms(399)), None);
        assert_eq!(scheduler.poll(ms(400)), Some(Tick::AdvanceFrame));
    }

    #[test]
    fn test_mode_switch_changes_rate_at_next_boundary() {
        let mut scheduler = scheduler();
        scheduler.start(ms(0));
        assert_eq!(scheduler.poll(ms(16)), Some(Tick::SamplePointer));
        scheduler.set_mode(PlaybackMode::Playing);
        assert_eq!(scheduler.tick_rate(), ms(100));
        assert_eq!(scheduler.poll(ms(50)), None);
        assert_eq!(scheduler.poll(ms(116)), Some(Tick::AdvanceFrame));
    }

    #[test]
    fn test_stop_is_idempotent_and_cancels() {
        let mut scheduler = scheduler();
        scheduler.start(ms(0));
        scheduler.stop();
        scheduler.stop();
        assert!(!scheduler.is_running());
        assert_eq!(scheduler.poll(ms(500)), None);
    }

    #[test]
    fn test_tick_rate_change_applies_from_last_tick() {
        let mut scheduler = scheduler();
        scheduler.start(ms(0));
        assert_eq!(scheduler.poll(ms(16)), Some(Tick::SamplePointer));

        scheduler.set_tick_rate(ms(50));
        assert_eq!(scheduler.tick_rate(), ms(50));
        assert_eq!(scheduler.poll(ms(40)), None);
        assert_eq!(scheduler.poll(ms(66)), Some(Tick::SamplePointer));
        assert_eq!(scheduler.poll(ms(100)), None);
        assert_eq!(scheduler.poll(ms(116)), Some(Tick::SamplePointer));

        scheduler.set_tick_rate(Duration::ZERO);
        assert_eq!(scheduler.tick_rate(), MIN_TICK);
    }

    #[test]
    fn test_restart_begins_a_fresh_interval() {
        let mut scheduler = scheduler();
        scheduler.start(ms(0));
        scheduler.stop();
        scheduler.start(ms(1000));
        assert_eq!(scheduler.poll(ms(1010)), None);
        assert_eq!(scheduler.poll(ms(1016)), Some(Tick::SamplePointer));
    }
}
