//! Beat clock - turns a tempo into beat and subdivision ticks
//!
//! Timers live in a `TaskQueue` on logical time and are fired by
//! `advance`. Every tempo change is a full restart: both timers are
//! cancelled and rescheduled from the moment of the change, and the
//! measure starts over at beat 0. Tempo transitions sample an eased
//! curve and restart the timers at every sample, so the pulse jumps
//! phase while a transition runs.

use crate::core::config::RhythmConfig;
use crate::core::error::{GameError, Result};
use crate::core::task_queue::TaskQueue;
use crate::core::types::Millis;
use crate::rhythm::constants::{MS_PER_MINUTE, SUBDIVISION_TIMER_DIVISOR};
use crate::rhythm::tick::{BeatTick, SubdivisionTick, TickSink};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ClockTimer {
    Beat,
    Subdivision,
}

/// An in-flight eased tempo change
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TempoTransition {
    pub start_bpm: f64,
    pub target_bpm: f64,
    pub started_at: Millis,
    pub duration_ms: f64,
    pub next_sample_at: Millis,
}

impl TempoTransition {
    /// Linear progress at `at`, clamped to 1
    pub fn progress(&self, at: Millis) -> f64 {
        ((at - self.started_at) / self.duration_ms).clamp(0.0, 1.0)
    }

    /// Interpolated tempo at `at`
    pub fn bpm_at(&self, at: Millis) -> f64 {
        let eased = ease_in_out_quad(self.progress(at));
        self.start_bpm + (self.target_bpm - self.start_bpm) * eased
    }
}

/// Quadratic ease-in-out on `0..=1`
pub fn ease_in_out_quad(progress: f64) -> f64 {
    if progress < 0.5 {
        2.0 * progress * progress
    } else {
        1.0 - (-2.0 * progress + 2.0).powi(2) / 2.0
    }
}

/// Produces beat/subdivision ticks at a rate derived from BPM
#[derive(Debug, Clone)]
pub struct BeatClock {
    bpm: f64,
    beat_bonus: f32,
    subdivision_bonus_factor: f32,
    beats_per_measure: u8,
    subdivision_count: u8,
    sample_step_ms: f64,

    // Counters
    current_beat: u8,
    eighth_counter: u32,
    sub_beat_counter: u32,

    timers: TaskQueue<ClockTimer>,
    transition: Option<TempoTransition>,
    now: Millis,
    running: bool,
}

impl BeatClock {
    pub fn new(config: &RhythmConfig) -> Self {
        Self {
            bpm: config.default_bpm,
            beat_bonus: config.beat_bonus,
            subdivision_bonus_factor: config.subdivision_bonus_factor,
            beats_per_measure: config.beats_per_measure.max(1),
            subdivision_count: config.subdivision_count.max(1),
            sample_step_ms: config.transition_sample_ms,
            current_beat: config.beats_per_measure.max(1) - 1,
            eighth_counter: 0,
            sub_beat_counter: 0,
            timers: TaskQueue::new(),
            transition: None,
            now: 0.0,
            running: false,
        }
    }

    pub fn bpm(&self) -> f64 {
        self.bpm
    }

    pub fn ms_per_beat(&self) -> f64 {
        MS_PER_MINUTE / self.bpm
    }

    pub fn beat_bonus(&self) -> f32 {
        self.beat_bonus
    }

    pub fn subdivision_bonus(&self) -> f32 {
        self.beat_bonus * self.subdivision_bonus_factor
    }

    pub fn subdivision_count(&self) -> u8 {
        self.subdivision_count
    }

    pub fn beats_per_measure(&self) -> u8 {
        self.beats_per_measure
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn is_transitioning(&self) -> bool {
        self.transition.is_some()
    }

    pub fn transition(&self) -> Option<&TempoTransition> {
        self.transition.as_ref()
    }

    /// Logical time of the last processed timer or advance
    pub fn now(&self) -> Millis {
        self.now
    }

    /// Number of outstanding beat/subdivision timers
    pub fn pending_timers(&self) -> usize {
        self.timers.len()
    }

    /// Start ticking at the current tempo from `now`
    pub fn start(&mut self, now: Millis) {
        self.now = now;
        self.running = true;
        self.restart_timers();
        tracing::debug!(bpm = self.bpm, at = now, "Beat clock started");
    }

    /// Cancel every timer and any transition. Safe to call repeatedly.
    pub fn stop(&mut self) {
        let dropped = self.timers.cancel_all();
        self.transition = None;
        if self.running {
            tracing::debug!(dropped, "Beat clock stopped");
        }
        self.running = false;
    }

    /// Set the tempo and restart both timers from the current time
    ///
    /// Cancels any tempo transition in progress. Rejects non-positive or
    /// non-finite BPM with a warning and leaves the clock untouched.
    pub fn set_tempo(&mut self, bpm: f64) -> Result<f64> {
        validate_bpm(bpm)?;
        self.transition = None;
        self.apply_tempo(bpm);
        Ok(self.bpm)
    }

    /// Ease from the current tempo to `target_bpm` over `duration_ms`
    ///
    /// Samples every `transition_sample_ms` of logical time; each sample
    /// is a full tempo restart. A zero duration applies the target at once.
    pub fn transition_tempo(&mut self, target_bpm: f64, duration_ms: f64) -> Result<()> {
        validate_bpm(target_bpm)?;
        if !(duration_ms > 0.0) {
            self.set_tempo(target_bpm)?;
            return Ok(());
        }

        self.transition = Some(TempoTransition {
            start_bpm: self.bpm,
            target_bpm,
            started_at: self.now,
            duration_ms,
            next_sample_at: self.now + self.sample_step_ms,
        });
        tracing::debug!(
            from = self.bpm,
            to = target_bpm,
            duration_ms,
            "Tempo transition started"
        );
        Ok(())
    }

    /// Change subdivision granularity and re-apply the current tempo
    pub fn set_subdivision_count(&mut self, count: u8) -> Result<()> {
        if count == 0 {
            tracing::warn!("Ignoring subdivision count of 0");
            return Err(GameError::InvalidConfig(
                "subdivision count must be at least 1".into(),
            ));
        }
        self.subdivision_count = count;
        self.apply_tempo(self.bpm);
        Ok(())
    }

    /// Fire every timer and transition sample due at or before `now`
    ///
    /// Returns the number of ticks published.
    pub fn advance<S: TickSink + ?Sized>(&mut self, now: Millis, sink: &mut S) -> usize {
        let mut published = 0;

        loop {
            let next_timer = self.timers.next_due_at().filter(|t| *t <= now);
            let next_sample = self
                .transition
                .map(|t| t.next_sample_at)
                .filter(|t| *t <= now);

            match (next_timer, next_sample) {
                (None, None) => break,
                (Some(timer_at), Some(sample_at)) if sample_at <= timer_at => {
                    self.sample_transition(sample_at);
                }
                (None, Some(sample_at)) => self.sample_transition(sample_at),
                (Some(_), _) => {
                    let Some((at, timer)) = self.timers.pop_due(now) else {
                        break;
                    };
                    self.now = at;
                    let fired = match timer {
                        ClockTimer::Beat => self.fire_beat(at, sink),
                        ClockTimer::Subdivision => self.fire_subdivision(at, sink),
                    };
                    if fired {
                        published += 1;
                    }
                }
            }
        }

        self.now = self.now.max(now);
        published
    }

    fn apply_tempo(&mut self, bpm: f64) {
        self.bpm = bpm;
        if self.running {
            self.restart_timers();
        }
    }

    fn restart_timers(&mut self) {
        self.timers.cancel_all();

        // Next beat is the downbeat
        self.current_beat = self.beats_per_measure - 1;
        self.eighth_counter = 0;
        self.sub_beat_counter = 0;

        let ms_per_beat = self.ms_per_beat();
        self.timers.schedule(self.now + ms_per_beat, ClockTimer::Beat);
        self.timers.schedule(
            self.now + ms_per_beat / SUBDIVISION_TIMER_DIVISOR,
            ClockTimer::Subdivision,
        );
    }

    fn sample_transition(&mut self, at: Millis) {
        let Some(mut transition) = self.transition else {
            return;
        };
        self.now = at;

        // Intermediate samples land on whole BPM; the last one is exact
        let progress = transition.progress(at);
        let bpm = if progress >= 1.0 {
            transition.target_bpm
        } else {
            let (low, high) = if transition.start_bpm <= transition.target_bpm {
                (transition.start_bpm, transition.target_bpm)
            } else {
                (transition.target_bpm, transition.start_bpm)
            };
            transition.bpm_at(at).round().clamp(low, high)
        };
        self.apply_tempo(bpm);

        if progress >= 1.0 {
            self.transition = None;
            tracing::debug!(bpm, "Tempo transition finished");
        } else {
            transition.next_sample_at += self.sample_step_ms;
            self.transition = Some(transition);
        }
    }

    fn fire_beat<S: TickSink + ?Sized>(&mut self, at: Millis, sink: &mut S) -> bool {
        self.current_beat = (self.current_beat + 1) % self.beats_per_measure;
        self.sub_beat_counter = 0;
        sink.publish_beat(BeatTick::new(self.current_beat, self.beat_bonus, at));

        self.timers.schedule(at + self.ms_per_beat(), ClockTimer::Beat);
        true
    }

    fn fire_subdivision<S: TickSink + ?Sized>(&mut self, at: Millis, sink: &mut S) -> bool {
        self.timers.schedule(
            at + self.ms_per_beat() / SUBDIVISION_TIMER_DIVISOR,
            ClockTimer::Subdivision,
        );

        self.eighth_counter += 1;
        if self.eighth_counter % 2 == 0 {
            // Coincides with a main beat
            self.eighth_counter = 0;
            return false;
        }

        self.sub_beat_counter += 1;
        sink.publish_subdivision(SubdivisionTick::new(
            self.subdivision_count,
            self.sub_beat_counter,
            self.subdivision_bonus(),
            at,
        ));
        true
    }
}

fn validate_bpm(bpm: f64) -> Result<()> {
    if bpm.is_finite() && bpm > 0.0 {
        Ok(())
    } else {
        tracing::warn!(bpm, "Ignoring invalid tempo");
        Err(GameError::InvalidTempo(bpm))
    }
}
