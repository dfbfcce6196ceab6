use std::time::{Duration, Instant};

use crate::audio::output::AudioOutput;
use crate::audio::tracks::track_for;
use crate::model::tone::Tone;

pub const FADE_DURATION: Duration = Duration::from_millis(2000);
pub const FADE_STEP: Duration = Duration::from_millis(50);
pub const FADE_STEPS: u32 = 40;
pub const MAX_VOLUME: f32 = 0.4;
const EPSILON: f32 = 0.01;

#[derive(Debug, Clone, Copy, PartialEq)]
enum FadeGoal {
    /// Fading to silence; swap to `next` (or stop) when done.
    Out { next: Option<&'static str> },
    In,
}

#[derive(Debug, Clone, Copy)]
struct Fade {
    target: f32,
    step: f32,
    steps_done: u32,
    next_due: Instant,
    goal: FadeGoal,
}

/// Plays one looping track matched to the scene tone, crossfading through
/// silence whenever the track changes.
///
/// Fades advance in fixed 50 ms steps from `update`. At most one fade is in
/// flight; a new tone always cancels the previous fade first.
pub struct MusicPlayer {
    output: Box<dyn AudioOutput>,
    active: Option<&'static str>,
    volume: f32,
    muted: bool,
    fade: Option<Fade>,
}

impl MusicPlayer {
    pub fn new(mut output: Box<dyn AudioOutput>) -> Self {
        output.set_volume(0.0);
        Self {
            output,
            active: None,
            volume: 0.0,
            muted: false,
            fade: None,
        }
    }

    pub fn volume(&self) -> f32 {
        self.volume
    }

    pub fn active_track(&self) -> Option<&'static str> {
        self.active
    }

    pub fn is_muted(&self) -> bool {
        self.muted
    }

    pub fn is_fading(&self) -> bool {
        self.fade.is_some()
    }

    pub fn set_muted(&mut self, muted: bool) {
        if self.muted != muted {
            self.muted = muted;
            self.output.set_muted(muted);
        }
    }

    /// Track we are at or heading to.
    fn targeted(&self) -> Option<&'static str> {
        match self.fade {
            Some(Fade {
                goal: FadeGoal::Out { next },
                ..
            }) => next,
            _ => self.active,
        }
    }

    pub fn set_tone(&mut self, tone: Option<Tone>, now: Instant) {
        let next = tone.map(track_for);
        if next == self.targeted() {
            return;
        }

        tracing::debug!(?tone, "switching music");
        self.fade = None;
        self.start_fade(0.0, FadeGoal::Out { next }, now);
    }

    /// Applies every fade step that is due at `now`.
    pub fn update(&mut self, now: Instant) {
        while let Some(mut fade) = self.fade.take() {
            if now < fade.next_due {
                self.fade = Some(fade);
                return;
            }

            fade.steps_done += 1;
            if fade.steps_done >= FADE_STEPS {
                self.apply_volume(fade.target);
                self.finish(fade.goal, fade.next_due);
            } else {
                self.apply_volume(self.volume + fade.step);
                fade.next_due += FADE_STEP;
                self.fade = Some(fade);
            }
        }
    }

    fn start_fade(&mut self, target: f32, goal: FadeGoal, now: Instant) {
        let delta = target - self.volume;
        if delta.abs() < EPSILON {
            if target == 0.0 {
                self.apply_volume(0.0);
            }
            self.finish(goal, now);
            return;
        }

        self.fade = Some(Fade {
            target,
            step: delta / FADE_STEPS as f32,
            steps_done: 0,
            next_due: now + FADE_STEP,
            goal,
        });
    }

    fn finish(&mut self, goal: FadeGoal, now: Instant) {
        match goal {
            FadeGoal::Out { next: Some(url) } => {
                self.active = Some(url);
                self.output.set_source(url);
                self.output.play();
                self.start_fade(MAX_VOLUME, FadeGoal::In, now);
            }
            FadeGoal::Out { next: None } => {
                self.output.pause();
                self.active = None;
            }
            FadeGoal::In => {}
        }
    }

    fn apply_volume(&mut self, volume: f32) {
        self.volume = volume.clamp(0.0, 1.0);
        self.output.set_volume(self.volume);
    }
}

impl Drop for MusicPlayer {
    fn drop(&mut self) {
        self.fade = None;
        self.output.pause();
    }
}
