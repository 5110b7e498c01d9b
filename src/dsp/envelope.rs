/*
Attack/Release Envelope
=======================

The voice's amplitude envelope has only two moving stages. There is no decay
and no separate sustain: once the attack ramp reaches 1.0 the level simply
holds there for as long as the key is down.

  Level
    1.0 ┐      ╱‾‾‾‾‾‾‾‾‾‾‾‾‾‾╲
        │     ╱                 ╲
        │    ╱                   ╲
    0.0 └───╱─────────────────────╲───→ Time
         note_on              note_off
          Attack    (held)     Release


Knob To Time: Quadratic Curves
------------------------------

Both knobs are normalized to [0, 1] and squared before scaling, so most of
the travel lands on short, playable times while the end of the knob still
reaches multi-second values:

    attack_ms  =  1 +  999 * attack²     (1 ms .. 1 s)
    release_ms = 10 + 2990 * release²    (10 ms .. 3 s)

    samples    = ms * 0.001 * sample_rate, at least 1


Rates Are Captured At The Gate
------------------------------

The attack step (1 / attack_samples) is computed at note_on and the release
step at note_off. Moving a knob mid-ramp changes the next ramp, not the
current one.

The release step is `level_at_note_off / release_samples`. Releasing from
full level or from 0.3 both take release_samples to reach zero, so the knob
means "release time", not "release slope".


State Machine
-------------

    ┌──────┐  note_on   ┌────────┐  level hits 1.0: clamp, stay
    │ Idle │ ─────────→ │ Attack │ ←──────┐
    └──────┘            └────────┘ ───────┘
        ↑                 │    ↑
        │        note_off │    │ note_on (from current level)
        │                 ↓    │
        │  level <= 0   ┌─────────┐
        └────────────── │ Release │
                        └─────────┘

A retrigger starts the new attack from wherever the level is, which keeps
the output continuous. note_off while Idle is ignored.
*/

/// Envelope stage. Ramp stages carry the per-sample step they were
/// triggered with.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EnvelopeState {
    Idle,
    Attack { rate: f64 },
    Release { rate: f64 },
}

/// Attack knob (0..1) to milliseconds.
#[inline]
pub fn attack_ms(attack: f32) -> f64 {
    let a = f64::from(attack);
    1.0 + 999.0 * a * a
}

/// Release knob (0..1) to milliseconds.
#[inline]
pub fn release_ms(release: f32) -> f64 {
    let r = f64::from(release);
    10.0 + 2990.0 * r * r
}

#[inline]
fn ms_to_samples(ms: f64, sample_rate: f64) -> f64 {
    (ms * 0.001 * sample_rate).max(1.0)
}

#[derive(Debug, Clone)]
pub struct Envelope {
    state: EnvelopeState,
    level: f64,
}

impl Default for Envelope {
    fn default() -> Self {
        Self::new()
    }
}

impl Envelope {
    pub fn new() -> Self {
        Self {
            state: EnvelopeState::Idle,
            level: 0.0,
        }
    }

    /// Gate high: ramp towards 1.0 from the current level.
    pub fn note_on(&mut self, attack: f32, sample_rate: f64) {
        let samples = ms_to_samples(attack_ms(attack), sample_rate);
        self.state = EnvelopeState::Attack {
            rate: 1.0 / samples,
        };
    }

    /// Gate low: ramp from the current level to zero over the release time.
    pub fn note_off(&mut self, release: f32, sample_rate: f64) {
        if self.state == EnvelopeState::Idle {
            return;
        }

        let samples = ms_to_samples(release_ms(release), sample_rate);
        self.state = EnvelopeState::Release {
            rate: self.level / samples,
        };
    }

    /// Advance by one sample and return the new level.
    #[inline]
    pub fn next_sample(&mut self) -> f64 {
        match self.state {
            EnvelopeState::Idle => {
                self.level = 0.0;
            }
            EnvelopeState::Attack { rate } => {
                self.level += rate;
                if self.level >= 1.0 {
                    self.level = 1.0;
                }
            }
            EnvelopeState::Release { rate } => {
                self.level -= rate;
                if self.level <= 0.0 {
                    self.level = 0.0;
                    self.state = EnvelopeState::Idle;
                }
            }
        }

        debug_assert!((0.0..=1.0).contains(&self.level));
        self.level
    }

    /// Render a block of envelope values into the buffer.
    pub fn render(&mut self, buffer: &mut [f32]) {
        for sample in buffer.iter_mut() {
            *sample = self.next_sample() as f32;
        }
    }

    /// True unless the envelope is idle.
    pub fn is_active(&self) -> bool {
        !matches!(self.state, EnvelopeState::Idle)
    }

    pub fn reset(&mut self) {
        self.state = EnvelopeState::Idle;
        self.level = 0.0;
    }

    pub fn level(&self) -> f64 {
        self.level
    }

    pub fn state(&self) -> EnvelopeState {
        self.state
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_RATE: f64 = 44_100.0;

    fn run(env: &mut Envelope, samples: usize) {
        for _ in 0..samples {
            env.next_sample();
        }
    }

    fn samples_until_idle(env: &mut Envelope) -> usize {
        let mut count = 0;
        while env.is_active() {
            env.next_sample();
            count += 1;
            assert!(count < 10_000_000, "release never finished");
        }
        count
    }

    #[test]
    fn knob_curves_hit_their_endpoints() {
        assert_eq!(attack_ms(0.0), 1.0);
        assert_eq!(attack_ms(1.0), 1000.0);
        assert_eq!(release_ms(0.0), 10.0);
        assert_eq!(release_ms(1.0), 3000.0);
        assert!((attack_ms(0.05) - 3.4975).abs() < 1e-6);
    }

    #[test]
    fn attack_reaches_full_level_and_holds() {
        let mut env = Envelope::new();
        env.note_on(0.05, SAMPLE_RATE);

        // 3.4975 ms at 44.1 kHz is about 154.2 samples.
        run(&mut env, 154);
        assert!(env.level() > 0.99 && env.level() < 1.0);
        run(&mut env, 1);
        assert_eq!(env.level(), 1.0);

        run(&mut env, 10_000);
        assert_eq!(env.level(), 1.0);
        assert!(matches!(env.state(), EnvelopeState::Attack { .. }));
    }

    #[test]
    fn attack_is_monotonic_and_bounded() {
        let mut env = Envelope::new();
        env.note_on(0.3, SAMPLE_RATE);

        let mut previous = env.level();
        for _ in 0..20_000 {
            let level = env.next_sample();
            assert!(level >= previous);
            assert!((0.0..=1.0).contains(&level));
            previous = level;
        }
    }

    #[test]
    fn release_is_monotonic_and_ends_idle() {
        let mut env = Envelope::new();
        env.note_on(0.0, SAMPLE_RATE);
        run(&mut env, 100);
        env.note_off(0.1, SAMPLE_RATE);

        let mut previous = env.level();
        while env.is_active() {
            let level = env.next_sample();
            assert!(level <= previous);
            assert!((0.0..=1.0).contains(&level));
            previous = level;
        }
        assert_eq!(env.level(), 0.0);
        assert_eq!(env.state(), EnvelopeState::Idle);
    }

    #[test]
    fn release_time_does_not_depend_on_start_level() {
        let release = 0.25;

        let mut full = Envelope::new();
        full.note_on(0.0, SAMPLE_RATE);
        run(&mut full, 100);
        assert_eq!(full.level(), 1.0);
        full.note_off(release, SAMPLE_RATE);
        let from_full = samples_until_idle(&mut full);

        let mut partial = Envelope::new();
        partial.note_on(0.5, SAMPLE_RATE);
        while partial.level() < 0.3 {
            partial.next_sample();
        }
        assert!(partial.level() < 0.31);
        partial.note_off(release, SAMPLE_RATE);
        let from_partial = samples_until_idle(&mut partial);

        assert!(
            from_full.abs_diff(from_partial) <= 1,
            "full={from_full} partial={from_partial}"
        );
    }

    #[test]
    fn note_off_while_idle_is_ignored() {
        let mut env = Envelope::new();
        env.note_off(0.5, SAMPLE_RATE);
        assert_eq!(env.state(), EnvelopeState::Idle);
        assert_eq!(env.next_sample(), 0.0);
    }

    #[test]
    fn retrigger_continues_from_current_level() {
        let mut env = Envelope::new();
        env.note_on(0.0, SAMPLE_RATE);
        run(&mut env, 100);
        env.note_off(0.5, SAMPLE_RATE);
        run(&mut env, 1000);
        let before = env.level();
        assert!(before > 0.0 && before < 1.0);

        env.note_on(1.0, SAMPLE_RATE);
        let after = env.next_sample();
        assert!(after > before);
        assert!(after - before < 0.001);
    }

    #[test]
    fn zero_level_release_goes_idle_immediately() {
        let mut env = Envelope::new();
        env.note_on(0.5, SAMPLE_RATE);
        env.note_off(0.5, SAMPLE_RATE);
        assert!(matches!(env.state(), EnvelopeState::Release { .. }));
        env.next_sample();
        assert_eq!(env.state(), EnvelopeState::Idle);
    }

    #[test]
    fn reset_returns_to_idle() {
        let mut env = Envelope::new();
        env.note_on(0.0, SAMPLE_RATE);
        run(&mut env, 10);
        env.reset();
        assert_eq!(env.level(), 0.0);
        assert!(!env.is_active());
    }
}
