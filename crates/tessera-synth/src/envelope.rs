//! ADSR envelope generator.
//!
//! Five-state exponential envelope. Each active stage moves the output a
//! fixed fraction of the way toward its target every sample:
//!
//! ```text
//! output += coefficient × (target − output)
//! coefficient = 1 − exp(−2.2 / (time_seconds × sample_rate))
//! ```
//!
//! which covers roughly 10% to 90% of the distance in the configured time.
//! The attack aims at 1.3 and is clamped at 1.0, so it arrives in finite time
//! with a straighter curve than an asymptotic approach would give.

use libm::exp;

/// Shortest stage time in seconds.
pub const MIN_TIME: f64 = 0.001;
/// Longest stage time in seconds.
pub const MAX_TIME: f64 = 10.0;

const ATTACK_TARGET: f64 = 1.3;
const DECAY_SNAP: f64 = 0.001;
const RELEASE_FLOOR: f64 = 0.001;

/// ADSR envelope states.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum EnvelopeState {
    /// Inactive. Output is zero.
    #[default]
    Idle,
    /// Rising toward the peak.
    Attack,
    /// Falling from the peak toward the sustain level.
    Decay,
    /// Holding the sustain level while the gate is held.
    Sustain,
    /// Falling to zero after the gate is released.
    Release,
}

/// One ADSR stage parameter, for per-stage updates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AdsrParam {
    /// Attack time in seconds.
    Attack,
    /// Decay time in seconds.
    Decay,
    /// Sustain level 0..1.
    Sustain,
    /// Release time in seconds.
    Release,
}

/// A complete set of ADSR settings (times in seconds).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EnvelopeParams {
    /// Attack time in seconds.
    pub attack: f64,
    /// Decay time in seconds.
    pub decay: f64,
    /// Sustain level 0..1.
    pub sustain: f64,
    /// Release time in seconds.
    pub release: f64,
}

impl EnvelopeParams {
    /// Build from attack, decay, sustain, release.
    pub const fn new(attack: f64, decay: f64, sustain: f64, release: f64) -> Self {
        Self {
            attack,
            decay,
            sustain,
            release,
        }
    }

    /// Value of one stage parameter.
    pub fn get(&self, param: AdsrParam) -> f64 {
        match param {
            AdsrParam::Attack => self.attack,
            AdsrParam::Decay => self.decay,
            AdsrParam::Sustain => self.sustain,
            AdsrParam::Release => self.release,
        }
    }
}

impl Default for EnvelopeParams {
    fn default() -> Self {
        Self::new(0.01, 0.1, 0.7, 0.3)
    }
}

/// ADSR envelope generator.
///
/// # Example
///
/// ```rust
/// use tessera_synth::{Adsr, EnvelopeState};
///
/// let mut env = Adsr::new(48000.0);
/// env.set_attack(0.005);
/// env.set_sustain(0.5);
///
/// env.note_on();
/// for _ in 0..48000 {
///     env.process();
/// }
/// assert_eq!(env.state(), EnvelopeState::Sustain);
/// assert_eq!(env.output(), 0.5);
///
/// env.note_off();
/// assert_eq!(env.state(), EnvelopeState::Release);
/// ```
#[derive(Debug, Clone)]
pub struct Adsr {
    state: EnvelopeState,
    output: f64,
    sample_rate: f64,
    params: EnvelopeParams,
    attack_coef: f64,
    decay_coef: f64,
    release_coef: f64,
}

impl Default for Adsr {
    fn default() -> Self {
        Self::new(tessera_core::NATIVE_SAMPLE_RATE)
    }
}

impl Adsr {
    /// Create an idle envelope with 0.01 / 0.1 / 0.7 / 0.3 settings.
    pub fn new(sample_rate: f64) -> Self {
        let mut env = Self {
            state: EnvelopeState::Idle,
            output: 0.0,
            sample_rate,
            params: EnvelopeParams::default(),
            attack_coef: 0.0,
            decay_coef: 0.0,
            release_coef: 0.0,
        };
        env.recalculate();
        env
    }

    /// Set attack time in seconds, clamped to [0.001, 10].
    pub fn set_attack(&mut self, seconds: f64) {
        self.params.attack = seconds.clamp(MIN_TIME, MAX_TIME);
        self.attack_coef = self.coefficient(self.params.attack);
    }

    /// Set decay time in seconds, clamped to [0.001, 10].
    pub fn set_decay(&mut self, seconds: f64) {
        self.params.decay = seconds.clamp(MIN_TIME, MAX_TIME);
        self.decay_coef = self.coefficient(self.params.decay);
    }

    /// Set sustain level, clamped to [0, 1].
    pub fn set_sustain(&mut self, level: f64) {
        self.params.sustain = level.clamp(0.0, 1.0);
    }

    /// Set release time in seconds, clamped to [0.001, 10].
    pub fn set_release(&mut self, seconds: f64) {
        self.params.release = seconds.clamp(MIN_TIME, MAX_TIME);
        self.release_coef = self.coefficient(self.params.release);
    }

    /// Set all four parameters.
    pub fn set_params(&mut self, params: EnvelopeParams) {
        self.set_attack(params.attack);
        self.set_decay(params.decay);
        self.set_sustain(params.sustain);
        self.set_release(params.release);
    }

    /// Set one stage parameter.
    pub fn set_param(&mut self, param: AdsrParam, value: f64) {
        match param {
            AdsrParam::Attack => self.set_attack(value),
            AdsrParam::Decay => self.set_decay(value),
            AdsrParam::Sustain => self.set_sustain(value),
            AdsrParam::Release => self.set_release(value),
        }
    }

    /// Current (clamped) settings.
    pub fn params(&self) -> EnvelopeParams {
        self.params
    }

    /// Attack time in seconds.
    pub fn attack(&self) -> f64 {
        self.params.attack
    }

    /// Decay time in seconds.
    pub fn decay(&self) -> f64 {
        self.params.decay
    }

    /// Sustain level.
    pub fn sustain(&self) -> f64 {
        self.params.sustain
    }

    /// Release time in seconds.
    pub fn release(&self) -> f64 {
        self.params.release
    }

    /// Per-sample attack coefficient.
    pub fn attack_coefficient(&self) -> f64 {
        self.attack_coef
    }

    /// Per-sample release coefficient.
    pub fn release_coefficient(&self) -> f64 {
        self.release_coef
    }

    /// Set sample rate and recalculate coefficients.
    pub fn set_sample_rate(&mut self, sample_rate: f64) {
        self.sample_rate = sample_rate;
        self.recalculate();
    }

    /// Enter Attack from any state, continuing from the current level.
    pub fn note_on(&mut self) {
        self.state = EnvelopeState::Attack;
    }

    /// Enter Release unless idle.
    pub fn note_off(&mut self) {
        if self.state != EnvelopeState::Idle {
            self.state = EnvelopeState::Release;
        }
    }

    /// Return to Idle with zero output.
    pub fn reset(&mut self) {
        self.state = EnvelopeState::Idle;
        self.output = 0.0;
    }

    /// Current stage.
    pub fn state(&self) -> EnvelopeState {
        self.state
    }

    /// Most recent output level.
    pub fn output(&self) -> f64 {
        self.output
    }

    /// True in every stage except Idle.
    pub fn is_active(&self) -> bool {
        self.state != EnvelopeState::Idle
    }

    /// Advance one sample and return the level in [0, 1].
    #[inline]
    pub fn process(&mut self) -> f64 {
        match self.state {
            EnvelopeState::Idle => {
                self.output = 0.0;
            }
            EnvelopeState::Attack => {
                self.output += self.attack_coef * (ATTACK_TARGET - self.output);
                if self.output >= 1.0 {
                    self.output = 1.0;
                    self.state = EnvelopeState::Decay;
                }
            }
            EnvelopeState::Decay => {
                let sustain = self.params.sustain;
                self.output += self.decay_coef * (sustain - self.output);
                if self.output <= sustain + DECAY_SNAP {
                    self.output = sustain;
                    self.state = EnvelopeState::Sustain;
                }
            }
            EnvelopeState::Sustain => {
                self.output = self.params.sustain;
            }
            EnvelopeState::Release => {
                self.output += self.release_coef * (0.0 - self.output);
                if self.output <= RELEASE_FLOOR {
                    self.output = 0.0;
                    self.state = EnvelopeState::Idle;
                }
            }
        }
        self.output
    }

    fn coefficient(&self, seconds: f64) -> f64 {
        1.0 - exp(-2.2 / (seconds * self.sample_rate))
    }

    fn recalculate(&mut self) {
        self.attack_coef = self.coefficient(self.params.attack);
        self.decay_coef = self.coefficient(self.params.decay);
        self.release_coef = self.coefficient(self.params.release);
    }
}
