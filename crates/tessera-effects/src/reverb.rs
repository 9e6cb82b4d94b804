//! Schroeder reverb: four parallel combs into two series allpasses.
//!
//! ```text
//!            ┌─ comb 2999·4 ─┐
//! (L+R)/2 ───┼─ comb 3407·4 ─┼─ Σ × 0.25 ─ allpass 521·4 ─ allpass 337·4 ─ wet
//!            ├─ comb 3701·4 ─┤
//!            └─ comb 4003·4 ─┘
//! ```
//!
//! Ring lengths are given at 192 kHz and scale linearly with the sample rate.
//! The wet signal is mono; both output channels crossfade their own dry input
//! against it.

use tessera_core::{
    AllpassFilter, CombFilter, Effect, NATIVE_SAMPLE_RATE, ParamDescriptor, ParamUnit,
    ParameterInfo, wet_dry_mix,
};

/// Nominal comb lengths, multiplied by [`LENGTH_SCALE`] at 192 kHz.
pub const COMB_LENGTHS: [usize; 4] = [2999, 3407, 3701, 4003];
/// Comb loop gains at decay 1.0.
pub const COMB_FEEDBACK: [f64; 4] = [0.805, 0.827, 0.783, 0.764];
/// Nominal allpass lengths, multiplied by [`LENGTH_SCALE`] at 192 kHz.
pub const ALLPASS_LENGTHS: [usize; 2] = [521, 337];
/// Allpass gain.
pub const ALLPASS_GAIN: f64 = 0.7;
/// Buffer multiplier applied to the nominal lengths.
pub const LENGTH_SCALE: usize = 4;

const DECAY: ParamDescriptor = ParamDescriptor {
    name: "Decay",
    short_name: "Decay",
    unit: ParamUnit::Ratio,
    min: 0.0,
    max: 0.99,
    default: 0.5,
    step: 0.05,
};

const MIX: ParamDescriptor = ParamDescriptor::mix().with_default(0.3);

/// Schroeder reverb.
///
/// ## Parameter Indices (`ParameterInfo`)
///
/// | Index | Name | Range | Default |
/// |-------|------|-------|---------|
/// | 0 | Decay | 0–0.99 | 0.5 |
/// | 1 | Mix | 0–1 | 0.3 |
///
/// # Example
///
/// ```rust
/// use tessera_core::Effect;
/// use tessera_effects::Reverb;
///
/// let mut reverb = Reverb::new(48000.0);
/// reverb.set_decay(0.8);
/// reverb.set_mix(0.4);
///
/// let (l, r) = reverb.process_stereo(1.0, 1.0);
/// assert!(l.is_finite() && r.is_finite());
/// ```
#[derive(Debug, Clone)]
pub struct Reverb {
    combs: [CombFilter; 4],
    allpasses: [AllpassFilter; 2],
    decay: f64,
    mix: f64,
}

impl Default for Reverb {
    fn default() -> Self {
        Self::new(NATIVE_SAMPLE_RATE)
    }
}

impl Reverb {
    /// Create a reverb with decay 0.5 and mix 0.3.
    pub fn new(sample_rate: f64) -> Self {
        let mut reverb = Self {
            combs: build_combs(sample_rate),
            allpasses: build_allpasses(sample_rate),
            decay: DECAY.default,
            mix: MIX.default,
        };
        reverb.update_feedback();
        reverb
    }

    /// Set decay, clamped to [0, 0.99]. Scales every comb's loop gain.
    pub fn set_decay(&mut self, decay: f64) {
        self.decay = DECAY.clamp(decay);
        self.update_feedback();
    }

    /// Decay amount.
    pub fn decay(&self) -> f64 {
        self.decay
    }

    /// Set dry/wet mix, clamped to [0, 1].
    pub fn set_mix(&mut self, mix: f64) {
        self.mix = MIX.clamp(mix);
    }

    /// Dry/wet mix.
    pub fn mix(&self) -> f64 {
        self.mix
    }

    /// Comb loop lengths in samples at the current rate.
    pub fn comb_lengths(&self) -> [usize; 4] {
        core::array::from_fn(|i| self.combs[i].len())
    }

    /// Allpass loop lengths in samples at the current rate.
    pub fn allpass_lengths(&self) -> [usize; 2] {
        core::array::from_fn(|i| self.allpasses[i].len())
    }

    /// Zero every comb and allpass buffer.
    pub fn clear(&mut self) {
        for comb in &mut self.combs {
            comb.clear();
        }
        for ap in &mut self.allpasses {
            ap.clear();
        }
    }

    /// True when no tail remains in any buffer.
    pub fn is_silent(&self) -> bool {
        self.combs.iter().all(CombFilter::is_silent)
            && self.allpasses.iter().all(AllpassFilter::is_silent)
    }

    fn update_feedback(&mut self) {
        for (comb, &base) in self.combs.iter_mut().zip(COMB_FEEDBACK.iter()) {
            comb.set_feedback(base * self.decay);
        }
    }
}

/// Scale a nominal length to `sample_rate`, never below one sample.
fn scaled_len(nominal: usize, sample_rate: f64) -> usize {
    let at_native = (nominal * LENGTH_SCALE) as f64;
    ((at_native * sample_rate / NATIVE_SAMPLE_RATE) as usize).max(1)
}

fn build_combs(sample_rate: f64) -> [CombFilter; 4] {
    COMB_LENGTHS.map(|n| CombFilter::new(scaled_len(n, sample_rate)))
}

fn build_allpasses(sample_rate: f64) -> [AllpassFilter; 2] {
    ALLPASS_LENGTHS.map(|n| AllpassFilter::new(scaled_len(n, sample_rate), ALLPASS_GAIN))
}

impl Effect for Reverb {
    #[inline]
    fn process_stereo(&mut self, left: f64, right: f64) -> (f64, f64) {
        let input = (left + right) * 0.5;

        let mut wet = 0.0;
        for comb in &mut self.combs {
            wet += comb.process(input);
        }
        wet *= 0.25;

        for ap in &mut self.allpasses {
            wet = ap.process(wet);
        }

        (
            wet_dry_mix(left, wet, self.mix),
            wet_dry_mix(right, wet, self.mix),
        )
    }

    fn set_sample_rate(&mut self, sample_rate: f64) {
        self.combs = build_combs(sample_rate);
        self.allpasses = build_allpasses(sample_rate);
        self.update_feedback();
    }

    fn reset(&mut self) {
        self.clear();
    }
}

impl ParameterInfo for Reverb {
    fn param_count(&self) -> usize {
        2
    }

    fn param_info(&self, index: usize) -> Option<ParamDescriptor> {
        match index {
            0 => Some(DECAY),
            1 => Some(MIX),
            _ => None,
        }
    }

    fn get_param(&self, index: usize) -> f64 {
        match index {
            0 => self.decay,
            1 => self.mix,
            _ => 0.0,
        }
    }

    fn set_param(&mut self, index: usize, value: f64) {
        match index {
            0 => self.set_decay(value),
            1 => self.set_mix(value),
            _ => {}
        }
    }
}
