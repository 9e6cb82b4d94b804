//! Chamberlin state-variable filter.
//!
//! A 2-pole (12 dB/oct) multimode filter producing lowpass, highpass,
//! bandpass and notch from one set of integrators.
//!
//! # Topology
//!
//! Each sample runs the classic Chamberlin update twice with the same input:
//!
//! ```text
//! lowpass  += f × bandpass
//! highpass  = input − lowpass − q × bandpass
//! bandpass += f × highpass
//! notch     = highpass + lowpass
//! ```
//!
//! with `f = 2 sin(π fc / sr)` and `q = 2 − 2 × resonance`.
//!
//! # Stability
//!
//! The doubled update is stable while `f² + 2fq < 4`. At 192 kHz with cutoffs
//! up to 20 kHz the bound is never approached. At lower sample rates `f` is
//! limited to 98% of the bound so high cutoffs cannot blow up.
//!
//! # Drive
//!
//! Drive > 0 feeds the input through [`rational_clip`] after a
//! `1 + 3 × drive` gain. Drive > 0.5 also clips the selected output.

use core::f64::consts::PI;
use libm::{sin, sqrt};

use crate::rational_clip;

/// Which output [`StateVariableFilter::process`] returns.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FilterMode {
    /// Low-pass.
    #[default]
    Lowpass,
    /// High-pass.
    Highpass,
    /// Band-pass.
    Bandpass,
    /// Notch (band-reject).
    Notch,
}

impl FilterMode {
    /// All modes in display order.
    pub const ALL: [FilterMode; 4] = [
        FilterMode::Lowpass,
        FilterMode::Highpass,
        FilterMode::Bandpass,
        FilterMode::Notch,
    ];

    /// Short display name.
    pub fn name(self) -> &'static str {
        match self {
            FilterMode::Lowpass => "LP",
            FilterMode::Highpass => "HP",
            FilterMode::Bandpass => "BP",
            FilterMode::Notch => "Notch",
        }
    }
}

/// Chamberlin state-variable filter with drive.
///
/// ## Parameters
///
/// - `cutoff`: 20 Hz to 0.9 × Nyquist (default 1000)
/// - `resonance`: 0.0 to 0.99 (default 0.0)
/// - `drive`: 0.0 to 1.0 (default 0.0)
/// - `mode`: output selected by [`process`](Self::process) (default lowpass)
///
/// # Example
///
/// ```rust
/// use tessera_core::{FilterMode, StateVariableFilter};
///
/// let mut svf = StateVariableFilter::new(192000.0);
/// svf.set_cutoff(2000.0);
/// svf.set_resonance(0.3);
/// svf.set_mode(FilterMode::Lowpass);
///
/// let out = svf.process(0.5);
/// let (lp, hp, bp, notch) = svf.process_all(0.5);
/// # let _ = (out, lp, hp, bp, notch);
/// ```
#[derive(Debug, Clone)]
pub struct StateVariableFilter {
    cutoff: f64,
    resonance: f64,
    drive: f64,
    mode: FilterMode,
    sample_rate: f64,

    lowpass: f64,
    highpass: f64,
    bandpass: f64,
    notch: f64,

    f: f64,
    q: f64,
}

impl StateVariableFilter {
    /// Create a filter at 1 kHz, no resonance, no drive.
    pub fn new(sample_rate: f64) -> Self {
        let mut svf = Self {
            cutoff: 1000.0,
            resonance: 0.0,
            drive: 0.0,
            mode: FilterMode::Lowpass,
            sample_rate,
            lowpass: 0.0,
            highpass: 0.0,
            bandpass: 0.0,
            notch: 0.0,
            f: 0.0,
            q: 2.0,
        };
        svf.update_coefficients();
        svf
    }

    /// Set cutoff in Hz, clamped to [20, 0.9 × Nyquist].
    pub fn set_cutoff(&mut self, freq: f64) {
        self.cutoff = freq.clamp(20.0, self.sample_rate * 0.5 * 0.9);
        self.update_coefficients();
    }

    /// Current cutoff in Hz.
    pub fn cutoff(&self) -> f64 {
        self.cutoff
    }

    /// Set resonance, clamped to [0, 0.99].
    pub fn set_resonance(&mut self, res: f64) {
        self.resonance = res.clamp(0.0, 0.99);
        self.update_coefficients();
    }

    /// Current resonance.
    pub fn resonance(&self) -> f64 {
        self.resonance
    }

    /// Set drive, clamped to [0, 1].
    pub fn set_drive(&mut self, drive: f64) {
        self.drive = drive.clamp(0.0, 1.0);
    }

    /// Current drive.
    pub fn drive(&self) -> f64 {
        self.drive
    }

    /// Select the output returned by [`process`](Self::process).
    pub fn set_mode(&mut self, mode: FilterMode) {
        self.mode = mode;
    }

    /// Current output mode.
    pub fn mode(&self) -> FilterMode {
        self.mode
    }

    /// Update the sample rate and recompute coefficients.
    pub fn set_sample_rate(&mut self, sample_rate: f64) {
        self.sample_rate = sample_rate;
        self.set_cutoff(self.cutoff);
    }

    /// Integration coefficient `f` currently in use.
    pub fn frequency_coefficient(&self) -> f64 {
        self.f
    }

    /// Damping coefficient `q = 2 − 2 × resonance`.
    pub fn damping_coefficient(&self) -> f64 {
        self.q
    }

    /// Filter one sample and return the output selected by the mode.
    #[inline]
    pub fn process(&mut self, input: f64) -> f64 {
        self.integrate(input);

        let output = match self.mode {
            FilterMode::Lowpass => self.lowpass,
            FilterMode::Highpass => self.highpass,
            FilterMode::Bandpass => self.bandpass,
            FilterMode::Notch => self.notch,
        };

        if self.drive > 0.5 {
            rational_clip(output)
        } else {
            output
        }
    }

    /// Filter one sample and return `(lowpass, highpass, bandpass, notch)`.
    ///
    /// The post-filter clip is not applied to these outputs.
    #[inline]
    pub fn process_all(&mut self, input: f64) -> (f64, f64, f64, f64) {
        self.integrate(input);
        (self.lowpass, self.highpass, self.bandpass, self.notch)
    }

    /// Zero all integrator state.
    pub fn reset(&mut self) {
        self.lowpass = 0.0;
        self.highpass = 0.0;
        self.bandpass = 0.0;
        self.notch = 0.0;
    }

    #[inline]
    fn integrate(&mut self, input: f64) {
        let input = if self.drive > 0.0 {
            rational_clip(input * (1.0 + self.drive * 3.0))
        } else {
            input
        };

        for _ in 0..2 {
            self.lowpass += self.f * self.bandpass;
            self.highpass = input - self.lowpass - self.q * self.bandpass;
            self.bandpass += self.f * self.highpass;
            self.notch = self.highpass + self.lowpass;
        }
    }

    fn update_coefficients(&mut self) {
        self.q = 2.0 - 2.0 * self.resonance;
        let f = 2.0 * sin(PI * self.cutoff / self.sample_rate);
        let limit = 0.98 * (sqrt(self.q * self.q + 4.0) - self.q);
        self.f = f.min(limit);
    }
}
