//! Parameter introspection for name-addressable effect controls.
//!
//! Effects expose their parameters by index through [`ParameterInfo`]. The
//! CLI uses this to apply settings by name and to print parameter tables;
//! the audio thread uses it to apply queued `SetEffectParam` commands.
//!
//! # Example
//!
//! ```rust
//! use tessera_core::{ParamDescriptor, ParameterInfo};
//!
//! struct Level {
//!     level: f64,
//! }
//!
//! impl ParameterInfo for Level {
//!     fn param_count(&self) -> usize { 1 }
//!
//!     fn param_info(&self, index: usize) -> Option<ParamDescriptor> {
//!         match index {
//!             0 => Some(ParamDescriptor::mix()),
//!             _ => None,
//!         }
//!     }
//!
//!     fn get_param(&self, index: usize) -> f64 {
//!         match index {
//!             0 => self.level,
//!             _ => 0.0,
//!         }
//!     }
//!
//!     fn set_param(&mut self, index: usize, value: f64) {
//!         if index == 0 {
//!             self.level = ParamDescriptor::mix().clamp(value);
//!         }
//!     }
//! }
//!
//! let mut lvl = Level { level: 0.0 };
//! let idx = lvl.find_param_by_name("mix").unwrap();
//! lvl.set_param(idx, 2.0);
//! assert_eq!(lvl.get_param(idx), 1.0);
//! ```

use core::fmt;

/// Display unit for a parameter value.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ParamUnit {
    /// Unitless.
    #[default]
    None,
    /// Hertz.
    Hertz,
    /// Milliseconds.
    Milliseconds,
    /// Seconds.
    Seconds,
    /// Fraction in [0, 1], displayed as-is.
    Ratio,
}

impl ParamUnit {
    /// Suffix for formatted values.
    pub fn suffix(self) -> &'static str {
        match self {
            ParamUnit::None | ParamUnit::Ratio => "",
            ParamUnit::Hertz => " Hz",
            ParamUnit::Milliseconds => " ms",
            ParamUnit::Seconds => " s",
        }
    }
}

impl fmt::Display for ParamUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.suffix().trim_start())
    }
}

/// Describes one parameter: name, unit and valid range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParamDescriptor {
    /// Full name, e.g. "Feedback".
    pub name: &'static str,
    /// Short name for narrow displays, at most 8 characters.
    pub short_name: &'static str,
    /// Display unit.
    pub unit: ParamUnit,
    /// Minimum value.
    pub min: f64,
    /// Maximum value.
    pub max: f64,
    /// Value after construction.
    pub default: f64,
    /// Suggested nudge step.
    pub step: f64,
}

impl ParamDescriptor {
    /// Dry/wet mix in [0, 1], default 0.5.
    pub const fn mix() -> Self {
        Self {
            name: "Mix",
            short_name: "Mix",
            unit: ParamUnit::Ratio,
            min: 0.0,
            max: 1.0,
            default: 0.5,
            step: 0.05,
        }
    }

    /// Modulation depth in [0, 1], default 0.5.
    pub const fn depth() -> Self {
        Self {
            name: "Depth",
            short_name: "Depth",
            unit: ParamUnit::Ratio,
            min: 0.0,
            max: 1.0,
            default: 0.5,
            step: 0.05,
        }
    }

    /// Time parameter in milliseconds.
    pub const fn time_ms(
        name: &'static str,
        short_name: &'static str,
        min: f64,
        max: f64,
        default: f64,
    ) -> Self {
        Self {
            name,
            short_name,
            unit: ParamUnit::Milliseconds,
            min,
            max,
            default,
            step: 1.0,
        }
    }

    /// Replace the default value.
    pub const fn with_default(mut self, default: f64) -> Self {
        self.default = default;
        self
    }

    /// Clamp `value` into `[min, max]`.
    #[inline]
    pub fn clamp(&self, value: f64) -> f64 {
        value.clamp(self.min, self.max)
    }
}

/// Index-based parameter access.
///
/// Indices are stable for the lifetime of the implementor. Out-of-range
/// indices are ignored by `set_param` and read as `0.0`.
pub trait ParameterInfo {
    /// Number of parameters; valid indices are `0..param_count()`.
    fn param_count(&self) -> usize;

    /// Descriptor for `index`, `None` when out of range.
    fn param_info(&self, index: usize) -> Option<ParamDescriptor>;

    /// Current value of the parameter at `index`.
    fn get_param(&self, index: usize) -> f64;

    /// Set the parameter at `index`; implementations clamp to the valid range.
    fn set_param(&mut self, index: usize, value: f64);

    /// Find a parameter index by full or short name, ignoring ASCII case.
    fn find_param_by_name(&self, name: &str) -> Option<usize> {
        (0..self.param_count()).find(|&i| {
            self.param_info(i).is_some_and(|d| {
                d.name.eq_ignore_ascii_case(name) || d.short_name.eq_ignore_ascii_case(name)
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Two {
        a: f64,
        b: f64,
    }

    impl ParameterInfo for Two {
        fn param_count(&self) -> usize {
            2
        }

        fn param_info(&self, index: usize) -> Option<ParamDescriptor> {
            match index {
                0 => Some(ParamDescriptor::time_ms("Delay Time", "Time", 1.0, 2000.0, 500.0)),
                1 => Some(ParamDescriptor::mix()),
                _ => None,
            }
        }

        fn get_param(&self, index: usize) -> f64 {
            match index {
                0 => self.a,
                1 => self.b,
                _ => 0.0,
            }
        }

        fn set_param(&mut self, index: usize, value: f64) {
            if let Some(desc) = self.param_info(index) {
                let v = desc.clamp(value);
                match index {
                    0 => self.a = v,
                    _ => self.b = v,
                }
            }
        }
    }

    #[test]
    fn test_find_by_full_and_short_name() {
        let t = Two { a: 0.0, b: 0.0 };
        assert_eq!(t.find_param_by_name("delay time"), Some(0));
        assert_eq!(t.find_param_by_name("TIME"), Some(0));
        assert_eq!(t.find_param_by_name("mix"), Some(1));
        assert_eq!(t.find_param_by_name("bogus"), None);
    }

    #[test]
    fn test_set_param_clamps_and_ignores_out_of_range() {
        let mut t = Two { a: 0.0, b: 0.0 };
        t.set_param(0, 99_999.0);
        t.set_param(1, -1.0);
        t.set_param(7, 3.0);
        assert_eq!(t.get_param(0), 2000.0);
        assert_eq!(t.get_param(1), 0.0);
        assert_eq!(t.get_param(7), 0.0);
    }

    #[test]
    fn test_unit_suffix() {
        assert_eq!(ParamUnit::Hertz.suffix(), " Hz");
        assert_eq!(ParamUnit::Ratio.suffix(), "");
    }
}
