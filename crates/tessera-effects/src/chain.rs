//! The post-voice effects chain.

use tessera_core::{Effect, NATIVE_SAMPLE_RATE, ParamDescriptor, ParameterInfo};

use crate::{Chorus, Delay, Reverb};

/// Number of slots in the chain.
pub const SLOT_COUNT: usize = 3;

/// Slot identifiers in processing order.
pub const SLOT_IDS: [&str; SLOT_COUNT] = ["chorus", "delay", "reverb"];

/// Chorus → Delay → Reverb with a bypass flag per slot.
///
/// Slots are addressed by position: 0 chorus, 1 delay, 2 reverb. Bypassed
/// slots pass audio through untouched and keep their buffers.
///
/// # Example
///
/// ```rust
/// use tessera_core::Effect;
/// use tessera_effects::EffectsChain;
///
/// let mut chain = EffectsChain::new(48000.0);
/// let reverb = chain.find_slot("reverb").unwrap();
/// chain.set_enabled(reverb, false);
///
/// let (l, r) = chain.process_stereo(0.25, 0.25);
/// assert!(l.is_finite() && r.is_finite());
/// ```
#[derive(Debug, Clone)]
pub struct EffectsChain {
    chorus: Chorus,
    delay: Delay,
    reverb: Reverb,
    enabled: [bool; SLOT_COUNT],
}

impl Default for EffectsChain {
    fn default() -> Self {
        Self::new(NATIVE_SAMPLE_RATE)
    }
}

impl EffectsChain {
    /// Create a chain with every slot enabled at its default settings.
    pub fn new(sample_rate: f64) -> Self {
        Self {
            chorus: Chorus::new(sample_rate),
            delay: Delay::new(sample_rate),
            reverb: Reverb::new(sample_rate),
            enabled: [true; SLOT_COUNT],
        }
    }

    /// Slot index for an identifier such as `"delay"`, ignoring ASCII case.
    pub fn find_slot(&self, id: &str) -> Option<usize> {
        SLOT_IDS.iter().position(|s| s.eq_ignore_ascii_case(id))
    }

    /// Enable or bypass a slot. Out-of-range slots are ignored.
    pub fn set_enabled(&mut self, slot: usize, enabled: bool) {
        if let Some(flag) = self.enabled.get_mut(slot) {
            *flag = enabled;
        }
    }

    /// Whether `slot` is processing. Out-of-range slots read as bypassed.
    pub fn is_enabled(&self, slot: usize) -> bool {
        self.enabled.get(slot).copied().unwrap_or(false)
    }

    /// Parameter access for one slot.
    pub fn slot(&self, slot: usize) -> Option<&dyn ParameterInfo> {
        match slot {
            0 => Some(&self.chorus),
            1 => Some(&self.delay),
            2 => Some(&self.reverb),
            _ => None,
        }
    }

    /// Mutable parameter access for one slot.
    pub fn slot_mut(&mut self, slot: usize) -> Option<&mut dyn ParameterInfo> {
        match slot {
            0 => Some(&mut self.chorus),
            1 => Some(&mut self.delay),
            2 => Some(&mut self.reverb),
            _ => None,
        }
    }

    /// Descriptor for parameter `index` of `slot`.
    pub fn param_info(&self, slot: usize, index: usize) -> Option<ParamDescriptor> {
        self.slot(slot).and_then(|fx| fx.param_info(index))
    }

    /// Current value of parameter `index` of `slot`, `0.0` when out of range.
    pub fn get_param(&self, slot: usize, index: usize) -> f64 {
        self.slot(slot).map_or(0.0, |fx| fx.get_param(index))
    }

    /// Set parameter `index` of `slot`; the effect clamps the value.
    pub fn set_param(&mut self, slot: usize, index: usize, value: f64) {
        if let Some(fx) = self.slot_mut(slot) {
            fx.set_param(index, value);
        }
    }

    /// The chorus.
    pub fn chorus(&self) -> &Chorus {
        &self.chorus
    }

    /// The chorus, mutably.
    pub fn chorus_mut(&mut self) -> &mut Chorus {
        &mut self.chorus
    }

    /// The delay.
    pub fn delay(&self) -> &Delay {
        &self.delay
    }

    /// The delay, mutably.
    pub fn delay_mut(&mut self) -> &mut Delay {
        &mut self.delay
    }

    /// The reverb.
    pub fn reverb(&self) -> &Reverb {
        &self.reverb
    }

    /// The reverb, mutably.
    pub fn reverb_mut(&mut self) -> &mut Reverb {
        &mut self.reverb
    }

    /// Zero every effect buffer.
    pub fn clear(&mut self) {
        self.chorus.clear();
        self.delay.clear();
        self.reverb.clear();
    }
}

impl Effect for EffectsChain {
    #[inline]
    fn process_stereo(&mut self, left: f64, right: f64) -> (f64, f64) {
        let mut frame = (left, right);
        if self.enabled[0] {
            frame = self.chorus.process_stereo(frame.0, frame.1);
        }
        if self.enabled[1] {
            frame = self.delay.process_stereo(frame.0, frame.1);
        }
        if self.enabled[2] {
            frame = self.reverb.process_stereo(frame.0, frame.1);
        }
        frame
    }

    fn set_sample_rate(&mut self, sample_rate: f64) {
        self.chorus.set_sample_rate(sample_rate);
        self.delay.set_sample_rate(sample_rate);
        self.reverb.set_sample_rate(sample_rate);
    }

    fn reset(&mut self) {
        self.chorus.reset();
        self.delay.reset();
        self.reverb.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_bypassed_is_identity() {
        let mut chain = EffectsChain::new(48000.0);
        for slot in 0..SLOT_COUNT {
            chain.set_enabled(slot, false);
        }
        assert_eq!(chain.process_stereo(0.3, -0.7), (0.3, -0.7));
    }

    #[test]
    fn test_slot_lookup() {
        let chain = EffectsChain::new(48000.0);
        assert_eq!(chain.find_slot("Chorus"), Some(0));
        assert_eq!(chain.find_slot("reverb"), Some(2));
        assert_eq!(chain.find_slot("flanger"), None);
        assert!(chain.slot(3).is_none());
        assert!(!chain.is_enabled(3));
    }

    #[test]
    fn test_set_param_routes_to_slot() {
        let mut chain = EffectsChain::new(48000.0);
        chain.set_param(1, 0, 250.0);
        assert_eq!(chain.delay().time_ms(), 250.0);
        chain.set_param(2, 1, 0.0);
        assert_eq!(chain.reverb().mix(), 0.0);
        chain.set_param(7, 0, 1.0);
        assert_eq!(chain.get_param(7, 0), 0.0);
        assert_eq!(chain.param_info(0, 0).map(|d| d.name), Some("Rate"));
    }
}
