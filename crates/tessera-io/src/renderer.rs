//! Audio-thread renderer: engine → effects chain → interleaved `f32`.

use tessera_core::Effect;
use tessera_effects::EffectsChain;
use tessera_synth::{Command, DEFAULT_VOICES, SynthEngine};

use crate::backend::OutputCallback;
use crate::control::ControlReceiver;

/// Owns everything the audio callback touches.
///
/// Each call to [`fill_interleaved`](Self::fill_interleaved) first drains the
/// command queue, then renders one frame per channel group: the engine's mono
/// sum goes through the effects chain and the stereo result is converted to
/// `f32`. A one-channel sink gets the average of left and right; channels
/// beyond the second are silent.
///
/// # Example
///
/// ```rust
/// use tessera_io::{Renderer, control_channel};
/// use tessera_synth::Command;
///
/// let (tx, rx) = control_channel(16);
/// let mut renderer: Renderer = Renderer::new(48000.0, 7, rx);
///
/// tx.send(Command::NoteOn { note: 60, velocity: 0.8 });
/// let mut block = vec![0.0f32; 1024];
/// renderer.fill_interleaved(&mut block);
/// assert_eq!(renderer.engine().active_voice_count(), 1);
/// ```
pub struct Renderer<const N: usize = DEFAULT_VOICES> {
    engine: SynthEngine<N>,
    effects: EffectsChain,
    commands: ControlReceiver,
    channels: usize,
}

impl<const N: usize> Renderer<N> {
    /// Create a stereo renderer at `sample_rate` with a seeded engine.
    pub fn new(sample_rate: f64, seed: u32, commands: ControlReceiver) -> Self {
        Self {
            engine: SynthEngine::with_seed(sample_rate, seed),
            effects: EffectsChain::new(sample_rate),
            commands,
            channels: 2,
        }
    }

    /// Set the interleaved channel count (at least one).
    pub fn with_channels(mut self, channels: u16) -> Self {
        self.channels = usize::from(channels.max(1));
        self
    }

    /// Interleaved channel count.
    pub fn channels(&self) -> usize {
        self.channels
    }

    /// Engine sample rate.
    pub fn sample_rate(&self) -> f64 {
        self.engine.sample_rate()
    }

    /// The synth engine.
    pub fn engine(&self) -> &SynthEngine<N> {
        &self.engine
    }

    /// The synth engine, mutably.
    pub fn engine_mut(&mut self) -> &mut SynthEngine<N> {
        &mut self.engine
    }

    /// The effects chain.
    pub fn effects(&self) -> &EffectsChain {
        &self.effects
    }

    /// The effects chain, mutably.
    pub fn effects_mut(&mut self) -> &mut EffectsChain {
        &mut self.effects
    }

    /// Apply one command immediately, bypassing the queue.
    pub fn apply(&mut self, command: Command) {
        dispatch(&mut self.engine, &mut self.effects, command);
    }

    /// Drain pending commands, then fill `out` with interleaved samples.
    ///
    /// Every slot in `out` is written. A trailing partial frame receives the
    /// leading channels of one more rendered frame.
    pub fn fill_interleaved(&mut self, out: &mut [f32]) {
        let Self {
            engine,
            effects,
            commands,
            channels,
        } = self;
        commands.drain(|cmd| dispatch(engine, effects, cmd));

        for frame in out.chunks_mut(*channels) {
            let (l, r) = engine.process_stereo();
            let (l, r) = effects.process_stereo(l, r);
            if *channels == 1 {
                frame[0] = ((l + r) * 0.5) as f32;
                continue;
            }
            for (ch, sample) in frame.iter_mut().enumerate() {
                *sample = match ch {
                    0 => l as f32,
                    1 => r as f32,
                    _ => 0.0,
                };
            }
        }
    }

    /// Move the renderer into a boxed output callback.
    pub fn into_callback(mut self) -> OutputCallback
    where
        Self: Send + 'static,
    {
        Box::new(move |out: &mut [f32]| self.fill_interleaved(out))
    }
}

fn dispatch<const N: usize>(
    engine: &mut SynthEngine<N>,
    effects: &mut EffectsChain,
    command: Command,
) {
    match command {
        Command::SetEffectParam { slot, index, value } => {
            effects.set_param(slot.index(), index, value);
        }
        Command::SetEffectEnabled { slot, enabled } => {
            effects.set_enabled(slot.index(), enabled);
        }
        Command::ClearEffects => effects.clear(),
        other => engine.apply(other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::control::control_channel;
    use tessera_synth::EffectSlot;

    const SR: f64 = 48000.0;

    fn renderer() -> (crate::ControlSender, Renderer) {
        let (tx, rx) = control_channel(64);
        (tx, Renderer::new(SR, 1, rx))
    }

    #[test]
    fn test_silent_without_notes() {
        let (_tx, mut r) = renderer();
        let mut out = vec![1.0f32; 512];
        r.fill_interleaved(&mut out);
        assert!(out.iter().all(|&s| s == 0.0));
    }

    #[test]
    fn test_effect_commands_reach_chain() {
        let (tx, mut r) = renderer();
        tx.send(Command::SetEffectParam {
            slot: EffectSlot::Delay,
            index: 0,
            value: 120.0,
        });
        tx.send(Command::SetEffectEnabled {
            slot: EffectSlot::Reverb,
            enabled: false,
        });
        r.fill_interleaved(&mut [0.0; 2]);
        assert_eq!(r.effects().delay().time_ms(), 120.0);
        assert!(!r.effects().is_enabled(2));
        assert!(r.effects().is_enabled(0));
    }

    #[test]
    fn test_commands_apply_before_block() {
        let (tx, mut r) = renderer();
        tx.send(Command::NoteOn {
            note: 69,
            velocity: 1.0,
        });
        let mut out = vec![0.0f32; 2048];
        r.fill_interleaved(&mut out);
        assert!(out.iter().any(|&s| s != 0.0));
    }

    #[test]
    fn test_mono_and_wide_layouts() {
        let (_tx, rx) = control_channel(4);
        let mut mono: Renderer = Renderer::new(SR, 1, rx).with_channels(1);
        mono.apply(Command::NoteOn {
            note: 60,
            velocity: 1.0,
        });
        let mut out = vec![0.0f32; 1000];
        mono.fill_interleaved(&mut out);
        assert!(out.iter().any(|&s| s != 0.0));

        let (_tx, rx) = control_channel(4);
        let mut quad: Renderer = Renderer::new(SR, 1, rx).with_channels(4);
        quad.apply(Command::NoteOn {
            note: 60,
            velocity: 1.0,
        });
        let mut out = vec![0.0f32; 4000];
        quad.fill_interleaved(&mut out);
        assert!(out.chunks(4).all(|f| f[2] == 0.0 && f[3] == 0.0));
        assert!(out.chunks(4).any(|f| f[0] != 0.0));
    }

    #[test]
    fn test_zero_channels_treated_as_mono() {
        let (_tx, rx) = control_channel(1);
        let r: Renderer = Renderer::new(SR, 0, rx).with_channels(0);
        assert_eq!(r.channels(), 1);
    }
}
