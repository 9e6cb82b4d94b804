//! QWERTY key mapping for the interactive player.
//!
//! Everything here is pure so it can be tested without a terminal:
//! [`action_for_key`] turns a key into an [`Action`], the `nudge` functions
//! implement the step-and-clamp rules for each knob, and [`NoteTracker`]
//! handles the one-note-at-a-time gating with auto release.
//!
//! ```text
//!  2 3   5 6 7        black keys
//! q w e r t y u i     C D E F G A B C'
//! z/x octave   ,/. preset   a s d f g wave toggles
//! [ ] cutoff   - = resonance
//! ! @ attack   # $ decay   % ^ sustain   & * release
//! space all notes off   esc quit
//! ```

use std::time::{Duration, Instant};

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tessera_synth::{Command, Waveform};

/// Lowest selectable octave.
pub const MIN_OCTAVE: u8 = 1;
/// Highest selectable octave.
pub const MAX_OCTAVE: u8 = 7;

/// Something a key press asks the player to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Play the key at this semitone offset from C of the current octave.
    Note(u8),
    /// One octave down.
    OctaveDown,
    /// One octave up.
    OctaveUp,
    /// Previous factory preset, wrapping.
    PrevPreset,
    /// Next factory preset, wrapping.
    NextPreset,
    /// Toggle one wave-mix weight between 0 and 1.
    ToggleWave(Waveform),
    /// Cutoff ×0.8.
    CutoffDown,
    /// Cutoff ×1.25.
    CutoffUp,
    /// Resonance −0.1.
    ResonanceDown,
    /// Resonance +0.1.
    ResonanceUp,
    /// Attack ×0.7.
    AttackDown,
    /// Attack ×1.4.
    AttackUp,
    /// Decay ×0.7.
    DecayDown,
    /// Decay ×1.4.
    DecayUp,
    /// Sustain −0.1.
    SustainDown,
    /// Sustain +0.1.
    SustainUp,
    /// Release ×0.7.
    ReleaseDown,
    /// Release ×1.4.
    ReleaseUp,
    /// Release every voice.
    AllNotesOff,
    /// Leave the player.
    Quit,
}

/// Map a character to an action.
pub fn action_for_char(c: char) -> Option<Action> {
    let action = match c.to_ascii_lowercase() {
        'q' => Action::Note(0),
        '2' => Action::Note(1),
        'w' => Action::Note(2),
        '3' => Action::Note(3),
        'e' => Action::Note(4),
        'r' => Action::Note(5),
        '5' => Action::Note(6),
        't' => Action::Note(7),
        '6' => Action::Note(8),
        'y' => Action::Note(9),
        '7' => Action::Note(10),
        'u' => Action::Note(11),
        'i' => Action::Note(12),
        'z' => Action::OctaveDown,
        'x' => Action::OctaveUp,
        ',' | '<' => Action::PrevPreset,
        '.' | '>' => Action::NextPreset,
        'a' => Action::ToggleWave(Waveform::Sine),
        's' => Action::ToggleWave(Waveform::Triangle),
        'd' => Action::ToggleWave(Waveform::Saw),
        'f' => Action::ToggleWave(Waveform::Square),
        'g' => Action::ToggleWave(Waveform::Noise),
        '[' => Action::CutoffDown,
        ']' => Action::CutoffUp,
        '-' => Action::ResonanceDown,
        '=' => Action::ResonanceUp,
        '!' => Action::AttackDown,
        '@' => Action::AttackUp,
        '#' => Action::DecayDown,
        '$' => Action::DecayUp,
        '%' => Action::SustainDown,
        '^' => Action::SustainUp,
        '&' => Action::ReleaseDown,
        '*' => Action::ReleaseUp,
        ' ' => Action::AllNotesOff,
        _ => return None,
    };
    Some(action)
}

/// Map a terminal key event to an action. Ctrl-C quits, since raw mode
/// swallows the signal.
pub fn action_for_key(event: &KeyEvent) -> Option<Action> {
    match event.code {
        KeyCode::Esc => Some(Action::Quit),
        KeyCode::Char('c') if event.modifiers.contains(KeyModifiers::CONTROL) => {
            Some(Action::Quit)
        }
        KeyCode::Char(c) => action_for_char(c),
        _ => None,
    }
}

/// MIDI note for a key offset at `octave`: `12 × octave + offset`.
pub fn note_for(octave: u8, offset: u8) -> u8 {
    12 * octave + offset
}

/// Octave after a step, kept in [1, 7].
pub fn step_octave(octave: u8, up: bool) -> u8 {
    if up {
        (octave + 1).min(MAX_OCTAVE)
    } else {
        octave.saturating_sub(1).max(MIN_OCTAVE)
    }
}

/// Cutoff nudge: ×0.8 down to a 100 Hz floor, ×1.25 up to a 15 kHz cap.
pub fn nudge_cutoff(hz: f64, up: bool) -> f64 {
    if up {
        if hz < 15000.0 { hz * 1.25 } else { 15000.0 }
    } else if hz > 100.0 {
        hz * 0.8
    } else {
        100.0
    }
}

/// Resonance nudge: −0.1 with a floor at 0, +0.1 with a cap at 0.95.
pub fn nudge_resonance(res: f64, up: bool) -> f64 {
    if up {
        if res < 0.9 { res + 0.1 } else { 0.95 }
    } else if res > 0.1 {
        res - 0.1
    } else {
        0.0
    }
}

/// Attack or decay nudge: ×0.7 down to 1 ms, ×1.4 up to 2 s.
pub fn nudge_attack_decay(seconds: f64, up: bool) -> f64 {
    if up {
        if seconds < 1.5 { seconds * 1.4 } else { 2.0 }
    } else if seconds > 0.01 {
        seconds * 0.7
    } else {
        0.001
    }
}

/// Sustain nudge: ∓0.1 within [0, 1].
pub fn nudge_sustain(level: f64, up: bool) -> f64 {
    if up {
        if level < 0.9 { level + 0.1 } else { 1.0 }
    } else if level > 0.1 {
        level - 0.1
    } else {
        0.0
    }
}

/// Release nudge: ×0.7 down to 10 ms, ×1.4 up to 3 s.
pub fn nudge_release(seconds: f64, up: bool) -> f64 {
    if up {
        if seconds < 2.5 { seconds * 1.4 } else { 3.0 }
    } else if seconds > 0.05 {
        seconds * 0.7
    } else {
        0.01
    }
}

/// Wave toggle: a weight above one half turns off, anything else turns on.
pub fn toggle_weight(weight: f64) -> f64 {
    if weight > 0.5 { 0.0 } else { 1.0 }
}

/// Gates keyboard notes one at a time.
///
/// A new note releases the previous one first. A note still held after the
/// auto-release time is released by [`tick`](Self::tick).
#[derive(Debug, Clone)]
pub struct NoteTracker {
    current: Option<(u8, Instant)>,
    velocity: f64,
    auto_off: Duration,
}

impl NoteTracker {
    /// Tracker sending `velocity` and releasing after `auto_off`.
    pub fn new(velocity: f64, auto_off: Duration) -> Self {
        Self {
            current: None,
            velocity: velocity.clamp(0.0, 1.0),
            auto_off,
        }
    }

    /// Commands for pressing `note` at `now`.
    pub fn press(&mut self, note: u8, now: Instant) -> Vec<Command> {
        let mut commands = Vec::with_capacity(2);
        if let Some((prev, _)) = self.current.take() {
            commands.push(Command::NoteOff { note: prev });
        }
        commands.push(Command::NoteOn {
            note,
            velocity: self.velocity,
        });
        self.current = Some((note, now));
        commands
    }

    /// Release the held note once it is older than the auto-release time.
    pub fn tick(&mut self, now: Instant) -> Option<Command> {
        let (note, started) = self.current?;
        if now.saturating_duration_since(started) > self.auto_off {
            self.current = None;
            Some(Command::NoteOff { note })
        } else {
            None
        }
    }

    /// Forget the held note without releasing it (after all-notes-off).
    pub fn clear(&mut self) {
        self.current = None;
    }

    /// The held note, if any.
    pub fn current(&self) -> Option<u8> {
        self.current.map(|(n, _)| n)
    }
}
