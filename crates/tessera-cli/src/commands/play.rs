//! Interactive keyboard player.

use std::io::{self, Stdout, Write};
use std::panic;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::{Duration, Instant};

use anyhow::Context;
use clap::Args;
use crossterm::event::{self, Event, KeyEventKind};
use crossterm::style::Print;
use crossterm::terminal::{
    Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode,
    enable_raw_mode,
};
use crossterm::{cursor, execute, queue};
use tessera_io::{
    BackendStreamConfig, CONTROL_QUEUE_CAPACITY, ControlSender, CpalBackend, ErrorCallback,
    Renderer, control_channel, open_with_fallback,
};
use tessera_synth::Command;

use super::settings::SettingsArgs;
use crate::keyboard::{self, NoteTracker};
use crate::mirror::{Outcome, ParamMirror};

/// Key polling interval; also the granularity of auto note-off.
const POLL_INTERVAL: Duration = Duration::from_millis(20);

#[derive(Args)]
pub struct PlayArgs {
    #[command(flatten)]
    settings: SettingsArgs,
}

pub fn run(args: PlayArgs) -> anyhow::Result<()> {
    let settings = args.settings.resolve()?;
    let startup = settings.startup_commands()?;

    let (tx, rx) = control_channel(CONTROL_QUEUE_CAPACITY);
    let stream_errors = Arc::new(AtomicU64::new(0));

    let backend = CpalBackend::new();
    let base = BackendStreamConfig {
        buffer_size: settings.audio.buffer_size,
        device_name: settings.audio.device.clone(),
        ..BackendStreamConfig::default()
    };
    let seed = settings.engine.seed;
    let opened = open_with_fallback(&backend, &base, &settings.audio.sample_rates, |rate| {
        let mut renderer: Renderer = Renderer::new(f64::from(rate), seed, rx.clone());
        for &command in &startup {
            renderer.apply(command);
        }
        let errors = Arc::clone(&stream_errors);
        let on_error: ErrorCallback = Box::new(move |message: &str| {
            errors.fetch_add(1, Ordering::Relaxed);
            tracing::warn!(error = message, "audio stream error");
        });
        (renderer.into_callback(), on_error)
    })
    .context("failed to open audio output")?;
    drop(rx);

    tracing::info!(
        sample_rate = opened.sample_rate,
        preset = settings.engine.preset,
        "player started"
    );

    let running = Arc::new(AtomicBool::new(true));
    let r = Arc::clone(&running);
    ctrlc::set_handler(move || {
        r.store(false, Ordering::SeqCst);
    })?;

    let mut player = Player {
        mirror: ParamMirror::new(settings.engine.preset, settings.keyboard.octave),
        tracker: NoteTracker::new(
            settings.keyboard.velocity,
            Duration::from_millis(settings.keyboard.auto_note_off_ms),
        ),
        tx,
        status: String::new(),
        sample_rate: opened.sample_rate,
    };
    player.status = format!("Preset: {}", player.mirror.preset_name());

    let mut screen = Screen::enter()?;
    screen.draw(&player.lines(stream_errors.load(Ordering::Relaxed)))?;

    while running.load(Ordering::SeqCst) {
        let mut dirty = false;
        if event::poll(POLL_INTERVAL)?
            && let Event::Key(key) = event::read()?
            && key.kind == KeyEventKind::Press
            && let Some(action) = keyboard::action_for_key(&key)
        {
            let outcome = player.mirror.apply(action);
            if !player.handle(outcome) {
                break;
            }
            dirty = true;
        }
        if let Some(off) = player.tracker.tick(Instant::now()) {
            player.tx.send(off);
        }
        if dirty {
            screen.draw(&player.lines(stream_errors.load(Ordering::Relaxed)))?;
        }
    }

    drop(screen);
    player.tx.send(Command::AllNotesOff);
    tracing::info!(
        dropped_commands = player.tx.dropped(),
        stream_errors = stream_errors.load(Ordering::Relaxed),
        "player stopped"
    );
    drop(opened);
    Ok(())
}

/// Control-thread state of the player.
struct Player {
    mirror: ParamMirror,
    tracker: NoteTracker,
    tx: ControlSender,
    status: String,
    sample_rate: u32,
}

impl Player {
    /// Act on a mirror outcome. Returns `false` when the player should stop.
    fn handle(&mut self, outcome: Outcome) -> bool {
        match outcome {
            Outcome::Play(note) => {
                for command in self.tracker.press(note, Instant::now()) {
                    self.tx.send(command);
                }
                self.status = format!("Note: {note}");
            }
            Outcome::Send(commands, status) => {
                for command in commands {
                    self.tx.send(command);
                }
                self.status = status;
            }
            Outcome::Status(status) => self.status = status,
            Outcome::AllOff => {
                self.tx.send(Command::AllNotesOff);
                self.tracker.clear();
                self.status = "All notes off".to_string();
            }
            Outcome::Quit => return false,
        }
        true
    }

    fn lines(&self, stream_errors: u64) -> Vec<String> {
        let m = &self.mirror;
        let mix = &m.wave_mix;
        let env = &m.amp_env;
        let on = |w: f64| if w > 0.5 { '*' } else { '.' };
        let mut lines = vec![
            format!("tessera  {} Hz", self.sample_rate),
            String::new(),
            format!("Preset  [{}] {}", m.preset, m.preset_name()),
            format!("Octave  {}", m.octave),
            format!(
                "Wave    sine {}  tri {}  saw {}  square {}  noise {}",
                on(mix.sine),
                on(mix.triangle),
                on(mix.sawtooth),
                on(mix.square),
                on(mix.noise)
            ),
            format!("Filter  {:.0} Hz  res {:.2}", m.cutoff, m.resonance),
            format!(
                "Amp     A {:.0} ms  D {:.0} ms  S {:.0}%  R {:.0} ms",
                env.attack * 1000.0,
                env.decay * 1000.0,
                env.sustain * 100.0,
                env.release * 1000.0
            ),
            String::new(),
            format!("> {}", self.status),
            String::new(),
            "q2w3er5t6y7ui notes   z/x octave   ,/. preset   asdfg waves".to_string(),
            "[ ] cutoff   - = resonance   ! @ attack   # $ decay   % ^ sustain   & * release"
                .to_string(),
            "space all notes off   esc quit".to_string(),
        ];
        let dropped = self.tx.dropped();
        if dropped > 0 || stream_errors > 0 {
            lines.push(String::new());
            lines.push(format!(
                "dropped commands {dropped}   stream errors {stream_errors}"
            ));
        }
        lines
    }
}

/// Raw-mode alternate screen, restored on drop and on panic.
struct Screen {
    out: Stdout,
}

impl Screen {
    fn enter() -> io::Result<Self> {
        enable_raw_mode()?;
        let mut out = io::stdout();
        execute!(out, EnterAlternateScreen, cursor::Hide)?;

        let previous_hook = panic::take_hook();
        panic::set_hook(Box::new(move |info| {
            restore_terminal();
            previous_hook(info);
        }));

        Ok(Self { out })
    }

    fn draw(&mut self, lines: &[String]) -> io::Result<()> {
        queue!(self.out, Clear(ClearType::All))?;
        for (row, line) in lines.iter().enumerate() {
            queue!(self.out, cursor::MoveTo(0, row as u16), Print(line))?;
        }
        self.out.flush()
    }
}

impl Drop for Screen {
    fn drop(&mut self) {
        restore_terminal();
    }
}

fn restore_terminal() {
    let _ = execute!(io::stdout(), cursor::Show, LeaveAlternateScreen);
    let _ = disable_raw_mode();
}
