use clap::{error::ErrorKind, CommandFactory, Parser};
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use pomo::{
    app,
    app_dirs::AppDirs,
    audio::{self, BoxedLoop, BoxedOneShot},
    clock::SystemClock,
    config::{Config, ConfigStore, FileConfigStore, Overrides},
    logging,
    pomodoro::Pomodoro,
    runtime::{CrosstermEventSource, Runner},
    volume::VolumeController,
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::{
    error::Error,
    io::{self, stdin},
    path::PathBuf,
    time::Duration,
};
use tracing::{info, warn};

/// pomodoro timer for the terminal with background audio and completion cues
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "A terminal Pomodoro timer: 25 minute work sessions alternate with 5 minute breaks, with an optional looping background track during work and a cue when a session ends."
)]
pub struct Cli {
    /// audio file looped during work sessions
    #[clap(short = 'b', long = "background", value_name = "FILE")]
    background: Option<PathBuf>,

    /// audio file played once when a session completes
    #[clap(short = 'c', long = "cue", value_name = "FILE")]
    cue: Option<PathBuf>,

    /// fixed volume of the completion cue, 0.0 to 1.0
    #[clap(long)]
    cue_volume: Option<f32>,

    /// starting volume of the background track, 0.0 to 1.0
    #[clap(short = 'v', long = "volume")]
    volume: Option<f32>,

    /// milliseconds between countdown refreshes
    #[clap(long)]
    tick_rate_ms: Option<u64>,

    /// log filter written to the log file (POMO_LOG takes precedence)
    #[clap(long, default_value = "info")]
    log_level: String,

    /// persist the effective settings as the new defaults
    #[clap(long)]
    save_config: bool,

    /// run without any audio output
    #[clap(long)]
    no_audio: bool,
}

impl Cli {
    fn overrides(&self) -> Overrides {
        Overrides {
            background_audio: self.background.clone(),
            cue_audio: self.cue.clone(),
            cue_volume: self.cue_volume,
            initial_volume: self.volume,
            tick_rate_ms: self.tick_rate_ms,
        }
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    if let Some(path) = AppDirs::log_path() {
        logging::init(&cli.log_level, &path);
    }

    let store = FileConfigStore::new();
    let config = store.load().with_overrides(&cli.overrides()).sanitized();
    if cli.save_config {
        store.save(&config)?;
        info!(path = %store.path().display(), "saved config");
    }
    info!(?config, "starting");

    let (background, cue, note) = open_audio(&config, cli.no_audio);
    let mut pomodoro = Pomodoro::new(
        SystemClock,
        VolumeController::new(config.initial_volume),
        background,
        cue,
    );

    enable_raw_mode()?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut runner = Runner::new(
        CrosstermEventSource::new(),
        Duration::from_millis(config.tick_rate_ms),
    );
    let result = app::run(&mut terminal, &mut runner, &mut pomodoro, note.as_deref());

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    info!("exiting");
    result.map_err(Into::into)
}

/// Players for the configured assets plus an optional note for the screen
fn open_audio(config: &Config, no_audio: bool) -> (BoxedLoop, BoxedOneShot, Option<String>) {
    if no_audio {
        let (background, cue) = audio::silent_players();
        return (background, cue, Some("audio disabled".to_string()));
    }
    match audio::open_players(&config.audio_settings()) {
        Ok((background, cue)) => (background, cue, None),
        Err(err) => {
            warn!(%err, "continuing without audio");
            let (background, cue) = audio::silent_players();
            (background, cue, Some(format!("audio off: {err}")))
        }
    }
}
