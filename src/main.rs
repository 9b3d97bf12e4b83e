pub mod ui;

use clap::{error::ErrorKind, ArgAction, CommandFactory, Parser};
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Frame, Terminal,
};
use std::{
    error::Error,
    io::{self, stdin},
    path::PathBuf,
    time::Duration,
};
use timeboxer::{
    alert::{Alert, Mute, SoundCommand, TerminalBell},
    app::{App, Flow},
    app_dirs::AppDirs,
    config::{Config, ConfigStore, FileConfigStore},
    logging,
    runtime::{CrosstermEventSource, Runner},
    Session, TimerConfig,
};
use tracing::{info, warn};

const TICK_RATE_MS: u64 = 100;

/// timebox everyone's turn: random order, one countdown per participant
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "Add participants, pick a turn length, then step through everyone in random order. The clock beeps and flashes when a turn runs out of time."
)]
pub struct Cli {
    /// minutes per turn (0-60)
    #[clap(short = 'm', long)]
    minutes: Option<u32>,

    /// extra seconds per turn (0-59)
    #[clap(short = 's', long)]
    seconds: Option<u32>,

    /// participant to pre-fill the roster with (repeatable)
    #[clap(short = 'p', long = "participant")]
    participants: Vec<String>,

    /// seed for the random turn order
    #[clap(long)]
    seed: Option<u64>,

    /// do not play any sound when time runs out
    #[clap(long)]
    mute: bool,

    /// sound file to play when time runs out (default: terminal bell)
    #[clap(long)]
    sound: Option<PathBuf>,

    /// program used to play the sound file
    #[clap(long)]
    player: Option<String>,

    /// argument for the sound player, placed before the file (repeatable)
    #[clap(long = "player-arg", allow_hyphen_values = true)]
    player_args: Vec<String>,

    /// path to the config file
    #[clap(long)]
    config: Option<PathBuf>,

    /// write a config file with the defaults and exit
    #[clap(long)]
    init_config: bool,

    /// more logging (-v info, -vv debug, -vvv trace)
    #[clap(short = 'v', long, action = ArgAction::Count)]
    verbose: u8,
}

impl Cli {
    /// CLI flags win over the config file.
    fn duration(&self, cfg: &Config) -> TimerConfig {
        match (self.minutes, self.seconds) {
            (None, None) => cfg.duration(),
            (m, s) => TimerConfig::new(m.unwrap_or(0), s.unwrap_or(0)),
        }
    }

    /// `None` when no sound file is configured. Player arguments from the
    /// command line replace the configured ones.
    fn sound_command(&self, cfg: &Config) -> Option<SoundCommand> {
        let file = self.sound.clone().or_else(|| cfg.sound_file.clone())?;
        let player = self
            .player
            .clone()
            .or_else(|| cfg.sound_player.clone())
            .unwrap_or_else(|| SoundCommand::default_player().to_string());
        let args = if self.player_args.is_empty() {
            cfg.sound_player_args.clone()
        } else {
            self.player_args.clone()
        };
        Some(SoundCommand::new(player, file).with_args(args))
    }

    fn build_alert(&self, cfg: &Config) -> Box<dyn Alert> {
        if self.mute || cfg.mute {
            return Box::new(Mute);
        }
        match self.sound_command(cfg) {
            Some(cmd) => Box::new(cmd),
            None => Box::new(TerminalBell::stdout()),
        }
    }

    fn build_session(&self, cfg: &Config) -> Session {
        let alert = self.build_alert(cfg);
        let session = match self.seed {
            Some(seed) => Session::seeded(seed, alert),
            None => Session::new(alert),
        };
        let mut session = session
            .with_presets(cfg.presets.clone())
            .with_flash(cfg.flash_on_expiry)
            .with_duration(self.duration(cfg));
        for name in &self.participants {
            session.add_participant(name);
        }
        session
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    let _log_guard = AppDirs::log_dir().and_then(|dir| match logging::init(&dir, cli.verbose) {
        Ok(guard) => Some(guard),
        Err(e) => {
            eprintln!("timeboxer: logging disabled, {}: {}", dir.display(), e);
            None
        }
    });

    let store = match &cli.config {
        Some(path) => FileConfigStore::with_path(path),
        None => FileConfigStore::new(),
    };

    if cli.init_config {
        store.save(&Config::default())?;
        println!("wrote {}", store.path().display());
        return Ok(());
    }

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    let cfg = store.load();
    let mut app = App::new(cli.build_session(&cfg));
    info!(
        participants = app.session.roster().len(),
        duration = %app.session.duration().label(),
        "starting"
    );

    enable_raw_mode()?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = start_tui(&mut terminal, &mut app);
    app.session.shutdown();

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(e) = &result {
        warn!(error = %e, "event loop failed");
    }
    result
}

fn start_tui<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<(), Box<dyn Error>> {
    let mut runner = Runner::new(
        CrosstermEventSource::new(),
        Duration::from_millis(TICK_RATE_MS),
    );

    terminal.draw(|f| ui(app, f))?;
    while app.on_step(runner.step()) == Flow::Continue {
        terminal.draw(|f| ui(app, f))?;
    }

    Ok(())
}

fn ui(app: &App, f: &mut Frame) {
    ui::screen::current_screen(app).render(app, f);
}
