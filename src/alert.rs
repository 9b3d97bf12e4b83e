use std::io::{self, Write};
use std::path::PathBuf;
use std::process::{Child, Command, Stdio};

use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum AlertError {
    #[error("sound file not found: {0}")]
    MissingFile(PathBuf),
    #[error("failed to start sound player `{program}`: {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },
    #[error("audio output failed: {0}")]
    Io(#[from] io::Error),
}

/// Audible notification played when a turn runs out of time.
pub trait Alert: Send {
    /// Play the notification from the start.
    fn play(&mut self) -> Result<(), AlertError>;
}

/// Rings the terminal bell.
pub struct TerminalBell<W: Write + Send = io::Stdout> {
    out: W,
}

impl TerminalBell<io::Stdout> {
    pub fn stdout() -> Self {
        Self { out: io::stdout() }
    }
}

impl<W: Write + Send> TerminalBell<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write + Send> Alert for TerminalBell<W> {
    fn play(&mut self) -> Result<(), AlertError> {
        self.out.write_all(b"\x07")?;
        self.out.flush()?;
        Ok(())
    }
}

/// Plays a sound file through an external player (`paplay`, `afplay`, ...).
///
/// A playback still running from the previous expiry is killed first, so the
/// sound always starts from the beginning.
pub struct SoundCommand {
    program: String,
    args: Vec<String>,
    file: PathBuf,
    child: Option<Child>,
}

impl SoundCommand {
    pub fn new(program: impl Into<String>, file: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            file: file.into(),
            child: None,
        }
    }

    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args = args.into_iter().map(Into::into).collect();
        self
    }

    /// Best guess at a player available on this platform.
    pub fn default_player() -> &'static str {
        if cfg!(target_os = "macos") {
            "afplay"
        } else {
            "paplay"
        }
    }

    /// `program args... file`, the command each playback spawns.
    pub fn command(&self) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args).arg(&self.file);
        cmd
    }

    fn rewind(&mut self) {
        if let Some(mut child) = self.child.take() {
            if let Ok(None) = child.try_wait() {
                debug!(program = %self.program, "stopping previous playback");
                let _ = child.kill();
            }
            let _ = child.wait();
        }
    }
}

impl Alert for SoundCommand {
    fn play(&mut self) -> Result<(), AlertError> {
        if !self.file.exists() {
            return Err(AlertError::MissingFile(self.file.clone()));
        }
        self.rewind();

        let child = self
            .command()
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|source| AlertError::Spawn {
                program: self.program.clone(),
                source,
            })?;
        self.child = Some(child);
        Ok(())
    }
}

impl Drop for SoundCommand {
    fn drop(&mut self) {
        self.rewind();
    }
}

/// No sound at all.
#[derive(Debug, Default, Clone, Copy)]
pub struct Mute;

impl Alert for Mute {
    fn play(&mut self) -> Result<(), AlertError> {
        Ok(())
    }
}
