// Everything but terminal setup and drawing lives here so it can be driven
// headless from tests.
pub mod alert;
pub mod app;
pub mod app_dirs;
pub mod config;
pub mod countdown;
pub mod logging;
pub mod roster;
pub mod runtime;
pub mod schedule;
pub mod session;
pub mod turns;
pub mod util;

pub use countdown::TimerConfig;
pub use session::Session;
pub use turns::Phase;
