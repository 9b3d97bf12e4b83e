use std::sync::mpsc::{self, Sender};
use std::time::Duration;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use timeboxer::alert::Mute;
use timeboxer::app::{App, Flow, Focus};
use timeboxer::runtime::{AppEvent, Runner, SteppedClock};
use timeboxer::{Phase, Session, TimerConfig};

// Headless integration: the real key handler fed by the runtime runner,
// with every runner step standing for 100ms of time.
type TestRunner = Runner<mpsc::Receiver<AppEvent>, SteppedClock>;

fn headless(names: &[&str], seed: u64) -> (App, Sender<AppEvent>, TestRunner) {
    let mut session = Session::seeded(seed, Box::new(Mute));
    for name in names {
        session.add_participant(name);
    }
    let (tx, rx) = mpsc::channel();
    let runner = Runner::with_clock(
        rx,
        Duration::from_millis(1),
        SteppedClock::new(Duration::from_millis(100)),
    );
    (App::new(session), tx, runner)
}

fn press(code: KeyCode) -> AppEvent {
    AppEvent::Key(KeyEvent::new(code, KeyModifiers::NONE))
}

fn chars(tx: &Sender<AppEvent>, keys: &str) {
    for c in keys.chars() {
        tx.send(press(KeyCode::Char(c))).unwrap();
    }
}

/// Steps until the app quits or `max` steps have run.
fn run(app: &mut App, runner: &mut TestRunner, max: usize) -> Flow {
    for _ in 0..max {
        if app.on_step(runner.step()) == Flow::Quit {
            return Flow::Quit;
        }
    }
    Flow::Continue
}

#[test]
fn headless_roster_entry_then_full_session() {
    let (mut app, tx, mut runner) = headless(&[], 21);

    for name in ["Ada", "Grace", "Linus"] {
        chars(&tx, name);
        tx.send(press(KeyCode::Enter)).unwrap();
    }
    tx.send(press(KeyCode::Tab)).unwrap();
    chars(&tx, "s");
    run(&mut app, &mut runner, 20);

    assert_eq!(app.focus, Focus::Controls);
    assert_eq!(app.session.phase(), Phase::InProgress);
    let mut seen = vec![app.session.active().unwrap().name().to_string()];

    for _ in 0..2 {
        chars(&tx, "n");
        run(&mut app, &mut runner, 1);
        seen.push(app.session.active().unwrap().name().to_string());
    }
    chars(&tx, "n");
    run(&mut app, &mut runner, 1);

    assert_eq!(app.session.phase(), Phase::Completed);
    seen.sort();
    assert_eq!(seen, vec!["Ada", "Grace", "Linus"]);

    // completed screen: enter goes back to setup, esc quits
    tx.send(press(KeyCode::Enter)).unwrap();
    tx.send(press(KeyCode::Esc)).unwrap();
    assert_eq!(run(&mut app, &mut runner, 10), Flow::Quit);
    assert_eq!(app.session.phase(), Phase::NotStarted);
    assert_eq!(app.session.roster().len(), 3);
}

#[test]
fn headless_countdown_expires_through_runner_steps() {
    let (mut app, tx, mut runner) = headless(&["Ada"], 3);
    app.session.set_duration(0, 2);
    app.focus = Focus::Controls;
    chars(&tx, "s ");

    run(&mut app, &mut runner, 40);

    assert_eq!(app.session.countdown().remaining_secs(), 0);
    assert!(!app.session.countdown().is_running());
    assert_eq!(app.session.alerts_played(), 1);
    // the turn is not advanced automatically
    assert_eq!(app.session.phase(), Phase::InProgress);
    assert_eq!(app.session.active().map(|p| p.name()), Some("Ada"));
}

#[test]
fn headless_pause_holds_the_clock() {
    let (mut app, tx, mut runner) = headless(&["Ada"], 5);
    app.session.set_duration(0, 10);
    app.focus = Focus::Controls;
    chars(&tx, "s ");
    // the clock starts on the second step; 35 more make 3.5s
    run(&mut app, &mut runner, 37);
    assert_eq!(app.session.countdown().remaining_secs(), 7);

    chars(&tx, " ");
    run(&mut app, &mut runner, 50);
    assert_eq!(app.session.countdown().remaining_secs(), 7);
    assert!(!app.session.countdown().is_running());

    chars(&tx, "r");
    run(&mut app, &mut runner, 1);
    assert_eq!(app.session.countdown().remaining_secs(), 10);
}

#[test]
fn headless_custom_duration_then_end_session() {
    let (mut app, tx, mut runner) = headless(&["Ada", "Grace"], 8);
    tx.send(press(KeyCode::Tab)).unwrap();
    chars(&tx, "c");
    // editor opens on 1:00; backspace, 3, tab, 45
    tx.send(press(KeyCode::Backspace)).unwrap();
    chars(&tx, "3");
    tx.send(press(KeyCode::Tab)).unwrap();
    chars(&tx, "45");
    tx.send(press(KeyCode::Enter)).unwrap();
    run(&mut app, &mut runner, 20);

    assert!(app.editor.is_none());
    assert_eq!(app.session.duration(), TimerConfig::new(3, 45));
    assert!(app.session.is_custom_selected());

    chars(&tx, "s e");
    run(&mut app, &mut runner, 5);

    assert_eq!(app.session.phase(), Phase::NotStarted);
    assert!(!app.session.countdown().is_running());
    assert_eq!(app.session.countdown().remaining_secs(), 225);
    assert_eq!(app.session.roster().len(), 2);
    // and the roster can be edited again
    assert!(app.session.add_participant("Linus"));
}
