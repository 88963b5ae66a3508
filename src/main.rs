use std::fs::File;
use std::io::{self, Stdout};
use std::sync::Mutex;
use std::thread;
use std::time::{Duration, Instant};

use crossterm::cursor::{Hide, Show};
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use crossterm::terminal::{self, EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::ExecutableCommand;
use tracing_subscriber::EnvFilter;

use maze_chase::{Game, GameConfig, GameError, GameEvent, Heading, Phase};

mod render;

use render::Renderer;

/// What a key press asks the front end to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Steer(Heading),
    Start,
    Restart,
    Quit,
}

fn main() -> io::Result<()> {
    let config = GameConfig::load();
    init_logging(&config)?;
    let game = Game::new(config).map_err(io::Error::other)?;

    let mut stdout = io::stdout();
    terminal::enable_raw_mode()?;
    stdout.execute(EnterAlternateScreen)?;
    stdout.execute(Hide)?;

    let result = run(&mut stdout, game);

    stdout.execute(Show)?;
    stdout.execute(LeaveAlternateScreen)?;
    terminal::disable_raw_mode()?;
    result
}

/// The terminal belongs to the game, so logs only go to a file when one is
/// configured.
fn init_logging(config: &GameConfig) -> io::Result<()> {
    let Some(path) = &config.log_file else {
        return Ok(());
    };
    let file = File::create(path)?;
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .try_init()
        .map_err(io::Error::other)
}

fn run(stdout: &mut Stdout, mut game: Game) -> io::Result<()> {
    let tick = Duration::from_millis(game.config().tick_ms);
    let frame_time = Duration::from_micros(1_000_000 / game.config().render_fps.max(1));
    let mut renderer = Renderer::new(game.grid().rows(), game.grid().cols());
    let mut last_tick = Instant::now();

    loop {
        let frame_start = Instant::now();
        while event::poll(Duration::from_millis(0))? {
            let Event::Key(key) = event::read()? else {
                continue;
            };
            if !matches!(key.kind, KeyEventKind::Press | KeyEventKind::Repeat) {
                continue;
            }
            match command_for(key.code, game.phase()) {
                Some(Command::Quit) => return Ok(()),
                Some(Command::Steer(heading)) => game.on_directional_input(heading),
                Some(Command::Start) => {
                    if begin_round(&mut game).map_err(io::Error::other)? {
                        renderer.invalidate();
                        last_tick = Instant::now();
                    }
                }
                Some(Command::Restart) => {
                    game.reset(None).map_err(io::Error::other)?;
                    renderer.invalidate();
                }
                None => {}
            }
        }

        if last_tick.elapsed() >= tick {
            last_tick = Instant::now();
            game.on_tick();
            for event in game.drain_events() {
                match event {
                    GameEvent::ScoreChanged(score) => tracing::debug!(score, "Score changed"),
                    GameEvent::GameOver => tracing::info!(score = game.score(), "Game over"),
                    GameEvent::GameWon => tracing::info!(score = game.score(), "Game won"),
                }
            }
        }
        renderer.render(stdout, &game)?;

        let elapsed = frame_start.elapsed();
        if elapsed < frame_time {
            thread::sleep(frame_time - elapsed);
        }
    }
}

/// Start a round, rebuilding the board first if the last one is over.
/// Returns false when a round is already running.
fn begin_round(game: &mut Game) -> Result<bool, GameError> {
    if matches!(game.phase(), Phase::Won | Phase::Lost) {
        game.reset(None)?;
    }
    Ok(game.start())
}

/// `s` means "down" while a round is running and "start" otherwise.
fn command_for(code: KeyCode, phase: Phase) -> Option<Command> {
    let running = phase == Phase::Running;
    match code {
        KeyCode::Char('q') | KeyCode::Esc => Some(Command::Quit),
        KeyCode::Char('r') => Some(Command::Restart),
        KeyCode::Enter | KeyCode::Char(' ') => Some(Command::Start),
        KeyCode::Char('s') if !running => Some(Command::Start),
        KeyCode::Up | KeyCode::Char('w') | KeyCode::Char('k') => Some(Command::Steer(Heading::Up)),
        KeyCode::Down | KeyCode::Char('s') | KeyCode::Char('j') => {
            Some(Command::Steer(Heading::Down))
        }
        KeyCode::Left | KeyCode::Char('a') | KeyCode::Char('h') => {
            Some(Command::Steer(Heading::Left))
        }
        KeyCode::Right | KeyCode::Char('d') | KeyCode::Char('l') => {
            Some(Command::Steer(Heading::Right))
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn s_starts_before_play_and_steers_during_it() {
        assert_eq!(
            command_for(KeyCode::Char('s'), Phase::NotStarted),
            Some(Command::Start)
        );
        assert_eq!(
            command_for(KeyCode::Char('s'), Phase::Lost),
            Some(Command::Start)
        );
        assert_eq!(
            command_for(KeyCode::Char('s'), Phase::Running),
            Some(Command::Steer(Heading::Down))
        );
    }

    #[test]
    fn start_only_begins_a_round_once() {
        let mut game = Game::new(GameConfig {
            seed: Some(5),
            ..GameConfig::default()
        })
        .unwrap();
        assert!(begin_round(&mut game).unwrap());
        assert_eq!(game.phase(), Phase::Running);
        // Key repeat while running must not count as a fresh start.
        assert!(!begin_round(&mut game).unwrap());
        assert_eq!(game.phase(), Phase::Running);
    }

    #[test]
    fn logging_reports_a_second_subscriber() {
        let path = std::env::temp_dir().join(format!("maze_chase_{}.log", std::process::id()));
        let config = GameConfig {
            log_file: Some(path.clone()),
            ..GameConfig::default()
        };
        assert!(init_logging(&GameConfig::default()).is_ok());
        assert!(init_logging(&config).is_ok());
        assert!(init_logging(&config).is_err());
        let _ = std::fs::remove_file(path);
    }

    #[test]
    fn all_key_sets_steer() {
        for code in [KeyCode::Left, KeyCode::Char('a'), KeyCode::Char('h')] {
            assert_eq!(
                command_for(code, Phase::Running),
                Some(Command::Steer(Heading::Left))
            );
        }
        assert_eq!(command_for(KeyCode::Char('q'), Phase::Running), Some(Command::Quit));
        assert_eq!(command_for(KeyCode::Char('x'), Phase::Running), None);
    }
}
