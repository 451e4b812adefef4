use std::fs::File;
use std::io::{stdout, BufWriter, Write};
use std::path::PathBuf;
use std::sync::mpsc::{self, TryRecvError};
use std::thread;
use std::time::{Duration, Instant};

use crossterm::{
    cursor,
    event::{
        self, Event, KeyCode, KeyEvent, KeyEventKind, KeyboardEnhancementFlags,
        PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    terminal, ExecutableCommand,
};
use log::{error, info};
use rand::{thread_rng, Rng};

use formation_shooter::assets::AssetCatalog;
use formation_shooter::audio;
use formation_shooter::compute::{init_state, move_player_left, move_player_right, player_shoot, tick};
use formation_shooter::director;
use formation_shooter::display;
use formation_shooter::entities::GameStatus;
use formation_shooter::input::KeyTracker;
use formation_shooter::{GameConfig, GameError};

const CONFIG_ENV: &str = "FORMATION_SHOOTER_CONFIG";

// ── Startup ───────────────────────────────────────────────────────────────────

/// Log to a file: stdout and stderr belong to the alternate screen.
fn init_logging() {
    let path = std::env::temp_dir().join("formation_shooter.log");
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    match File::create(&path) {
        Ok(file) => {
            builder.target(env_logger::Target::Pipe(Box::new(file)));
        }
        Err(_) => {
            builder.filter_level(log::LevelFilter::Off);
        }
    }
    let _ = builder.try_init();
}

/// Config path: first CLI argument, then `FORMATION_SHOOTER_CONFIG`,
/// otherwise the built-in defaults.
fn load_config() -> Result<GameConfig, GameError> {
    let path = std::env::args_os()
        .nth(1)
        .or_else(|| std::env::var_os(CONFIG_ENV))
        .map(PathBuf::from);
    match path {
        Some(path) => {
            info!("loading config from {}", path.display());
            Ok(GameConfig::load(&path)?)
        }
        None => Ok(GameConfig::default()),
    }
}

fn startup() -> Result<(GameConfig, AssetCatalog), GameError> {
    let mut config = load_config()?;
    let assets = AssetCatalog::load(&config.assets.dir)?;
    for name in &assets.fallbacks {
        info!("using placeholder for {name}");
    }
    // The ship's bounds follow its sprite.
    config.player.width = assets.player.width() as f32;
    config.player.height = assets.player.height() as f32;
    Ok((config, assets))
}

// ── Menu ──────────────────────────────────────────────────────────────────────

enum MenuResult {
    Start,
    Quit,
}

fn wait_for_key(rx: &mpsc::Receiver<Event>) -> Option<KeyCode> {
    loop {
        match rx.recv() {
            Ok(Event::Key(KeyEvent {
                code,
                kind: KeyEventKind::Press,
                ..
            })) => return Some(code),
            Ok(_) => {}
            Err(_) => return None,
        }
    }
}

fn show_menu<W: Write>(out: &mut W, rx: &mpsc::Receiver<Event>) -> std::io::Result<MenuResult> {
    loop {
        let (width, height) = terminal::size()?;
        display::render_menu(out, width, height)?;

        // Block until the user makes a choice
        match wait_for_key(rx) {
            Some(KeyCode::Char('s' | 'S') | KeyCode::Enter) => return Ok(MenuResult::Start),
            Some(KeyCode::Char('i' | 'I')) => {
                display::render_info(out, width, height)?;
                if wait_for_key(rx).is_none() {
                    return Ok(MenuResult::Quit);
                }
            }
            Some(KeyCode::Char('q' | 'Q') | KeyCode::Esc) | None => return Ok(MenuResult::Quit),
            Some(_) => {}
        }
    }
}

// ── Game loop ─────────────────────────────────────────────────────────────────

/// Fixed-rate loop. Returns once the game reaches `Terminated`: the player
/// quit, or the input thread went away.
fn game_loop<W: Write>(
    out: &mut W,
    config: &GameConfig,
    assets: &AssetCatalog,
    rx: &mpsc::Receiver<Event>,
    rng: &mut impl Rng,
) -> std::io::Result<()> {
    let frame_budget = Duration::from_secs(1) / config.timing.ticks_per_second;
    let (width, height) = terminal::size()?;
    let mut state = init_state(config.clone(), width, height, assets.masks(), rng);
    let mut keys = KeyTracker::new();
    let mut frame: u64 = 0;

    loop {
        let frame_start = Instant::now();
        frame += 1;

        // ── Drain all pending input events (non-blocking) ─────────────────────
        loop {
            match rx.try_recv() {
                Ok(Event::Key(key)) => {
                    let Some(action) = keys.handle(&key, frame) else {
                        continue;
                    };
                    let (next, consumed) = director::apply_action(&state, action, rng);
                    state = next;
                    if consumed {
                        keys.clear();
                    }
                }
                Ok(_) => {}
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    director::terminate(&mut state);
                    break;
                }
            }
        }

        if state.status == GameStatus::Terminated {
            return Ok(());
        }

        // ── Apply controls ────────────────────────────────────────────────────
        let controls = keys.sample(frame);
        if state.status == GameStatus::Playing {
            if controls.left && !controls.right {
                state = move_player_left(&state);
            } else if controls.right && !controls.left {
                state = move_player_right(&state);
            }
            if controls.fire {
                state = player_shoot(&state);
            }
        }

        state = tick(&state, rng);
        display::render(out, &state, assets)?;

        // Late frames are dropped, never caught up.
        let elapsed = frame_start.elapsed();
        if elapsed < frame_budget {
            thread::sleep(frame_budget - elapsed);
        }
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() -> std::io::Result<()> {
    init_logging();

    // Missing required assets or a broken config end the process here,
    // before the terminal is touched.
    let (config, assets) = match startup() {
        Ok(loaded) => loaded,
        Err(e) => {
            error!("startup failed: {e}");
            eprintln!("formation_shooter: {e}");
            std::process::exit(1);
        }
    };

    let mut music = audio::from_config(&config.audio);
    audio::start_background_track(music.as_mut(), &config.audio.track);

    let raw_out = stdout();
    let mut out = BufWriter::new(raw_out);

    terminal::enable_raw_mode()?;
    out.execute(terminal::EnterAlternateScreen)?;
    out.execute(cursor::Hide)?;

    // Request key-release (and key-repeat) events from the terminal.
    // Ghostty / kitty-protocol terminals support this; others fall back gracefully.
    let keyboard_enhanced = out
        .execute(PushKeyboardEnhancementFlags(
            KeyboardEnhancementFlags::REPORT_EVENT_TYPES,
        ))
        .is_ok();

    // Dedicate a thread exclusively to blocking event reads, sending them
    // through a channel so the game loop never has to block on I/O.
    let (tx, rx) = mpsc::channel::<Event>();
    thread::spawn(move || loop {
        match event::read() {
            Ok(ev) => {
                if tx.send(ev).is_err() {
                    break; // receiver dropped → program exiting
                }
            }
            Err(_) => break,
        }
    });

    let result = run(&mut out, &config, &assets, &rx);

    // Always restore the terminal
    if keyboard_enhanced {
        let _ = out.execute(PopKeyboardEnhancementFlags);
    }
    let _ = out.execute(cursor::Show);
    let _ = out.execute(terminal::LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();

    music.stop();
    result
}

fn run<W: Write>(
    out: &mut W,
    config: &GameConfig,
    assets: &AssetCatalog,
    rx: &mpsc::Receiver<Event>,
) -> std::io::Result<()> {
    let mut rng = thread_rng();
    match show_menu(out, rx)? {
        MenuResult::Quit => Ok(()),
        MenuResult::Start => game_loop(out, config, assets, rx, &mut rng),
    }
}
