use std::cell::RefCell;
use std::collections::HashSet;
use std::rc::Rc;
use std::sync::mpsc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{debug, info};

use voxel_snake::game::{
    step, Coord, Direction, Game, GameEvents, GameState, StartConfig,
};
use voxel_snake::metrics::{format_duration, GameMetrics};
use voxel_snake::scheduler::SpeedConfig;

/// Headless demo driver: runs the engine off its own tick scheduler with
/// a small greedy pilot steering the snake, and reports score events.
#[derive(Parser)]
#[command(name = "voxel_snake")]
#[command(version, about = "Headless snake engine demo")]
struct Cli {
    /// Start configuration preset
    #[arg(long, default_value = "standard")]
    config: String,

    /// Speed level, 0 = slowest
    #[arg(long, default_value_t = 6)]
    speed: u32,

    /// Stop after this many ticks even if the snake is still alive
    #[arg(long, default_value_t = 500)]
    max_ticks: u32,

    /// Override the preset's initial direction (left/right/up/down)
    #[arg(long)]
    direction: Option<String>,
}

/// Event sink for the demo: log the notifications and feed the session
/// metrics
struct ConsoleEvents {
    metrics: Rc<RefCell<GameMetrics>>,
}

impl GameEvents for ConsoleEvents {
    fn on_score_changed(&mut self, score: u32) {
        self.metrics.borrow_mut().on_score_changed(score);
        info!("score: {score}");
    }

    fn on_game_over(&mut self, final_score: u32) {
        self.metrics.borrow_mut().on_game_over(final_score);
        info!("game over, final score {final_score}");
    }

    fn on_state_changed(&mut self, state: GameState) {
        self.metrics.borrow_mut().on_state_changed(state);
        debug!("state: {state:?}");
    }
}

/// Pick the safe direction that closes the most distance to the food
///
/// Good enough to keep a demo game going for a while; it looks one cell
/// ahead and does not plan around its own tail.
fn steer(game: &mut Game) {
    let snap = game.snapshot();
    let wraps = !snap.portal.is_empty();
    let (width, height) = (game.width(), game.height());

    let blocked: HashSet<Coord> = snap
        .maze
        .iter()
        .chain(snap.snake_body.iter())
        .copied()
        .collect();

    let mut best: Option<(i32, Direction)> = None;
    for dir in [
        Direction::Left,
        Direction::Right,
        Direction::Up,
        Direction::Down,
    ] {
        if game.direction().is_opposite(dir) {
            continue;
        }
        let mut next = step(snap.snake_head, dir, 1);
        if wraps {
            next = Coord::new(next.x.rem_euclid(width), next.y.rem_euclid(height));
        }
        if blocked.contains(&next) {
            continue;
        }
        let distance = (next.x - snap.food.x).abs() + (next.y - snap.food.y).abs();
        if best.map_or(true, |(d, _)| distance < d) {
            best = Some((distance, dir));
        }
    }

    match best {
        Some((_, Direction::Left)) => game.left(),
        Some((_, Direction::Right)) => game.right(),
        Some((_, Direction::Up)) => game.up(),
        Some((_, Direction::Down)) => game.down(),
        None => {} // boxed in; ride the current direction out
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt().init();

    let cli = Cli::parse();

    let mut rng = rand::thread_rng();
    let mut config = StartConfig::by_name(&cli.config, &mut rng).with_context(|| {
        format!(
            "unknown --config, expected one of {}",
            StartConfig::preset_names().join(", ")
        )
    })?;
    if let Some(direction) = &cli.direction {
        config.snake_direction = direction
            .parse::<Direction>()
            .context("invalid --direction")?;
    }

    let metrics = Rc::new(RefCell::new(GameMetrics::new()));
    let events = ConsoleEvents {
        metrics: Rc::clone(&metrics),
    };

    let (tick_tx, tick_rx) = mpsc::channel();
    let mut game = Game::new(config, SpeedConfig::default(), Box::new(events), move || {
        let _ = tick_tx.send(());
    })
    .context("failed to build the start state")?;

    game.set_speed_level(cli.speed);
    game.play();

    let mut ticks = 0;
    while ticks < cli.max_ticks && game.state() == GameState::Running {
        match tick_rx.recv_timeout(Duration::from_secs(5)) {
            Ok(()) => {
                steer(&mut game);
                game.on_tick();
                ticks += 1;
            }
            Err(_) => break,
        }
    }

    if game.state() == GameState::Running {
        game.pause();
    }
    let final_score = game.score();
    game.stop();

    let metrics = metrics.borrow();
    info!(
        "done after {} tick(s) in {}: score {}, session high score {}",
        ticks,
        format_duration(metrics.game_time()),
        final_score,
        metrics.high_score()
    );

    Ok(())
}
