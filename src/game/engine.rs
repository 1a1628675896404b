use rand::rngs::ThreadRng;
use tracing::{debug, info};

use super::config::StartConfig;
use super::error::GameError;
use super::events::GameEvents;
use super::grid::{Coord, Direction};
use super::snake::Snake;
use super::world::World;
use crate::scheduler::{interval_for_level, SpeedConfig, TickScheduler};

/// Lifecycle state of a game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GameState {
    Start,
    Running,
    Paused,
    Over,
}

/// Semantic role of a cell in a [`Snapshot`], for the host renderer to
/// map onto whatever visual style it uses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VoxelRole {
    Maze,
    Portal,
    SnakeBody,
    SnakeHead,
    Food,
}

/// A render-agnostic view of the current board
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    pub maze: Vec<Coord>,
    pub portal: Vec<Coord>,
    pub snake_body: Vec<Coord>,
    pub snake_head: Coord,
    pub food: Coord,
}

impl Snapshot {
    /// All cells paired with their roles
    pub fn voxels(&self) -> impl Iterator<Item = (Coord, VoxelRole)> + '_ {
        self.maze
            .iter()
            .map(|&c| (c, VoxelRole::Maze))
            .chain(self.portal.iter().map(|&c| (c, VoxelRole::Portal)))
            .chain(self.snake_body.iter().map(|&c| (c, VoxelRole::SnakeBody)))
            .chain([
                (self.snake_head, VoxelRole::SnakeHead),
                (self.food, VoxelRole::Food),
            ])
    }
}

/// The game: lifecycle state machine, scoring and tick orchestration
///
/// One instance owns one world/snake/food triple plus its tick scheduler.
/// All mutating methods must be called from a single gameplay thread; the
/// scheduler signals ticks through the callback passed to [`Game::new`],
/// and the host marshals that signal back here via [`Game::on_tick`].
pub struct Game {
    config: StartConfig,
    speed: SpeedConfig,
    speed_level: u32,
    world: World,
    snake: Snake,
    food: Coord,
    score: u32,
    state: GameState,
    scheduler: TickScheduler,
    events: Box<dyn GameEvents>,
    rng: ThreadRng,
}

impl Game {
    /// Create a game in the `Start` state
    ///
    /// `tick_signal` runs on the scheduler thread once per tick interval
    /// while the game is running; it should forward the signal (e.g. over
    /// a channel) to whatever thread drives [`Game::on_tick`].
    pub fn new(
        config: StartConfig,
        speed: SpeedConfig,
        events: Box<dyn GameEvents>,
        tick_signal: impl FnMut() + Send + 'static,
    ) -> Result<Self, GameError> {
        let speed_level = speed
            .initial_level
            .min(speed.n_speed_levels.saturating_sub(1));
        let scheduler = TickScheduler::new(interval_for_level(speed_level, &speed), tick_signal);

        let mut rng = rand::thread_rng();
        let world = World::build(&config);
        let snake = Self::build_snake(&config);
        let food = world.find_food_position(&snake, &mut rng)?;

        Ok(Self {
            config,
            speed,
            speed_level,
            world,
            snake,
            food,
            score: 0,
            state: GameState::Start,
            scheduler,
            events,
            rng,
        })
    }

    fn build_snake(config: &StartConfig) -> Snake {
        let portal_bounds = config.portal.then_some((config.width, config.height));
        Snake::new(
            config.snake_head,
            config.snake_direction,
            config.snake_length,
            portal_bounds,
        )
    }

    fn set_state(&mut self, new_state: GameState) {
        debug!("game state {:?} -> {:?}", self.state, new_state);
        self.state = new_state;
        self.events.on_state_changed(new_state);
    }

    /// Rebuild world, snake and food from the selected start
    /// configuration and zero the score
    ///
    /// Only takes effect in the `Start` state; anywhere else it is a
    /// no-op, so a stray configuration-change event cannot rebuild a game
    /// in progress.
    pub fn build_start_state(&mut self) -> Result<(), GameError> {
        if self.state != GameState::Start {
            return Ok(());
        }

        self.world = World::build(&self.config);
        self.snake = Self::build_snake(&self.config);
        self.food = self.world.find_food_position(&self.snake, &mut self.rng)?;
        self.score = 0;
        self.events.on_score_changed(0);
        Ok(())
    }

    /// Select a preset by name for the next (re)build
    ///
    /// Rebuilds immediately when waiting in `Start`; otherwise the new
    /// configuration applies on the next `reset()`.
    pub fn select_start_config(&mut self, name: &str) -> Result<(), GameError> {
        self.config = StartConfig::by_name(name, &mut self.rng)?;
        self.build_start_state()
    }

    /// Advance the game by one tick; routed here by the host from the
    /// scheduler's signal
    pub fn on_tick(&mut self) {
        self.move_snake();
    }

    fn move_snake(&mut self) {
        if self.state != GameState::Running {
            return;
        }

        self.snake.advance();
        let head = self.snake.head();

        if self.world.maze().contains(&head) || self.snake.body().contains(&head) {
            // fatal: halt the clock, then roll the snake back so the
            // final observable shape is the pre-death one
            self.scheduler.pause();
            self.snake.undo_move();
            self.set_state(GameState::Over);
            info!("game over with score {}", self.score);
            self.events.on_game_over(self.score);
            return;
        }

        if head == self.food {
            self.snake.eat();
            self.score += 1;
            debug!("food eaten, score now {}", self.score);
            self.events.on_score_changed(self.score);

            match self.world.find_food_position(&self.snake, &mut self.rng) {
                Ok(food) => self.food = food,
                Err(_) => {
                    // board full: nothing left to eat, the snake wins
                    self.scheduler.pause();
                    self.set_state(GameState::Over);
                    info!("board full, game won with score {}", self.score);
                    self.events.on_game_over(self.score);
                }
            }
        }
    }

    /// Directional command; accepted only while running
    pub fn left(&mut self) {
        if self.state == GameState::Running {
            self.snake.set_direction(Direction::Left);
        }
    }

    pub fn right(&mut self) {
        if self.state == GameState::Running {
            self.snake.set_direction(Direction::Right);
        }
    }

    pub fn up(&mut self) {
        if self.state == GameState::Running {
            self.snake.set_direction(Direction::Up);
        }
    }

    pub fn down(&mut self) {
        if self.state == GameState::Running {
            self.snake.set_direction(Direction::Down);
        }
    }

    /// Start or resume the game
    pub fn play(&mut self) {
        if matches!(self.state, GameState::Start | GameState::Paused) {
            self.scheduler.start();
            self.set_state(GameState::Running);
        }
    }

    /// Pause the game; no tick is processed after this returns
    pub fn pause(&mut self) {
        if self.state == GameState::Running {
            self.scheduler.pause();
            self.set_state(GameState::Paused);
        }
    }

    /// Halt the clock and rebuild everything from the selected start
    /// configuration
    pub fn reset(&mut self) -> Result<(), GameError> {
        self.scheduler.pause();
        self.set_state(GameState::Start);
        self.build_start_state()
    }

    /// Permanently shut down the tick scheduler; used at teardown, the
    /// game cannot be restarted afterwards
    pub fn stop(&mut self) {
        self.scheduler.kill();
    }

    /// Map a speed level to a tick interval; levels outside
    /// `[0, n_speed_levels)` clamp. Takes effect on the next tick.
    pub fn set_speed_level(&mut self, level: u32) {
        self.speed_level = level.min(self.speed.n_speed_levels.saturating_sub(1));
        self.scheduler
            .set_interval(interval_for_level(self.speed_level, &self.speed));
    }

    /// Render-agnostic view of the board for the host renderer
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            maze: self.world.maze().iter().copied().collect(),
            portal: self.world.portal().iter().copied().collect(),
            snake_body: self.snake.body().to_vec(),
            snake_head: self.snake.head(),
            food: self.food,
        }
    }

    pub fn state(&self) -> GameState {
        self.state
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn width(&self) -> i32 {
        self.world.width()
    }

    pub fn height(&self) -> i32 {
        self.world.height()
    }

    pub fn direction(&self) -> Direction {
        self.snake.direction()
    }

    pub fn speed_level(&self) -> u32 {
        self.speed_level
    }
}
