use std::collections::BTreeSet;

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::error::GameError;
use super::grid::{Coord, Direction};

/// Scattered obstacles keep at least this Chebyshev distance from the
/// initial snake head
const MIN_HEAD_CLEARANCE: i32 = 5;

/// A named arena preset: size, obstacle layout, portal flag and initial
/// snake placement
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StartConfig {
    pub width: i32,
    pub height: i32,
    pub obstacles: BTreeSet<Coord>,
    pub snake_head: Coord,
    pub snake_direction: Direction,
    pub snake_length: usize,
    /// Boundary ring wraps instead of killing when set
    pub portal: bool,
}

impl StartConfig {
    /// Open 50x25 arena, boundary wraps around
    pub fn standard() -> Self {
        Self {
            width: 50,
            height: 25,
            obstacles: BTreeSet::new(),
            snake_head: Coord::new(27, 12),
            snake_direction: Direction::Right,
            snake_length: 5,
            portal: true,
        }
    }

    /// Closed 50x25 arena, boundary kills
    pub fn frame() -> Self {
        Self {
            portal: false,
            ..Self::standard()
        }
    }

    /// Closed arena with vertical zig-zag walls
    pub fn zigzag() -> Self {
        Self {
            obstacles: zigzag_obstacles(50, 25, 3, 0.7, true),
            snake_head: Coord::new(5, 10),
            snake_direction: Direction::Up,
            portal: false,
            ..Self::standard()
        }
    }

    /// Closed arena with horizontal zig-zag walls
    pub fn zigzag_horizontal() -> Self {
        Self {
            obstacles: zigzag_obstacles(50, 25, 3, 0.7, false),
            snake_head: Coord::new(10, 22),
            snake_direction: Direction::Right,
            portal: false,
            ..Self::standard()
        }
    }

    /// Open wrapping arena with randomly scattered obstacles
    pub fn random_obstacles(rng: &mut impl Rng) -> Self {
        let snake_head = Coord::new(5, 10);
        Self {
            obstacles: scattered_obstacles(50, 25, 35, snake_head, rng),
            snake_head,
            snake_direction: Direction::Up,
            portal: true,
            ..Self::standard()
        }
    }

    /// Closed arena with randomly scattered obstacles
    pub fn random_obstacles_frame(rng: &mut impl Rng) -> Self {
        Self {
            portal: false,
            ..Self::random_obstacles(rng)
        }
    }

    /// Look up a preset by name
    ///
    /// The random presets draw a fresh obstacle sample on every call.
    pub fn by_name(name: &str, rng: &mut impl Rng) -> Result<Self, GameError> {
        match name {
            "standard" => Ok(Self::standard()),
            "frame" => Ok(Self::frame()),
            "zigzag" => Ok(Self::zigzag()),
            "zigzag-horizontal" => Ok(Self::zigzag_horizontal()),
            "random-obstacles" => Ok(Self::random_obstacles(rng)),
            "random-obstacles-frame" => Ok(Self::random_obstacles_frame(rng)),
            other => Err(GameError::UnknownStartConfig(other.to_string())),
        }
    }

    /// Names accepted by [`by_name`](StartConfig::by_name)
    pub fn preset_names() -> &'static [&'static str] {
        &[
            "standard",
            "frame",
            "zigzag",
            "zigzag-horizontal",
            "random-obstacles",
            "random-obstacles-frame",
        ]
    }
}

impl Default for StartConfig {
    fn default() -> Self {
        Self::standard()
    }
}

/// Generate zig-zag walls: `n_stripes` partial walls spread evenly across
/// the arena, anchored alternately at opposite edges
///
/// Vertical stripes are columns covering `portion` of the height; the
/// horizontal variant transposes this.
pub fn zigzag_obstacles(
    width: i32,
    height: i32,
    n_stripes: i32,
    portion: f64,
    vertical: bool,
) -> BTreeSet<Coord> {
    let mut obstacles = BTreeSet::new();
    let mut from_low_edge = true;

    if vertical {
        let spacing = width / (n_stripes + 1);
        let stripe_len = (height as f64 * portion) as i32;
        for i in 0..n_stripes {
            let x = spacing * (i + 1);
            for y in 0..stripe_len {
                let y = if from_low_edge { y } else { height - 1 - y };
                obstacles.insert(Coord::new(x, y));
            }
            from_low_edge = !from_low_edge;
        }
    } else {
        let spacing = height / (n_stripes + 1);
        let stripe_len = (width as f64 * portion) as i32;
        for i in 0..n_stripes {
            let y = spacing * (i + 1);
            for x in 0..stripe_len {
                let x = if from_low_edge { x } else { width - 1 - x };
                obstacles.insert(Coord::new(x, y));
            }
            from_low_edge = !from_low_edge;
        }
    }

    obstacles
}

/// Scatter `n` obstacles across the arena, rejection-sampling any
/// candidate within the minimum clearance around the initial snake head
pub fn scattered_obstacles(
    width: i32,
    height: i32,
    n: usize,
    snake_head: Coord,
    rng: &mut impl Rng,
) -> BTreeSet<Coord> {
    let mut obstacles = BTreeSet::new();
    while obstacles.len() < n {
        let candidate = Coord::new(rng.gen_range(0..width), rng.gen_range(0..height));
        if candidate.chebyshev_distance(snake_head) > MIN_HEAD_CLEARANCE {
            obstacles.insert(candidate);
        }
    }
    obstacles
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_preset_names_resolve() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        for name in StartConfig::preset_names() {
            assert!(StartConfig::by_name(name, &mut rng).is_ok(), "{name}");
        }
    }

    #[test]
    fn test_unknown_preset_name() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let err = StartConfig::by_name("labyrinth", &mut rng).unwrap_err();
        assert_eq!(err, GameError::UnknownStartConfig("labyrinth".to_string()));
    }

    #[test]
    fn test_vertical_zigzag_layout() {
        // 3 stripes in a 50x25 arena: columns at x = 12, 24, 36, each
        // 17 cells long (floor(25 * 0.7)), anchored bottom/top/bottom
        let obstacles = zigzag_obstacles(50, 25, 3, 0.7, true);

        let xs: BTreeSet<i32> = obstacles.iter().map(|c| c.x).collect();
        assert_eq!(xs, BTreeSet::from([12, 24, 36]));
        assert_eq!(obstacles.len(), 3 * 17);

        assert!(obstacles.contains(&Coord::new(12, 0)));
        assert!(obstacles.contains(&Coord::new(12, 16)));
        assert!(!obstacles.contains(&Coord::new(12, 17)));

        // middle stripe hangs from the top edge
        assert!(obstacles.contains(&Coord::new(24, 24)));
        assert!(obstacles.contains(&Coord::new(24, 8)));
        assert!(!obstacles.contains(&Coord::new(24, 7)));

        assert!(obstacles.contains(&Coord::new(36, 0)));
    }

    #[test]
    fn test_horizontal_zigzag_layout() {
        // rows at y = 6, 12, 18, each 35 cells long (floor(50 * 0.7))
        let obstacles = zigzag_obstacles(50, 25, 3, 0.7, false);

        let ys: BTreeSet<i32> = obstacles.iter().map(|c| c.y).collect();
        assert_eq!(ys, BTreeSet::from([6, 12, 18]));
        assert_eq!(obstacles.len(), 3 * 35);

        assert!(obstacles.contains(&Coord::new(0, 6)));
        assert!(obstacles.contains(&Coord::new(34, 6)));
        assert!(!obstacles.contains(&Coord::new(35, 6)));

        // middle row hangs from the right edge
        assert!(obstacles.contains(&Coord::new(49, 12)));
        assert!(obstacles.contains(&Coord::new(15, 12)));
        assert!(!obstacles.contains(&Coord::new(14, 12)));
    }

    #[test]
    fn test_scattered_obstacles_clearance_and_bounds() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let head = Coord::new(5, 10);
        let obstacles = scattered_obstacles(50, 25, 35, head, &mut rng);

        assert_eq!(obstacles.len(), 35);
        for c in &obstacles {
            assert!((0..50).contains(&c.x) && (0..25).contains(&c.y));
            assert!(c.chebyshev_distance(head) > MIN_HEAD_CLEARANCE);
        }
    }

    #[test]
    fn test_scattered_obstacles_reproducible() {
        let head = Coord::new(5, 10);
        let a = scattered_obstacles(50, 25, 35, head, &mut ChaCha8Rng::seed_from_u64(42));
        let b = scattered_obstacles(50, 25, 35, head, &mut ChaCha8Rng::seed_from_u64(42));
        assert_eq!(a, b);
    }
}
