use super::grid::{step, Coord, Direction};

/// The snake: an ordered chain of grid cells, head first
///
/// Movement is unconditional; collision policy lives in the game state
/// machine, which may call [`undo_move`](Snake::undo_move) right after a
/// move it decides was fatal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snake {
    /// Body cells with the head at index 0
    elements: Vec<Coord>,
    /// Current direction of movement
    direction: Direction,
    /// Set once a direction change has been accepted this tick
    direction_locked: bool,
    /// Tail cell vacated by the most recent move, kept for one tick so an
    /// eat can reattach it
    pending_tail: Option<Coord>,
    /// When present, new head coordinates wrap modulo (width, height)
    portal_bounds: Option<(i32, i32)>,
}

impl Snake {
    /// Create a snake with its body laid out behind the head along the
    /// initial direction. The initial layout does not wrap.
    pub fn new(
        head: Coord,
        direction: Direction,
        length: usize,
        portal_bounds: Option<(i32, i32)>,
    ) -> Self {
        let elements = (0..length.max(1) as i32)
            .map(|i| step(head, direction, -i))
            .collect();

        Self {
            elements,
            direction,
            direction_locked: false,
            pending_tail: None,
            portal_bounds,
        }
    }

    pub fn head(&self) -> Coord {
        self.elements[0]
    }

    /// Body cells excluding the head (may be empty)
    pub fn body(&self) -> &[Coord] {
        &self.elements[1..]
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Returns true if the snake occupies `cell` with head or body
    pub fn occupies(&self, cell: Coord) -> bool {
        self.elements.contains(&cell)
    }

    /// Advance one cell in the current direction
    ///
    /// The vacated tail is retained as the pending tail and the direction
    /// lock is released. No collision checking happens here.
    pub fn advance(&mut self) {
        let mut new_head = step(self.head(), self.direction, 1);
        if let Some((width, height)) = self.portal_bounds {
            new_head = Coord::new(new_head.x.rem_euclid(width), new_head.y.rem_euclid(height));
        }

        self.elements.insert(0, new_head);
        self.pending_tail = self.elements.pop();
        self.direction_locked = false;
    }

    /// Revert the most recent [`advance`](Snake::advance)
    ///
    /// Drops the new head and reattaches the pending tail, so the body
    /// matches the pre-move shape. No-op without a pending tail.
    pub fn undo_move(&mut self) {
        if let Some(tail) = self.pending_tail.take() {
            self.elements.remove(0);
            self.elements.push(tail);
        }
    }

    /// Grow by reattaching the tail cell vacated by the last move
    ///
    /// Returns the reattached cell, or `None` when no move happened since
    /// the last eat. The `None` case is tolerated silently; it only
    /// arises from out-of-order calls.
    pub fn eat(&mut self) -> Option<Coord> {
        let tail = self.pending_tail.take()?;
        self.elements.push(tail);
        Some(tail)
    }

    /// Request a direction change
    ///
    /// Ignored when a change was already accepted this tick, or when the
    /// new direction is the exact reverse of the current one (an instant
    /// reversal would fold the head into the neck).
    pub fn set_direction(&mut self, new_direction: Direction) {
        if self.direction_locked || self.direction.is_opposite(new_direction) {
            return;
        }
        self.direction = new_direction;
        self.direction_locked = true;
    }
}
