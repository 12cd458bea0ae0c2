//! The four axis-aligned neighbors passed into constructors.

use std::fmt;

/// Cardinal direction of a neighbor relative to the entity being built.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    North,
    East,
    South,
    West,
}

impl Direction {
    /// Grafting order: north, east, south, west.
    pub const ALL: [Direction; 4] = [
        Direction::North,
        Direction::East,
        Direction::South,
        Direction::West,
    ];
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Direction::North => "north",
            Direction::East => "east",
            Direction::South => "south",
            Direction::West => "west",
        };
        f.write_str(name)
    }
}

/// Up to four neighbors, used once at construction time and never stored.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Neighbors<T> {
    pub north: Option<T>,
    pub east: Option<T>,
    pub south: Option<T>,
    pub west: Option<T>,
}

impl<T> Neighbors<T> {
    /// No neighbors on any side.
    pub fn none() -> Self {
        Self {
            north: None,
            east: None,
            south: None,
            west: None,
        }
    }

    /// The neighbor on `direction`'s side, if any.
    pub fn get(&self, direction: Direction) -> Option<&T> {
        match direction {
            Direction::North => self.north.as_ref(),
            Direction::East => self.east.as_ref(),
            Direction::South => self.south.as_ref(),
            Direction::West => self.west.as_ref(),
        }
    }

    /// Set the neighbor on `direction`'s side.
    pub fn with(mut self, direction: Direction, value: T) -> Self {
        let slot = match direction {
            Direction::North => &mut self.north,
            Direction::East => &mut self.east,
            Direction::South => &mut self.south,
            Direction::West => &mut self.west,
        };
        *slot = Some(value);
        self
    }

    /// Project every present neighbor through `f`; `None` results drop that side.
    pub fn filter_map<U>(self, mut f: impl FnMut(T) -> Option<U>) -> Neighbors<U> {
        Neighbors {
            north: self.north.and_then(&mut f),
            east: self.east.and_then(&mut f),
            south: self.south.and_then(&mut f),
            west: self.west.and_then(&mut f),
        }
    }

    /// Number of sides with a neighbor.
    pub fn count(&self) -> usize {
        Direction::ALL
            .iter()
            .filter(|&&direction| self.get(direction).is_some())
            .count()
    }
}

impl<T> Default for Neighbors<T> {
    fn default() -> Self {
        Self::none()
    }
}
