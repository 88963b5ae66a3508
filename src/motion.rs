use crate::grid::{Cell, Heading};

/// Result of resolving one step of movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Stride {
    pub pos: Cell,
    pub heading: Heading,
    /// Still-buffered desired heading, if it could not be taken yet.
    pub desired: Option<Heading>,
}

/// Resolve one cell of movement. A passable `desired` heading replaces the
/// current one and is consumed; an agent that runs into a wall stops.
pub fn step(
    pos: Cell,
    heading: Heading,
    desired: Option<Heading>,
    passable: impl Fn(Cell) -> bool,
) -> Stride {
    let can_go = |h: Heading| pos.offset(h).is_some_and(&passable);

    let mut heading = heading;
    let mut desired = desired.filter(|h| *h != Heading::None);
    if let Some(want) = desired {
        if can_go(want) {
            heading = want;
            desired = None;
        }
    }

    if heading == Heading::None {
        return Stride {
            pos,
            heading,
            desired,
        };
    }
    match pos.offset(heading).filter(|next| passable(*next)) {
        Some(next) => Stride {
            pos: next,
            heading,
            desired,
        },
        None => Stride {
            pos,
            heading: Heading::None,
            desired,
        },
    }
}
