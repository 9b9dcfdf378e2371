//! Actions accepted by simulator sessions.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::error::SimulatorError;

/// Full state-dependent action.
///
/// `index` selects a navigable candidate (0 is the current viewpoint, so it
/// never moves); `heading` and `elevation` rotate the camera by whole 30° steps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Action {
    pub index: usize,
    pub heading: i32,
    pub elevation: i32,
}

impl Action {
    pub const NOOP: Action = Action::new(0, 0, 0);
    pub const TURN_LEFT: Action = Action::new(0, -1, 0);
    pub const TURN_RIGHT: Action = Action::new(0, 1, 0);
    pub const LOOK_UP: Action = Action::new(0, 0, 1);
    pub const LOOK_DOWN: Action = Action::new(0, 0, -1);

    pub const fn new(index: usize, heading: i32, elevation: i32) -> Self {
        Self {
            index,
            heading,
            elevation,
        }
    }

    /// Moves onto navigable candidate `index` without rotating.
    pub const fn move_to(index: usize) -> Self {
        Self::new(index, 0, 0)
    }

    pub fn is_noop(&self) -> bool {
        *self == Self::NOOP
    }

    /// Whether this action changes viewpoint.
    pub fn is_move(&self) -> bool {
        self.index > 0
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.index, self.heading, self.elevation)
    }
}

/// Reduced discrete action set.
///
/// A strict subset of [`Action`]: `Forward` always targets candidate 1, so it
/// may leave the agent in place when nothing is in view. Callers must check
/// the resulting state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SimpleAction {
    Forward,
    TurnLeft,
    TurnRight,
    LookUp,
    LookDown,
}

impl SimpleAction {
    /// Returns all simple actions in code order.
    pub fn all() -> [SimpleAction; 5] {
        [
            SimpleAction::Forward,
            SimpleAction::TurnLeft,
            SimpleAction::TurnRight,
            SimpleAction::LookUp,
            SimpleAction::LookDown,
        ]
    }

    pub fn code(&self) -> usize {
        match self {
            SimpleAction::Forward => 0,
            SimpleAction::TurnLeft => 1,
            SimpleAction::TurnRight => 2,
            SimpleAction::LookUp => 3,
            SimpleAction::LookDown => 4,
        }
    }

    pub fn to_action(self) -> Action {
        match self {
            SimpleAction::Forward => Action::move_to(1),
            SimpleAction::TurnLeft => Action::TURN_LEFT,
            SimpleAction::TurnRight => Action::TURN_RIGHT,
            SimpleAction::LookUp => Action::LOOK_UP,
            SimpleAction::LookDown => Action::LOOK_DOWN,
        }
    }
}

impl TryFrom<usize> for SimpleAction {
    type Error = SimulatorError;

    fn try_from(code: usize) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(SimpleAction::Forward),
            1 => Ok(SimpleAction::TurnLeft),
            2 => Ok(SimpleAction::TurnRight),
            3 => Ok(SimpleAction::LookUp),
            4 => Ok(SimpleAction::LookDown),
            other => Err(SimulatorError::InvalidAction(other)),
        }
    }
}

impl From<SimpleAction> for Action {
    fn from(simple: SimpleAction) -> Self {
        simple.to_action()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_round_trip() {
        for a in SimpleAction::all() {
            assert_eq!(SimpleAction::try_from(a.code()).unwrap(), a);
        }
    }

    #[test]
    fn simple_actions_map_to_triples() {
        assert_eq!(Action::from(SimpleAction::Forward), Action::new(1, 0, 0));
        assert_eq!(Action::from(SimpleAction::TurnLeft), Action::new(0, -1, 0));
        assert_eq!(Action::from(SimpleAction::TurnRight), Action::new(0, 1, 0));
        assert_eq!(Action::from(SimpleAction::LookUp), Action::new(0, 0, 1));
        assert_eq!(Action::from(SimpleAction::LookDown), Action::new(0, 0, -1));
    }

    #[test]
    fn out_of_range_code_fails() {
        assert!(matches!(
            SimpleAction::try_from(5),
            Err(SimulatorError::InvalidAction(5))
        ));
    }

    #[test]
    fn noop_is_not_a_move() {
        assert!(Action::NOOP.is_noop());
        assert!(!Action::NOOP.is_move());
        assert!(Action::move_to(2).is_move());
    }
}
