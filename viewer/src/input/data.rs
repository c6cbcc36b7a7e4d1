use serde::{Deserialize, Serialize};

/// Every rebindable action the viewer reacts to. `Ord` so the keybindings
/// file serializes in a stable order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum GameAction {
    MoveForward,
    MoveBackward,
    MoveLeft,
    MoveRight,
    Sprint,
    Jump,
    ToggleViewMode,
    CycleLighting,
    ToggleDebugHud,
    Escape,
}

impl GameAction {
    /// All actions, for coverage checks over the key map.
    pub const ALL: [GameAction; 10] = [
        GameAction::MoveForward,
        GameAction::MoveBackward,
        GameAction::MoveLeft,
        GameAction::MoveRight,
        GameAction::Sprint,
        GameAction::Jump,
        GameAction::ToggleViewMode,
        GameAction::CycleLighting,
        GameAction::ToggleDebugHud,
        GameAction::Escape,
    ];
}
