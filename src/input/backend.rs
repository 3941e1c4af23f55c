use serde::{Deserialize, Serialize};

use crate::{error::input_error::InputError, input::Screenshot};

/// Windows-style virtual key code; the key table is expressed in this space
/// and backends translate it to whatever the platform expects.
pub type KeyCode = u16;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MouseButton {
    #[default]
    Left,
    Right,
    Middle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScrollAxis {
    Vertical,
    Horizontal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Press {
    Down,
    Up,
}

/// OS-level pointer/keyboard simulation plus full-screen capture.
///
/// Every call is synchronous: when it returns, the OS has accepted the event,
/// so a capture issued afterwards observes its effect.
pub trait InputBackend: Send {
    fn screen_size(&mut self) -> Result<(u32, u32), InputError>;

    fn capture(&mut self) -> Result<Screenshot, InputError>;

    fn move_pointer(&mut self, x: i32, y: i32) -> Result<(), InputError>;

    fn button(&mut self, button: MouseButton, press: Press) -> Result<(), InputError>;

    /// Vertical: negative scrolls down, positive scrolls up.
    fn scroll(&mut self, axis: ScrollAxis, delta: i32) -> Result<(), InputError>;

    fn key(&mut self, code: KeyCode, press: Press) -> Result<(), InputError>;
}
