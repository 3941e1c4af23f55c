use enigo::{Axis, Button, Coordinate, Direction, Enigo, Key, Keyboard, Mouse, Settings};
use tracing::debug;
use xcap::Monitor;

use crate::{
    error::input_error::InputError,
    input::{InputBackend, KeyCode, MouseButton, Press, ScrollAxis, Screenshot},
};

/// Wheel events above this magnitude are treated as Win32 wheel units.
const WHEEL_DELTA: i32 = 120;

/// Real desktop backend: enigo for injection, xcap for capture.
pub struct NativeBackend {
    enigo: Enigo,
}

impl NativeBackend {
    pub fn new() -> Result<Self, InputError> {
        let enigo =
            Enigo::new(&Settings::default()).map_err(|e| InputError::Init(e.to_string()))?;
        Ok(Self { enigo })
    }

    fn map_button(button: MouseButton) -> Button {
        match button {
            MouseButton::Left => Button::Left,
            MouseButton::Right => Button::Right,
            MouseButton::Middle => Button::Middle,
        }
    }

    fn map_direction(press: Press) -> Direction {
        match press {
            Press::Down => Direction::Press,
            Press::Up => Direction::Release,
        }
    }

    fn notches(delta: i32) -> i32 {
        if delta.abs() >= WHEEL_DELTA {
            delta / WHEEL_DELTA
        } else {
            delta
        }
    }
}

impl InputBackend for NativeBackend {
    fn screen_size(&mut self) -> Result<(u32, u32), InputError> {
        let (width, height) = self
            .enigo
            .main_display()
            .map_err(|e| InputError::Inject(e.to_string()))?;
        Ok((width.max(1) as u32, height.max(1) as u32))
    }

    fn capture(&mut self) -> Result<Screenshot, InputError> {
        let monitor = Monitor::all()
            .map_err(|e| InputError::Capture(e.to_string()))?
            .into_iter()
            .next()
            .ok_or_else(|| InputError::Capture("no monitor found".into()))?;
        let image = monitor
            .capture_image()
            .map_err(|e| InputError::Capture(e.to_string()))?;
        Screenshot::from_rgba(image)
    }

    fn move_pointer(&mut self, x: i32, y: i32) -> Result<(), InputError> {
        debug!(x, y, "move pointer");
        self.enigo
            .move_mouse(x, y, Coordinate::Abs)
            .map_err(|e| InputError::Inject(e.to_string()))
    }

    fn button(&mut self, button: MouseButton, press: Press) -> Result<(), InputError> {
        self.enigo
            .button(Self::map_button(button), Self::map_direction(press))
            .map_err(|e| InputError::Inject(e.to_string()))
    }

    fn scroll(&mut self, axis: ScrollAxis, delta: i32) -> Result<(), InputError> {
        let notches = Self::notches(delta);
        // enigo scrolls down for positive vertical lengths
        let (length, axis) = match axis {
            ScrollAxis::Vertical => (-notches, Axis::Vertical),
            ScrollAxis::Horizontal => (notches, Axis::Horizontal),
        };
        self.enigo
            .scroll(length, axis)
            .map_err(|e| InputError::Inject(e.to_string()))
    }

    fn key(&mut self, code: KeyCode, press: Press) -> Result<(), InputError> {
        let key = platform_key(code)?;
        self.enigo
            .key(key, Self::map_direction(press))
            .map_err(|e| InputError::Inject(e.to_string()))
    }
}

#[cfg(target_os = "windows")]
fn platform_key(code: KeyCode) -> Result<Key, InputError> {
    Ok(Key::Other(u32::from(code)))
}

#[cfg(not(target_os = "windows"))]
fn platform_key(code: KeyCode) -> Result<Key, InputError> {
    let key = match code {
        0x10 => Key::Shift,
        0x11 => Key::Control,
        0x12 => Key::Alt,
        0x5B => Key::Meta,
        0x20 => Key::Space,
        0x0D => Key::Return,
        0x08 => Key::Backspace,
        0x2E => Key::Delete,
        0x09 => Key::Tab,
        0x1B => Key::Escape,
        0x14 => Key::CapsLock,
        0x25 => Key::LeftArrow,
        0x27 => Key::RightArrow,
        0x26 => Key::UpArrow,
        0x28 => Key::DownArrow,
        0x70 => Key::F1,
        0x71 => Key::F2,
        0x72 => Key::F3,
        0x73 => Key::F4,
        0x74 => Key::F5,
        0x75 => Key::F6,
        0x76 => Key::F7,
        0x77 => Key::F8,
        0x78 => Key::F9,
        0x79 => Key::F10,
        0x7A => Key::F11,
        0x7B => Key::F12,
        #[cfg(target_os = "linux")]
        0x2D => Key::Other(0xff63),
        #[cfg(target_os = "linux")]
        0x2C => Key::Other(0xff61),
        #[cfg(not(target_os = "linux"))]
        0x2C | 0x2D => return Err(InputError::UnsupportedKey(code)),
        0x30..=0x39 | 0x41..=0x5A => {
            Key::Unicode(char::from(code as u8).to_ascii_lowercase())
        }
        0xBA => Key::Unicode(';'),
        0xBB => Key::Unicode('='),
        0xBC => Key::Unicode(','),
        0xBD => Key::Unicode('-'),
        0xBE => Key::Unicode('.'),
        0xBF => Key::Unicode('/'),
        0xC0 => Key::Unicode('`'),
        0xDB => Key::Unicode('['),
        0xDC => Key::Unicode('\\'),
        0xDD => Key::Unicode(']'),
        0xDE => Key::Unicode('\''),
        other => match char::from_u32(u32::from(other)) {
            Some(c) if !c.is_control() => Key::Unicode(c.to_lowercase().next().unwrap_or(c)),
            _ => return Err(InputError::UnsupportedKey(other)),
        },
    };
    Ok(key)
}
