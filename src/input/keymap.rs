use std::collections::HashMap;

use once_cell::sync::Lazy;
use tracing::debug;

use crate::{error::agent_error::AgentError, input::KeyCode};

pub const SHIFT: KeyCode = 0x10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Keystroke {
    Single(KeyCode),
    /// Symbols that need a modifier held, e.g. `!` is shift+1.
    Modified { modifier: &'static str, code: KeyCode },
}

static KEY_TABLE: Lazy<HashMap<&'static str, Keystroke>> = Lazy::new(|| {
    use Keystroke::{Modified, Single};
    let shifted = |code| Modified {
        modifier: "shift",
        code,
    };

    let mut table = HashMap::from([
        ("shift", Single(SHIFT)),
        ("ctrl", Single(0x11)),
        ("alt", Single(0x12)),
        ("windows", Single(0x5B)),
        ("win", Single(0x5B)),
        ("space", Single(0x20)),
        ("enter", Single(0x0D)),
        ("backspace", Single(0x08)),
        ("delete", Single(0x2E)),
        ("tab", Single(0x09)),
        ("esc", Single(0x1B)),
        ("capslock", Single(0x14)),
        ("left", Single(0x25)),
        ("right", Single(0x27)),
        ("up", Single(0x26)),
        ("down", Single(0x28)),
        ("insert", Single(0x2D)),
        ("printscreen", Single(0x2C)),
        ("\n", Single(0x0D)),
        (" ", Single(0x20)),
        ("\t", Single(0x09)),
        ("!", shifted(0x31)),
        ("@", shifted(0x32)),
        ("#", shifted(0x33)),
        ("$", shifted(0x34)),
        ("%", shifted(0x35)),
        ("^", shifted(0x36)),
        ("&", shifted(0x37)),
        ("*", shifted(0x38)),
        ("(", shifted(0x39)),
        (")", shifted(0x30)),
        ("-", Single(0xBD)),
        ("_", shifted(0xBD)),
        ("=", Single(0xBB)),
        ("+", shifted(0xBB)),
        (",", Single(0xBC)),
        ("<", shifted(0xBC)),
        (".", Single(0xBE)),
        (">", shifted(0xBE)),
        (";", Single(0xBA)),
        (":", shifted(0xBA)),
        ("\\", Single(0xDC)),
        ("|", shifted(0xDC)),
        ("/", Single(0xBF)),
        ("?", shifted(0xBF)),
        ("`", Single(0xC0)),
        ("~", shifted(0xC0)),
        ("[", Single(0xDB)),
        ("{", shifted(0xDB)),
        ("]", Single(0xDD)),
        ("}", shifted(0xDD)),
        ("'", Single(0xDE)),
        ("\"", shifted(0xDE)),
    ]);

    const FUNCTION_KEYS: [&str; 12] = [
        "f1", "f2", "f3", "f4", "f5", "f6", "f7", "f8", "f9", "f10", "f11", "f12",
    ];
    for (offset, name) in (0u16..).zip(FUNCTION_KEYS) {
        table.insert(name, Single(0x70 + offset));
    }
    table
});

/// Looks a human-readable key name up in the static table.
///
/// Named keys are matched case-insensitively ("Enter" == "enter"); single
/// characters are matched exactly so that `A` is not mistaken for `a`.
pub fn lookup(key: &str) -> Option<Keystroke> {
    if let Some(stroke) = KEY_TABLE.get(key) {
        return Some(*stroke);
    }
    if key.chars().count() > 1 {
        return KEY_TABLE.get(key.to_lowercase().as_str()).copied();
    }
    None
}

/// Characters outside the table fall back to their uppercase character code.
pub fn fallback_code(key: &str) -> Result<KeyCode, AgentError> {
    let mut chars = key.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => {
            let upper = c.to_uppercase().next().unwrap_or(c);
            let code = KeyCode::try_from(upper as u32)
                .map_err(|_| AgentError::UnknownKey(key.to_string()))?;
            // outside ASCII this is a raw character code, not a real virtual key
            debug!(key, code, ascii = upper.is_ascii(), "key not in table, using its character code");
            Ok(code)
        }
        _ => Err(AgentError::UnknownKey(key.to_string())),
    }
}

/// Resolves a key name into the codes that must be held together to produce it.
pub fn resolve_codes(key: &str) -> Result<Vec<KeyCode>, AgentError> {
    match lookup(key) {
        Some(Keystroke::Single(code)) => Ok(vec![code]),
        Some(Keystroke::Modified { modifier, code }) => {
            let mut codes = resolve_codes(modifier)?;
            codes.push(code);
            Ok(codes)
        }
        None => fallback_code(key).map(|code| vec![code]),
    }
}
