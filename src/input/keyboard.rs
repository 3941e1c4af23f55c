use tracing::debug;

use crate::{
    error::Result,
    input::{
        Desktop, KeyCode, Press, Screenshot,
        keymap::{self, Keystroke},
    },
};

impl Desktop {
    fn tap_key(&mut self, key: &str) -> Result<()> {
        match keymap::lookup(key) {
            Some(Keystroke::Single(code)) => {
                self.backend.key(code, Press::Down)?;
                self.backend.key(code, Press::Up)?;
            }
            Some(Keystroke::Modified { modifier, code }) => {
                let mut codes = keymap::resolve_codes(modifier)?;
                codes.push(code);
                self.hold_and_release(&codes)?;
            }
            None => {
                let code = keymap::fallback_code(key)?;
                self.backend.key(code, Press::Down)?;
                self.backend.key(code, Press::Up)?;
            }
        }
        Ok(())
    }

    /// Presses every key in order, then releases them in exactly reverse order.
    fn chord<S: AsRef<str>>(&mut self, keys: &[S]) -> Result<()> {
        let mut codes = Vec::with_capacity(keys.len());
        for key in keys {
            codes.extend(keymap::resolve_codes(key.as_ref())?);
        }
        self.hold_and_release(&codes)
    }

    fn hold_and_release(&mut self, codes: &[KeyCode]) -> Result<()> {
        for code in codes {
            self.backend.key(*code, Press::Down)?;
        }
        for code in codes.iter().rev() {
            self.backend.key(*code, Press::Up)?;
        }
        Ok(())
    }

    pub fn press_key(&mut self, key: &str) -> Result<Screenshot> {
        debug!(key, "press key");
        self.tap_key(key)?;
        self.capture()
    }

    pub fn key_combination<S: AsRef<str>>(&mut self, keys: &[S]) -> Result<Screenshot> {
        self.chord(keys)?;
        self.capture()
    }

    pub fn type_string(&mut self, text: &str) -> Result<Screenshot> {
        debug!(chars = text.chars().count(), "type string");
        let mut buffer = [0u8; 4];
        for c in text.chars() {
            let key: &str = c.encode_utf8(&mut buffer);
            if c.is_uppercase() {
                self.chord(&["shift", key])?;
            } else {
                // digits, lowercase letters and symbols all go through the key table
                self.tap_key(key)?;
            }
        }
        self.capture()
    }
}
