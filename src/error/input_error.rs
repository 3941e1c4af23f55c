#[derive(Debug, thiserror::Error)]
pub enum InputError {
    #[error("failed to initialise input backend: {0}")]
    Init(String),

    #[error("input injection failed: {0}")]
    Inject(String),

    #[error("screen capture failed: {0}")]
    Capture(String),

    #[error("screenshot encoding failed: {0}")]
    Encode(#[from] image::ImageError),

    #[error("key {0:#04x} cannot be injected on this platform")]
    UnsupportedKey(u16),
}
