use thiserror::Error;

/// Everything that can reject a conversion.
///
/// Stream anomalies (duplicate note-offs, out-of-range notes) are not
/// errors; the converter skips and logs them.
#[derive(Error, Debug)]
pub enum RollError {
    #[error("Unknown tracker bar: {0}")]
    UnknownTrackerBar(String),

    #[error("Invalid roll config: {0}")]
    InvalidConfig(String),

    #[error("Invalid tempo event at tick {tick}: {us_per_beat} µs per beat")]
    InvalidTempo { tick: u64, us_per_beat: u32 },

    #[error("Unsupported MIDI timing: {0}")]
    UnsupportedTiming(String),

    #[error("MIDI parse error: {0}")]
    Midi(#[from] midly::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("PNG encoding error: {0}")]
    Png(#[from] png::EncodingError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Converter session already finished")]
    SessionFinished,
}

pub type Result<T> = std::result::Result<T, RollError>;
