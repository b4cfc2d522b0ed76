//! midi2roll: MIDI to player-piano roll image converter.
//!
//! Converts a Standard MIDI File into a tall grayscale bitmap of a paper
//! roll, with the holes a reproducing piano or player organ would read.
//! Supported tracker bars: 88-Note, Ampico A, Ampico B and the Aeolian
//! 176-note (Duo-Art) organ.
//!
//! # Example
//! ```no_run
//! use midi2roll::{convert_file, RollConfig};
//!
//! let roll = convert_file("path/to/song.mid", "88-Note", RollConfig::default()).unwrap();
//! println!("{} x {} px", roll.summary.width_px, roll.summary.height_px);
//! roll.save_png("song tempo80.png").unwrap();
//! ```

pub mod acceleration;
pub mod config;
pub mod converter;
pub mod error;
pub mod geometry;
pub mod midi;
pub mod model;
pub mod raster;
pub mod tracker_bar;
pub mod units;

#[cfg(target_os = "android")]
pub mod android;

use std::path::Path;

pub use config::{RollConfig, RollLayout};
pub use converter::{ConversionState, ConvertedRoll, RollConverter, RollSummary};
pub use error::{Result, RollError};
pub use midi::{parse_smf, read_smf};
pub use model::*;
pub use raster::encode::{encode_png, write_png};
pub use raster::RollImage;
pub use tracker_bar::{DuoArtSettings, TrackerBar, TrackerBarKind};

/// Convert an already parsed event stream.
pub fn convert_stream(
    stream: &EventStream,
    tracker_name: &str,
    config: RollConfig,
) -> Result<ConvertedRoll> {
    RollConverter::new(tracker_name, config)?.convert(stream)
}

/// Convert SMF bytes.
pub fn convert_bytes(data: &[u8], tracker_name: &str, config: RollConfig) -> Result<ConvertedRoll> {
    // Reject bad configs before parsing.
    let mut converter = RollConverter::new(tracker_name, config)?;
    let stream = parse_smf(data)?;
    converter.convert(&stream)
}

/// Convert a MIDI file from a path.
pub fn convert_file<P: AsRef<Path>>(
    path: P,
    tracker_name: &str,
    config: RollConfig,
) -> Result<ConvertedRoll> {
    let path = path.as_ref();
    let data = std::fs::read(path)?;
    convert_bytes(&data, tracker_name, config)
}

/// Convert a MIDI file and write the roll as a DPI-tagged PNG.
pub fn convert_file_to_png<P: AsRef<Path>, Q: AsRef<Path>>(
    midi_path: P,
    png_path: Q,
    tracker_name: &str,
    config: RollConfig,
) -> Result<RollSummary> {
    let roll = convert_file(midi_path, tracker_name, config)?;
    roll.save_png(png_path)?;
    Ok(roll.summary)
}

/// Suggested output file name: `"<midi stem> tempo<N>.png"`.
pub fn default_output_name<P: AsRef<Path>>(midi_path: P, tempo: u32) -> String {
    let stem = midi_path
        .as_ref()
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "roll".to_string());
    format!("{stem} tempo{tempo}.png")
}

/// Convert to PNG with a JSON config, returning the summary as JSON.
/// Shared by the C and JNI entry points. A missing or empty config uses
/// the defaults.
pub fn convert_file_to_png_json(
    midi_path: &str,
    tracker_name: &str,
    config_json: Option<&str>,
    png_path: &str,
) -> Result<String> {
    let config = match config_json {
        Some(json) if !json.trim().is_empty() => RollConfig::from_json(json)?,
        _ => RollConfig::default(),
    };
    let summary = convert_file_to_png(midi_path, png_path, tracker_name, config)?;
    Ok(serde_json::to_string(&summary)?)
}

// ═══════════════════════════════════════════════════════════════════════
// C FFI for native hosts (static library / cdylib)
// ═══════════════════════════════════════════════════════════════════════

use std::ffi::{CStr, CString};
use std::os::raw::c_char;

unsafe fn opt_str<'a>(ptr: *const c_char) -> Option<&'a str> {
    if ptr.is_null() {
        None
    } else {
        unsafe { CStr::from_ptr(ptr) }.to_str().ok()
    }
}

/// Convert a MIDI file to a PNG roll image.
/// Returns the roll summary as a JSON C string, or null on failure.
/// The caller must free the returned string with `midi2roll_free_string`.
///
/// `config_json` may be null to use the default config.
///
/// # Safety
/// `midi_path`, `tracker_name` and `png_path` must be valid null-terminated
/// UTF-8 C strings. `config_json` must be null or one as well.
#[no_mangle]
pub unsafe extern "C" fn midi2roll_convert_file(
    midi_path: *const c_char,
    tracker_name: *const c_char,
    config_json: *const c_char,
    png_path: *const c_char,
) -> *mut c_char {
    let (Some(midi), Some(tracker), Some(png)) = (
        unsafe { opt_str(midi_path) },
        unsafe { opt_str(tracker_name) },
        unsafe { opt_str(png_path) },
    ) else {
        return std::ptr::null_mut();
    };
    let config = unsafe { opt_str(config_json) };

    match convert_file_to_png_json(midi, tracker, config, png) {
        Ok(json) => CString::new(json).unwrap_or_default().into_raw(),
        Err(e) => {
            tracing::warn!("midi2roll_convert_file: {e}");
            std::ptr::null_mut()
        }
    }
}

/// Free a string previously returned by midi2roll functions.
///
/// # Safety
/// `ptr` must be a string previously returned by a midi2roll function, or null.
#[no_mangle]
pub unsafe extern "C" fn midi2roll_free_string(ptr: *mut c_char) {
    if !ptr.is_null() {
        unsafe {
            let _ = CString::from_raw(ptr);
        }
    }
}
