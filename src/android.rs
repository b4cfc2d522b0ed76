//! JNI bindings for Android.
//!
//! These functions are called from Kotlin via the JNI bridge.

use jni::objects::{JClass, JString};
use jni::sys::jstring;
use jni::JNIEnv;

use crate::convert_file_to_png_json;

fn read_string(env: &mut JNIEnv, value: &JString) -> Option<String> {
    if value.is_null() {
        return None;
    }
    env.get_string(value).ok().map(|s| s.into())
}

/// Convert a MIDI file to a PNG roll image and return the roll summary
/// as JSON, or null on failure.
///
/// Called from Kotlin as:
///   external fun convertFile(midiPath: String, trackerName: String, configJson: String?, pngPath: String): String?
#[no_mangle]
pub extern "system" fn Java_com_midi2roll_app_RollLib_convertFile(
    mut env: JNIEnv,
    _class: JClass,
    midi_path: JString,
    tracker_name: JString,
    config_json: JString,
    png_path: JString,
) -> jstring {
    let (Some(midi), Some(tracker), Some(png)) = (
        read_string(&mut env, &midi_path),
        read_string(&mut env, &tracker_name),
        read_string(&mut env, &png_path),
    ) else {
        return std::ptr::null_mut();
    };
    let config = read_string(&mut env, &config_json);

    match convert_file_to_png_json(&midi, &tracker, config.as_deref(), &png) {
        Ok(json) => match env.new_string(&json) {
            Ok(js) => js.into_raw(),
            Err(_) => std::ptr::null_mut(),
        },
        Err(e) => {
            tracing::warn!("convertFile: {e}");
            std::ptr::null_mut()
        }
    }
}
