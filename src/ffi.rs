//! FFI bindings for Gait Flux
//!
//! This module provides C-compatible functions for calling the engine from the
//! mobile host app. All functions use C strings (null-terminated) and return
//! allocated memory that must be freed by the caller using `gait_free_string`.

use std::cell::RefCell;
use std::ffi::{CStr, CString};
use std::os::raw::c_char;
use std::ptr;

use chrono::{TimeZone, Utc};

use crate::pipeline::{session_to_gait_score, GaitAnalyzer};
use crate::GAIT_FLUX_VERSION;

// Thread-local storage for the last error message
thread_local! {
    static LAST_ERROR: RefCell<Option<CString>> = const { RefCell::new(None) };
}

fn set_last_error(msg: &str) {
    LAST_ERROR.with(|e| {
        *e.borrow_mut() = CString::new(msg).ok();
    });
}

fn clear_last_error() {
    LAST_ERROR.with(|e| {
        *e.borrow_mut() = None;
    });
}

/// Helper to convert C string to Rust string
unsafe fn cstr_to_string(ptr: *const c_char) -> Option<String> {
    if ptr.is_null() {
        return None;
    }
    CStr::from_ptr(ptr).to_str().ok().map(|s| s.to_string())
}

/// Helper to convert Rust string to C string (caller must free)
fn string_to_cstr(s: &str) -> *mut c_char {
    match CString::new(s) {
        Ok(cstr) => cstr.into_raw(),
        Err(_) => ptr::null_mut(),
    }
}

// ============================================================================
// Stateless API
// ============================================================================

/// Analyze a recording session JSON and return GaitScore JSON.
///
/// # Safety
/// - `json` must be a valid null-terminated C string.
/// - Returns a newly allocated string that must be freed with `gait_free_string`.
/// - Returns NULL on error; call `gait_last_error` to get the error message.
#[no_mangle]
pub unsafe extern "C" fn gait_analyze_session(json: *const c_char) -> *mut c_char {
    clear_last_error();

    let json_str = match cstr_to_string(json) {
        Some(s) => s,
        None => {
            set_last_error("Invalid JSON string pointer");
            return ptr::null_mut();
        }
    };

    match session_to_gait_score(json_str) {
        Ok(result) => string_to_cstr(&result),
        Err(e) => {
            set_last_error(&e.to_string());
            ptr::null_mut()
        }
    }
}

// ============================================================================
// Configured Analyzer API
// ============================================================================

/// Opaque handle to a GaitAnalyzer
pub struct GaitAnalyzerHandle {
    analyzer: GaitAnalyzer,
}

/// Create a new GaitAnalyzer.
///
/// A non-positive `sampling_rate_hz` lets each session decide its own rate.
///
/// # Safety
/// - Returns a pointer to a newly allocated GaitAnalyzer.
/// - Must be freed with `gait_analyzer_free`.
/// - Returns NULL on error.
#[no_mangle]
pub unsafe extern "C" fn gait_analyzer_new(sampling_rate_hz: f64) -> *mut GaitAnalyzerHandle {
    clear_last_error();

    let analyzer = if sampling_rate_hz > 0.0 {
        match GaitAnalyzer::with_sampling_rate(sampling_rate_hz) {
            Ok(analyzer) => analyzer,
            Err(e) => {
                set_last_error(&e.to_string());
                return ptr::null_mut();
            }
        }
    } else {
        GaitAnalyzer::new()
    };

    Box::into_raw(Box::new(GaitAnalyzerHandle { analyzer }))
}

/// Free a GaitAnalyzer.
///
/// # Safety
/// - `analyzer` must be a valid pointer returned by `gait_analyzer_new`.
/// - After calling this function, the pointer is invalid.
#[no_mangle]
pub unsafe extern "C" fn gait_analyzer_free(analyzer: *mut GaitAnalyzerHandle) {
    if !analyzer.is_null() {
        drop(Box::from_raw(analyzer));
    }
}

/// Analyze a recording session JSON with a configured analyzer.
///
/// # Safety
/// - `analyzer` must be a valid pointer returned by `gait_analyzer_new`.
/// - `json` must be a valid null-terminated C string.
/// - Returns a newly allocated string that must be freed with `gait_free_string`.
/// - Returns NULL on error; call `gait_last_error` to get the error message.
#[no_mangle]
pub unsafe extern "C" fn gait_analyzer_process(
    analyzer: *const GaitAnalyzerHandle,
    json: *const c_char,
) -> *mut c_char {
    clear_last_error();

    if analyzer.is_null() {
        set_last_error("Null analyzer pointer");
        return ptr::null_mut();
    }

    let handle = &*analyzer;

    let json_str = match cstr_to_string(json) {
        Some(s) => s,
        None => {
            set_last_error("Invalid JSON string pointer");
            return ptr::null_mut();
        }
    };

    match handle.analyzer.process(&json_str) {
        Ok(result) => string_to_cstr(&result),
        Err(e) => {
            set_last_error(&e.to_string());
            ptr::null_mut()
        }
    }
}

/// Analyze a recording session JSON, stamping the result with a fixed time.
///
/// `analyzed_at_ms` is milliseconds since the Unix epoch (UTC). Identical
/// input and timestamp produce byte-identical output.
///
/// # Safety
/// - `analyzer` must be a valid pointer returned by `gait_analyzer_new`.
/// - `json` must be a valid null-terminated C string.
/// - Returns a newly allocated string that must be freed with `gait_free_string`.
/// - Returns NULL on error; call `gait_last_error` to get the error message.
#[no_mangle]
pub unsafe extern "C" fn gait_analyzer_process_at(
    analyzer: *const GaitAnalyzerHandle,
    json: *const c_char,
    analyzed_at_ms: i64,
) -> *mut c_char {
    clear_last_error();

    if analyzer.is_null() {
        set_last_error("Null analyzer pointer");
        return ptr::null_mut();
    }

    let handle = &*analyzer;

    let json_str = match cstr_to_string(json) {
        Some(s) => s,
        None => {
            set_last_error("Invalid JSON string pointer");
            return ptr::null_mut();
        }
    };

    let analyzed_at = match Utc.timestamp_millis_opt(analyzed_at_ms).single() {
        Some(at) => at,
        None => {
            set_last_error(&format!("Analysis timestamp out of range: {}", analyzed_at_ms));
            return ptr::null_mut();
        }
    };

    match handle.analyzer.process_at(&json_str, analyzed_at) {
        Ok(result) => string_to_cstr(&result),
        Err(e) => {
            set_last_error(&e.to_string());
            ptr::null_mut()
        }
    }
}

// ============================================================================
// Memory Management
// ============================================================================

/// Free a string returned by Gait Flux functions.
///
/// # Safety
/// - `ptr` must be a valid pointer returned by a Gait Flux function, or NULL.
/// - After calling this function, the pointer is invalid.
#[no_mangle]
pub unsafe extern "C" fn gait_free_string(ptr: *mut c_char) {
    if !ptr.is_null() {
        drop(CString::from_raw(ptr));
    }
}

// ============================================================================
// Error Handling
// ============================================================================

/// Get the last error message.
///
/// # Safety
/// - Returns a pointer to a thread-local error string.
/// - The returned pointer is valid until the next Gait Flux call on this thread.
/// - Do NOT free the returned pointer.
/// - Returns NULL if no error occurred.
#[no_mangle]
pub unsafe extern "C" fn gait_last_error() -> *const c_char {
    LAST_ERROR.with(|e| match &*e.borrow() {
        Some(cstr) => cstr.as_ptr(),
        None => ptr::null(),
    })
}

/// Get the library version.
///
/// # Safety
/// - Returns a newly allocated string that must be freed with `gait_free_string`.
#[no_mangle]
pub unsafe extern "C" fn gait_version() -> *mut c_char {
    string_to_cstr(GAIT_FLUX_VERSION)
}
