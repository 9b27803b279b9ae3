// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
// Version information for the captcha engine

/// Full version string with feature description
pub const VERSION: &str = "v0.1.0-fisheye-sessions-2026-10-18";

/// Semantic version number
pub const VERSION_NUMBER: &str = "0.1.0";

/// Major version number
pub const VERSION_MAJOR: u32 = 0;

/// Minor version number
pub const VERSION_MINOR: u32 = 1;

/// Patch version number
pub const VERSION_PATCH: u32 = 0;

/// Build date
pub const BUILD_DATE: &str = "2026-10-18";

/// Supported features in this version
pub const FEATURES: &[&str] = &[
    "fisheye-removal",
    "strength-search",
    "fixed-band-segmentation",
    "position-marking",
    "remote-classifier",
    "concurrent-classification",
    "session-retry",
    "cookie-continuity",
    "cancellation",
    "outcome-reporting",
    "training-noise",
];

/// Get formatted version string for logging
pub fn get_version_string() -> String {
    format!("Captcha Engine {} ({})", VERSION_NUMBER, BUILD_DATE)
}

/// Get full version info as JSON
pub fn get_version_info() -> serde_json::Value {
    serde_json::json!({
        "version": VERSION_NUMBER,
        "build": VERSION,
        "date": BUILD_DATE,
        "features": FEATURES,
    })
}
