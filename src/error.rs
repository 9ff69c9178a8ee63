// SPDX-License-Identifier: MPL-2.0
use std::fmt;

#[derive(Debug, Clone)]
pub enum Error {
    Io(String),
    Config(String),
    Encode(String),
    Camera(CameraFault),
}

/// Specific fault types for camera acquisition issues.
/// Used to provide user-friendly, localized error messages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CameraFault {
    /// The user or platform refused camera access
    PermissionDenied,

    /// No capture device is present on this machine
    DeviceNotFound,

    /// A capture device exists but another application holds it
    DeviceBusy,

    /// Generic fault with the raw signal from the device layer
    Unknown(String),
}

impl CameraFault {
    /// Returns the i18n message key for this fault type.
    pub fn message_key(&self) -> &'static str {
        match self {
            CameraFault::PermissionDenied => "error-camera-permission-denied",
            CameraFault::DeviceNotFound => "error-camera-not-found",
            CameraFault::DeviceBusy => "error-camera-busy",
            CameraFault::Unknown(_) => "error-camera-general",
        }
    }

    /// Attempts to parse a raw device-layer signal into a specific fault.
    /// This is used to categorize errors from platform capture backends,
    /// which surface either DOM-style exception names or free-form text.
    pub fn from_signal(signal: &str) -> Self {
        let signal_lower = signal.to_lowercase();

        // Permission checks come first ("not allowed" must not fall
        // through to the "not found" branch below)
        if signal_lower.contains("notallowederror")
            || signal_lower.contains("permissiondeniederror")
            || signal_lower.contains("permission denied")
            || signal_lower.contains("not allowed")
        {
            return CameraFault::PermissionDenied;
        }

        // Missing hardware
        if signal_lower.contains("notfounderror")
            || signal_lower.contains("devicesnotfounderror")
            || signal_lower.contains("no camera")
            || signal_lower.contains("not found")
        {
            return CameraFault::DeviceNotFound;
        }

        // Device held by someone else
        if signal_lower.contains("notreadableerror")
            || signal_lower.contains("trackstarterror")
            || signal_lower.contains("in use")
            || signal_lower.contains("busy")
        {
            return CameraFault::DeviceBusy;
        }

        CameraFault::Unknown(signal.to_string())
    }
}

impl fmt::Display for CameraFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CameraFault::PermissionDenied => write!(
                f,
                "Camera access denied. Please allow camera access in your device settings."
            ),
            CameraFault::DeviceNotFound => write!(f, "No camera found on this device."),
            CameraFault::DeviceBusy => {
                write!(f, "Camera is in use by another application.")
            }
            CameraFault::Unknown(signal) => {
                write!(f, "Could not access the camera: {}", signal)
            }
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Io(e) => write!(f, "I/O Error: {}", e),
            Error::Config(e) => write!(f, "Config Error: {}", e),
            Error::Encode(e) => write!(f, "Encode Error: {}", e),
            Error::Camera(e) => write!(f, "Camera Error: {}", e),
        }
    }
}

impl From<CameraFault> for Error {
    fn from(err: CameraFault) -> Self {
        Error::Camera(err)
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err.to_string())
    }
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Error::Config(err.to_string())
    }
}

impl From<toml::ser::Error> for Error {
    fn from(err: toml::ser::Error) -> Self {
        Error::Config(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
