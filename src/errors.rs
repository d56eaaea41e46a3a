use std::fmt;

/// Custom error type that includes exit codes
#[derive(Debug)]
pub enum A11yprobeError {
    /// A scan was prevented from producing a usable result (exit code 2)
    ScanPrevented(String),
    /// The supervised watch process exited with an error (exit code 3)
    WatchFailed { code: i32, stderr: String },
    /// WebDriver connection failed (exit code 4)
    WebDriverFailed(String),
    /// Operation timeout (exit code 5)
    Timeout(String),
    /// Generic error (exit code 1)
    Other(anyhow::Error),
}

impl A11yprobeError {
    /// Get the exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            A11yprobeError::ScanPrevented(_) => 2,
            A11yprobeError::WatchFailed { .. } => 3,
            A11yprobeError::WebDriverFailed(_) => 4,
            A11yprobeError::Timeout(_) => 5,
            A11yprobeError::Other(_) => 1,
        }
    }
}

impl fmt::Display for A11yprobeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            A11yprobeError::ScanPrevented(msg) => {
                write!(f, "Scan prevented: {}", msg)
            }
            A11yprobeError::WatchFailed { code, stderr } => {
                write!(f, "Watcher exited with error code {}: {}", code, stderr)
            }
            A11yprobeError::WebDriverFailed(msg) => {
                write!(f, "WebDriver connection failed: {}", msg)
            }
            A11yprobeError::Timeout(msg) => {
                write!(f, "Operation timed out: {}", msg)
            }
            A11yprobeError::Other(err) => write!(f, "{}", err),
        }
    }
}

impl std::error::Error for A11yprobeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            A11yprobeError::Other(err) => Some(err.as_ref()),
            _ => None,
        }
    }
}

impl From<anyhow::Error> for A11yprobeError {
    fn from(err: anyhow::Error) -> Self {
        // Surface typed errors raised deeper in the stack before falling
        // back to message sniffing
        match err.downcast::<A11yprobeError>() {
            Ok(typed) => typed,
            Err(err) => {
                let msg = err.to_string();
                if msg.contains("Scan prevented") {
                    A11yprobeError::ScanPrevented(msg)
                } else if msg.contains("WebDriver") || msg.contains("webdriver") {
                    A11yprobeError::WebDriverFailed(msg)
                } else if msg.contains("timed out") || msg.contains("timeout") {
                    A11yprobeError::Timeout(msg)
                } else {
                    A11yprobeError::Other(err)
                }
            }
        }
    }
}

#[cfg(test)]
#[path = "errors_test.rs"]
mod errors_test;
