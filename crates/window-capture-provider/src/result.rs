use core::fmt::Display;

use thiserror::Error;

/// A shortcut for `Result<T, CallError>`.
pub type LabelledResult<T> = Result<T, CallError>;

/// A window-system call failure wrapped with the name of the call that triggered it.
#[derive(Debug, Error)]
pub struct CallError {
    call: &'static str,
    #[source]
    source: CallErrorSource,
}

/// Possible sources for a [CallError].
#[derive(Debug, Error)]
pub enum CallErrorSource {
    /// A [windows_result::Error].
    #[cfg(windows)]
    #[error(transparent)]
    WindowsError(#[from] windows_result::Error),

    /// A raw error code reported by the window system.
    #[error("Code: {0:#x}")]
    Code(u32),

    /// The call reported failure without any further detail.
    #[error("The call reported failure")]
    Failed,
}

impl CallError {
    /// Create a CallError from a `windows_result::Error` and a label.
    #[cfg(windows)]
    pub fn new(source: windows_result::Error, call: &'static str) -> Self {
        Self {
            call,
            source: source.into(),
        }
    }

    /// Create a CallError from the calling thread's last error, if one is set.
    #[cfg(windows)]
    pub fn from_last_error(call: &'static str) -> Self {
        let code = unsafe { windows::Win32::Foundation::GetLastError() };

        if code.0 == 0 {
            return Self::failed(call);
        }

        Self::from_code(code.0, call)
    }

    /// Create a new CallError from a raw error code and a label.
    pub fn from_code(code: u32, call: &'static str) -> Self {
        Self {
            call,
            source: CallErrorSource::Code(code),
        }
    }

    /// Create a new CallError for a call that only reports success or failure.
    pub fn failed(call: &'static str) -> Self {
        Self {
            call,
            source: CallErrorSource::Failed,
        }
    }

    /// The name of the call that failed.
    pub fn call(&self) -> &'static str {
        self.call
    }
}

impl Display for CallError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "Window system {} call failed:\n{}", self.call, self.source)
    }
}
