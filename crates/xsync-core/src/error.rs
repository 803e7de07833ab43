//! Error taxonomy and process return codes
//!
//! Every failure from the decode library, the resampler or the FFT is mapped
//! into [`SyncError`] at the component boundary. The CLI turns a `SyncError`
//! into a [`ReturnCode`] and a single diagnostic line.

use std::collections::TryReserveError;
use std::io::ErrorKind;
use std::path::PathBuf;

use symphonia::core::errors::Error as SymphoniaError;
use thiserror::Error;

/// Errors that can occur while extracting or correlating audio
#[derive(Error, Debug)]
pub enum SyncError {
    #[error("Invalid arguments: {0}")]
    ArgumentsInvalid(String),

    #[error("Cannot open file: {path}")]
    FileNotFound {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid format: {0}")]
    FormatInvalid(String),

    #[error("Invalid channel: requested channel {requested}, stream has {available}")]
    ChannelInvalid { requested: usize, available: usize },

    #[error("Invalid data: {0}")]
    DataInvalid(String),

    #[error("Not enough memory")]
    NotEnoughMemory,

    #[error("Unsupported: {0}")]
    Unsupported(String),

    #[error("Signal is empty, nothing to correlate")]
    EmptySignal,

    #[error("Unknown error: {0}")]
    Unknown(String),
}

pub type Result<T> = std::result::Result<T, SyncError>;

/// Process exit codes reported by the command-line tool
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum ReturnCode {
    Success = 0,
    CannotOpenFile = 1,
    NotEnoughMemory = 2,
    DataInvalid = 3,
    ArgumentsInvalid = 4,
    FormatInvalid = 5,
    Unsupported = 20,
    Unknown = 255,
}

impl ReturnCode {
    /// Numeric value used as the process exit status
    pub fn code(self) -> u8 {
        self as u8
    }
}

impl SyncError {
    /// Collapse the error into the fixed set of return codes
    pub fn return_code(&self) -> ReturnCode {
        match self {
            SyncError::ArgumentsInvalid(_) => ReturnCode::ArgumentsInvalid,
            SyncError::FileNotFound { .. } => ReturnCode::CannotOpenFile,
            SyncError::FormatInvalid(_) | SyncError::ChannelInvalid { .. } => {
                ReturnCode::FormatInvalid
            }
            SyncError::DataInvalid(_) | SyncError::EmptySignal => ReturnCode::DataInvalid,
            SyncError::NotEnoughMemory => ReturnCode::NotEnoughMemory,
            SyncError::Unsupported(_) => ReturnCode::Unsupported,
            SyncError::Unknown(_) => ReturnCode::Unknown,
        }
    }

    /// Map an error raised while opening a container or its codec.
    ///
    /// Anything the probe or codec registry rejects is a format problem.
    pub(crate) fn from_open(err: SymphoniaError) -> Self {
        match err {
            SymphoniaError::IoError(e)
                if matches!(e.kind(), ErrorKind::UnexpectedEof | ErrorKind::InvalidData) =>
            {
                SyncError::FormatInvalid(format!("unreadable container: {}", e))
            }
            SymphoniaError::IoError(e) => Self::from_io(e),
            SymphoniaError::DecodeError(msg) => SyncError::FormatInvalid(msg.to_string()),
            SymphoniaError::Unsupported(what) => {
                SyncError::FormatInvalid(format!("unsupported {}", what))
            }
            SymphoniaError::LimitError(what) => SyncError::FormatInvalid(format!("limit: {}", what)),
            SymphoniaError::ResetRequired => {
                SyncError::Unsupported("decoder is not ready".to_string())
            }
            other => SyncError::Unknown(other.to_string()),
        }
    }

    /// Map an error raised after decoding has started.
    pub(crate) fn from_decode(err: SymphoniaError) -> Self {
        match err {
            SymphoniaError::IoError(e) => Self::from_io(e),
            SymphoniaError::DecodeError(msg) => SyncError::DataInvalid(msg.to_string()),
            SymphoniaError::Unsupported(what) => {
                SyncError::Unsupported(format!("unsupported {}", what))
            }
            SymphoniaError::ResetRequired => {
                SyncError::Unsupported("decoder is not ready".to_string())
            }
            other => SyncError::Unknown(other.to_string()),
        }
    }

    fn from_io(err: std::io::Error) -> Self {
        match err.kind() {
            ErrorKind::OutOfMemory => SyncError::NotEnoughMemory,
            ErrorKind::InvalidData | ErrorKind::UnexpectedEof => {
                SyncError::DataInvalid(err.to_string())
            }
            _ => SyncError::Unknown(err.to_string()),
        }
    }
}

impl From<TryReserveError> for SyncError {
    fn from(_: TryReserveError) -> Self {
        SyncError::NotEnoughMemory
    }
}
