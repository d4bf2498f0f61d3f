use std::path::PathBuf;

/// Errors that can occur while setting up the gauge overlay
///
/// Only startup work can fail: allocating images, loading the system sheet and
/// reading the settings file. Everything that runs per frame is total.
#[derive(Debug, thiserror::Error)]
pub enum GaugeError {
    /// An image could not be allocated
    #[error("failed to create {width}x{height} image")]
    ImageCreate { width: u32, height: u32 },

    /// The system sheet file could not be opened
    #[error("failed to read system sheet {}: {source}", .path.display())]
    SheetIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The system sheet is not a valid PNG
    #[error("failed to decode system sheet: {0}")]
    SheetDecode(#[from] png::DecodingError),

    /// The system sheet decoded but is not palette-indexed
    #[error("system sheet must be an indexed PNG (got {0:?})")]
    UnsupportedSheet(png::ColorType),

    /// The settings file exists but could not be read
    #[error("failed to read settings {}: {source}", .path.display())]
    ConfigIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
