#[derive(Debug, thiserror::Error)]
pub enum TrackError {
    #[error("GPX parse error: {0}")]
    Gpx(#[from] gpx::errors::GpxError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, TrackError>;
