/// An error type for the camera module.
#[derive(thiserror::Error, Debug)]
pub enum CameraError {
    /// A parameter has the wrong shape or value, or a model file is not usable.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Error to open, read or write a model file.
    #[error("Failed to manipulate the file. {0}")]
    FileError(#[from] std::io::Error),

    /// Error to decode or encode the json content of a model file.
    #[error("Failed to parse the model file. {0}")]
    JsonError(#[from] serde_json::Error),
}

impl CameraError {
    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        CameraError::InvalidArgument(msg.into())
    }
}
