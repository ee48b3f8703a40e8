#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

/// The common camera interface and the dispatching camera type.
pub mod camera;

/// Error types for the camera module.
pub mod error;

/// Extrinsic pose of a camera.
pub mod extrinsic;

/// Intrinsic focal length, principal point and skew.
pub mod intrinsic;

/// Reading and writing camera models as json files.
pub mod io;

/// Concrete lens models.
pub mod models;

/// Stereo rectification and ray triangulation.
pub mod stereo;

pub use crate::camera::{BackprojectSettings, Camera, CameraModel, SENTINEL};
pub use crate::error::CameraError;
pub use crate::extrinsic::CameraExtrinsic;
pub use crate::intrinsic::CameraIntrinsic;
pub use crate::models::{BrownConrady, GenFTanTheta, GenFTheta, Kannala, Pinhole};
