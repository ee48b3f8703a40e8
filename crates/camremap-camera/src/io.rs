use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use camremap_image::ImageSize;

use crate::camera::{Camera, CameraModel};
use crate::error::CameraError;
use crate::extrinsic::{triple, CameraExtrinsic};
use crate::models::{BrownConrady, GenFTanTheta, GenFTheta, Kannala, Pinhole};

const EXPORT_NOTE: &str = "This model was exported by camremap. It is not the original camera \
model and its parameters may have been modified. For full metadata, contact the calibration supplier.";

const COORDINATE_CONVENTION: &str = "TL0_0";

const EXTRINSICS_CLASS_NAME: &str = "RealObject";

#[derive(Debug, Default, Serialize, Deserialize)]
struct MetaData {
    #[serde(rename = "Note", default)]
    note: String,
}

#[derive(Debug, Serialize, Deserialize)]
struct IntrinsicsRecord {
    class_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    image_size: Option<Vec<usize>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    coordinate_convention: Option<String>,
    #[serde(flatten)]
    parameters: BTreeMap<String, Value>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct ExtrinsicsRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    rotation: Option<Vec<f64>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    translation: Option<Vec<f64>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    class_name: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
struct ModelFile {
    #[serde(rename = "MetaData", default)]
    meta_data: MetaData,
    #[serde(rename = "Intrinsics")]
    intrinsics: IntrinsicsRecord,
    #[serde(rename = "Extrinsics", default)]
    extrinsics: ExtrinsicsRecord,
}

/// The `class_name` tag written for a model.
fn class_name_of(model_name: &str) -> Result<&'static str, CameraError> {
    match model_name {
        Pinhole::MODEL_NAME => Ok("PinholeModel"),
        BrownConrady::MODEL_NAME => Ok("BrownConradyModel"),
        GenFTanTheta::MODEL_NAME => Ok("GenFTanThetaModel"),
        GenFTheta::MODEL_NAME => Ok("GenFThetaModel"),
        Kannala::MODEL_NAME => Ok("KannalaModel"),
        other => Err(CameraError::invalid(format!(
            "{other} models cannot be saved"
        ))),
    }
}

fn parameter_values(label: &str, value: &Value) -> Result<Vec<f64>, CameraError> {
    let values = match value {
        Value::Number(n) => n.as_f64().map(|v| vec![v]),
        Value::Array(items) => items.iter().map(Value::as_f64).collect::<Option<Vec<_>>>(),
        _ => None,
    };
    values.ok_or_else(|| {
        CameraError::invalid(format!("{label} must be a number or an array of numbers"))
    })
}

fn image_size_from(values: &[usize]) -> Result<ImageSize, CameraError> {
    match values {
        [width, height] => Ok(ImageSize {
            width: *width,
            height: *height,
        }),
        _ => Err(CameraError::invalid(format!(
            "image_size must have exactly 2 elements, got {}",
            values.len()
        ))),
    }
}

fn check_extension(path: &Path) -> Result<(), CameraError> {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_lowercase())
        .unwrap_or_default();

    if extension != "json" {
        log::warn!("Filetype .{extension} is not implemented: {}", path.display());
        return Err(CameraError::invalid(format!(
            "unsupported model file extension: .{extension}"
        )));
    }
    Ok(())
}

fn camera_from_record(record: ModelFile) -> Result<Camera, CameraError> {
    let ModelFile {
        intrinsics,
        extrinsics,
        ..
    } = record;

    let mut camera = Camera::from_class_name(&intrinsics.class_name).inspect_err(|_| {
        log::warn!("unknown camera class name: {}", intrinsics.class_name);
    })?;

    // labels missing from the file keep the defaults of the model
    let mut parameters = camera.parameters();
    for (slot, label) in parameters.iter_mut().zip(camera.parameter_labels()) {
        if let Some(value) = intrinsics.parameters.get(*label) {
            *slot = parameter_values(label, value)?;
        }
    }
    camera.set_parameters(&parameters)?;

    if let Some(image_size) = intrinsics.image_size.as_deref() {
        camera.set_image_size(image_size_from(image_size)?);
    }

    let rotation = match extrinsics.rotation.as_deref() {
        Some(values) => triple(values, "rotation")?,
        None => Default::default(),
    };
    let translation = match extrinsics.translation.as_deref() {
        Some(values) => triple(values, "translation")?,
        None => Default::default(),
    };
    *camera.extrinsic_mut() = CameraExtrinsic::new(rotation, translation);

    Ok(camera)
}

fn record_from_camera<M: CameraModel + ?Sized>(model: &M) -> Result<ModelFile, CameraError> {
    let parameters = model
        .parameter_labels()
        .iter()
        .zip(model.parameters())
        .map(|(label, values)| (label.to_string(), Value::from(values)))
        .collect();

    let size = model.image_size();
    let rotation = model.rotation();
    let translation = model.translation();

    Ok(ModelFile {
        meta_data: MetaData {
            note: EXPORT_NOTE.to_string(),
        },
        intrinsics: IntrinsicsRecord {
            class_name: class_name_of(model.model_name())?.to_string(),
            image_size: Some(vec![size.width, size.height]),
            coordinate_convention: Some(COORDINATE_CONVENTION.to_string()),
            parameters,
        },
        extrinsics: ExtrinsicsRecord {
            rotation: Some(rotation.to_array().to_vec()),
            translation: Some(translation.to_array().to_vec()),
            class_name: Some(EXTRINSICS_CLASS_NAME.to_string()),
        },
    })
}

/// Parse a camera model from the content of a json model file.
///
/// # Errors
///
/// Fails on malformed json, an unknown `class_name` or parameters of the wrong shape.
pub fn camera_from_json_str(json: &str) -> Result<Camera, CameraError> {
    let record: ModelFile = serde_json::from_str(json)?;
    camera_from_record(record)
}

/// Serialize a camera model to pretty printed json.
pub fn camera_to_json_string<M: CameraModel + ?Sized>(model: &M) -> Result<String, CameraError> {
    let record = record_from_camera(model)?;
    Ok(serde_json::to_string_pretty(&record)?)
}

/// Load a camera model from a file.
///
/// # Arguments
///
/// * `path` - The path to the model file, only `.json` files are supported.
///
/// # Returns
///
/// The camera wrapped in the variant named by the `class_name` of the file.
///
/// # Errors
///
/// An [`CameraError::InvalidArgument`] if the file does not exist, has an
/// unsupported extension or holds an unknown model.
pub fn load_camera(path: impl AsRef<Path>) -> Result<Camera, CameraError> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(CameraError::invalid(format!(
            "The file referenced does not exist: {}",
            path.display()
        )));
    }
    check_extension(path)?;

    let content = std::fs::read_to_string(path)?;
    let camera = camera_from_json_str(&content)?;
    log::debug!("loaded {} camera from {}", camera.model_name(), path.display());

    Ok(camera)
}

/// Save a camera model to a `.json` file.
///
/// # Errors
///
/// Fails on unsupported extensions and when the file cannot be written.
pub fn save_camera<M: CameraModel + ?Sized>(
    model: &M,
    path: impl AsRef<Path>,
) -> Result<(), CameraError> {
    let path = path.as_ref();
    check_extension(path)?;

    std::fs::write(path, camera_to_json_string(model)?)?;
    log::debug!("saved {} camera to {}", model.model_name(), path.display());

    Ok(())
}

macro_rules! impl_typed_load {
    ($($model:ident),*) => {
        $(
            impl $model {
                /// Load a model file that must hold this model.
                ///
                /// # Errors
                ///
                /// Fails like [`load_camera`], or when the file holds another model.
                pub fn load(path: impl AsRef<Path>) -> Result<Self, CameraError> {
                    Self::try_from(load_camera(path)?)
                }

                /// Save the model to a `.json` file.
                pub fn save(&self, path: impl AsRef<Path>) -> Result<(), CameraError> {
                    save_camera(self, path)
                }
            }
        )*
    };
}

impl_typed_load!(Pinhole, BrownConrady, GenFTanTheta, GenFTheta, Kannala);

impl Camera {
    /// Load a camera model from a `.json` file, see [`load_camera`].
    pub fn load(path: impl AsRef<Path>) -> Result<Self, CameraError> {
        load_camera(path)
    }

    /// Save the camera model to a `.json` file, see [`save_camera`].
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), CameraError> {
        save_camera(self, path)
    }
}
