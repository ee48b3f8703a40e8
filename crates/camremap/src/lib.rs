#![doc = env!("CARGO_PKG_DESCRIPTION")]

#[doc(inline)]
pub use camremap_linalg as linalg;

#[doc(inline)]
pub use camremap_image as image;

#[doc(inline)]
pub use camremap_camera as camera;

#[doc(inline)]
pub use camremap_imgproc as imgproc;

#[doc(inline)]
pub use camremap_io as io;
