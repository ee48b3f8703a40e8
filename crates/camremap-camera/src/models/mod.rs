mod brown_conrady;
mod gen_ftan_theta;
mod gen_ftheta;
mod kannala;
mod pinhole;

pub use brown_conrady::BrownConrady;
pub use gen_ftan_theta::{ActiveTerms, GenFTanTheta, TanThetaDistortion};
pub use gen_ftheta::{FThetaDistortion, GenFTheta};
pub use kannala::Kannala;
pub use pinhole::Pinhole;
