pub mod health_check;
pub mod media;

pub use health_check::*;
pub use media::*;
