pub mod detect;
pub mod drops;
pub mod mask;
pub mod score;

pub use detect::{detect, MatchEvent};
pub use drops::missing_frames;
pub use mask::{Mask, MaskError, MaskStore};
pub use score::{score, INCOMPARABLE};
