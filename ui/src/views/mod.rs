mod overview;
pub use overview::{FatalOverlay, Overview};

mod insights;
pub use insights::Insights;
