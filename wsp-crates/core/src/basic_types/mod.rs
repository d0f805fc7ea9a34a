mod assignment;
mod ids;
mod invalid_reference;

pub use assignment::*;
pub use ids::*;
pub use invalid_reference::*;
