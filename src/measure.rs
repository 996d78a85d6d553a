mod carbon_level;
mod gas;
mod heat_index;

pub use carbon_level::*;
pub use gas::*;
pub use heat_index::*;
