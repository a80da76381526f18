// Utility modules

pub mod detect;
pub mod encode;
pub mod filename;
pub mod preferences;
