pub mod file;
pub mod peer;
pub mod tracker;
pub mod util;
