pub mod memory;
pub mod research;
pub mod sessions;
pub mod utils;
