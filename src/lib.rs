pub mod scoring;
pub mod settings;
pub mod utils;
