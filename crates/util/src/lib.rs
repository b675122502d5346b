pub mod path_processing;
pub mod text_processing;

pub use path_processing::*;
pub use text_processing::*;
