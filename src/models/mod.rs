mod process;
mod system;

pub use process::*;
pub use system::*;
