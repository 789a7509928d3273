pub mod check;
pub mod history;
pub mod project;
pub mod todos;
pub mod util;
pub mod wiring;

pub use check::*;
pub use history::*;
pub use project::*;
pub use todos::*;
pub use util::*;
pub use wiring::*;
