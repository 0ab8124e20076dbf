pub mod field;
pub mod issue;
pub mod issue_input;
pub mod issue_type;
pub mod priority;
pub mod project;
pub mod results;

pub use field::*;
pub use issue::*;
pub use issue_input::*;
pub use issue_type::*;
pub use priority::*;
pub use project::*;
pub use results::*;
