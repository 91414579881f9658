pub mod error;

pub use error::{ErrorKind, QuizError, Result, preview};
