pub mod resolver;

pub use resolver::{resolve_rank, ResultEntry};
