mod reader;

pub use reader::{LoadError, Rows, load, read};
