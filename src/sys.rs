pub mod shell;
pub mod timer;
