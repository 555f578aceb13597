pub mod command;
pub mod console;
pub mod engine;
pub mod framing;
pub mod limits;
pub mod model;
pub mod observability;
