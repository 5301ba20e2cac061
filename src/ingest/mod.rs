pub mod mock;
pub mod serial;
pub mod wire;
