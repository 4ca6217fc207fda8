mod shared_input;

pub use shared_input::SharedInputSource;
