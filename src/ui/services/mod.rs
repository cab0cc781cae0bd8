pub mod config_bridge;
pub mod sequence_io;

pub use config_bridge::ConfigBridge;
pub use sequence_io::SequenceIo;
