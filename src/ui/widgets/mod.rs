pub mod file_selector;

pub use file_selector::FileSelector;
