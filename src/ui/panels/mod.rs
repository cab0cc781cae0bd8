pub mod left_panel;
pub mod main_panel;

pub use left_panel::LeftPanel;
pub use main_panel::MainPanel;
