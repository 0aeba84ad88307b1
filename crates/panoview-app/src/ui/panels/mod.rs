pub mod catalog_panel;
pub mod controls_panel;
