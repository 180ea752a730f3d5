pub mod chart_panel;
pub mod export;
pub mod tooltip;
