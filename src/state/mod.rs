pub mod chart_state;
pub mod interaction;
pub mod theme;
