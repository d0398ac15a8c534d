// TUI widget modules for each viewer zone.

pub mod field;
pub mod status_bar;
pub mod title_bar;
