pub mod display;
pub mod prompt;
pub mod rates;
pub mod setup;
pub mod ui;
