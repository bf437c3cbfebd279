pub mod app;
pub mod generate;
pub mod page;
