pub mod display;
pub mod redirect;
