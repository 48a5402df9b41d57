pub mod apply;
pub mod check;
pub mod common;
pub mod dump;
pub mod extract;
pub mod info;
