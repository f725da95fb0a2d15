//! Core library implementation of the register viewer.

pub mod codec;
pub mod detect;
pub mod lane;
pub mod parser;
pub mod register;
pub mod session;
pub mod view;
