#![allow(dead_code)]

pub mod env;
pub mod net;
pub mod scripts;
