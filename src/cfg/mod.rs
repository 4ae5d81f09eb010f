// src/cfg/mod.rs

pub mod config;
pub mod secure;
pub mod settings;
pub mod target;
