//! HTTP handlers

pub mod data;
pub mod health;
pub mod predict;
