pub mod camera;
pub mod classify;
pub mod config;
pub mod pose;
pub mod render;
pub mod scoring;
