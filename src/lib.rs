pub mod ai;
pub mod app;
pub mod auth;
pub mod clock;
pub mod config;
pub mod controller;
pub mod diary;
pub mod entitlements;
pub mod errors;
pub mod plans;
pub mod profile;
pub mod recipes;
pub mod state;
pub mod storage;

#[cfg(test)]
mod testing;
