// src/utils/mod.rs

pub mod hash;
pub mod html;
pub mod jwt;
pub mod report;
pub mod roster;
pub mod upload;
pub mod validation;
