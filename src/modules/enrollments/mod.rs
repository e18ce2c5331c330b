//! Agents enrolled in sessions. Mounted under `/sessions/{id}/agents`.

pub mod controller;
pub mod service;
