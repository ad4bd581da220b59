//! Core of the Bawabti job board.
//!
//! Companies register and post jobs; job seekers apply with an optional résumé and
//! introductory video. The [`uploads`] module validates, names and stores those
//! artifacts, [`db`] persists the relational records, and [`board`] exposes the
//! services and HTTP routers that tie them together.

pub mod board;
pub mod config;
pub mod db;
pub mod error;
pub mod telemetry;
pub mod uploads;
