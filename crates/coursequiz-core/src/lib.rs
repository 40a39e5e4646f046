//! Question banks, quiz sessions and scoring for coursequiz.
//!
//! This crate defines the content model (questions, banks, course pages),
//! the quiz session state machine and its single-question inline variant,
//! and the selection, scoring and reporting logic built on top of them.

pub mod config;
pub mod error;
pub mod inline_check;
pub mod model;
pub mod page;
pub mod parser;
pub mod report;
pub mod scoring;
pub mod selection;
pub mod session;
