//! Presentation of course pages and quiz state.
//!
//! `text` produces terminal output for the interactive CLI, `html` produces
//! self-contained static pages.

pub mod html;
pub mod text;
