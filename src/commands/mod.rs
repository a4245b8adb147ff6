//! Command handlers.
//!
//! `inspect` is the default action; `completion` runs instead when
//! `--completion <SHELL>` is given.

pub mod completion;
pub mod inspect;
