//! Route handlers.

pub mod health;
pub mod lexical;
pub mod viewer;
