//! Line-driven front end for the console document: a demo evaluator that runs
//! off the owning thread, and plain-text transcript rendering.

pub mod demo;
pub mod transcript;
