//! This package implements a small normalization engine for spider diagrams
//! in the style of the [ZX-calculus][wiki].
//!
//! - [`graph`] provides the diagram model (colored, phased spiders joined by
//! undirected wires) together with the individual rewrite rules, each
//! expressed through the [`RuleFinder`][graph::rules::RuleFinder] and
//! [`Rule`][graph::rules::Rule] traits.
//! - [`rewrite`][mod@rewrite] sequences those rules into full passes and
//! exposes the [`rewrite()`] entry point, configured by a set of [`Flag`]s.
//!
//! Diagrams are passed by value into [`rewrite()`] and returned simplified;
//! caller-defined metadata on each spider and an opaque passthrough value on
//! the diagram are carried along untouched.
//!
//! [wiki]: https://en.wikipedia.org/wiki/ZX-calculus
//!
//! # See also
//! - [PyZX](https://github.com/Quantomatic/pyzx): a Python implementation of
//! the ZX-calculus and its rewrite rules.
//! - [QuiZX](https://github.com/Quantomatic/quizx/tree/master): a Rust
//! implementation of the above.
//!
//! # Further reading
//! - B. Coecke, "Basic ZX-calculus for students and professionals."
//! [arXiv:2303.03163](https://arxiv.org/abs/2303.03163)
//! - J. van de Wetering, "ZX-calculus for the working quantum computer
//! scientist." [arXiv:2012.13966](https://arxiv.org/abs/2012.13966)
//!

pub mod graph;
pub mod rewrite;
pub(crate) mod vizdefs;

pub use rewrite::{ rewrite, rewrite_with_report, Flag, Flags, RewriteReport };
