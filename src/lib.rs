//! Kiln core library.
//!
//! Kiln turns a declarative description of rules and edges into a Ninja
//! build file. Rules may declare which output extensions they produce from
//! which input extensions; edges without an explicit rule are resolved
//! against those declarations. The [`ir::GraphBuilder`] API can be driven
//! directly or from a `Kilnfile` parsed by [`manifest`].

pub mod ast;
pub mod cli;
pub mod deps;
pub mod ir;
pub mod manifest;
pub mod ninja_gen;
pub mod path;
pub mod runner;
pub mod vars;
