//! Transit route planner server.
//!
//! Answers "what is the shortest way from this station to that one?" over a
//! rail network read from a station database, charging a fixed penalty for
//! every change of line.

pub mod config;
pub mod domain;
pub mod planner;
pub mod stations;
pub mod web;
