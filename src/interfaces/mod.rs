//! Outer surfaces: reading session scripts and writing session reports.

pub mod csv;
