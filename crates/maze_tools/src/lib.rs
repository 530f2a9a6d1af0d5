//! Development tools for Nightmaze map authoring.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod validate;
