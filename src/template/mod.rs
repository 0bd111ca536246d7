//! Template processing engine for xcookie
//!
//! This module contains the core template processing components:
//! - `registry`: The artifacts xcookie knows how to render
//! - `stage`: Rendering the applicable artifacts into a staging directory
//! - `operation`: Defines what to do with each staged file
//! - `processor`: Decides the operation for each staged file

pub mod operation;
pub mod processor;
pub mod registry;
pub mod stage;
