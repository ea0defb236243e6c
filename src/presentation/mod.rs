//! Presentation Layer
//!
//! This layer handles:
//! - Wiring an `Engine` over catalog and build files
//! - Text rendering of engine results
//!
//! ## Structure
//!
//! - `factory` - Creates the engine with its infrastructure (dependency injection)
//! - `output` - Text renderers
//!
//! ## Usage
//!
//! ```ignore
//! use rackfit::presentation::{create_engine, TextRenderer};
//!
//! let engine = create_engine(&catalog, &builds, &config)?;
//! let result = engine.validate("cpu", "build-1", "cpu-6338", None);
//! print!("{}", TextRenderer::default().validation("cpu", "cpu-6338", &result));
//! ```

pub mod factory;
pub mod output;

pub use factory::create_engine;
pub use output::{format_speed, TextRenderer};
