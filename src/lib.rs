//! "Certwatch" utility

//! Crate docs

#![forbid(unsafe_code)]
#![deny(
    missing_docs,
    unstable_features,
    missing_debug_implementations,
    missing_copy_implementations,
    trivial_casts,
    trivial_numeric_casts,
    unused_import_braces,
    unused_qualifications,
    bad_style,
    dead_code,
    improper_ctypes,
    non_shorthand_field_patterns,
    no_mangle_generic_items,
    overflowing_literals,
    path_statements,
    patterns_in_fns_without_body,
    unconditional_recursion,
    unused,
    unused_allocation,
    unused_comparisons,
    unused_parens,
    while_true,
    unused_extern_crates
)]
#![warn(dead_code, unused_imports, unused_variables)]

// For development:
// #![allow(dead_code, unused_imports, unused_variables, deprecated)]


/// Use MiMalloc as default allocator:
#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;


pub use crate::api::*;
pub use crate::checks::batch::*;
pub use crate::checks::expiry::*;
pub use crate::checks::fetcher::*;
pub use crate::config::*;
pub use crate::configuration::*;
pub use crate::inputs::host::*;
pub use crate::notificator::*;
pub use crate::products::certificate_result::*;
pub use crate::products::expected::*;
pub use crate::products::notification_batch::*;
pub use crate::products::report::*;
pub use crate::products::unexpected::*;
pub use tracing::{debug, error, info, instrument, trace, warn};

use curl::easy::{Handler, WriteError};
use std::fmt;


/// Collects response body from Curl:
pub struct Collector(Vec<u8>);


impl Handler for Collector {
    fn write(&mut self, data: &[u8]) -> Result<usize, WriteError> {
        self.0.extend_from_slice(data);
        Ok(data.len())
    }
}


impl fmt::Debug for Collector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct(&format!(
            "Collector buffer (first 50 in hex): {}…",
            self
        ))
        .finish()
    }
}


impl fmt::Display for Collector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let hex: String = self.0.iter().take(50).map(|c| format!("{:x}", c)).collect();
        write!(f, "{}", hex)
    }
}


//
// Public modules:
//

/// Configuration defaults:
pub mod configuration;

/// Dynamic config:
pub mod config;

/// Utilities and helpers:
pub mod utilities;

/// Host inputs:
pub mod inputs;

/// Certificate checks:
pub mod checks;

/// Check products:
pub mod products;

/// Webhook notifications:
pub mod notificator;

/// Checks API functions:
pub mod api;

//
// Private modules:
//
