//! Internal constants for diagram rendering.

use std::time::Duration;

/// Default HTTP timeout for Kroki requests (30 seconds).
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Id prefix for extracted blocks (`diagram-0`, `diagram-1`, ...).
pub const BLOCK_ID_PREFIX: &str = "diagram-";
