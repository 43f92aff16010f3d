//! Internal constants for diagram rendering.

use std::time::Duration;

/// Default timeout for a single Mermaid CLI invocation (30 seconds).
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Public `PlantUML` server.
pub const DEFAULT_PLANTUML_SERVER: &str = "http://www.plantuml.com/plantuml";

/// Default Mermaid CLI executable.
pub const DEFAULT_MERMAID_COMMAND: &str = "mmdc";

/// Preprocessor priority of the Mermaid pass.
pub const MERMAID_PRIORITY: i32 = 30;

/// Preprocessor priority of the `PlantUML` pass.
pub const PLANTUML_PRIORITY: i32 = 29;

/// Hex digits of the source digest used in client-side placeholder ids.
pub(crate) const PLACEHOLDER_ID_LEN: usize = 8;
