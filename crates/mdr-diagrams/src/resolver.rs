//! Combined Mermaid and `PlantUML` resolution.

use std::sync::Arc;

use mdr_renderer::{HtmlEngine, Preprocessor};

use crate::consts::DEFAULT_PLANTUML_SERVER;
use crate::mermaid::MermaidPreprocessor;
use crate::plantuml::PlantUmlPreprocessor;
use crate::runner::{DiagramToolRunner, MmdcRunner};

/// Replaces fenced diagram blocks with renderable markup.
///
/// Mermaid blocks are resolved first, then `PlantUML` blocks. Diagram
/// failures degrade to fallback markup and never abort a render.
#[derive(Clone)]
pub struct DiagramResolver {
    mermaid: MermaidPreprocessor,
    plantuml: PlantUmlPreprocessor,
}

impl DiagramResolver {
    #[must_use]
    pub fn new(runner: Arc<dyn DiagramToolRunner>, plantuml_server: &str) -> Self {
        Self {
            mermaid: MermaidPreprocessor::new(runner),
            plantuml: PlantUmlPreprocessor::new(plantuml_server),
        }
    }

    /// Fall back to a Mermaid server before the client-side placeholder.
    #[must_use]
    pub fn with_mermaid_server(mut self, server: Option<String>) -> Self {
        self.mermaid = self.mermaid.with_server(server);
        self
    }

    /// Resolve every diagram block in `raw`.
    #[must_use]
    pub fn resolve(&self, raw: &str) -> String {
        let text = self.mermaid.run(raw);
        self.plantuml.run(&text)
    }

    /// Register both passes on an HTML engine.
    #[must_use]
    pub fn install(self, engine: HtmlEngine) -> HtmlEngine {
        engine
            .with_preprocessor(self.mermaid)
            .with_preprocessor(self.plantuml)
    }
}

impl Default for DiagramResolver {
    fn default() -> Self {
        Self::new(Arc::new(MmdcRunner::default()), DEFAULT_PLANTUML_SERVER)
    }
}
