//! Product configuration trait for CLI binaries
//!
//! A binary built on this library implements the trait to name its own
//! manifest and catalog files, its template source and the command shown
//! in missing-dependency suggestions.

/// Configuration trait for CLI products built on the generation engine
pub trait ProductConfig: Clone + Send + Sync + 'static {
    /// Internal product name (used for the CLI command and env vars)
    fn name(&self) -> &'static str;

    /// Human-readable display name
    fn display_name(&self) -> &'static str;

    /// File at the project root holding the project manifest
    fn manifest_file(&self) -> &'static str {
        ".stencil.json"
    }

    /// File at the template root holding the template catalog
    fn catalog_file(&self) -> &'static str {
        ".stencil.template.json"
    }

    /// Template repository used by `init` when none is given
    fn default_template_url(&self) -> &'static str;

    /// Environment variable name for overriding the default template URL
    fn template_url_env(&self) -> &'static str;

    /// Environment variable name for overriding the template cache root
    fn home_env(&self) -> &'static str;

    /// User agent string for HTTP requests
    fn user_agent(&self) -> &'static str {
        self.name()
    }

    /// Template URL to bind a new project to, honoring the env override
    fn template_url(&self) -> String {
        std::env::var(self.template_url_env())
            .unwrap_or_else(|_| self.default_template_url().to_string())
    }
}
