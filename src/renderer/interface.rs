use crate::error::Result;

/// Trait for template rendering engines.
pub trait TemplateRenderer {
    /// Renders a template string with the given context.
    ///
    /// # Arguments
    /// * `template` - Template string to render
    /// * `context` - Context variables for rendering
    /// * `template_name` - Optional name for the template (used in error messages)
    ///
    /// # Returns
    /// * `Result<String>` - Rendered template string
    fn render(
        &self,
        template: &str,
        context: &serde_json::Value,
        template_name: Option<&str>,
    ) -> Result<String>;

    /// Renders a relative output path such as `{{ mod_dpath }}/__init__.py`.
    ///
    /// # Returns
    /// * `Result<String>` - Rendered path as string
    fn render_path(&self, template_path: &str, context: &serde_json::Value) -> Result<String>;
}
