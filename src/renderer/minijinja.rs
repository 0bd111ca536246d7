use super::filters::*;
use crate::{error::Result, renderer::interface::TemplateRenderer};
use minijinja::{AutoEscape, Environment};

/// MiniJinja-based template rendering engine.
pub struct MiniJinjaRenderer {
    env: Environment<'static>,
}

impl MiniJinjaRenderer {
    /// Creates a new MiniJinjaRenderer instance.
    ///
    /// Generated files are whitespace sensitive (YAML, python), so block
    /// tags strip their own line and trailing newlines are kept.
    pub fn new() -> Self {
        let mut env = Environment::new();
        env.set_keep_trailing_newline(true);
        env.set_trim_blocks(true);
        env.set_lstrip_blocks(true);
        env.set_auto_escape_callback(|_| AutoEscape::None);

        env.add_filter("kebab_case", to_kebab_case);
        env.add_filter("pascal_case", to_pascal_case);
        env.add_filter("screaming_snake_case", to_screaming_snake_case);
        env.add_filter("snake_case", to_snake_case);
        env.add_filter("train_case", to_train_case);
        env.add_filter("cpython_tag", cpython_tag);
        env.add_filter("min_version_spec", min_version_spec);
        env.add_filter("rst_underline", rst_underline);

        Self { env }
    }

    fn render_internal(
        &self,
        template: &str,
        context: &serde_json::Value,
        template_name: Option<&str>,
    ) -> Result<String> {
        let mut env = self.env.clone();
        let name = template_name.unwrap_or("temp");
        env.add_template_owned(name.to_string(), template.to_string())?;
        let tmpl = env.get_template(name)?;
        Ok(tmpl.render(context)?)
    }
}

impl Default for MiniJinjaRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl TemplateRenderer for MiniJinjaRenderer {
    fn render(
        &self,
        template: &str,
        context: &serde_json::Value,
        template_name: Option<&str>,
    ) -> Result<String> {
        self.render_internal(template, context, template_name)
    }

    fn render_path(&self, template_path: &str, context: &serde_json::Value) -> Result<String> {
        Ok(self.env.render_str(template_path, context)?.replace('\\', "/"))
    }
}
