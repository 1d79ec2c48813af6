//! Documentation generator for the settings schema and edit-path contract
//!
//! Generates markdown from `SettingsSchema` metadata and from [`CONTRACT`].

use crate::config::{SettingMetadata, SettingScope, SettingType, SettingsSchema};
use crate::contract::CONTRACT;
use std::collections::HashMap;
use std::fmt::Write;

/// Configuration for docs generation
#[derive(Debug, Clone, Default)]
pub struct DocsConfig {
    /// Title for the documentation
    pub title: Option<String>,
    /// Description/introduction text
    pub description: Option<String>,
    /// Whether to group by the `group` metadata entry
    pub group_by_group: bool,
}

impl DocsConfig {
    #[must_use]
    pub fn new() -> Self {
        Self {
            group_by_group: true,
            ..Default::default()
        }
    }

    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    #[must_use]
    pub fn with_description(mut self, desc: impl Into<String>) -> Self {
        self.description = Some(desc.into());
        self
    }

    #[must_use]
    pub fn flat(mut self) -> Self {
        self.group_by_group = false;
        self
    }
}

/// Generate markdown documentation from a settings schema
#[must_use]
pub fn generate_docs<T: SettingsSchema>(config: DocsConfig) -> String {
    let metadata = T::get_metadata();
    generate_docs_from_metadata(&metadata, config)
}

/// Generate docs from raw metadata
#[must_use]
pub fn generate_docs_from_metadata<S: std::hash::BuildHasher>(
    metadata: &HashMap<String, SettingMetadata, S>,
    config: DocsConfig,
) -> String {
    let mut output = String::new();

    let title = config
        .title
        .unwrap_or_else(|| "Store Settings Reference".to_string());
    let _ = writeln!(output, "# {title}\n");

    if let Some(desc) = config.description {
        let _ = writeln!(output, "{desc}\n");
    }

    let mut settings: Vec<_> = metadata.iter().collect();
    settings.sort_by(|(a, _), (b, _)| a.cmp(b));

    if config.group_by_group {
        let mut groups: Vec<(&str, Vec<(&String, &SettingMetadata)>)> = Vec::new();
        for (key, meta) in settings {
            let group = meta.get_meta_str("group").unwrap_or("general");
            match groups.iter_mut().find(|(name, _)| *name == group) {
                Some((_, entries)) => entries.push((key, meta)),
                None => groups.push((group, vec![(key, meta)])),
            }
        }
        groups.sort_by(|(a, _), (b, _)| a.cmp(b));

        for (group, entries) in groups {
            let _ = writeln!(output, "## {}\n", capitalize(group));
            write_table(&mut output, &entries);
        }
    } else {
        write_table(&mut output, &settings);
    }

    output
}

fn write_table(output: &mut String, entries: &[(&String, &SettingMetadata)]) {
    let _ = writeln!(output, "| Key | Label | Type | Scope | Default | Constraints |");
    let _ = writeln!(output, "|-----|-------|------|-------|---------|-------------|");
    for (key, meta) in entries {
        let label = meta.get_meta_str("label").unwrap_or("");
        let _ = writeln!(
            output,
            "| `{key}` | {label} | {} | {} | {} | {} |",
            type_name(meta.setting_type),
            scope_name(meta.scope),
            default_display(meta),
            constraints_display(meta),
        );
    }
    let _ = writeln!(output);
}

/// Generate the edit-path catalog with the settings each region binds
#[must_use]
pub fn generate_edit_path_catalog() -> String {
    let mut output = String::new();
    let _ = writeln!(output, "# Edit Paths\n");
    let _ = writeln!(
        output,
        "Every ready template tags these regions with `data-edit-path`.\n"
    );
    let _ = writeln!(output, "| Path | Settings |");
    let _ = writeln!(output, "|------|----------|");
    for path in CONTRACT.edit_paths {
        let bound = CONTRACT.bound_keys(path);
        let keys = if bound.is_empty() {
            "-".to_string()
        } else {
            bound
                .iter()
                .map(|k| format!("`{k}`"))
                .collect::<Vec<_>>()
                .join(", ")
        };
        let _ = writeln!(output, "| `{path}` | {keys} |");
    }
    output
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn type_name(t: SettingType) -> &'static str {
    match t {
        SettingType::Text => "Text",
        SettingType::Color => "Color",
        SettingType::Number => "Number",
        SettingType::Select => "Select",
        SettingType::List => "List",
    }
}

fn scope_name(scope: SettingScope) -> &'static str {
    match scope {
        SettingScope::Store => "Store",
        SettingScope::Template => "Template (null = template default)",
    }
}

fn default_display(meta: &SettingMetadata) -> String {
    match &meta.default {
        serde_json::Value::Null => "-".to_string(),
        serde_json::Value::String(s) if s.is_empty() => "\"\"".to_string(),
        serde_json::Value::String(s) => format!("`{s}`"),
        other => format!("`{other}`"),
    }
}

fn constraints_display(meta: &SettingMetadata) -> String {
    let mut parts = Vec::new();
    let number = &meta.constraints.number;
    match (number.min, number.max) {
        (Some(min), Some(max)) => parts.push(format!("{min}–{max}")),
        (Some(min), None) => parts.push(format!("≥ {min}")),
        (None, Some(max)) => parts.push(format!("≤ {max}")),
        (None, None) => {}
    }
    if let Some(step) = number.step {
        parts.push(format!("step {step}"));
    }
    if let Some(pattern) = &meta.constraints.text.pattern {
        parts.push(format!("pattern `{pattern}`"));
    }
    if let Some(len) = meta.constraints.text.max_length {
        parts.push(format!("max {len} chars"));
    }
    if let Some(options) = &meta.constraints.options {
        let labels: Vec<String> = options
            .iter()
            .map(|o| match &o.value {
                serde_json::Value::String(v) => format!("{v} ({})", o.label),
                v => format!("{v} ({})", o.label),
            })
            .collect();
        parts.push(labels.join(", "));
    }
    if parts.is_empty() {
        "-".to_string()
    } else {
        parts.join("; ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::store_schema;
    use crate::settings::StoreSettings;

    #[test]
    fn test_generate_docs_groups_by_group() {
        let docs = generate_docs::<StoreSettings>(
            DocsConfig::new()
                .with_title("My Store")
                .with_description("Keys the storefront editor writes."),
        );

        assert!(docs.starts_with("# My Store\n\nKeys the storefront editor writes.\n"));
        assert!(docs.contains("## Colors"));
        assert!(docs.contains("## Identity"));
        assert!(docs.contains("`template_accent_color`"));
        assert!(docs.contains("Template (null = template default)"));
        let colors = docs.find("## Colors").unwrap();
        let identity = docs.find("## Identity").unwrap();
        assert!(colors < identity);
    }

    #[test]
    fn test_flat_docs_render_constraints() {
        let docs = generate_docs_from_metadata(&store_schema(), DocsConfig::new().flat());

        assert!(!docs.contains("## "));
        assert!(docs.contains("10–48; step 1"));
        assert!(docs.contains("pattern `^[A-Z]{3}$`"));
        assert!(docs.contains("400 (Regular)"));
        assert!(docs.contains("| `currency` | Currency | Text | Store | `USD` |"));
    }

    #[test]
    fn test_edit_path_catalog_lists_contract() {
        let catalog = generate_edit_path_catalog();
        for path in CONTRACT.edit_paths {
            assert!(catalog.contains(&format!("| `{path}` |")), "{path}");
        }
        assert!(catalog.contains("| `layout.header.nav` | - |"));
        assert!(catalog.contains("`template_social_links`"));
    }
}
