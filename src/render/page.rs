/*
 * Folio, personal portfolio content server.
 * Copyright (c) 2024 Folio contributors
 *
 * This program is free software: you can redistribute it and/or modify
 * it under the terms of the GNU Affero General Public License as published by
 * the Free Software Foundation, either version 3 of the License, or any later version.
 */

//! Page shell of the public portfolio

use crate::models::PageDocument;

use super::format::html_escape;
use super::theme::apply_theme;
use super::{FileSource, ModuleRegistry, RenderContext};

/// Counter ping used by download anchors. Errors are swallowed so the
/// navigation of the anchor always proceeds.
const DOWNLOAD_SCRIPT: &str = r#"<script>
function trackDownload(id) {
  try {
    fetch('/api/files/' + encodeURIComponent(id) + '/download', { method: 'POST', keepalive: true })
      .catch(function () {});
  } catch (e) {}
}
</script>"#;

/// Render the full public page: themed shell plus modules in layout order
pub async fn render_page(
    document: &PageDocument,
    registry: &ModuleRegistry,
    files: &dyn FileSource,
) -> String {
    let style = apply_theme(&document.theme);
    let ctx = RenderContext { document, files };
    let container = registry
        .render_modules(&document.layout.module_order, &ctx)
        .await;

    let title = document
        .profile
        .name
        .as_deref()
        .filter(|n| !n.trim().is_empty())
        .unwrap_or("Portfolio");

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{title}</title>
<link rel="stylesheet" href="/static/css/style.css">
</head>
<body class="{body_class}" style="{body_style}">
<main id="modules-container">{modules}</main>
{script}
</body>
</html>
"#,
        title = html_escape(title),
        body_class = style.body_class,
        body_style = style.inline_style(),
        modules = container.to_html(),
        script = DOWNLOAD_SCRIPT,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{module_names, ThemeDescriptor};
    use crate::render::tests::NoFiles;
    use crate::render::FALLBACK_PLACEHOLDER;
    use serde_json::json;

    #[tokio::test]
    async fn page_paints_theme_and_orders_modules() {
        let mut doc = PageDocument::default();
        doc.theme = serde_json::from_value::<ThemeDescriptor>(json!({
            "background_type": "solid",
            "background_color": "#112233"
        }))
        .unwrap();
        doc.layout.module_order = module_names(["skills", "hero"]);

        let html = render_page(&doc, &ModuleRegistry::with_built_ins(), &NoFiles).await;
        assert!(html.contains(r#"class="bg-solid""#));
        assert!(html.contains("--bg-color: #112233"));
        let skills = html.find("module-skills").unwrap();
        let hero = html.find("module-hero").unwrap();
        assert!(skills < hero);
    }

    #[tokio::test]
    async fn empty_layout_renders_placeholder() {
        let mut doc = PageDocument::default();
        doc.layout.module_order.clear();
        let html = render_page(&doc, &ModuleRegistry::with_built_ins(), &NoFiles).await;
        assert!(html.contains(FALLBACK_PLACEHOLDER));
    }
}
