/*
 * Folio, personal portfolio content server.
 * Copyright (c) 2024 Folio contributors
 *
 * This program is free software: you can redistribute it and/or modify
 * it under the terms of the GNU Affero General Public License as published by
 * the Free Software Foundation, either version 3 of the License, or any later version.
 */

//! Built-in module renderers

use async_trait::async_trait;

use crate::models::{
    Announcement, ButtonEntry, ButtonStyle, CustomModule, FileEntry, ModuleName, PageDocument,
};

use super::format::{file_icon, format_file_size, html_escape};
use super::{ModuleRenderer, RenderContext};

pub const DEFAULT_NAME: &str = "Your Name";
pub const DEFAULT_TITLE: &str = "Frontend Developer / Full-Stack Engineer";
pub const DEFAULT_BIO: &str =
    "Hi! I'm a developer who loves technology and builds great web applications.";
pub const DEFAULT_AVATAR: &str = "/static/uploads/default-avatar.png";
pub const BROKEN_AVATAR: &str = "https://placehold.co/160";
pub const BROKEN_PROJECT_IMAGE: &str = "https://placehold.co/320x220";

/// Profile header with buttons and announcement
pub struct HeroModule;

#[async_trait]
impl ModuleRenderer for HeroModule {
    fn name(&self) -> &str {
        ModuleName::HERO
    }

    async fn render(&self, ctx: &RenderContext<'_>) -> anyhow::Result<String> {
        Ok(hero_markup(ctx.document))
    }
}

fn hero_markup(doc: &PageDocument) -> String {
    let profile = &doc.profile;
    let text = |value: &Option<String>, fallback: &str| {
        html_escape(
            value
                .as_deref()
                .filter(|v| !v.trim().is_empty())
                .unwrap_or(fallback),
        )
    };
    let avatar = text(&profile.avatar, DEFAULT_AVATAR);
    let name = text(&profile.name, DEFAULT_NAME);

    format!(
        r#"<div class="hero"><div class="container"><div class="hero-content">
<img src="{avatar}" alt="{name}" class="avatar interactive-avatar" data-full-size="{avatar}" onerror="this.onerror=null;this.src='{broken}'">
<h1 class="hero-title">{name}</h1>
<p class="hero-subtitle">{title}</p>
<p class="hero-bio">{bio}</p>
{buttons}{announcement}</div></div></div>"#,
        avatar = avatar,
        name = name,
        broken = BROKEN_AVATAR,
        title = text(&profile.title, DEFAULT_TITLE),
        bio = text(&profile.bio, DEFAULT_BIO),
        buttons = buttons_markup(&doc.buttons),
        announcement = doc
            .announcement
            .as_ref()
            .map(announcement_markup)
            .unwrap_or_default(),
    )
}

/// Buttons grouped by style: primary then secondary links, then navigation
fn buttons_markup(buttons: &[ButtonEntry]) -> String {
    let usable = |style: ButtonStyle| {
        buttons
            .iter()
            .filter(move |b| b.style == style && !b.url.is_empty())
    };
    let label = |b: &ButtonEntry| {
        let icon = if b.icon.is_empty() {
            String::new()
        } else {
            format!("<span>{}</span> ", html_escape(&b.icon))
        };
        format!("{}{}", icon, html_escape(&b.text))
    };

    let mut html = String::new();

    let links: Vec<&ButtonEntry> = usable(ButtonStyle::Primary)
        .chain(usable(ButtonStyle::Secondary))
        .collect();
    if !links.is_empty() {
        html.push_str(r#"<div class="hero-links">"#);
        for b in links {
            let class = if b.style == ButtonStyle::Primary {
                "btn-primary"
            } else {
                "btn-secondary"
            };
            let target = if b.url.starts_with("http") {
                r#" target="_blank" rel="noopener noreferrer""#
            } else {
                ""
            };
            html.push_str(&format!(
                r#"<a href="{}" class="btn {}"{}>{}</a>"#,
                html_escape(&b.url),
                class,
                target,
                label(b)
            ));
        }
        html.push_str("</div>");
    }

    let nav: Vec<&ButtonEntry> = usable(ButtonStyle::Nav).collect();
    if !nav.is_empty() {
        html.push_str(r#"<div class="hero-navigation">"#);
        for b in nav {
            html.push_str(&format!(
                r#"<button class="nav-btn" data-target="{}">{}</button>"#,
                html_escape(&b.url.replacen('#', "", 1)),
                label(b)
            ));
        }
        html.push_str("</div>");
    }

    html
}

fn announcement_markup(announcement: &Announcement) -> String {
    if !announcement.enabled || announcement.text.trim().is_empty() {
        return String::new();
    }
    format!(
        r#"<div class="announcement-bar" style="background: {}"><span class="announcement-icon">📢</span><span class="announcement-text">{}</span></div>"#,
        announcement.kind.tint(),
        html_escape(&announcement.text)
    )
}

fn section(class: &str, title: &str, body: &str) -> String {
    format!(
        r#"<section class="section {}"><div class="container"><h2 class="section-title">{}</h2>{}</div></section>"#,
        class,
        html_escape(title),
        body
    )
}

/// One progress bar per skill at its stored level
pub struct SkillsModule;

#[async_trait]
impl ModuleRenderer for SkillsModule {
    fn name(&self) -> &str {
        ModuleName::SKILLS
    }

    async fn render(&self, ctx: &RenderContext<'_>) -> anyhow::Result<String> {
        let items: String = ctx
            .document
            .skills
            .iter()
            .map(|skill| {
                format!(
                    r#"<div class="skill-item" data-skill-id="{id}"><div class="skill-info"><span class="skill-name">{name}</span><span class="skill-level">{level}%</span></div><div class="skill-bar"><div class="skill-progress" style="width: {level}%"></div></div></div>"#,
                    id = html_escape(&skill.id),
                    name = html_escape(&skill.name),
                    level = skill.level,
                )
            })
            .collect();
        Ok(section(
            "skills-section",
            "Skills",
            &format!(r#"<div class="skills-grid">{}</div>"#, items),
        ))
    }
}

/// One card per project, with tags
pub struct ProjectsModule;

#[async_trait]
impl ModuleRenderer for ProjectsModule {
    fn name(&self) -> &str {
        ModuleName::PROJECTS
    }

    async fn render(&self, ctx: &RenderContext<'_>) -> anyhow::Result<String> {
        let cards: String = ctx
            .document
            .projects
            .iter()
            .map(|project| {
                let tags: String = project
                    .tags
                    .iter()
                    .map(|tag| format!(r#"<span class="tag">{}</span>"#, html_escape(tag)))
                    .collect();
                format!(
                    r#"<div class="project-card"><img src="{image}" alt="{title}" class="project-image" onerror="this.onerror=null;this.src='{broken}'"><div class="project-content"><h3 class="project-title">{title}</h3><p class="project-description">{description}</p><div class="project-tags">{tags}</div><a href="{link}" class="project-link" target="_blank" rel="noopener noreferrer">View project →</a></div></div>"#,
                    image = html_escape(&project.image),
                    title = html_escape(&project.title),
                    broken = BROKEN_PROJECT_IMAGE,
                    description = html_escape(&project.description),
                    tags = tags,
                    link = html_escape(&project.link),
                )
            })
            .collect();
        Ok(section(
            "projects-section",
            "Projects",
            &format!(r#"<div class="projects-grid">{}</div>"#, cards),
        ))
    }
}

/// Downloadable files, listed through the context's file source
///
/// The only renderer that suspends. A listing failure renders an error notice
/// inside the section instead of failing the module.
pub struct FilesModule;

#[async_trait]
impl ModuleRenderer for FilesModule {
    fn name(&self) -> &str {
        ModuleName::FILES
    }

    async fn render(&self, ctx: &RenderContext<'_>) -> anyhow::Result<String> {
        let files = match ctx.files.list_files().await {
            Ok(files) => files,
            Err(e) => {
                tracing::warn!("Failed to list files: {}", e);
                return Ok(section(
                    "files-section",
                    "Files",
                    r#"<p class="files-empty">Failed to load files</p>"#,
                ));
            }
        };

        if files.is_empty() {
            return Ok(section(
                "files-section",
                "Files",
                r#"<p class="files-empty">No files yet</p>"#,
            ));
        }

        let cards: String = files.iter().map(file_card).collect();
        Ok(section(
            "files-section",
            "Files",
            &format!(r#"<div class="files-grid">{}</div>"#, cards),
        ))
    }
}

/// The download anchor never depends on the counter ping: the ping is
/// fire-and-forget and its failure is swallowed by `trackDownload`.
fn file_card(file: &FileEntry) -> String {
    let description = if file.description.trim().is_empty() {
        "No description".to_string()
    } else {
        html_escape(&file.description)
    };
    format!(
        r#"<div class="file-card"><div class="file-icon">{icon}</div><div class="file-name">{name}</div><div class="file-description">{description}</div><div class="file-info"><span>{size}</span><span>{downloads} downloads</span></div><a href="/files/{path}" class="file-download-btn" target="_blank" rel="noopener noreferrer" data-file-id="{id}" onclick="trackDownload(this.dataset.fileId); return true;">Download</a></div>"#,
        icon = file_icon(&file.file_type),
        name = html_escape(&file.original_name),
        description = description,
        size = format_file_size(file.size),
        downloads = file.downloads,
        path = html_escape(file.download_path()),
        id = html_escape(&file.id),
    )
}

/// Markup of an operator-defined module, or None when it is hidden
pub fn custom_markup(module: &CustomModule) -> Option<String> {
    if !module.visible {
        return None;
    }
    let mut body = format!(
        r#"<div class="custom-content">{}</div>"#,
        html_escape(&module.content)
    );
    if !module.link.trim().is_empty() {
        body.push_str(&format!(
            r#"<a href="{}" class="custom-link" target="_blank" rel="noopener noreferrer">Learn more →</a>"#,
            html_escape(&module.link)
        ));
    }
    Some(section(
        &format!("custom-section custom-{}", html_escape(&module.kind)),
        &module.title,
        &body,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AnnouncementKind, Profile, Project, Skill};

    #[test]
    fn hero_uses_fallbacks() {
        let html = hero_markup(&PageDocument::default());
        assert!(html.contains(DEFAULT_NAME));
        assert!(html.contains(DEFAULT_TITLE));
        assert!(html.contains(DEFAULT_AVATAR));
        assert!(html.contains(BROKEN_AVATAR));
    }

    #[test]
    fn hero_blank_avatar_falls_back() {
        let doc = PageDocument {
            profile: Profile {
                avatar: Some("  ".into()),
                name: Some("Ada <Lovelace>".into()),
                ..Default::default()
            },
            ..Default::default()
        };
        let html = hero_markup(&doc);
        assert!(html.contains(DEFAULT_AVATAR));
        assert!(html.contains("Ada &lt;Lovelace&gt;"));
    }

    fn button(text: &str, url: &str, style: ButtonStyle) -> ButtonEntry {
        ButtonEntry {
            id: text.to_string(),
            text: text.to_string(),
            icon: String::new(),
            url: url.to_string(),
            style,
            order: 0,
        }
    }

    #[test]
    fn buttons_are_partitioned_by_style() {
        let html = buttons_markup(&[
            button("Blog", "/blog", ButtonStyle::Secondary),
            button("GitHub", "https://github.com/x", ButtonStyle::Primary),
            button("Skills", "#skills", ButtonStyle::Nav),
            button("Broken", "", ButtonStyle::Primary),
        ]);

        let github = html.find("GitHub").unwrap();
        let blog = html.find("Blog").unwrap();
        assert!(github < blog, "primary buttons come first");
        assert!(html.contains(r#"data-target="skills""#));
        assert!(!html.contains("Broken"));
        assert_eq!(html.matches("target=\"_blank\"").count(), 1);
    }

    #[test]
    fn no_buttons_no_groups() {
        assert_eq!(buttons_markup(&[]), "");
    }

    #[test]
    fn announcement_needs_enabled_and_text() {
        let mut a = Announcement {
            enabled: true,
            text: String::new(),
            kind: AnnouncementKind::Warning,
        };
        assert_eq!(announcement_markup(&a), "");
        a.text = "Hiring".into();
        assert!(announcement_markup(&a).contains(AnnouncementKind::Warning.tint()));
        a.enabled = false;
        assert_eq!(announcement_markup(&a), "");
    }

    #[tokio::test]
    async fn skills_render_unclamped_levels() {
        let doc = PageDocument {
            skills: vec![Skill::new("Rust", 120)],
            ..Default::default()
        };
        let files = crate::render::tests::NoFiles;
        let ctx = RenderContext {
            document: &doc,
            files: &files,
        };
        let html = SkillsModule.render(&ctx).await.unwrap();
        assert!(html.contains("width: 120%"));
    }

    #[tokio::test]
    async fn projects_render_tags_and_image_fallback() {
        let doc = PageDocument {
            projects: vec![Project {
                id: "p1".into(),
                title: "Folio".into(),
                description: "Portfolio server".into(),
                image: "/img.png".into(),
                link: "https://example.com".into(),
                tags: vec!["rust".into(), "web".into()],
            }],
            ..Default::default()
        };
        let files = crate::render::tests::NoFiles;
        let ctx = RenderContext {
            document: &doc,
            files: &files,
        };
        let html = ProjectsModule.render(&ctx).await.unwrap();
        assert_eq!(html.matches(r#"class="tag""#).count(), 2);
        assert!(html.contains(BROKEN_PROJECT_IMAGE));
    }

    #[test]
    fn file_card_links_to_download_path() {
        let mut file = FileEntry::sample("cv.pdf");
        file.relative_path = "docs/abc.pdf".into();
        file.size = 1536;
        let html = file_card(&file);
        assert!(html.contains(r#"href="/files/docs/abc.pdf""#));
        assert!(html.contains("1.50 KB"));
        assert!(html.contains("📄"));
        assert!(html.contains("No description"));
    }

    #[test]
    fn hidden_custom_module_renders_nothing() {
        let mut module = CustomModule {
            id: "custom_1".into(),
            title: "Talks".into(),
            content: "Slides".into(),
            kind: "custom".into(),
            link: String::new(),
            visible: false,
            order: 0,
            created_at: None,
            updated_at: None,
        };
        assert!(custom_markup(&module).is_none());
        module.visible = true;
        let html = custom_markup(&module).unwrap();
        assert!(html.contains("Talks"));
        assert!(!html.contains("custom-link"));
    }
}
