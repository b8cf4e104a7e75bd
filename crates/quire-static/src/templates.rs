//! Template engine for rendering the generated pages.

use minijinja::Environment;
use serde::Serialize;

use crate::theme::ThemeSettings;

/// A post link in the viewer sidebar.
#[derive(Debug, Clone, Serialize)]
pub struct NavLink {
    /// Element id of the post's article
    pub anchor: String,
    /// Display title
    pub title: String,
}

/// A subcategory in the viewer sidebar.
#[derive(Debug, Clone, Serialize)]
pub struct NavGroup {
    pub name: String,
    pub posts: Vec<NavLink>,
}

/// A category in the viewer sidebar.
#[derive(Debug, Clone, Serialize)]
pub struct NavCategory {
    pub name: String,
    pub posts: Vec<NavLink>,
    pub subcategories: Vec<NavGroup>,
}

/// A post as shown by the viewer.
#[derive(Debug, Clone, Serialize)]
pub struct ViewerPost {
    pub anchor: String,
    pub title: String,
    pub date: String,
    pub category: String,
    pub subcategory: Option<String>,
    /// Plain-text preview for the post list
    pub excerpt: String,
    /// Rendered body HTML
    pub html: String,
}

/// Context for the viewer page.
#[derive(Debug, Clone, Serialize)]
pub struct ViewerContext {
    pub title: String,
    pub subtitle: String,
    pub footer: String,
    pub theme: ThemeSettings,
    pub css: String,
    pub js: String,
    pub nav: Vec<NavCategory>,
    pub posts: Vec<ViewerPost>,
}

/// One post section of the printable export.
#[derive(Debug, Clone, Serialize)]
pub struct ExportEntry {
    pub anchor: String,
    /// 1-based position in the document
    pub position: usize,
    pub title: String,
    pub date: String,
    pub category: String,
    pub subcategory: Option<String>,
    pub filename: Option<String>,
    pub html: String,
    /// Whether this is the final section (no separator or page break after)
    pub last: bool,
}

/// Context for the printable export.
#[derive(Debug, Clone, Serialize)]
pub struct ExportContext {
    pub title: String,
    pub subtitle: String,
    pub generated_on: String,
    pub css: String,
    pub js: String,
    pub total: usize,
    pub entries: Vec<ExportEntry>,
}

/// Context for a converted Markdown document.
#[derive(Debug, Clone, Serialize)]
pub struct ConvertedContext {
    pub title: String,
    pub css: String,
    pub content: String,
}

/// Template engine using minijinja.
pub struct TemplateEngine {
    env: Environment<'static>,
}

impl TemplateEngine {
    /// Create a new template engine with the built-in templates.
    pub fn new() -> Self {
        let mut env = Environment::new();

        env.add_template("viewer.html", VIEWER_TEMPLATE)
            .expect("Failed to add viewer template");

        env.add_template("nav.html", NAV_TEMPLATE)
            .expect("Failed to add nav template");

        env.add_template("export.html", EXPORT_TEMPLATE)
            .expect("Failed to add export template");

        env.add_template("converted.html", CONVERTED_TEMPLATE)
            .expect("Failed to add converted template");

        Self { env }
    }

    /// Render a template with a serializable context.
    pub fn render<C: Serialize>(&self, template: &str, context: &C) -> Result<String, minijinja::Error> {
        self.env.get_template(template)?.render(context)
    }

    pub fn render_viewer(&self, context: &ViewerContext) -> Result<String, minijinja::Error> {
        self.render("viewer.html", context)
    }

    pub fn render_export(&self, context: &ExportContext) -> Result<String, minijinja::Error> {
        self.render("export.html", context)
    }

    pub fn render_converted(&self, context: &ConvertedContext) -> Result<String, minijinja::Error> {
        self.render("converted.html", context)
    }
}

impl Default for TemplateEngine {
    fn default() -> Self {
        Self::new()
    }
}

const VIEWER_TEMPLATE: &str = r##"<!DOCTYPE html>
<html lang="en" data-theme-mode="{{ theme.mode }}" data-theme-key="{{ theme.storage_key }}">
<head>
  <meta charset="utf-8">
  <meta name="viewport" content="width=device-width, initial-scale=1">
  <title>{{ title }}</title>
  <style>{{ css | safe }}</style>
</head>
<body>
  <div class="blog-container">
    <nav class="blog-navigation">
      {% include "nav.html" %}
    </nav>
    <div class="main-content">
      <header class="blog-header">
        <div>
          <h1>{{ title }}</h1>
          {% if subtitle %}<p>{{ subtitle }}</p>{% endif %}
        </div>
        <button class="theme-toggle" type="button" aria-label="Toggle theme">☾</button>
      </header>

      <main class="blog-list">
        <h2>All posts</h2>
        {% for post in posts %}
        <div class="post-preview" data-post="{{ post.anchor }}">
          <h3>{{ post.title }}</h3>
          <div class="post-meta">
            <span class="post-date">{{ post.date }}</span>
            <span class="post-category">{{ post.category }}</span>
            {% if post.subcategory %}<span class="post-subcategory">{{ post.subcategory }}</span>{% endif %}
          </div>
          <p class="post-excerpt">{{ post.excerpt }}...</p>
        </div>
        {% else %}
        <p class="post-excerpt">No posts yet.</p>
        {% endfor %}
      </main>

      {% for post in posts %}
      <article class="blog-post" id="{{ post.anchor }}" hidden>
        <button class="back-button" type="button">← Back to all posts</button>
        <h2>{{ post.title }}</h2>
        <div class="post-meta">
          <span class="post-date">{{ post.date }}</span>
          <span class="post-category">{{ post.category }}</span>
          {% if post.subcategory %}<span class="post-subcategory">{{ post.subcategory }}</span>{% endif %}
        </div>
        <div class="post-content markdown-content">{{ post.html | safe }}</div>
      </article>
      {% endfor %}

      <footer class="blog-footer">
        <p>{{ footer }}</p>
      </footer>
    </div>
  </div>
  <script>{{ js | safe }}</script>
</body>
</html>"##;

const NAV_TEMPLATE: &str = r##"<div class="nav-header">
  <button class="nav-toggle" type="button" aria-label="Toggle navigation">←</button>
  <span class="nav-title">Contents</span>
</div>
<div class="nav-content">
{% for category in nav %}
  <div class="nav-category">
    <button class="category-header" type="button">
      <span class="category-icon">▼</span>
      {{ category.name }}
    </button>
    <div class="category-content">
      {% for post in category.posts %}
      <button class="nav-item" type="button" data-post="{{ post.anchor }}">{{ post.title }}</button>
      {% endfor %}
      {% for sub in category.subcategories %}
      <div class="nav-subcategory">
        <div class="subcategory-header">{{ sub.name }}</div>
        {% for post in sub.posts %}
        <button class="nav-item subcategory-item" type="button" data-post="{{ post.anchor }}">{{ post.title }}</button>
        {% endfor %}
      </div>
      {% endfor %}
    </div>
  </div>
{% endfor %}
</div>"##;

const EXPORT_TEMPLATE: &str = r##"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{{ title }}</title>
    <script src="https://cdn.tailwindcss.com"></script>
    <style>{{ css | safe }}</style>
</head>
<body>
    <div class="max-w-4xl mx-auto p-8 bg-white text-black print:p-0 print:max-w-none">
      <div class="text-center mb-12">
        <h1 class="text-4xl font-bold mb-4">{{ title }}</h1>
        <p class="text-gray-600">{{ subtitle }}</p>
      </div>

      <nav class="toc mb-12 page-break-after">
        <h2 class="text-2xl font-bold mb-6 text-zinc-900 border-b-2 border-zinc-500 pb-2">Contents</h2>
        <div class="space-y-3">
        {% for entry in entries %}
          <div class="toc-entry flex justify-between items-start">
            <div class="flex-1">
              <a href="#{{ entry.anchor }}" class="font-medium text-gray-900 mb-1 hover:text-blue-600 transition-colors block">{{ entry.title }}</a>
              <div class="flex gap-3 text-sm text-gray-600">
                {% if entry.date %}<span>📅 {{ entry.date }}</span>{% endif %}
                {% if entry.category %}<span>📂 {{ entry.category }}</span>{% endif %}
                {% if entry.subcategory %}<span>📁 {{ entry.subcategory }}</span>{% endif %}
                {% if entry.filename %}<span>📄 {{ entry.filename }}</span>{% endif %}
              </div>
            </div>
            <span class="text-sm text-gray-500 ml-4 flex-shrink-0">{{ entry.position }}</span>
          </div>
        {% endfor %}
        </div>
      </nav>

      {% for entry in entries %}
      <article id="{{ entry.anchor }}" class="{% if not entry.last %}page-break-after{% endif %}">
        <header class="mb-6 border-b-2 border-zinc-500 pb-4">
          <h1 class="text-3xl font-bold text-zinc-900 mb-2">{{ entry.title }}</h1>
          <div class="flex flex-wrap gap-4 text-sm text-gray-600">
            {% if entry.date %}<span>📅 {{ entry.date }}</span>{% endif %}
            {% if entry.category %}<span>📂 {{ entry.category }}</span>{% endif %}
            {% if entry.subcategory %}<span>📁 {{ entry.subcategory }}</span>{% endif %}
            {% if entry.filename %}<span>📄 {{ entry.filename }}</span>{% endif %}
          </div>
        </header>
        <div class="post-content">{{ entry.html | safe }}</div>
        {% if not entry.last %}
        <div class="separator mt-12 mb-8 text-center text-gray-400">
          <div class="border-t border-gray-300"></div>
          <span class="inline-block px-4 bg-white text-xs uppercase tracking-wide mt-2">{{ entry.position }} / {{ total }}</span>
        </div>
        {% endif %}
      </article>
      {% endfor %}

      <footer class="mt-12 pt-8 border-t border-gray-300 text-center text-gray-500">
        <p>{{ title }} - generated on {{ generated_on }}</p>
      </footer>
    </div>

    <div class="floating-toc no-print">
      <div class="floating-toc-icon">
        <svg width="20" height="20" viewBox="0 0 24 24" fill="none" stroke="currentColor" stroke-width="2">
          <line x1="8" y1="6" x2="21" y2="6"></line>
          <line x1="8" y1="12" x2="21" y2="12"></line>
          <line x1="8" y1="18" x2="21" y2="18"></line>
          <line x1="3" y1="6" x2="3.01" y2="6"></line>
          <line x1="3" y1="12" x2="3.01" y2="12"></line>
          <line x1="3" y1="18" x2="3.01" y2="18"></line>
        </svg>
      </div>
      <div class="floating-toc-header">Contents</div>
      <div class="floating-toc-content">
      {% for entry in entries %}
        <div class="floating-toc-item" data-target="{{ entry.anchor }}">{{ entry.title }}</div>
      {% endfor %}
      </div>
    </div>

    <script>{{ js | safe }}</script>
</body>
</html>"##;

const CONVERTED_TEMPLATE: &str = r##"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{{ title }}</title>
    <style>{{ css | safe }}</style>
</head>
<body>
{{ content | safe }}
</body>
</html>"##;

#[cfg(test)]
mod tests {
    use super::*;

    fn link(anchor: &str, title: &str) -> NavLink {
        NavLink {
            anchor: anchor.to_string(),
            title: title.to_string(),
        }
    }

    fn viewer_context() -> ViewerContext {
        ViewerContext {
            title: "My <Blog>".to_string(),
            subtitle: "Notes".to_string(),
            footer: "© quire".to_string(),
            theme: ThemeSettings::default(),
            css: "body{}".to_string(),
            js: "console.log(1)".to_string(),
            nav: vec![NavCategory {
                name: "Tech".to_string(),
                posts: vec![link("post-alpha", "Alpha")],
                subcategories: vec![NavGroup {
                    name: "Notes".to_string(),
                    posts: vec![link("post-beta", "Beta")],
                }],
            }],
            posts: vec![ViewerPost {
                anchor: "post-alpha".to_string(),
                title: "Alpha".to_string(),
                date: "2024-01-02".to_string(),
                category: "Tech".to_string(),
                subcategory: None,
                excerpt: "Hello".to_string(),
                html: "<p>Hello</p>".to_string(),
            }],
        }
    }

    #[test]
    fn renders_viewer_page() {
        let engine = TemplateEngine::new();

        let html = engine.render_viewer(&viewer_context()).unwrap();

        assert!(html.contains("<title>My &lt;Blog&gt;</title>"));
        assert!(html.contains("<p>Hello</p>"));
        assert!(html.contains(r#"data-theme-mode="system""#));
        assert!(html.contains(r#"<article class="blog-post" id="post-alpha" hidden>"#));
        assert!(html.contains("console.log(1)"));
    }

    #[test]
    fn renders_navigation() {
        let engine = TemplateEngine::new();

        let html = engine.render_viewer(&viewer_context()).unwrap();

        assert!(html.contains("Tech"));
        assert!(html.contains(r#"<div class="subcategory-header">Notes</div>"#));
        assert!(html.contains(r#"data-post="post-beta">Beta</button>"#));
    }

    #[test]
    fn renders_converted_document() {
        let engine = TemplateEngine::new();

        let html = engine
            .render_converted(&ConvertedContext {
                title: "Converted".to_string(),
                css: "h1{}".to_string(),
                content: "<h1>Doc</h1>".to_string(),
            })
            .unwrap();

        assert!(html.contains("<title>Converted</title>"));
        assert!(html.contains("<h1>Doc</h1>"));
    }
}
