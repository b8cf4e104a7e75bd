//! Inline CSS and JavaScript for the generated pages.

/// Asset pipeline utilities.
pub struct AssetPipeline;

impl AssetPipeline {
    /// Stylesheet for the viewer page, optionally minified.
    pub fn viewer_css(minify: bool) -> String {
        Self::maybe_minify(VIEWER_CSS, minify)
    }

    /// Script for the viewer page.
    pub fn viewer_js() -> String {
        VIEWER_JS.to_string()
    }

    /// Stylesheet for the printable export.
    pub fn export_css(minify: bool) -> String {
        Self::maybe_minify(EXPORT_CSS, minify)
    }

    /// Script driving the export's floating table of contents.
    pub fn export_js() -> String {
        EXPORT_JS.to_string()
    }

    /// Stylesheet for converted documents.
    pub fn converted_css(minify: bool) -> String {
        Self::maybe_minify(CONVERTED_CSS, minify)
    }

    /// Minify CSS using lightningcss.
    pub fn minify_css(css: &str) -> Result<String, String> {
        use lightningcss::stylesheet::{ParserOptions, PrinterOptions, StyleSheet};

        let stylesheet = StyleSheet::parse(css, ParserOptions::default())
            .map_err(|e| format!("CSS parse error: {}", e))?;

        let minified = stylesheet
            .to_css(PrinterOptions {
                minify: true,
                ..Default::default()
            })
            .map_err(|e| format!("CSS minify error: {}", e))?;

        Ok(minified.code)
    }

    fn maybe_minify(css: &str, minify: bool) -> String {
        if !minify {
            return css.to_string();
        }

        match Self::minify_css(css) {
            Ok(minified) => minified,
            Err(e) => {
                tracing::warn!("Keeping unminified CSS: {}", e);
                css.to_string()
            }
        }
    }
}

const VIEWER_CSS: &str = r#"/* quire viewer */
:root {
  --nav-width: 280px;
  --background: #fafafa;
  --surface: #ffffff;
  --foreground: #18181b;
  --muted: #71717a;
  --border: #e4e4e7;
  --accent: #0d9488;
  --accent-soft: #ccfbf1;
}

html.dark {
  --background: #18181b;
  --surface: #27272a;
  --foreground: #f4f4f5;
  --muted: #a1a1aa;
  --border: #3f3f46;
  --accent: #2dd4bf;
  --accent-soft: #134e4a;
}

* {
  box-sizing: border-box;
}

body {
  margin: 0;
  font-family: system-ui, -apple-system, "Segoe UI", sans-serif;
  background: var(--background);
  color: var(--foreground);
  line-height: 1.6;
}

.blog-container {
  display: flex;
  min-height: 100vh;
}

/* Navigation */
.blog-navigation {
  width: var(--nav-width);
  flex-shrink: 0;
  background: var(--surface);
  border-right: 1px solid var(--border);
  position: sticky;
  top: 0;
  height: 100vh;
  overflow-y: auto;
  transition: width 0.2s ease;
}

.blog-navigation.collapsed {
  width: 48px;
}

.blog-navigation.collapsed .nav-content,
.blog-navigation.collapsed .nav-title {
  display: none;
}

.nav-header {
  display: flex;
  align-items: center;
  gap: 0.5rem;
  padding: 0.75rem;
  border-bottom: 1px solid var(--border);
  font-weight: 600;
}

.nav-toggle,
.theme-toggle,
.back-button,
.category-header,
.nav-item {
  font: inherit;
  color: inherit;
  background: none;
  border: none;
  cursor: pointer;
}

.nav-content {
  padding: 0.5rem;
}

.category-header {
  display: flex;
  align-items: center;
  gap: 0.5rem;
  width: 100%;
  padding: 0.5rem;
  font-weight: 600;
  text-align: left;
}

.category-icon {
  font-size: 0.7rem;
  transition: transform 0.2s ease;
}

.nav-category.collapsed .category-icon {
  transform: rotate(-90deg);
}

.nav-category.collapsed .category-content {
  display: none;
}

.subcategory-header {
  padding: 0.25rem 0.5rem 0.25rem 1.25rem;
  font-size: 0.8rem;
  text-transform: uppercase;
  letter-spacing: 0.04em;
  color: var(--muted);
}

.nav-item {
  display: block;
  width: 100%;
  padding: 0.35rem 0.5rem 0.35rem 1.25rem;
  text-align: left;
  border-radius: 0.375rem;
}

.nav-item.subcategory-item {
  padding-left: 2rem;
}

.nav-item:hover {
  background: var(--accent-soft);
}

.nav-item.active {
  background: var(--accent);
  color: var(--surface);
}

/* Main content */
.main-content {
  flex: 1;
  max-width: 860px;
  margin: 0 auto;
  padding: 2rem;
}

.blog-header {
  display: flex;
  justify-content: space-between;
  align-items: flex-start;
  gap: 1rem;
  margin-bottom: 2rem;
}

.blog-header h1 {
  margin: 0 0 0.25rem;
}

.blog-header p {
  margin: 0;
  color: var(--muted);
}

.theme-toggle {
  padding: 0.4rem 0.6rem;
  border: 1px solid var(--border);
  border-radius: 0.375rem;
}

.post-preview {
  padding: 1rem;
  margin-bottom: 1rem;
  background: var(--surface);
  border: 1px solid var(--border);
  border-radius: 0.5rem;
  cursor: pointer;
}

.post-preview:hover {
  border-color: var(--accent);
}

.post-preview h3 {
  margin: 0 0 0.25rem;
}

.post-meta {
  display: flex;
  flex-wrap: wrap;
  gap: 0.75rem;
  font-size: 0.85rem;
  color: var(--muted);
}

.post-excerpt {
  margin: 0.5rem 0 0;
  color: var(--muted);
}

.blog-post[hidden],
.blog-list[hidden] {
  display: none;
}

.back-button {
  margin-bottom: 1rem;
  color: var(--accent);
}

.markdown-content img {
  max-width: 100%;
  height: auto;
}

.markdown-content pre {
  background: var(--surface);
  border: 1px solid var(--border);
  padding: 1rem;
  border-radius: 0.5rem;
  overflow-x: auto;
}

.markdown-content blockquote {
  margin: 1rem 0;
  padding-left: 1rem;
  border-left: 4px solid var(--accent);
  color: var(--muted);
}

.markdown-content table {
  border-collapse: collapse;
  width: 100%;
}

.markdown-content th,
.markdown-content td {
  border: 1px solid var(--border);
  padding: 6px 13px;
}

.blog-footer {
  margin-top: 3rem;
  padding-top: 1rem;
  border-top: 1px solid var(--border);
  text-align: center;
  color: var(--muted);
  font-size: 0.85rem;
}

@media (max-width: 768px) {
  .blog-container {
    flex-direction: column;
  }

  .blog-navigation {
    width: 100%;
    height: auto;
    position: static;
  }
}
"#;

const VIEWER_JS: &str = r#"// quire viewer runtime
(function() {
  'use strict';

  const root = document.documentElement;
  const storageKey = root.dataset.themeKey || 'theme';
  const defaultMode = root.dataset.themeMode || 'system';

  // Theme
  function initialDark() {
    let saved = null;
    try {
      saved = localStorage.getItem(storageKey);
    } catch (e) {}
    if (saved) return saved === 'dark';
    if (defaultMode === 'dark') return true;
    if (defaultMode === 'light') return false;
    return window.matchMedia && window.matchMedia('(prefers-color-scheme: dark)').matches;
  }

  function applyTheme(dark) {
    root.classList.toggle('dark', dark);
    try {
      localStorage.setItem(storageKey, dark ? 'dark' : 'light');
    } catch (e) {}
    const toggle = document.querySelector('.theme-toggle');
    if (toggle) toggle.textContent = dark ? '☀' : '☾';
  }

  let dark = initialDark();
  applyTheme(dark);

  document.querySelectorAll('.theme-toggle').forEach(function(btn) {
    btn.addEventListener('click', function() {
      dark = !dark;
      applyTheme(dark);
    });
  });

  // Navigation drawer
  const nav = document.querySelector('.blog-navigation');
  const navToggle = document.querySelector('.nav-toggle');
  if (nav && navToggle) {
    navToggle.addEventListener('click', function() {
      const collapsed = nav.classList.toggle('collapsed');
      navToggle.textContent = collapsed ? '→' : '←';
    });
  }

  document.querySelectorAll('.category-header').forEach(function(header) {
    header.addEventListener('click', function() {
      header.parentElement.classList.toggle('collapsed');
    });
  });

  // Post selection
  const list = document.querySelector('.blog-list');
  const articles = document.querySelectorAll('.blog-post');

  function showPost(id) {
    let found = false;
    articles.forEach(function(article) {
      const match = article.id === id;
      article.hidden = !match;
      found = found || match;
    });
    if (list) list.hidden = found;
    document.querySelectorAll('.nav-item').forEach(function(item) {
      item.classList.toggle('active', item.dataset.post === id);
    });
    window.scrollTo(0, 0);
  }

  function showList() {
    articles.forEach(function(article) { article.hidden = true; });
    if (list) list.hidden = false;
    document.querySelectorAll('.nav-item.active').forEach(function(item) {
      item.classList.remove('active');
    });
  }

  document.querySelectorAll('[data-post]').forEach(function(el) {
    el.addEventListener('click', function() {
      history.pushState(null, '', '#' + el.dataset.post);
      showPost(el.dataset.post);
    });
  });

  document.querySelectorAll('.back-button').forEach(function(btn) {
    btn.addEventListener('click', function() {
      history.pushState(null, '', location.pathname);
      showList();
    });
  });

  function route() {
    const id = decodeURIComponent(location.hash.slice(1));
    if (id && document.getElementById(id)) {
      showPost(id);
    } else {
      showList();
    }
  }

  window.addEventListener('popstate', route);
  route();
})();
"#;

const EXPORT_CSS: &str = r#"html {
  scroll-behavior: smooth;
}

@media print {
  body { margin: 0; }
  .page-break { page-break-before: always; }
  .page-break-after { page-break-after: always; }
  .no-print { display: none; }
  .floating-toc { display: none; }
}

.post-content h1 { font-size: 1.875rem; font-weight: bold; margin: 1.5rem 0 1rem 0; }
.post-content h2 { font-size: 1.5rem; font-weight: bold; margin: 1.25rem 0 0.75rem 0; }
.post-content h3 { font-size: 1.25rem; font-weight: bold; margin: 1rem 0 0.5rem 0; }
.post-content p { margin: 0.75rem 0; line-height: 1.6; }
.post-content ul, .post-content ol { margin: 0.75rem 0; padding-left: 1.5rem; }
.post-content li { margin: 0.25rem 0; }
.post-content blockquote { border-left: 4px solid #14b8a6; padding-left: 1rem; margin: 1rem 0; font-style: italic; }
.post-content code { background: #f3f4f6; padding: 0.125rem 0.25rem; border-radius: 0.25rem; font-family: monospace; }
.post-content pre { background: #f3f4f6; padding: 1rem; border-radius: 0.5rem; overflow-x: auto; margin: 1rem 0; }
.post-content pre code { background: none; padding: 0; }
.post-content a { color: #0891b2; text-decoration: underline; }
.post-content img { max-width: 100%; height: auto; margin: 1rem 0; }
.post-content table { border-collapse: collapse; margin: 16px 0; width: 100%; }
.post-content table th, .post-content table td { border: 1px solid #dfe2e5; padding: 6px 13px; }
.post-content table th { background-color: #f6f8fa; font-weight: 600; }

/* Floating table of contents */
.floating-toc {
  position: fixed;
  top: 20px;
  left: 0;
  width: 300px;
  max-height: 70vh;
  background: white;
  border: 1px solid #e5e7eb;
  border-radius: 0 8px 8px 0;
  box-shadow: 0 4px 6px -1px rgba(0, 0, 0, 0.1);
  z-index: 1000;
  transition: transform 0.3s ease;
  transform: translateX(-300px);
}

.floating-toc:hover {
  transform: translateX(0);
}

.floating-toc-icon {
  position: absolute;
  right: -40px;
  top: 50%;
  transform: translateY(-50%);
  width: 40px;
  height: 40px;
  background: white;
  border: 1px solid #e5e7eb;
  border-left: none;
  border-radius: 0 8px 8px 0;
  display: flex;
  align-items: center;
  justify-content: center;
  box-shadow: 2px 0 4px rgba(0, 0, 0, 0.1);
  cursor: pointer;
}

.floating-toc-header {
  padding: 12px 16px;
  border-bottom: 1px solid #e5e7eb;
  background: #f9fafb;
  font-weight: 600;
  font-size: 14px;
}

.floating-toc-content {
  max-height: calc(70vh - 50px);
  overflow-y: auto;
  padding: 12px;
}

.floating-toc-item {
  padding: 6px 12px;
  margin: 2px 0;
  border-radius: 4px;
  cursor: pointer;
  transition: background-color 0.2s;
  font-size: 14px;
}

.floating-toc-item:hover {
  background-color: #f3f4f6;
}

@media (max-width: 768px) {
  .floating-toc {
    width: 250px;
    top: 10px;
    transform: translateX(-250px);
  }

  .floating-toc-icon {
    right: -35px;
    width: 35px;
    height: 35px;
  }
}
"#;

const EXPORT_JS: &str = r#"(function() {
  'use strict';

  function scrollToSection(id) {
    const element = document.getElementById(id);
    if (element) {
      element.scrollIntoView({ behavior: 'instant', block: 'start' });
    }
  }

  window.scrollToSection = scrollToSection;

  document.querySelectorAll('.floating-toc-item[data-target]').forEach(function(item) {
    item.addEventListener('click', function() {
      scrollToSection(item.dataset.target);
    });
  });
})();
"#;

const CONVERTED_CSS: &str = r#"body {
  font-family: -apple-system, BlinkMacSystemFont, "Segoe UI", Roboto, sans-serif;
  line-height: 1.6;
  color: #333;
  max-width: 800px;
  margin: 0 auto;
  padding: 20px;
  background-color: #fff;
}

h1, h2, h3, h4, h5, h6 {
  margin-top: 24px;
  margin-bottom: 16px;
  font-weight: 600;
  line-height: 1.25;
}

h1 { font-size: 2em; border-bottom: 1px solid #eaecef; padding-bottom: 10px; }
h2 { font-size: 1.5em; border-bottom: 1px solid #eaecef; padding-bottom: 8px; }
p { margin-bottom: 16px; }

code {
  background-color: rgba(27, 31, 35, 0.05);
  border-radius: 3px;
  font-size: 85%;
  padding: 0.2em 0.4em;
}

pre {
  background-color: #f6f8fa;
  border-radius: 6px;
  font-size: 85%;
  line-height: 1.45;
  overflow: auto;
  padding: 16px;
}

pre code {
  background-color: transparent;
  padding: 0;
}

blockquote {
  border-left: 4px solid #dfe2e5;
  margin: 0;
  padding: 0 16px;
  color: #6a737d;
}

table {
  border-collapse: collapse;
  margin: 16px 0;
  width: 100%;
}

table th, table td {
  border: 1px solid #dfe2e5;
  padding: 6px 13px;
}

table th {
  background-color: #f6f8fa;
  font-weight: 600;
}

img {
  max-width: 100%;
  height: auto;
  border-radius: 6px;
  box-shadow: 0 2px 8px rgba(0, 0, 0, 0.1);
}

ul, ol {
  padding-left: 30px;
}

li {
  margin-bottom: 4px;
}
"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn viewer_css_has_dark_theme() {
        let css = AssetPipeline::viewer_css(false);
        assert!(css.contains("html.dark"));
        assert!(css.contains("--accent"));
    }

    #[test]
    fn viewer_js_persists_theme() {
        let js = AssetPipeline::viewer_js();
        assert!(js.contains("localStorage.setItem"));
        assert!(js.contains("prefers-color-scheme"));
    }

    #[test]
    fn export_css_has_print_rules() {
        let css = AssetPipeline::export_css(false);
        assert!(css.contains("@media print"));
        assert!(css.contains("page-break-after"));
    }

    #[test]
    fn export_js_scrolls_to_sections() {
        let js = AssetPipeline::export_js();
        assert!(js.contains("function scrollToSection(id)"));
        assert!(js.contains(".floating-toc-item[data-target]"));
    }

    #[test]
    fn minifies_css() {
        let css = r#"
.button {
    background-color: blue;
    padding: 10px;
}
        "#;

        let minified = AssetPipeline::minify_css(css).unwrap();

        assert!(!minified.contains('\n'));
        assert!(minified.contains(".button"));
    }

    #[test]
    fn minified_stylesheets_parse() {
        assert!(!AssetPipeline::viewer_css(true).contains('\n'));
        assert!(!AssetPipeline::converted_css(true).is_empty());
    }
}
