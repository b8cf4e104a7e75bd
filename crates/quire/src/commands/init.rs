//! Initialize a quire project.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

/// Run the init command.
pub async fn run(yes: bool) -> Result<()> {
    tracing::info!("Initializing quire...");

    scaffold(Path::new("."), yes)?;

    tracing::info!("Initialization complete!");
    tracing::info!("Run 'quire dev' to start the development server.");

    Ok(())
}

/// Write the config file and sample posts under `root`.
///
/// Existing files are kept unless `overwrite` is set.
fn scaffold(root: &Path, overwrite: bool) -> Result<()> {
    let content_dir = root.join("content");

    if content_dir.exists() && !overwrite {
        tracing::warn!("content/ directory already exists. Use --yes to overwrite.");
        return Ok(());
    }

    fs::create_dir_all(&content_dir).context("Failed to create content directory")?;

    let files = [
        (root.join("quire.toml"), DEFAULT_CONFIG),
        (content_dir.join("welcome.md"), DEFAULT_WELCOME),
        (content_dir.join("writing-posts.md"), DEFAULT_WRITING_POSTS),
    ];

    for (path, contents) in files {
        if path.exists() && !overwrite {
            continue;
        }

        fs::write(&path, contents).with_context(|| format!("Failed to write {}", path.display()))?;
        tracing::info!("Created {}", path.display());
    }

    Ok(())
}

const DEFAULT_CONFIG: &str = r#"# Quire Configuration

[content]
# Directory holding the Markdown posts
dir = "content"

# Category for posts without one
default_category = "Uncategorized"

[site]
title = "My Blog"
subtitle = ""
footer = "Built with quire"

# system, light or dark
theme = "system"

[build]
output = "dist"
minify = true

[export]
title = "Collected Posts"
# subtitle = "Everything, newest first"

[server]
port = 7777
"#;

const DEFAULT_WELCOME: &str = r#"---
title: "Welcome"
date: 2024-01-01
category: "Getting Started"
---

# Welcome

This is your first post. Every Markdown file in `content/` becomes a post.

Run `quire build` to produce the viewer in `dist/`, or `quire export` for a
single printable document.
"#;

const DEFAULT_WRITING_POSTS: &str = r#"---
title: "Writing Posts"
date: 2024-01-02
category: "Getting Started"
subcategory: "Guides"
---

# Writing Posts

Each post may start with a front matter block:

```yaml
---
id: "my-post"
title: "My Post"
date: 2024-01-02
category: "Notes"
subcategory: "Drafts"
---
```

Every field is optional. Images next to the post are embedded in the output:

```markdown
![Diagram](./diagram.png)
```
"#;
