// src/services/assets.rs
use std::path::Path;

/// The chat UI, compiled into the binary.
const ASSETS: &[(&str, &str)] = &[
    ("index.html", include_str!("../../public/index.html")),
    ("styles.css", include_str!("../../public/styles.css")),
    ("app.js", include_str!("../../public/app.js")),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Asset {
    pub name: &'static str,
    pub body: &'static str,
    pub content_type: &'static str,
}

/// Resolve a request path to an embedded asset. `/` maps to `index.html`.
pub fn lookup(path: &str) -> Option<Asset> {
    let name = match path.trim_start_matches('/') {
        "" => "index.html",
        other => other,
    };

    ASSETS
        .iter()
        .find(|&&(asset, _)| asset == name)
        .map(|&(name, body)| Asset {
            name,
            body,
            content_type: content_type_for(name),
        })
}

pub fn content_type_for(path: &str) -> &'static str {
    let ext = Path::new(path)
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);

    match ext.as_deref() {
        Some("html") | Some("htm") => "text/html; charset=utf-8",
        Some("css") => "text/css; charset=utf-8",
        Some("js") | Some("mjs") => "application/javascript; charset=utf-8",
        Some("json") => "application/json",
        Some("svg") => "image/svg+xml",
        Some("ico") => "image/x-icon",
        Some("png") => "image/png",
        Some("txt") => "text/plain; charset=utf-8",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn content_types_by_extension() {
        assert_eq!(content_type_for("index.html"), "text/html; charset=utf-8");
        assert_eq!(content_type_for("/styles.css"), "text/css; charset=utf-8");
        assert_eq!(content_type_for("app.js"), "application/javascript; charset=utf-8");
        assert_eq!(content_type_for("APP.JS"), "application/javascript; charset=utf-8");
        assert_eq!(content_type_for("favicon.ico"), "image/x-icon");
        assert_eq!(content_type_for("manifest.json"), "application/json");
        assert_eq!(content_type_for("logo.svg"), "image/svg+xml");
        assert_eq!(content_type_for("icon.png"), "image/png");
        assert_eq!(content_type_for("README"), "application/octet-stream");
    }

    #[test]
    fn root_and_index_resolve_to_the_same_page() {
        let root = lookup("/").unwrap();
        let index = lookup("/index.html").unwrap();
        assert_eq!(root, index);
        assert!(root.body.contains("<html"));
    }

    #[test]
    fn unknown_and_traversal_paths_miss() {
        assert!(lookup("/missing.js").is_none());
        assert!(lookup("/../Cargo.toml").is_none());
        assert!(lookup("/public/app.js").is_none());
    }
}
