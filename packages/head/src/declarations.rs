//! Reading contributor declarations from files.
//!
//! A declaration file holds the children of one contributor: a list of head
//! nodes in YAML (`.yaml`, `.yml`) or JSON (`.json`).
//!
//! ```yaml
//! - tag: title
//!   content: My page
//! - tag: meta
//!   attributes: { name: description, content: About my page }
//! ```

use std::fs;
use std::path::Path;

use crate::config::MAX_DECLARATION_SIZE;
use crate::error::{HeadError, Result};
use crate::types::HeadNode;

/// Serialization format of a declaration file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeclarationFormat {
    Yaml,
    Json,
}

impl DeclarationFormat {
    /// Detect the format from the file extension.
    #[must_use]
    pub fn from_path(path: &Path) -> Option<Self> {
        let extension = path.extension()?.to_str()?.to_ascii_lowercase();
        match extension.as_str() {
            "yaml" | "yml" => Some(Self::Yaml),
            "json" => Some(Self::Json),
            _ => None,
        }
    }
}

/// Parse declarations from a string.
///
/// An empty document declares no children.
///
/// # Errors
/// Returns an error if the content is not a list of head nodes.
pub fn parse_declarations(content: &str, format: DeclarationFormat) -> Result<Vec<HeadNode>> {
    if content.trim().is_empty() {
        return Ok(Vec::new());
    }
    let nodes = match format {
        DeclarationFormat::Yaml => serde_yaml_ng::from_str(content)?,
        DeclarationFormat::Json => serde_json::from_str(content)?,
    };
    Ok(nodes)
}

/// Load the declarations of one contributor from a file.
///
/// # Errors
/// Returns an error if the extension is not recognized, the file is larger
/// than [`MAX_DECLARATION_SIZE`], or it cannot be read or parsed.
pub fn load_declarations(path: impl AsRef<Path>) -> Result<Vec<HeadNode>> {
    let path = path.as_ref();
    tracing::debug!(path = %path.display(), "Loading head declarations");

    let format = DeclarationFormat::from_path(path)
        .ok_or_else(|| HeadError::UnsupportedDeclaration(path.to_path_buf()))?;

    let size = fs::metadata(path)?.len();
    if size > MAX_DECLARATION_SIZE {
        tracing::warn!(
            size,
            max = MAX_DECLARATION_SIZE,
            "Declaration file exceeds size limit"
        );
        return Err(HeadError::DeclarationTooLarge {
            path: path.to_path_buf(),
            size,
            limit: MAX_DECLARATION_SIZE,
        });
    }

    let content = fs::read_to_string(path)?;
    let nodes = parse_declarations(&content, format)?;
    tracing::debug!(nodes = nodes.len(), "Loaded head declarations");
    Ok(nodes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ElementDescriptor, TagKind};
    use std::io::Write;
    use std::path::PathBuf;

    #[test]
    fn test_format_from_path() {
        assert_eq!(DeclarationFormat::from_path(Path::new("a.yaml")), Some(DeclarationFormat::Yaml));
        assert_eq!(DeclarationFormat::from_path(Path::new("a.YML")), Some(DeclarationFormat::Yaml));
        assert_eq!(DeclarationFormat::from_path(Path::new("a.json")), Some(DeclarationFormat::Json));
        assert_eq!(DeclarationFormat::from_path(Path::new("a.toml")), None);
        assert_eq!(DeclarationFormat::from_path(Path::new("a")), None);
    }

    #[test]
    fn test_parse_yaml() {
        let nodes = parse_declarations(
            "- tag: title\n  content: hi\n- tag: div\n",
            DeclarationFormat::Yaml,
        )
        .unwrap();
        assert_eq!(nodes.len(), 2);
        assert_eq!(nodes[0], HeadNode::from(ElementDescriptor::title("hi")));
        assert_eq!(
            nodes[1].as_element().map(|e| &e.tag),
            Some(&TagKind::Other("div".to_string()))
        );
    }

    #[test]
    fn test_parse_json() {
        let nodes = parse_declarations(
            r#"[{"tag": "meta", "attributes": {"charSet": "utf-8"}}]"#,
            DeclarationFormat::Json,
        )
        .unwrap();
        assert_eq!(
            nodes,
            vec![HeadNode::from(ElementDescriptor::meta([("charSet", "utf-8")]))]
        );
    }

    #[test]
    fn test_parse_empty_document() {
        assert!(parse_declarations("\n", DeclarationFormat::Yaml).unwrap().is_empty());
    }

    #[test]
    fn test_parse_not_a_list() {
        let err = parse_declarations("tag: title", DeclarationFormat::Yaml).unwrap_err();
        assert!(matches!(err, HeadError::Yaml(_)));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        writeln!(file, "- tag: title\n  content: from file").unwrap();

        let nodes = load_declarations(file.path()).unwrap();
        assert_eq!(nodes, vec![HeadNode::from(ElementDescriptor::title("from file"))]);
    }

    #[test]
    fn test_load_unsupported_extension() {
        let err = load_declarations("page.toml").unwrap_err();
        assert!(matches!(err, HeadError::UnsupportedDeclaration(p) if p == PathBuf::from("page.toml")));
    }

    #[test]
    fn test_load_missing_file() {
        let err = load_declarations("does/not/exist.yaml").unwrap_err();
        assert!(matches!(err, HeadError::Io(_)));
    }

    #[test]
    fn test_load_too_large() {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        let padding = " ".repeat(usize::try_from(MAX_DECLARATION_SIZE).unwrap() + 1);
        file.write_all(padding.as_bytes()).unwrap();

        let err = load_declarations(file.path()).unwrap_err();
        assert!(matches!(err, HeadError::DeclarationTooLarge { .. }));
    }
}
