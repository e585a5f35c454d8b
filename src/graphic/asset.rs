use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use super::error::GraphicError;
use super::node::Node;

const LOG_TARGET: &str = "graphic::asset";

/// Directory holding the `<name>.svg` building blocks of the table scene.
#[derive(Clone, Debug)]
pub struct AssetStore {
    dir: PathBuf,
}

impl AssetStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Assets shipped with the crate.
    pub fn bundled() -> Self {
        Self::new(default_image_dir())
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_of(&self, name: &str) -> PathBuf {
        self.dir.join(format!("{name}.svg"))
    }

    pub fn load(&self, name: &str) -> Result<Node, GraphicError> {
        let path = self.path_of(name);
        let source = fs::read_to_string(&path).map_err(|err| GraphicError::AssetNotFound {
            name: name.to_owned(),
            reason: format!("{}: {err}", path.display()),
        })?;
        let node = Node::parse(&source).map_err(|err| GraphicError::AssetNotFound {
            name: name.to_owned(),
            reason: err.to_string(),
        })?;
        debug!(target = LOG_TARGET, name, path = %path.display(), "loaded svg asset");
        Ok(node)
    }
}

pub fn default_asset_root() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("assets")
}

pub fn default_image_dir() -> PathBuf {
    default_asset_root().join("images")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graphic::Selector;

    #[test]
    fn loads_bundled_templates() {
        let store = AssetStore::bundled();
        let table = store.load("table").unwrap();
        assert_eq!(table.attr("class"), Some("table"));

        let base = store.load("base").unwrap();
        assert_eq!(base.attr("viewBox"), Some("0 0 1000 1000"));
        assert_eq!(base.view_box_width(), Some(1000.0));

        let patterns = store.load("patterns").unwrap();
        assert_eq!(patterns.find_all(&Selector::tag("pattern")).unwrap().len(), 7);
        assert_eq!(patterns.x(), 0.0);
        assert_eq!(patterns.id(), None);
        assert_eq!(patterns.view_box(), None);
    }

    #[test]
    fn missing_asset_is_reported_by_name() {
        let store = AssetStore::bundled();
        match store.load("foo") {
            Err(GraphicError::AssetNotFound { name, .. }) => assert_eq!(name, "foo"),
            other => panic!("expected AssetNotFound, got {other:?}"),
        }
    }

    #[test]
    fn unparsable_asset_is_reported_as_missing() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("broken.svg"), "<svg><g></svg>").unwrap();
        let store = AssetStore::new(dir.path());
        assert!(matches!(
            store.load("broken"),
            Err(GraphicError::AssetNotFound { .. })
        ));
    }
}
