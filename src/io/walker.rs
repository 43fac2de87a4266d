use anyhow::{Context, Result};
use glob::Pattern;
use ignore::WalkBuilder;
use std::path::{Path, PathBuf};

use crate::frontend::DocumentFormat;

/// Collects interface documents below a root, honoring `.gitignore` and any
/// extra glob patterns from `[input] ignore` or `--ignore`.
pub struct DocumentWalker {
    root: PathBuf,
    ignore_patterns: Vec<Pattern>,
}

impl DocumentWalker {
    pub fn new(root: PathBuf) -> Self {
        Self {
            root,
            ignore_patterns: vec![],
        }
    }

    pub fn with_ignore_patterns(mut self, patterns: &[String]) -> Result<Self> {
        self.ignore_patterns = patterns
            .iter()
            .map(|p| Pattern::new(p).with_context(|| format!("Invalid ignore pattern {:?}", p)))
            .collect::<Result<Vec<_>>>()?;
        Ok(self)
    }

    pub fn walk(&self) -> Result<Vec<PathBuf>> {
        let mut files = Vec::new();
        let walker = WalkBuilder::new(&self.root)
            .hidden(true)
            .git_ignore(true)
            .build();

        for entry in walker {
            let entry = entry?;
            let path = entry.path();

            if path.is_file() && self.should_process(path) {
                files.push(path.to_path_buf());
            }
        }

        // Walk order is filesystem-dependent
        files.sort();
        Ok(files)
    }

    fn should_process(&self, path: &Path) -> bool {
        if DocumentFormat::from_path(path).is_none() {
            return false;
        }

        !self.ignore_patterns.iter().any(|p| p.matches_path(path))
    }
}

pub fn find_interface_documents(root: &Path, ignore_patterns: &[String]) -> Result<Vec<PathBuf>> {
    DocumentWalker::new(root.to_path_buf())
        .with_ignore_patterns(ignore_patterns)?
        .walk()
}
