use {
    crate::{ContractArtifact, Error},
    std::{
        collections::{BTreeMap, HashMap},
        fs,
        path::{Path, PathBuf},
    },
};

/// Directory backed artifact registry.
///
/// Indexes a Hardhat (`artifacts/contracts/Foo.sol/Foo.json`) or Foundry
/// (`out/Foo.sol/Foo.json`) build output by contract name. Artifacts are only
/// parsed when resolved, so a broken artifact of a contract that is never
/// deployed does not get in the way.
#[derive(Debug, Clone)]
pub struct Artifacts {
    root: PathBuf,
    /// Fully qualified name (`contracts/Foo.sol:Foo`) to artifact file.
    files: BTreeMap<String, PathBuf>,
    /// Short contract name to all fully qualified names sharing it.
    by_name: HashMap<String, Vec<String>>,
}

impl Artifacts {
    pub fn load(root: impl Into<PathBuf>) -> Result<Self, Error> {
        let root = root.into();
        let mut files = BTreeMap::new();
        collect(&root, &root, &mut files)?;

        let mut by_name: HashMap<String, Vec<String>> = HashMap::new();
        for qualified in files.keys() {
            let name = short_name(qualified).to_string();
            by_name.entry(name).or_default().push(qualified.clone());
        }

        tracing::debug!(root = ?root, artifacts = files.len(), "indexed contract artifacts");
        Ok(Self {
            root,
            files,
            by_name,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Fully qualified names of all indexed artifacts, sorted.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.files.keys().map(String::as_str)
    }

    /// Looks up an artifact by contract name or fully qualified name and
    /// parses it.
    pub fn resolve(&self, name: &str) -> Result<ContractArtifact, Error> {
        let qualified = self.qualify(name)?;
        let path = &self.files[qualified];
        let json = fs::read_to_string(path).map_err(|source| Error::Io {
            path: path.clone(),
            source,
        })?;

        let mut artifact =
            ContractArtifact::from_json(short_name(qualified), &json).map_err(|err| match err {
                Error::Invalid { reason, .. } => Error::Invalid {
                    location: path.display().to_string(),
                    reason,
                },
                err => err,
            })?;
        artifact.qualified_name = Some(qualified.to_string());
        Ok(artifact)
    }

    fn qualify(&self, name: &str) -> Result<&str, Error> {
        if let Some((qualified, _)) = self.files.get_key_value(name) {
            return Ok(qualified.as_str());
        }
        match self.by_name.get(name).map(Vec::as_slice) {
            Some([qualified]) => Ok(qualified.as_str()),
            Some(candidates) if !candidates.is_empty() => Err(Error::Ambiguous {
                name: name.to_string(),
                candidates: candidates.to_vec(),
            }),
            _ => Err(Error::NotFound(name.to_string())),
        }
    }
}

/// Recursively collects `<dir>/<Source>.sol/<Name>.json` files, keyed by
/// `<dir>/<Source>.sol:<Name>` relative to `root`.
fn collect(root: &Path, dir: &Path, files: &mut BTreeMap<String, PathBuf>) -> Result<(), Error> {
    let io_error = |source: std::io::Error| Error::Io {
        path: dir.to_path_buf(),
        source,
    };

    for entry in fs::read_dir(dir).map_err(io_error)? {
        let path = entry.map_err(io_error)?.path();
        let Some(file_name) = path.file_name().and_then(|name| name.to_str()) else {
            continue;
        };

        if path.is_dir() {
            // Compiler inputs and outputs, not artifacts.
            if file_name == "build-info" {
                continue;
            }
            collect(root, &path, files)?;
            continue;
        }

        let Some(name) = file_name.strip_suffix(".json") else {
            continue;
        };
        if name.ends_with(".dbg") {
            continue;
        }
        let Some(source) = path
            .parent()
            .and_then(|parent| parent.strip_prefix(root).ok())
            .filter(|source| !source.as_os_str().is_empty())
        else {
            continue;
        };

        let source = source
            .components()
            .map(|component| component.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/");
        files.insert(format!("{source}:{name}"), path);
    }

    Ok(())
}

fn short_name(qualified: &str) -> &str {
    qualified
        .rsplit_once(':')
        .map(|(_, name)| name)
        .unwrap_or(qualified)
}
