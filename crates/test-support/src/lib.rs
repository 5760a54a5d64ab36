//! Fixture files shared by the Perch test suites.
//!
//! Fixtures live under `tests/fixtures/` at the workspace root, one directory
//! per [`Kind`](fixtures::Kind).

pub mod fixtures {
    use std::fs;
    use std::path::{Path, PathBuf};

    /// A family of fixtures sharing a directory and a file extension.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub enum Kind {
        /// Raw XMPP stanzas, one element per file.
        Stanza,
        /// `perch.toml` variants.
        Config,
    }

    impl Kind {
        pub fn extension(self) -> &'static str {
            match self {
                Kind::Stanza => "xml",
                Kind::Config => "toml",
            }
        }

        pub fn dir(self) -> PathBuf {
            root().join(match self {
                Kind::Stanza => "stanzas",
                Kind::Config => "config",
            })
        }

        /// Location of fixture `name`. The extension may be left off.
        ///
        /// Panics when `name` carries an extension belonging to another kind.
        pub fn path(self, name: &str) -> PathBuf {
            match Path::new(name).extension().and_then(|ext| ext.to_str()) {
                None => self.dir().join(format!("{name}.{}", self.extension())),
                Some(ext) if ext == self.extension() => self.dir().join(name),
                Some(ext) => panic!("{name} is a .{ext} file, not a {self:?} fixture"),
            }
        }

        pub fn load(self, name: &str) -> String {
            let path = self.path(name);
            fs::read_to_string(&path).unwrap_or_else(|error| {
                panic!("failed to read fixture {}: {error}", path.display())
            })
        }

        /// Every fixture of this kind, by name without extension, sorted.
        pub fn names(self) -> Vec<String> {
            let dir = self.dir();
            let entries = fs::read_dir(&dir)
                .unwrap_or_else(|error| panic!("failed to list {}: {error}", dir.display()));
            let mut names: Vec<String> = entries
                .filter_map(Result::ok)
                .map(|entry| entry.path())
                .filter(|path| {
                    path.extension().and_then(|ext| ext.to_str()) == Some(self.extension())
                })
                .filter_map(|path| Some(path.file_stem()?.to_str()?.to_string()))
                .collect();
            names.sort();
            names
        }
    }

    pub fn root() -> PathBuf {
        Path::new(env!("CARGO_MANIFEST_DIR"))
            .join("..")
            .join("..")
            .join("tests")
            .join("fixtures")
    }

    pub fn stanza(name: &str) -> String {
        Kind::Stanza.load(name)
    }

    pub fn config(name: &str) -> String {
        Kind::Config.load(name)
    }
}
