//! File access for the data file, its companion files and rendered pages.
//!
//! Loading and the commands take a `&dyn FileSystem`; tests hand them a [`mock::MockFs`].

use std::io;
use std::path::Path;

pub trait FileSystem: Send + Sync {
    fn read_to_string(&self, path: &Path) -> io::Result<String>;

    /// Missing parent directories are created.
    fn write(&self, path: &Path, content: &str) -> io::Result<()>;

    fn exists(&self, path: &Path) -> bool;
}

/// The local disk.
#[derive(Debug, Default, Clone, Copy)]
pub struct RealFs;

impl FileSystem for RealFs {
    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        std::fs::read_to_string(path)
    }

    fn write(&self, path: &Path, content: &str) -> io::Result<()> {
        match path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => std::fs::create_dir_all(dir)?,
            _ => {}
        }
        std::fs::write(path, content)
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }
}

pub fn default_fs() -> &'static RealFs {
    static DISK: RealFs = RealFs;
    &DISK
}

/// Contents of a file that may legitimately be absent.
///
/// `NotFound` becomes `Ok(None)`; permission and encoding failures are still errors.
pub fn read_optional(fs: &dyn FileSystem, path: &Path) -> io::Result<Option<String>> {
    match fs.read_to_string(path) {
        Ok(content) => Ok(Some(content)),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e),
    }
}

#[cfg(test)]
pub mod mock {
    use super::*;
    use std::collections::BTreeMap;
    use std::path::PathBuf;
    use std::sync::Mutex;

    /// Files kept in memory, keyed by the exact path they were written under.
    #[derive(Debug, Default)]
    pub struct MockFs {
        files: Mutex<BTreeMap<PathBuf, String>>,
    }

    impl MockFs {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn with_files<I, P, C>(files: I) -> Self
        where
            I: IntoIterator<Item = (P, C)>,
            P: AsRef<Path>,
            C: Into<String>,
        {
            let files = files
                .into_iter()
                .map(|(path, content)| (path.as_ref().to_path_buf(), content.into()))
                .collect();
            Self {
                files: Mutex::new(files),
            }
        }

        /// What a command wrote, if anything.
        pub fn get(&self, path: &Path) -> Option<String> {
            self.files.lock().unwrap().get(path).cloned()
        }
    }

    impl FileSystem for MockFs {
        fn read_to_string(&self, path: &Path) -> io::Result<String> {
            self.get(path).ok_or_else(|| {
                io::Error::new(
                    io::ErrorKind::NotFound,
                    format!("{} is not in the mock filesystem", path.display()),
                )
            })
        }

        fn write(&self, path: &Path, content: &str) -> io::Result<()> {
            self.files
                .lock()
                .unwrap()
                .insert(path.to_path_buf(), content.to_string());
            Ok(())
        }

        fn exists(&self, path: &Path) -> bool {
            self.files.lock().unwrap().contains_key(path)
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn test_read_optional() {
            let fs = MockFs::with_files([(Path::new("/data/scenario.json"), "{}")]);

            let present = read_optional(&fs, Path::new("/data/scenario.json")).unwrap();
            assert_eq!(present.as_deref(), Some("{}"));

            let missing = read_optional(&fs, Path::new("/data/other.json")).unwrap();
            assert!(missing.is_none());
        }

        #[test]
        fn test_write_then_read() {
            let fs = MockFs::new();
            let path = Path::new("/out/graph.html");
            assert!(!fs.exists(path));
            assert!(fs.read_to_string(path).is_err());

            fs.write(path, "<html></html>").unwrap();
            assert!(fs.exists(path));
            assert_eq!(fs.get(path).as_deref(), Some("<html></html>"));
        }
    }
}
