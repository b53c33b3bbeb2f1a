//! Slash-separated paths for definition folders and template files

use std::fmt;
use std::path::{MAIN_SEPARATOR_STR, Path, PathBuf};

/// A cleaned, forward-slash path.
///
/// Definition files spell template paths with forward slashes regardless of
/// the platform they were written on. Paths stay in that form while the
/// loader joins them onto definition folders; [`NormalizedPath::to_native`]
/// produces the platform form right before touching the disk.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NormalizedPath {
    inner: String,
}

impl NormalizedPath {
    /// Backslashes become forward slashes, empty and `.` segments are
    /// dropped and `segment/..` pairs collapse. Leading `..` segments of a
    /// relative path survive, so a template may live in a sibling folder.
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            inner: clean(&slashes(path.as_ref())),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.inner
    }

    pub fn to_native(&self) -> PathBuf {
        PathBuf::from(self.inner.replace('/', MAIN_SEPARATOR_STR))
    }

    /// Resolve `segment` relative to this path. An absolute segment wins.
    pub fn join(&self, segment: impl AsRef<Path>) -> Self {
        let segment = slashes(segment.as_ref());
        match self.inner.as_str() {
            _ if segment.starts_with('/') => Self::new(segment),
            "" | "." => Self::new(segment),
            base => Self::new(format!("{base}/{segment}")),
        }
    }

    /// The containing folder, `None` for a single relative segment.
    pub fn parent(&self) -> Option<Self> {
        let idx = self.inner.rfind('/')?;
        let inner = match idx {
            0 if self.inner.len() == 1 => return None,
            0 => "/".to_string(),
            _ => self.inner[..idx].to_string(),
        };
        Some(Self { inner })
    }

    pub fn file_name(&self) -> Option<&str> {
        self.inner.rsplit('/').next().filter(|name| !name.is_empty())
    }

    /// Extension of the file name; dot-files such as `.hidden` have none.
    pub fn extension(&self) -> Option<&str> {
        let name = self.file_name()?;
        match name.rfind('.') {
            Some(0) | None => None,
            Some(idx) => Some(&name[idx + 1..]),
        }
    }

    pub fn exists(&self) -> bool {
        self.to_native().exists()
    }

    pub fn is_dir(&self) -> bool {
        self.to_native().is_dir()
    }

    pub fn is_file(&self) -> bool {
        self.to_native().is_file()
    }
}

fn slashes(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}

fn clean(raw: &str) -> String {
    let absolute = raw.starts_with('/');
    let mut segments: Vec<&str> = Vec::new();

    for segment in raw.split('/') {
        match segment {
            "" | "." => {}
            ".." => match segments.last() {
                Some(&last) if last != ".." => {
                    segments.pop();
                }
                // `/..` is still `/`
                _ if absolute => {}
                _ => segments.push(".."),
            },
            other => segments.push(other),
        }
    }

    let joined = segments.join("/");
    match (absolute, joined.is_empty()) {
        (true, _) => format!("/{joined}"),
        (false, true) if raw.is_empty() => String::new(),
        (false, true) => ".".to_string(),
        (false, false) => joined,
    }
}

impl AsRef<Path> for NormalizedPath {
    fn as_ref(&self) -> &Path {
        Path::new(&self.inner)
    }
}

impl fmt::Display for NormalizedPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.inner)
    }
}

macro_rules! from_path_like {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for NormalizedPath {
                fn from(path: $ty) -> Self {
                    Self::new(path)
                }
            }
        )*
    };
}

from_path_like!(&str, String, PathBuf, &Path);
