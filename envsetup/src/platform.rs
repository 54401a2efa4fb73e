//! Platform-specific virtual environment layout.

use std::path::{Path, PathBuf};

/// Host operating system family, as far as venv layout is concerned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Os {
    Unix,
    Windows,
}

impl Os {
    /// Detect the current OS family.
    pub fn detect() -> Self {
        if cfg!(windows) { Os::Windows } else { Os::Unix }
    }

    /// Get the OS string for display.
    pub fn as_str(&self) -> &'static str {
        match self {
            Os::Unix => "unix",
            Os::Windows => "windows",
        }
    }
}

/// Where a venv keeps its executables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VenvLayout {
    pub os: Os,
    root: PathBuf,
}

impl VenvLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self::for_os(Os::detect(), root)
    }

    pub fn for_os(os: Os, root: impl Into<PathBuf>) -> Self {
        Self {
            os,
            root: root.into(),
        }
    }

    /// Directory holding the venv's executables.
    pub fn bin_dir(&self) -> PathBuf {
        match self.os {
            Os::Unix => self.root.join("bin"),
            Os::Windows => self.root.join("Scripts"),
        }
    }

    /// The venv's interpreter.
    pub fn python(&self) -> PathBuf {
        match self.os {
            Os::Unix => self.bin_dir().join("python"),
            Os::Windows => self.bin_dir().join("python.exe"),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl std::fmt::Display for VenvLayout {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.root.display(), self.os.as_str())
    }
}
