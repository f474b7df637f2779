//! Bytecode version and runtime variant tags.

use std::fmt;

/// Bytecode format version, as `major.minor`.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, PartialOrd, Ord)]
pub struct Version {
    pub major: u8,
    pub minor: u8,
}

impl Version {
    pub const V3_7: Version = Version::new(3, 7);
    pub const V3_8: Version = Version::new(3, 8);

    /// Versions the pipeline has grammars and instruction tables for.
    pub const SUPPORTED: &'static [Version] = &[Version::V3_7, Version::V3_8];

    pub const fn new(major: u8, minor: u8) -> Self {
        Version { major, minor }
    }

    pub fn is_supported(self) -> bool {
        Self::SUPPORTED.contains(&self)
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

impl std::str::FromStr for Version {
    type Err = ();

    /// Parse `"3.8"`. Anything that is not two dot-separated numbers fails.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (major, minor) = s.split_once('.').ok_or(())?;
        let major = major.trim().parse().map_err(|_| ())?;
        let minor = minor.trim().parse().map_err(|_| ())?;
        Ok(Version::new(major, minor))
    }
}

/// Runtime that produced the bytecode.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
pub enum Variant {
    #[default]
    CPython,
    PyPy,
}

impl Variant {
    pub fn is_pypy(self) -> bool {
        self == Variant::PyPy
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Variant::CPython => write!(f, "CPython"),
            Variant::PyPy => write!(f, "PyPy"),
        }
    }
}

#[cfg(test)]
mod tests;
