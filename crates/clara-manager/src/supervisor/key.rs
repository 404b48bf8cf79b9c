use std::fmt;

use strum::{Display, EnumString};

use clara_config::Role;

/// Long-running process kinds the supervisor can start.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display, EnumString)]
#[strum(serialize_all = "snake_case")]
pub enum Instance {
    /// The platform process.
    Platform,
    /// The data processing environment.
    Dpe,
}

impl Instance {
    /// Command table entry used to launch this instance.
    #[must_use]
    pub const fn role(self) -> Role {
        match self {
            Self::Platform => Role::Platform,
            Self::Dpe => Role::Dpe,
        }
    }
}

/// Identity of a supervised process, displayed as `language/instance`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ProcessKey {
    language: String,
    instance: Instance,
}

impl ProcessKey {
    /// Builds a key.
    pub fn new(language: impl Into<String>, instance: Instance) -> Self {
        Self {
            language: language.into(),
            instance,
        }
    }

    /// Language variant of the process.
    #[must_use]
    pub fn language(&self) -> &str {
        &self.language
    }

    /// Instance kind of the process.
    #[must_use]
    pub const fn instance(&self) -> Instance {
        self.instance
    }
}

impl fmt::Display for ProcessKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.language, self.instance)
    }
}
