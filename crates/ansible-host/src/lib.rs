//! Host analysis surface consumed by the Ansible lint sensor.
//!
//! The `ansible-host` crate models the collaborators a sensor receives from
//! the analysis host: the [`FileSystem`] holding the [`InputFile`]s to scan,
//! the flat [`Settings`] store, the catalog of [`ActiveRules`], and the
//! [`SensorContext`] that persists the [`Issue`]s a sensor raises.
//!
//! The production host lives outside this workspace. [`InMemoryContext`] is a
//! complete, self-contained implementation used by the standalone runner and
//! by tests.
//!
//! # Example
//!
//! ```
//! use ansible_host::{ActiveRules, FileSystem, InMemoryContext, RuleKey, Settings};
//!
//! let fs = FileSystem::new("/project");
//! let mut rules = ActiveRules::new();
//! rules.activate(RuleKey::new("ansible", "ANSIBLE0001"));
//!
//! let context = InMemoryContext::new(fs, Settings::new(), rules);
//! assert!(context.issues().is_empty());
//! ```

pub mod context;
pub mod error;
pub mod fs;
pub mod issue;
pub mod rules;
pub mod sensor;
pub mod settings;

pub use self::context::{InMemoryContext, SensorContext};
pub use self::error::HostError;
pub use self::fs::{FileSystem, InputFile, file_uri, normalize_path};
pub use self::issue::{Issue, IssueLocation};
pub use self::rules::{ActiveRules, RuleKey};
pub use self::sensor::{Sensor, SensorDescriptor};
pub use self::settings::Settings;
