//! The contract a sensor exposes to the host.

use crate::context::SensorContext;

/// Describes a sensor: its display name and the language it analyses.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SensorDescriptor {
    name: Option<String>,
    language: Option<String>,
}

impl SensorDescriptor {
    /// Creates an empty descriptor for a sensor to fill in.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the display name.
    pub fn name(&mut self, name: impl Into<String>) -> &mut Self {
        self.name = Some(name.into());
        self
    }

    /// Restricts the sensor to one language.
    pub fn only_on_language(&mut self, language: impl Into<String>) -> &mut Self {
        self.language = Some(language.into());
        self
    }

    /// Returns the display name, if set.
    #[must_use]
    pub fn sensor_name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Returns the language filter, if set.
    #[must_use]
    pub fn language(&self) -> Option<&str> {
        self.language.as_deref()
    }
}

/// A host-plugin unit that inspects files and emits issues.
pub trait Sensor {
    /// Fills in the sensor descriptor.
    fn describe(&self, descriptor: &mut SensorDescriptor);

    /// Runs the sensor against the context.
    fn execute(&self, context: &mut dyn SensorContext);
}
