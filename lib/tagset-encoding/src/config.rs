use figment::{
    error::Kind,
    providers::{Env, Serialized},
    Figment, Provider as _,
};
use serde::Deserialize;
use snafu::Snafu;
use tracing::debug;

use crate::encoder::{new_tag_encoder_with_capacity, TagEncoder, TagEncoderKind};

/// A configuration error.
#[derive(Debug, Snafu)]
#[snafu(context(suffix(false)))]
pub enum ConfigurationError {
    /// Environment variable prefix was empty.
    #[snafu(display("Environment variable prefix must not be empty."))]
    EmptyPrefix,

    /// Requested field's data type was not the expected data type.
    #[snafu(display(
        "Expected value for field '{}' to be '{}', got '{}' instead.",
        field,
        expected_ty,
        actual_ty
    ))]
    InvalidFieldType {
        /// Name of the invalid field.
        field: String,

        /// Expected data type.
        expected_ty: String,

        /// Actual data type.
        actual_ty: String,
    },

    /// Generic configuration error.
    #[snafu(display("Failed to load configuration."))]
    Generic {
        /// Error source.
        source: Box<figment::Error>,
    },
}

impl From<figment::Error> for ConfigurationError {
    fn from(e: figment::Error) -> Self {
        match e.kind {
            Kind::InvalidType(actual_ty, expected_ty) => Self::InvalidFieldType {
                field: e.path.join("."),
                expected_ty,
                actual_ty: actual_ty.to_string(),
            },
            _ => Self::Generic { source: Box::new(e) },
        }
    }
}

const fn default_initial_capacity() -> usize {
    0
}

/// Tag encoder configuration.
///
/// Controls which encoder implementation is used for an encoding session, and how its output buffer is sized.
#[derive(Clone, Debug, Deserialize)]
pub struct TagEncoderConfiguration {
    /// Tag encoder implementation to use.
    ///
    /// `v1` writes every tag literally, while `v2` deduplicates tags across groups with a per-session dictionary.
    ///
    /// Defaults to `v2`.
    #[serde(rename = "tag_encoder_kind", default)]
    kind: TagEncoderKind,

    /// Initial capacity of the encoded output buffer, in bytes.
    ///
    /// Sizing this close to the expected payload size avoids growing the buffer while encoding. When set to zero, the
    /// buffer is allocated on the first write.
    ///
    /// Defaults to 0.
    #[serde(rename = "tag_encoder_initial_capacity", default = "default_initial_capacity")]
    initial_capacity: usize,
}

impl TagEncoderConfiguration {
    /// Creates a new `TagEncoderConfiguration` for the given encoder kind, with default settings otherwise.
    pub fn from_kind(kind: TagEncoderKind) -> Self {
        Self {
            kind,
            initial_capacity: default_initial_capacity(),
        }
    }

    /// Extracts the configuration from the given `Figment`.
    ///
    /// Missing fields take their default values.
    ///
    /// # Errors
    ///
    /// If a field is present but holds an invalid value, an error will be returned.
    pub fn from_figment(figment: &Figment) -> Result<Self, ConfigurationError> {
        figment.extract().map_err(Into::into)
    }

    /// Loads the configuration from environment variables with the given prefix.
    ///
    /// The prefix given will have an underscore appended to it if it does not already end with one. For example, with a
    /// prefix of `DD`, the encoder kind is read from `DD_TAG_ENCODER_KIND`.
    ///
    /// # Errors
    ///
    /// If the prefix is empty, or if a variable holds an invalid value, an error will be returned.
    pub fn from_environment(prefix: &str) -> Result<Self, ConfigurationError> {
        if prefix.is_empty() {
            return Err(ConfigurationError::EmptyPrefix);
        }

        let prefix = if prefix.ends_with('_') {
            prefix.to_string()
        } else {
            format!("{}_", prefix)
        };

        // Snapshot the environment up front, so the resulting figment doesn't change underneath us.
        let values = Env::prefixed(&prefix).data()?;
        let mut figment = Figment::new();
        if let Some(default_dict) = values.get(&figment::Profile::Default) {
            figment = figment.merge(Serialized::defaults(default_dict.clone()));
        }

        Self::from_figment(&figment)
    }

    /// Returns the configured encoder kind.
    pub fn kind(&self) -> TagEncoderKind {
        self.kind
    }

    /// Returns the configured initial buffer capacity, in bytes.
    pub fn initial_capacity(&self) -> usize {
        self.initial_capacity
    }

    /// Sets the initial buffer capacity, in bytes.
    pub fn with_initial_capacity(mut self, initial_capacity: usize) -> Self {
        self.initial_capacity = initial_capacity;
        self
    }

    /// Creates a new tag encoder based on this configuration.
    pub fn build(&self) -> Box<dyn TagEncoder> {
        debug!(kind = %self.kind, initial_capacity = self.initial_capacity, "Building tag encoder from configuration.");
        new_tag_encoder_with_capacity(self.kind, self.initial_capacity)
    }
}

impl Default for TagEncoderConfiguration {
    fn default() -> Self {
        Self::from_kind(TagEncoderKind::default())
    }
}
