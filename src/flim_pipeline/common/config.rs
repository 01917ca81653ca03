//! Conversion configuration types

/// Shape every decay record must have: (y, x, time bins).
pub const DEFAULT_CUBE_SHAPE: [usize; 3] = [512, 512, 1024];

/// Configuration for SDT to B64 conversion
#[derive(Debug, Clone)]
pub struct ConversionConfig {
    /// Exact shape each decoded record must have before it is reordered
    pub expected_shape: [usize; 3],
    /// File name suffix (without the dot) selecting source files in a folder
    pub source_extension: String,
    /// Extension appended to every output file
    pub destination_extension: String,
    /// Keep walking a folder after a file fails instead of stopping
    pub keep_going: bool,
}

impl Default for ConversionConfig {
    fn default() -> Self {
        Self {
            expected_shape: DEFAULT_CUBE_SHAPE,
            source_extension: "sdt".to_string(),
            destination_extension: "B64".to_string(),
            keep_going: false,
        }
    }
}

impl ConversionConfig {
    pub fn builder() -> ConversionConfigBuilder {
        ConversionConfigBuilder::default()
    }
}

/// Builder for ConversionConfig
#[derive(Default)]
pub struct ConversionConfigBuilder {
    expected_shape: Option<[usize; 3]>,
    source_extension: Option<String>,
    destination_extension: Option<String>,
    keep_going: Option<bool>,
}

impl ConversionConfigBuilder {
    pub fn expected_shape(mut self, shape: [usize; 3]) -> Self {
        self.expected_shape = Some(shape);
        self
    }

    pub fn source_extension(mut self, extension: impl Into<String>) -> Self {
        self.source_extension = Some(extension.into());
        self
    }

    pub fn destination_extension(mut self, extension: impl Into<String>) -> Self {
        self.destination_extension = Some(extension.into());
        self
    }

    pub fn keep_going(mut self, enable: bool) -> Self {
        self.keep_going = Some(enable);
        self
    }

    pub fn build(self) -> ConversionConfig {
        let default = ConversionConfig::default();
        ConversionConfig {
            expected_shape: self.expected_shape.unwrap_or(default.expected_shape),
            source_extension: self.source_extension.unwrap_or(default.source_extension),
            destination_extension: self
                .destination_extension
                .unwrap_or(default.destination_extension),
            keep_going: self.keep_going.unwrap_or(default.keep_going),
        }
    }
}
