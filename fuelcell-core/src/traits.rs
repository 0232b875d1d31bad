use crate::imports::*;

/// Serialization formats understood by [SerdeAPI]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SerdeFormat {
    Yaml,
    Json,
}

impl SerdeFormat {
    /// Parse a format name or file extension, with or without a leading dot
    pub fn parse(format: &str) -> anyhow::Result<Self> {
        match format.trim_start_matches('.').to_lowercase().as_str() {
            "yaml" | "yml" => Ok(Self::Yaml),
            "json" => Ok(Self::Json),
            _ => bail!(
                "Unsupported format {format:?}, must be one of {:?}",
                ACCEPTED_FORMATS
            ),
        }
    }

    /// Format implied by the extension of `filepath`
    pub fn from_path(filepath: &Path) -> anyhow::Result<Self> {
        let extension = filepath
            .extension()
            .and_then(OsStr::to_str)
            .with_context(|| format!("File extension could not be parsed: {filepath:?}"))?;
        Self::parse(extension)
    }
}

pub const ACCEPTED_FORMATS: &[&str] = &["yaml", "yml", "json"];

/// File and string (de)serialization for configuration, state and results.
/// Every deserializing method runs [SerdeAPI::init] on the result, so loaded
/// objects are validated the same way constructed ones are.
pub trait SerdeAPI: Serialize + for<'a> Deserialize<'a> {
    /// Validation and derived-field setup after deserialization
    fn init(&mut self) -> anyhow::Result<()> {
        Ok(())
    }

    /// Write to `filepath` in the format given by its extension, creating or
    /// truncating the file
    fn to_file<P: AsRef<Path>>(&self, filepath: P) -> anyhow::Result<()> {
        let filepath = filepath.as_ref();
        let format = SerdeFormat::from_path(filepath)?;
        let file = File::create(filepath)
            .with_context(|| format!("Could not create file: {filepath:?}"))?;
        self.to_writer(file, format)
    }

    fn to_writer<W: std::io::Write>(&self, wtr: W, format: SerdeFormat) -> anyhow::Result<()> {
        match format {
            SerdeFormat::Yaml => serde_yaml::to_writer(wtr, self)?,
            SerdeFormat::Json => serde_json::to_writer(wtr, self)?,
        }
        Ok(())
    }

    /// Read from `filepath` in the format given by its extension
    fn from_file<P: AsRef<Path>>(filepath: P) -> anyhow::Result<Self> {
        let filepath = filepath.as_ref();
        let format = SerdeFormat::from_path(filepath)?;
        let file = File::open(filepath).with_context(|| {
            if !filepath.exists() {
                format!("File not found: {filepath:?}")
            } else {
                format!("Could not open file: {filepath:?}")
            }
        })?;
        Self::from_reader(file, format)
    }

    fn from_reader<R: std::io::Read>(rdr: R, format: SerdeFormat) -> anyhow::Result<Self> {
        let mut de: Self = match format {
            SerdeFormat::Yaml => serde_yaml::from_reader(rdr)?,
            SerdeFormat::Json => serde_json::from_reader(rdr)?,
        };
        de.init()?;
        Ok(de)
    }

    /// Serialize to a string in `format`, any of [ACCEPTED_FORMATS]
    fn to_str(&self, format: &str) -> anyhow::Result<String> {
        match SerdeFormat::parse(format)? {
            SerdeFormat::Yaml => self.to_yaml(),
            SerdeFormat::Json => self.to_json(),
        }
    }

    /// Deserialize from `contents` in `format`, any of [ACCEPTED_FORMATS]
    fn from_str<S: AsRef<str>>(contents: S, format: &str) -> anyhow::Result<Self> {
        match SerdeFormat::parse(format)? {
            SerdeFormat::Yaml => Self::from_yaml(contents),
            SerdeFormat::Json => Self::from_json(contents),
        }
    }

    fn to_json(&self) -> anyhow::Result<String> {
        Ok(serde_json::to_string(&self)?)
    }

    fn from_json<S: AsRef<str>>(json_str: S) -> anyhow::Result<Self> {
        let mut de: Self = serde_json::from_str(json_str.as_ref())?;
        de.init()?;
        Ok(de)
    }

    fn to_yaml(&self) -> anyhow::Result<String> {
        Ok(serde_yaml::to_string(&self)?)
    }

    fn from_yaml<S: AsRef<str>>(yaml_str: S) -> anyhow::Result<Self> {
        let mut de: Self = serde_yaml::from_str(yaml_str.as_ref())?;
        de.init()?;
        Ok(de)
    }
}

/// Evenly spaced values from `start` to `stop`, inclusive
pub trait Linspace {
    fn linspace(start: f64, stop: f64, n_elements: usize) -> Vec<f64> {
        match n_elements {
            0 => vec![],
            1 => vec![start],
            _ => {
                let step_size = (stop - start) / (n_elements - 1) as f64;
                (0..n_elements)
                    .map(|i| start + step_size * i as f64)
                    .collect()
            }
        }
    }
}

impl Linspace for Vec<f64> {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_parse() {
        assert_eq!(SerdeFormat::parse(".YML").unwrap(), SerdeFormat::Yaml);
        assert_eq!(SerdeFormat::parse("json").unwrap(), SerdeFormat::Json);
        assert!(SerdeFormat::parse("toml").is_err());
        assert!(SerdeFormat::from_path(Path::new("no_extension")).is_err());
    }

    #[test]
    fn test_linspace() {
        assert_eq!(Vec::linspace(0., 1., 5), vec![0., 0.25, 0.5, 0.75, 1.]);
        assert_eq!(Vec::linspace(3., 9., 1), vec![3.]);
        assert!(Vec::linspace(3., 9., 0).is_empty());
    }
}
