//! Configuration loader with layered approach.
//!
//! This module provides the [`Loader`], which discovers configuration files
//! by glob pattern and merges them, in order, into a typed record:
//!
//! 1. Declared defaults (only for unset fields)
//! 2. Every file matched by every pattern, in pattern order then sorted
//!    match order, later files overriding earlier ones
//! 3. Validation of the final record

use std::collections::HashMap;
use std::fmt;
use std::fs::{self, File};
use std::io::BufReader;
use std::path::{Path, PathBuf};

use glob::MatchOptions;
use tracing::{debug, info, warn};

use crate::formats::{JsonMapDecoder, TomlMapDecoder, YamlMapDecoder};
use crate::{Config, LoadError, Map, MapDecoder};

/// `*` and `?` never cross a path separator, like a POSIX shell.
const GLOB_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: true,
    require_literal_leading_dot: false,
};

/// Loads configuration files into typed records.
///
/// The loader owns a registry of [`MapDecoder`]s keyed by file extension and
/// an ordered, de-duplicated list of path patterns. It keeps no decoded data
/// between calls, so one loader can populate any number of records.
///
/// # Example
///
/// ```no_run
/// use strata::{Config, Loader};
///
/// #[derive(Debug, Default, Config)]
/// struct AppConfig {
///     #[config(key = "foo", required)]
///     foo: String,
///
///     #[config(key = "bar", default = "baz")]
///     bar: String,
/// }
///
/// # fn main() -> Result<(), strata::LoadError> {
/// let mut loader = Loader::with_default_formats();
/// loader.add_config_path("/etc/foo/foo.*");
/// loader.add_config_path("/etc/foo.d/*");
///
/// let mut config = AppConfig::default();
/// loader.load(&mut config)?;
/// # Ok(())
/// # }
/// ```
pub struct Loader {
    formats: HashMap<String, Box<dyn MapDecoder>>,
    config_paths: Vec<String>,
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Loader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Loader")
            .field("formats", &self.formats())
            .field("config_paths", &self.config_paths)
            .finish()
    }
}

impl Loader {
    /// Create a loader with no formats and no paths.
    ///
    /// # Example
    ///
    /// ```
    /// use strata::Loader;
    ///
    /// let loader = Loader::new();
    /// assert!(loader.formats().is_empty());
    /// assert!(loader.config_paths().is_empty());
    /// ```
    #[must_use]
    pub fn new() -> Self {
        Self {
            formats: HashMap::new(),
            config_paths: Vec::new(),
        }
    }

    /// Create a loader with the built-in decoders registered.
    ///
    /// | Extension         | Decoder            |
    /// |-------------------|--------------------|
    /// | `.toml`           | [`TomlMapDecoder`] |
    /// | `.yaml`, `.yml`   | [`YamlMapDecoder`] |
    /// | `.json`           | [`JsonMapDecoder`] |
    ///
    /// # Example
    ///
    /// ```
    /// use strata::Loader;
    ///
    /// let loader = Loader::with_default_formats();
    /// assert_eq!(loader.formats(), vec![".json", ".toml", ".yaml", ".yml"]);
    /// ```
    #[must_use]
    pub fn with_default_formats() -> Self {
        let mut loader = Self::new();
        loader.insert_format(".toml", TomlMapDecoder);
        loader.insert_format(".yaml", YamlMapDecoder);
        loader.insert_format(".yml", YamlMapDecoder);
        loader.insert_format(".json", JsonMapDecoder);
        loader
    }

    /// Register a decoder for a file extension.
    ///
    /// `extension` includes the leading `.` (e.g. `".toml"`); the empty string
    /// targets files without an extension. A previous registration for the
    /// same extension is replaced.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError::InvalidExtension`] if `extension` is neither empty
    /// nor starts with `.`. The registry is left unchanged.
    ///
    /// # Example
    ///
    /// ```
    /// use strata::{formats::TomlMapDecoder, Loader};
    ///
    /// let mut loader = Loader::new();
    /// loader.register_format(".conf", TomlMapDecoder).unwrap();
    /// assert!(loader.register_format("conf", TomlMapDecoder).is_err());
    /// ```
    pub fn register_format<D>(
        &mut self,
        extension: impl Into<String>,
        decoder: D,
    ) -> Result<(), LoadError>
    where
        D: MapDecoder + 'static,
    {
        let extension = extension.into();
        if !extension.is_empty() && !extension.starts_with('.') {
            return Err(LoadError::invalid_extension(extension));
        }
        self.insert_format(extension, decoder);
        Ok(())
    }

    /// Builder form of [`register_format`](Self::register_format).
    ///
    /// # Errors
    ///
    /// Same as [`register_format`](Self::register_format).
    pub fn with_format<D>(mut self, extension: impl Into<String>, decoder: D) -> Result<Self, LoadError>
    where
        D: MapDecoder + 'static,
    {
        self.register_format(extension, decoder)?;
        Ok(self)
    }

    /// Add a path pattern from which configuration files are loaded.
    ///
    /// Patterns may use shell globs (`*`, `?`, `[...]`) and must match files,
    /// not directories. Adding a pattern that is already present (exact
    /// string match) does nothing. Returns whether the pattern was added.
    ///
    /// # Example
    ///
    /// ```
    /// use strata::Loader;
    ///
    /// let mut loader = Loader::new();
    /// assert!(loader.add_config_path("/etc/app/*.toml"));
    /// assert!(!loader.add_config_path("/etc/app/*.toml"));
    /// assert_eq!(loader.config_paths(), ["/etc/app/*.toml"]);
    /// ```
    pub fn add_config_path(&mut self, pattern: impl Into<String>) -> bool {
        let pattern = pattern.into();
        if self.config_paths.contains(&pattern) {
            return false;
        }
        self.config_paths.push(pattern);
        true
    }

    /// Builder form of [`add_config_path`](Self::add_config_path).
    #[must_use]
    pub fn with_config_path(mut self, pattern: impl Into<String>) -> Self {
        self.add_config_path(pattern);
        self
    }

    /// Configured path patterns, in precedence order.
    pub fn config_paths(&self) -> &[String] {
        &self.config_paths
    }

    /// Registered extensions, sorted.
    pub fn formats(&self) -> Vec<&str> {
        let mut extensions: Vec<&str> = self.formats.keys().map(String::as_str).collect();
        extensions.sort_unstable();
        extensions
    }

    /// Whether a decoder is registered for `extension`.
    pub fn has_format(&self, extension: &str) -> bool {
        self.formats.contains_key(extension)
    }

    /// The decoder that would be used for `path`, if any.
    pub fn decoder_for(&self, path: &Path) -> Option<&dyn MapDecoder> {
        self.formats
            .get(&file_extension(path))
            .map(|decoder| decoder.as_ref())
    }

    /// Expand every pattern into the ordered list of files to load.
    ///
    /// Matches are returned in pattern order, then in sorted order within a
    /// pattern. Patterns that match nothing contribute nothing.
    ///
    /// # Errors
    ///
    /// Returns `LoadError` if:
    /// - A pattern is not valid glob syntax
    /// - A matched path cannot be inspected (directories that cannot be
    ///   read while expanding a wildcard are skipped instead)
    /// - A matched path is a directory
    pub fn resolve_paths(&self) -> Result<Vec<PathBuf>, LoadError> {
        let mut resolved = Vec::new();

        for pattern in &self.config_paths {
            let matches = glob::glob_with(pattern, GLOB_OPTIONS)
                .map_err(|e| LoadError::pattern(pattern, e))?;

            let before = resolved.len();
            for entry in matches {
                // Unreadable directories met while expanding a wildcard hide
                // their matches; the readable ones still load.
                let path = match entry {
                    Ok(path) => path,
                    Err(e) => {
                        warn!(
                            pattern = %pattern,
                            path = %e.path().display(),
                            error = %e.error(),
                            "skipping unreadable path during expansion"
                        );
                        continue;
                    }
                };

                let metadata = fs::metadata(&path).map_err(|e| LoadError::stat(&path, e))?;
                if metadata.is_dir() {
                    return Err(LoadError::is_directory(path));
                }

                resolved.push(path);
            }

            debug!(
                pattern = %pattern,
                matched = resolved.len() - before,
                "expanded configuration path"
            );
        }

        Ok(resolved)
    }

    /// Load configuration files into `config`.
    ///
    /// Applies declared defaults, merges every resolved file that has a
    /// registered decoder (files with other extensions are skipped), then
    /// validates the result. Processing stops at the first fatal error; the
    /// state of `config` is unspecified in that case.
    ///
    /// # Errors
    ///
    /// Returns `LoadError` if:
    /// - A default literal does not fit its field
    /// - A pattern cannot be expanded, or matches a directory
    /// - A file cannot be opened, decoded or bound
    /// - The final record fails validation (every violation is reported)
    pub fn load<C>(&self, config: &mut C) -> Result<(), LoadError>
    where
        C: Config + ?Sized,
    {
        self.load_inner(config).map_err(|err| {
            warn!(error = %err, "failed to load configuration");
            err
        })
    }

    /// Load configuration files into a fresh `C::default()`.
    ///
    /// # Errors
    ///
    /// Same as [`load`](Self::load).
    ///
    /// # Example
    ///
    /// ```
    /// use strata::{Config, Loader};
    ///
    /// #[derive(Debug, Default, Config)]
    /// struct AppConfig {
    ///     #[config(default = 8080)]
    ///     port: u16,
    /// }
    ///
    /// let config: AppConfig = Loader::new().load_as().unwrap();
    /// assert_eq!(config.port, 8080);
    /// ```
    pub fn load_as<C>(&self) -> Result<C, LoadError>
    where
        C: Config + Default,
    {
        let mut config = C::default();
        self.load(&mut config)?;
        Ok(config)
    }

    fn load_inner<C>(&self, config: &mut C) -> Result<(), LoadError>
    where
        C: Config + ?Sized,
    {
        config.apply_defaults().map_err(LoadError::defaults)?;

        let paths = self.resolve_paths()?;

        let mut merged = 0_usize;
        for path in &paths {
            let Some(decoder) = self.decoder_for(path) else {
                debug!(path = %path.display(), "no decoder registered for extension, skipping");
                continue;
            };

            let map = decode_file(path, decoder)?;
            config
                .bind_map(&map)
                .map_err(|e| LoadError::bind(path, e))?;

            debug!(path = %path.display(), keys = map.len(), "merged configuration file");
            merged += 1;
        }

        config.validate().map_err(LoadError::Validation)?;

        info!(
            resolved = paths.len(),
            merged,
            "configuration loaded"
        );
        Ok(())
    }

    fn insert_format(&mut self, extension: impl Into<String>, decoder: impl MapDecoder + 'static) {
        let extension = extension.into();
        if self.formats.insert(extension.clone(), Box::new(decoder)).is_some() {
            debug!(extension = %extension, "replaced registered format decoder");
        }
    }
}

// The file is closed when `reader` drops, including on decode failure.
fn decode_file(path: &Path, decoder: &dyn MapDecoder) -> Result<Map, LoadError> {
    let file = File::open(path).map_err(|e| LoadError::open(path, e))?;
    let mut reader = BufReader::new(file);

    let mut map = Map::new();
    decoder
        .decode(&mut reader, &mut map)
        .map_err(|e| LoadError::decode(path, e))?;

    Ok(map)
}

/// Extension of the final path component, from its last `.` inclusive.
///
/// Returns the empty string when the name has no `.`. A leading dot counts,
/// so `.env` has extension `.env`.
///
/// # Example
///
/// ```
/// use std::path::Path;
///
/// use strata::file_extension;
///
/// assert_eq!(file_extension(Path::new("/etc/app/config.toml")), ".toml");
/// assert_eq!(file_extension(Path::new("/etc/app/archive.tar.gz")), ".gz");
/// assert_eq!(file_extension(Path::new("/etc/app/config")), "");
/// ```
pub fn file_extension(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy())
        .and_then(|name| name.rfind('.').map(|index| name[index..].to_string()))
        .unwrap_or_default()
}
