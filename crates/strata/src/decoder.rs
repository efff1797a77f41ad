//! The format decoder extension point.

use std::io::Read;

use crate::{DecodeError, Map};

/// Decodes a byte stream into a generic [`Map`].
///
/// Register implementations with
/// [`Loader::register_format`](crate::Loader::register_format) to support a
/// file extension. Implementations must not keep the reader after returning.
/// On error the map's contents are undefined and are discarded by the loader.
///
/// # Example
///
/// ```
/// use std::io::Read;
///
/// use strata::{DecodeError, Loader, Map, MapDecoder, Value};
///
/// /// `key=value` lines.
/// struct PropertiesDecoder;
///
/// impl MapDecoder for PropertiesDecoder {
///     fn decode(&self, reader: &mut dyn Read, map: &mut Map) -> Result<(), DecodeError> {
///         let mut content = String::new();
///         reader.read_to_string(&mut content)?;
///         for line in content.lines().filter(|l| !l.trim().is_empty()) {
///             let (key, value) = line
///                 .split_once('=')
///                 .ok_or_else(|| DecodeError::other(format!("missing '=' in {line:?}")))?;
///             map.insert(key.trim().to_string(), Value::from(value.trim()));
///         }
///         Ok(())
///     }
/// }
///
/// let mut loader = Loader::new();
/// loader.register_format(".properties", PropertiesDecoder).unwrap();
/// assert!(loader.has_format(".properties"));
/// ```
pub trait MapDecoder: Send + Sync {
    /// Populate `map` from `reader`.
    ///
    /// # Errors
    ///
    /// Returns [`DecodeError`] if the stream cannot be read or parsed.
    fn decode(&self, reader: &mut dyn Read, map: &mut Map) -> Result<(), DecodeError>;
}
