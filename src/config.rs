//! Configuration for the tile server.
//!
//! All options are available as command-line flags and as environment
//! variables with the `MBTILED_` prefix:
//!
//! - `MBTILED_PORT` - Server port (default: 8080)
//! - `MBTILED_PACKAGE` - Path to the vector MBTiles package (required)
//! - `MBTILED_HILLSHADE` - Path to the hillshade MBTiles package
//! - `MBTILED_CACHE` - Tile cache size, e.g. `512m` or `1g` (default: 512m)
//! - `MBTILED_STATIC_DIR` - Root of the static web content (default: `.`)
//! - `MBTILED_CORS` - Enable CORS handling

use std::path::PathBuf;

use clap::Parser;

/// Default server port.
pub const DEFAULT_PORT: u16 = 8080;

/// Default tile cache size.
pub const DEFAULT_CACHE_SIZE: &str = "512m";

const KB: u64 = 1024;
const MB: u64 = KB * 1024;
const GB: u64 = MB * 1024;

/// mbtiled - a tile server for MBTiles map packages.
///
/// Serves gzip-compressed vector tiles (and optionally raster hillshade
/// tiles) from MBTiles packages, with an in-memory byte-bounded LRU cache in
/// front of the package reads.
#[derive(Parser, Debug, Clone)]
#[command(name = "mbtiled")]
#[command(author, version, about, long_about = None)]
pub struct Config {
    /// Port on which to run the server.
    #[arg(short, long, default_value_t = DEFAULT_PORT, env = "MBTILED_PORT")]
    pub port: u16,

    /// Path to the vector MBTiles package to serve.
    #[arg(long, env = "MBTILED_PACKAGE")]
    pub package: PathBuf,

    /// Path to a hillshade MBTiles package to serve alongside the vector
    /// tiles.
    #[arg(long, env = "MBTILED_HILLSHADE")]
    pub hillshade: Option<PathBuf>,

    /// Tile cache size: an integer with a k/m/g suffix, e.g. `1g` or `512m`.
    #[arg(long, default_value = DEFAULT_CACHE_SIZE, env = "MBTILED_CACHE")]
    pub cache: String,

    /// Directory holding the static web content (index.html, style, fonts).
    #[arg(long, default_value = ".", env = "MBTILED_STATIC_DIR")]
    pub static_dir: PathBuf,

    /// Enable CORS handling.
    #[arg(long, default_value_t = false, env = "MBTILED_CORS")]
    pub cors: bool,

    /// Enable verbose logging (debug level).
    #[arg(short, long, default_value_t = false)]
    pub verbose: bool,
}

impl Config {
    /// Validate the configuration and return an error message if invalid.
    pub fn validate(&self) -> Result<(), String> {
        if !self.package.is_file() {
            return Err(format!(
                "vector package does not exist: {}",
                self.package.display()
            ));
        }

        if let Some(hillshade) = &self.hillshade {
            if !hillshade.is_file() {
                return Err(format!(
                    "hillshade package does not exist: {}",
                    hillshade.display()
                ));
            }
        }

        parse_cache_size(&self.cache)?;

        Ok(())
    }

    /// Cache capacity in bytes.
    ///
    /// Only valid after [`Config::validate`] has accepted the value.
    pub fn cache_bytes(&self) -> Result<u64, String> {
        parse_cache_size(&self.cache)
    }

    /// Address to bind the server to.
    pub fn bind_address(&self) -> String {
        format!("0.0.0.0:{}", self.port)
    }
}

/// Parse a cache size such as `64k`, `512m` or `1g` into bytes.
///
/// A bare integer is taken as bytes.
pub fn parse_cache_size(value: &str) -> Result<u64, String> {
    let value = value.trim();
    if value.is_empty() {
        return Err("cache size is empty".to_string());
    }

    let (digits, multiplier) = match value.as_bytes()[value.len() - 1].to_ascii_lowercase() {
        b'k' => (&value[..value.len() - 1], KB),
        b'm' => (&value[..value.len() - 1], MB),
        b'g' => (&value[..value.len() - 1], GB),
        _ => (value, 1),
    };

    let size: u64 = digits
        .parse()
        .map_err(|_| format!("invalid cache size: {value}"))?;
    if size == 0 {
        return Err(format!("cache size must be positive: {value}"));
    }

    size.checked_mul(multiplier)
        .ok_or_else(|| format!("cache size overflows: {value}"))
}

// =============================================================================
// Tests
// =============================================================================
