//! Config file location.

use std::path::PathBuf;

/// Config path when `--config` is not given: `$HETGRAPH_CONFIG`, else
/// `hetgraph.toml` in the working directory.
pub fn get_config_path() -> PathBuf {
    if let Some(path) = std::env::var_os("HETGRAPH_CONFIG") {
        return PathBuf::from(path);
    }
    PathBuf::from("hetgraph.toml")
}
