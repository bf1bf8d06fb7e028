#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

/// Configuration value that switches a rule off (case-insensitive).
pub const DISABLE_TOKEN: &str = "disable";

/// Configuration token that expands to every value a usage rule knows about
/// (case-insensitive).
pub const ALL_TOKEN: &str = "all";

/// Separates the tokens of a configuration value. The last token is always
/// the number of points.
pub const VALUE_SEPARATOR: char = ',';

/// Environment variable naming the configuration file used when none is
/// passed on the command line.
pub const CONFIG_ENV: &str = "ERGRADE_CONFIG";

/// Comment markers recognized in properties-style configuration files.
pub const COMMENT_MARKERS: [char; 2] = ['#', '!'];
