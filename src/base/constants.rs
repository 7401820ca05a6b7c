//! Delimiters shared across the crate.

/// Boundary delimiter joining the segments of a hierarchical symbol name.
pub const NAME_DELIMITER: char = '\\';

/// Separator between a class name and a member constant in a constant
/// reference (`App\Mode::STRICT`).
pub const MEMBER_DELIMITER: &str = "::";

/// Separator between keys of a configuration key path (`framework.session`).
pub const CONFIG_KEY_DELIMITER: char = '.';
