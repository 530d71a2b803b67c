//! Shared constants for test infrastructure

// Package names
pub const SCOPED_PACKAGE: &str = "@scope/tpl-a";
pub const UNSCOPED_PACKAGE: &str = "tpl-b";
pub const MISSING_PACKAGE: &str = "@scope/missing";

// Versions
pub const VERSION_1_0_0: &str = "1.0.0";
pub const VERSION_1_2_0: &str = "1.2.0";
pub const VERSION_2_0_0: &str = "2.0.0";

// Package contents
pub const ENTRY_FILE: &str = "lib/index.js";
pub const ENTRY_CONTENT: &str = "module.exports = function () {};\n";

// Integrity string that matches nothing
pub const WRONG_INTEGRITY: &str =
    "sha512-AAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA==";
