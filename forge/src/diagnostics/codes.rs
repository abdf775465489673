//! Diagnostic code constants, grouped by family (`spec.md` §4.C).
//!
//! Codes are opaque strings to the rest of the library; this module
//! exists purely so every code is declared in one documented place
//! instead of scattered as string literals through the parser and
//! verifier.

/// `fc-*`: front-end configuration.
pub mod fc {
    pub const BAD_OPTION: &str = "fc-1";
}

/// `fl-*`: linker.
pub mod fl {
    pub const UNABLE_TO_SPAWN: &str = "fl-1";
    pub const EXITED_NONZERO: &str = "fl-2";
    pub const NO_LINKER: &str = "fl-3";
}

/// `is-*`: input syntax (lexical/parse errors).
pub mod is {
    pub const EMPTY_CHARACTER_LITERAL: &str = "is-2";
    pub const MISSING_OPENING_QUOTE: &str = "is-3";
    pub const MISSING_CLOSING_QUOTE: &str = "is-3";
    pub const MALFORMED_NUMBER: &str = "is-4";
    pub const UNEXPECTED_TOKEN: &str = "is-5";
    pub const UNEXPECTED_EOF: &str = "is-6";
}

/// `es-*`: early semantic errors (scope, feature gate).
pub mod es {
    pub const UNSUPPORTED_FEATURE: &str = "es-1";
    pub const DUPLICATE_DECLARATION: &str = "es-2";
    pub const MALFORMED_ESCAPE: &str = "es-8";
}

/// `et-*`: typing errors.
pub mod et {
    pub const UNRESOLVED_SYMBOL: &str = "et-1";
    pub const NOT_A_POINTER: &str = "et-2";
    pub const NOT_CALLABLE: &str = "et-3";
    pub const ARITY_MISMATCH: &str = "et-4";
    pub const MISMATCHED_RETURN_TYPE: &str = "et-5";
    pub const NOT_A_STRUCTURE: &str = "et-6";
    pub const UNKNOWN_MEMBER: &str = "et-7";
    pub const OPERAND_TYPE: &str = "et-8";
    pub const NOT_CASTABLE: &str = "et-9";
}
