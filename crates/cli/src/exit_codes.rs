//! CLI Exit Code Registry
//!
//! Single source of truth for `ordermatch` exit codes. Scripts rely on them.
//!
//! | Code | Meaning                                                   |
//! |------|-----------------------------------------------------------|
//! | 0    | Success                                                   |
//! | 1    | General error (unspecified)                               |
//! | 2    | Usage error (bad arguments, conflicting flags)            |
//! | 3    | Invalid input (validation failure or malformed record)    |
//! | 4    | Invalid matcher config                                    |
//! | 5    | Runtime / IO error (unreadable file, malformed document)  |
//! | 6    | Unmatched records left over under `--strict`              |
//!
//! # Adding New Exit Codes
//!
//! 1. Add the constant
//! 2. Document what triggers it
//! 3. Update the table above
//! 4. Wire it into `exit_code_for` or the relevant command

use ordermatch_recon::MatchError;

/// Success - command completed without errors.
pub const EXIT_SUCCESS: u8 = 0;

/// General error - unspecified failure.
/// Avoid using this; prefer a specific error code.
pub const EXIT_ERROR: u8 = 1;

/// Usage error - bad arguments, missing required options.
/// clap exits with this code on its own parse failures.
pub const EXIT_USAGE: u8 = 2;

/// Input rejected by the validator (`INVALID_INPUT`, `EMPTY_INPUT`,
/// `MISSING_FIELD`) or a record that failed to deserialize.
pub const EXIT_INVALID_INPUT: u8 = 3;

/// Matcher config failed to parse or validate.
pub const EXIT_INVALID_CONFIG: u8 = 4;

/// Cannot read/write a file, or a document is not well-formed.
pub const EXIT_RUNTIME: u8 = 5;

/// `--strict` run left at least one order or transaction unmatched.
pub const EXIT_UNMATCHED: u8 = 6;

/// Map an engine error to its exit code.
pub fn exit_code_for(err: &MatchError) -> u8 {
    match err {
        MatchError::InvalidInput { .. }
        | MatchError::EmptyInput
        | MatchError::MissingField { .. }
        | MatchError::RecordParse { .. } => EXIT_INVALID_INPUT,
        MatchError::ConfigParse(_) | MatchError::ConfigValidation(_) => EXIT_INVALID_CONFIG,
        MatchError::Io(_) => EXIT_RUNTIME,
    }
}
