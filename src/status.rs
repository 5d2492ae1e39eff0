//! Multi-signal handler outcome.
//!
//! A handler action returns a [`Status`]: a struct of independent boolean
//! signals (`success`, `fail`, `skip`, `break_pass`, `drop_record`) composed
//! with `|`. The named constants each set exactly one signal; combinations
//! such as `SUCCESS | BREAK` or `SKIP | BREAK | DROP` are meaningful and
//! interpreted by the dispatch engine. Explicit booleans are used in place of
//! an integer bitmask so illegal combinations and handling logic stay
//! explicit (spec §3).

use std::fmt;
use std::ops::BitOr;

/// The multi-signal outcome of a single handler action invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Status {
    /// Action completed; the path should be recorded as up to date.
    pub success: bool,
    /// Action failed; the run continues but the failure is reported.
    pub fail: bool,
    /// Action declined to run (precondition unmet); path is not recorded.
    pub skip: bool,
    /// Stop processing the remaining glob matches for this pattern pass;
    /// remaining matches are treated as already handled successfully.
    pub break_pass: bool,
    /// Do not persist a fingerprint for this path even when it is recorded
    /// as handled.
    pub drop_record: bool,
}

impl Status {
    /// Action completed; record the path as up to date.
    pub const SUCCESS: Self = Self {
        success: true,
        fail: false,
        skip: false,
        break_pass: false,
        drop_record: false,
    };

    /// Action failed; reported, run continues.
    pub const FAIL: Self = Self {
        success: false,
        fail: true,
        skip: false,
        break_pass: false,
        drop_record: false,
    };

    /// Action declined to run; path is not recorded.
    pub const SKIP: Self = Self {
        success: false,
        fail: false,
        skip: true,
        break_pass: false,
        drop_record: false,
    };

    /// Stop processing remaining matches for the current glob pattern pass.
    pub const BREAK: Self = Self {
        success: false,
        fail: false,
        skip: false,
        break_pass: true,
        drop_record: false,
    };

    /// Record as handled but do not persist a fingerprint.
    pub const DROP: Self = Self {
        success: false,
        fail: false,
        skip: false,
        break_pass: false,
        drop_record: true,
    };
}

impl BitOr for Status {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self {
            success: self.success | rhs.success,
            fail: self.fail | rhs.fail,
            skip: self.skip | rhs.skip,
            break_pass: self.break_pass | rhs.break_pass,
            drop_record: self.drop_record | rhs.drop_record,
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts: Vec<&str> = Vec::new();
        if self.success {
            parts.push("SUCCESS");
        }
        if self.fail {
            parts.push("FAIL");
        }
        if self.skip {
            parts.push("SKIP");
        }
        if self.break_pass {
            parts.push("BREAK");
        }
        if self.drop_record {
            parts.push("DROP");
        }
        if parts.is_empty() {
            f.write_str("NONE")
        } else {
            f.write_str(&parts.join("|"))
        }
    }
}
