//! Check modes that tune a single validation run.
use std::{
    fmt,
    ops::{BitOr, BitOrAssign},
};

/// Independent flags controlling how lenient a validation run is.
///
/// A mode is fixed for the whole run and handed down through every recursive check.
/// ```rust
/// use jsonschema_check::CheckMode;
///
/// let mode = CheckMode::TYPE_CAST | CheckMode::APPLY_DEFAULTS;
/// assert!(mode.contains(CheckMode::TYPE_CAST));
/// assert!(!mode.contains(CheckMode::STRICT));
/// ```
#[derive(Clone, Copy, Default, Eq, PartialEq, Hash)]
pub struct CheckMode {
    inner: u16,
}

impl CheckMode {
    /// Plain validation.
    pub const NORMAL: CheckMode = CheckMode { inner: 0 };
    /// Allow lossless string/number/integer/boolean coercion.
    pub const TYPE_CAST: CheckMode = CheckMode { inner: 1 };
    /// Ambiguous containers are checked as objects as well.
    pub const ARRAY_AS_OBJECT: CheckMode = CheckMode { inner: 2 };
    /// Validate the schema against its meta-schema first.
    pub const VALIDATE_SCHEMA: CheckMode = CheckMode { inner: 4 };
    /// Use the native array/object distinction only.
    pub const STRICT: CheckMode = CheckMode { inner: 8 };
    /// Abort on the first violation.
    pub const EXCEPTIONS: CheckMode = CheckMode { inner: 16 };
    /// Fill absent properties from their schema `default`.
    pub const APPLY_DEFAULTS: CheckMode = CheckMode { inner: 32 };

    const NAMES: [(CheckMode, &'static str); 6] = [
        (CheckMode::TYPE_CAST, "TYPE_CAST"),
        (CheckMode::ARRAY_AS_OBJECT, "ARRAY_AS_OBJECT"),
        (CheckMode::VALIDATE_SCHEMA, "VALIDATE_SCHEMA"),
        (CheckMode::STRICT, "STRICT"),
        (CheckMode::EXCEPTIONS, "EXCEPTIONS"),
        (CheckMode::APPLY_DEFAULTS, "APPLY_DEFAULTS"),
    ];

    /// Whether every flag of `other` is set.
    #[must_use]
    #[inline]
    pub const fn contains(self, other: CheckMode) -> bool {
        self.inner & other.inner == other.inner
    }

    /// The same mode with the flags of `other` cleared.
    #[must_use]
    #[inline]
    pub const fn without(self, other: CheckMode) -> CheckMode {
        CheckMode {
            inner: self.inner & !other.inner,
        }
    }

    /// Raw bit representation.
    #[must_use]
    pub const fn bits(self) -> u16 {
        self.inner
    }

    /// Loose container typing is active only when a lenient flag asks for it and
    /// `STRICT` does not forbid it.
    pub(crate) const fn is_loose(self) -> bool {
        !self.contains(CheckMode::STRICT)
            && (self.contains(CheckMode::TYPE_CAST) || self.contains(CheckMode::ARRAY_AS_OBJECT))
    }
}

impl BitOr for CheckMode {
    type Output = CheckMode;

    #[inline]
    fn bitor(self, rhs: CheckMode) -> CheckMode {
        CheckMode {
            inner: self.inner | rhs.inner,
        }
    }
}

impl BitOrAssign for CheckMode {
    #[inline]
    fn bitor_assign(&mut self, rhs: CheckMode) {
        self.inner |= rhs.inner;
    }
}

impl fmt::Debug for CheckMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = CheckMode::NAMES
            .iter()
            .filter(|(flag, _)| self.contains(*flag))
            .map(|(_, name)| *name)
            .collect();
        if names.is_empty() {
            f.write_str("NORMAL")
        } else {
            f.write_str(&names.join(" | "))
        }
    }
}
