use crate::schema::def::RelationKind;

use std::sync::Arc;

/// Creates an [`Error`] from format arguments.
#[macro_export]
macro_rules! err {
    ($($arg:tt)*) => {
        $crate::Error::from_args(format_args!($($arg)*))
    };
}

/// Returns early with an [`Error`] built from format arguments.
#[macro_export]
macro_rules! bail {
    ($($arg:tt)*) => {
        return Err($crate::Error::from_args(format_args!($($arg)*)))
    };
}

/// An error raised while compiling a schema.
#[derive(Clone)]
pub struct Error {
    inner: Arc<ErrorInner>,
}

#[derive(Debug)]
struct ErrorInner {
    kind: ErrorKind,
    cause: Option<Error>,
}

#[derive(Debug)]
enum ErrorKind {
    Configuration(ConfigurationError),
    Adhoc(String),
    Anyhow(anyhow::Error),
}

/// A defect in the declared content model.
///
/// Every variant is unrecoverable at the point raised: compilation is pure
/// and deterministic, so a failing input fails identically on every run until
/// the definitions are fixed. The orchestrator wraps each of these with the
/// offending attribute name and model uid.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ConfigurationError {
    /// A relation names a target uid that is not in the registry.
    UnknownTarget { target: String },

    /// A relation that requires a target was declared without one.
    MissingTarget,

    /// A morph relation was declared without a `morphBy` attribute name.
    MissingMorphBy,

    /// A user attribute reuses a name reserved for injected identity columns.
    ReservedAttributeName { name: String },

    /// Two definitions share the same uid.
    DuplicateUid { uid: String },

    /// The "one" side of a bidirectional relation was marked as the owner.
    InvalidOwner { attribute: String, kind: RelationKind },

    /// The "many" side of a bidirectional relation was not marked as the owner.
    MissingOwner { attribute: String, kind: RelationKind },

    /// The `inversedBy` attribute does not exist on the target model.
    InverseNotFound { attribute: String, target: String },

    /// The `inversedBy` attribute exists but is not a relation.
    InverseNotRelation { attribute: String, target: String },

    /// The `morphBy` attribute does not exist on the morph target model.
    MorphByNotFound { attribute: String, target: String },

    /// The `morphBy` attribute exists but is not a relation.
    MorphByNotRelation { attribute: String, target: String },
}

impl Error {
    pub(crate) fn configuration(err: ConfigurationError) -> Error {
        Error::from(ErrorKind::Configuration(err))
    }

    #[doc(hidden)]
    pub fn from_args(args: core::fmt::Arguments<'_>) -> Error {
        Error::from(ErrorKind::Adhoc(args.to_string()))
    }

    /// Adds context to this error.
    ///
    /// Context is displayed in reverse order: the most recently added context
    /// is shown first, ending with the root cause.
    pub fn context(self, consequent: Error) -> Error {
        let mut consequent = consequent;
        {
            let inner = Arc::get_mut(&mut consequent.inner)
                .expect("consequent error must be freshly created");
            assert!(
                inner.cause.is_none(),
                "consequent error must not already have a cause"
            );
            inner.cause = Some(self);
        }
        consequent
    }

    /// Returns the configuration defect at the root of this error, if any.
    pub fn as_configuration(&self) -> Option<&ConfigurationError> {
        self.chain().find_map(|err| match &err.inner.kind {
            ErrorKind::Configuration(config) => Some(config),
            _ => None,
        })
    }

    fn chain(&self) -> impl Iterator<Item = &Error> {
        let mut err = self;
        core::iter::once(err).chain(core::iter::from_fn(move || {
            err = err.inner.cause.as_ref()?;
            Some(err)
        }))
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match &self.inner.kind {
            ErrorKind::Anyhow(err) => Some(err.as_ref()),
            _ => None,
        }
    }
}

impl core::fmt::Display for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        let mut it = self.chain().peekable();
        while let Some(err) = it.next() {
            core::fmt::Display::fmt(&err.inner.kind, f)?;
            if it.peek().is_some() {
                f.write_str(": ")?;
            }
        }
        Ok(())
    }
}

impl core::fmt::Debug for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        if !f.alternate() {
            core::fmt::Display::fmt(self, f)
        } else {
            f.debug_struct("Error")
                .field("kind", &self.inner.kind)
                .field("cause", &self.inner.cause)
                .finish()
        }
    }
}

impl core::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        match self {
            ErrorKind::Configuration(err) => core::fmt::Display::fmt(err, f),
            ErrorKind::Adhoc(msg) => f.write_str(msg),
            ErrorKind::Anyhow(err) => core::fmt::Display::fmt(err, f),
        }
    }
}

impl core::fmt::Display for ConfigurationError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        use ConfigurationError::*;

        match self {
            UnknownTarget { target } => write!(f, "unknown target `{target}`"),
            MissingTarget => f.write_str("relation is missing a target"),
            MissingMorphBy => f.write_str("morph relation is missing a morphBy attribute"),
            ReservedAttributeName { name } => {
                write!(f, "`{name}` is a reserved attribute name")
            }
            DuplicateUid { uid } => write!(f, "duplicate uid `{uid}`"),
            InvalidOwner { attribute, kind } => write!(
                f,
                "`{attribute}` cannot be the owner side of a bidirectional {kind}"
            ),
            MissingOwner { attribute, kind } => write!(
                f,
                "`{attribute}` must be the owner side of a bidirectional {kind}"
            ),
            InverseNotFound { attribute, target } => write!(
                f,
                "inversedBy attribute `{attribute}` not found on target `{target}`"
            ),
            InverseNotRelation { attribute, target } => write!(
                f,
                "inversedBy attribute `{attribute}` on target `{target}` \
                 targets a non-relational attribute"
            ),
            MorphByNotFound { attribute, target } => write!(
                f,
                "morphBy attribute `{attribute}` not found on target `{target}`"
            ),
            MorphByNotRelation { attribute, target } => write!(
                f,
                "morphBy attribute `{attribute}` on target `{target}` \
                 targets a non-relational attribute"
            ),
        }
    }
}

impl From<ErrorKind> for Error {
    fn from(kind: ErrorKind) -> Error {
        Error {
            inner: Arc::new(ErrorInner { kind, cause: None }),
        }
    }
}

impl From<ConfigurationError> for Error {
    fn from(err: ConfigurationError) -> Error {
        Error::configuration(err)
    }
}

impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Error {
        Error::from(ErrorKind::Anyhow(err))
    }
}
