use std::{fmt, str::FromStr};

use smol_str::SmolStr;

use crate::{assert_valid_name, Error, Result};

/// A reference to a type as it appears on a field, argument or variable:
/// a named type, possibly wrapped in any number of list/non-null layers.
///
/// Named types are referenced by name and resolved through the [`Schema`](crate::Schema),
/// so types may refer to themselves or to types declared after them.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum TypeFull {
    Type(SmolStr),
    List(Box<TypeFull>),
    NonNull(Box<TypeFull>),
}

impl TypeFull {
    pub fn list(of: TypeFull) -> Self {
        Self::List(Box::new(of))
    }

    pub fn non_null(of: TypeFull) -> Result<Self> {
        if let Self::NonNull(_) = &of {
            return Err(Error::NonNullOfNonNull(of.to_string().into()));
        }
        Ok(Self::NonNull(Box::new(of)))
    }

    /// The name of the innermost named type.
    pub fn name(&self) -> &str {
        match self.named_type() {
            Self::Type(name) => name,
            _ => unreachable!(),
        }
    }

    /// Strips every list/non-null layer.
    pub fn named_type(&self) -> &TypeFull {
        let mut unwrapped = self;
        while let Self::List(of) | Self::NonNull(of) = unwrapped {
            unwrapped = of;
        }
        unwrapped
    }

    /// Strips exactly one non-null layer.
    pub fn nullable(&self) -> &TypeFull {
        match self {
            Self::NonNull(of) => of,
            type_ => type_,
        }
    }

    pub fn is_non_null(&self) -> bool {
        matches!(self, Self::NonNull(_))
    }

    pub fn is_list(&self) -> bool {
        matches!(self.nullable(), Self::List(_))
    }

    /// Two type references are the same type iff their printed forms match.
    pub fn is_same_type(&self, other: &TypeFull) -> bool {
        self.to_string() == other.to_string()
    }

    pub(crate) fn check_well_formed(&self) -> Result<()> {
        match self {
            Self::Type(name) => assert_valid_name(name),
            Self::List(of) => of.check_well_formed(),
            Self::NonNull(of) => {
                if of.is_non_null() {
                    return Err(Error::NonNullOfNonNull((**of).to_string().into()));
                }
                of.check_well_formed()
            }
        }
    }
}

impl fmt::Display for TypeFull {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Type(name) => write!(f, "{name}"),
            Self::List(of) => write!(f, "[{of}]"),
            Self::NonNull(of) => write!(f, "{of}!"),
        }
    }
}

impl From<&str> for TypeFull {
    fn from(value: &str) -> Self {
        Self::Type(value.into())
    }
}

impl From<SmolStr> for TypeFull {
    fn from(value: SmolStr) -> Self {
        Self::Type(value)
    }
}

/// Parses the SDL shorthand, eg `[Dog!]!`.
impl FromStr for TypeFull {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self> {
        let (inner, is_non_null) = match value.strip_suffix('!') {
            Some(inner) => (inner, true),
            None => (value, false),
        };
        let type_ = match inner.strip_prefix('[') {
            Some(rest) => Self::list(
                rest.strip_suffix(']')
                    .ok_or_else(|| Error::InvalidTypeReference(value.into()))?
                    .parse()?,
            ),
            None => {
                assert_valid_name(inner)
                    .map_err(|_| Error::InvalidTypeReference(value.into()))?;
                Self::Type(inner.into())
            }
        };
        if is_non_null {
            Self::non_null(type_)
        } else {
            Ok(type_)
        }
    }
}
