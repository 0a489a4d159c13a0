/// The captured outcome of a single future: its value or its failure
/// reason, tagged but not re-raised.
///
/// Produced by [`all_settled`][crate::DeferSet::all_settled], which reports
/// every entry's outcome instead of short-circuiting on the first failure.
///
/// # Example
///
/// ```rust
/// use defer_set::Settlement;
///
/// let ok: Settlement<u32, &str> = Settlement::from(Ok(1));
/// let err: Settlement<u32, &str> = Settlement::from(Err("oh no"));
/// assert_eq!(ok.status(), "fulfilled");
/// assert_eq!(err.status(), "rejected");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Settlement<T, E> {
    /// The future completed with a value.
    Fulfilled(T),
    /// The future failed with a reason.
    Rejected(E),
}

impl<T, E> Settlement<T, E> {
    /// Returns `true` if the future completed with a value.
    pub fn is_fulfilled(&self) -> bool {
        matches!(self, Self::Fulfilled(_))
    }

    /// Returns `true` if the future failed.
    pub fn is_rejected(&self) -> bool {
        matches!(self, Self::Rejected(_))
    }

    /// The status tag, either `"fulfilled"` or `"rejected"`.
    pub fn status(&self) -> &'static str {
        match self {
            Self::Fulfilled(_) => "fulfilled",
            Self::Rejected(_) => "rejected",
        }
    }

    /// The completion value, if the future completed with one.
    pub fn value(self) -> Option<T> {
        match self {
            Self::Fulfilled(value) => Some(value),
            Self::Rejected(_) => None,
        }
    }

    /// The failure reason, if the future failed.
    pub fn reason(self) -> Option<E> {
        match self {
            Self::Fulfilled(_) => None,
            Self::Rejected(reason) => Some(reason),
        }
    }

    /// Converts from `&Settlement<T, E>` to `Settlement<&T, &E>`.
    pub fn as_ref(&self) -> Settlement<&T, &E> {
        match self {
            Self::Fulfilled(value) => Settlement::Fulfilled(value),
            Self::Rejected(reason) => Settlement::Rejected(reason),
        }
    }

    /// Converts back into the `Result` the future produced.
    pub fn into_result(self) -> Result<T, E> {
        match self {
            Self::Fulfilled(value) => Ok(value),
            Self::Rejected(reason) => Err(reason),
        }
    }
}

impl<T, E> From<Result<T, E>> for Settlement<T, E> {
    fn from(result: Result<T, E>) -> Self {
        match result {
            Ok(value) => Self::Fulfilled(value),
            Err(reason) => Self::Rejected(reason),
        }
    }
}
