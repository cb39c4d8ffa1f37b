/// A successful result that may carry warnings for the user.
///
/// Used where input is accepted but something about it deserves a note,
/// such as a function that will not be drawn.
///
/// ```rust
/// use loancalc::types::WithWarnings;
///
/// let result: WithWarnings<Option<f64>, String> =
///     WithWarnings::Warning(None, vec!["nothing to draw".to_string()]);
/// assert!(result.is_warning());
///
/// let (value, warnings) = result.into();
/// assert_eq!(value, None);
/// assert_eq!(warnings, vec!["nothing to draw".to_string()]);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum WithWarnings<T, W> {
    Ok(T),
    Warning(T, Vec<W>),
}

impl<T, W> WithWarnings<T, W> {
    pub fn is_ok(&self) -> bool {
        matches!(self, WithWarnings::Ok(_))
    }

    pub fn is_warning(&self) -> bool {
        matches!(self, WithWarnings::Warning(_, _))
    }

    /// The value, dropping any warnings.
    pub fn unwrap(self) -> T {
        match self {
            WithWarnings::Ok(value) | WithWarnings::Warning(value, _) => value,
        }
    }

    /// The warnings, dropping the value.
    pub fn warnings(self) -> Vec<W> {
        match self {
            WithWarnings::Ok(_) => Vec::new(),
            WithWarnings::Warning(_, warnings) => warnings,
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> WithWarnings<U, W> {
        match self {
            WithWarnings::Ok(value) => WithWarnings::Ok(f(value)),
            WithWarnings::Warning(value, warnings) => WithWarnings::Warning(f(value), warnings),
        }
    }
}

impl<T, W> From<WithWarnings<T, W>> for (T, Vec<W>) {
    fn from(value: WithWarnings<T, W>) -> Self {
        match value {
            WithWarnings::Ok(value) => (value, Vec::new()),
            WithWarnings::Warning(value, warnings) => (value, warnings),
        }
    }
}
