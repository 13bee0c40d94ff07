use std::str::FromStr;

/// Answer from the external player.
///
/// `Unavailable` covers every way a read can fail: the process is missing,
/// exited non-zero, timed out or printed something unparseable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reply<T> {
    Ok(T),
    Unavailable,
}

impl<T> Reply<T> {
    pub fn is_ok(&self) -> bool {
        matches!(self, Reply::Ok(_))
    }

    pub fn is_unavailable(&self) -> bool {
        matches!(self, Reply::Unavailable)
    }

    /// The value, or `default` when the player did not answer
    pub fn or(self, default: T) -> T {
        match self {
            Reply::Ok(value) => value,
            Reply::Unavailable => default,
        }
    }

    pub fn or_else(self, default: impl FnOnce() -> T) -> T {
        match self {
            Reply::Ok(value) => value,
            Reply::Unavailable => default(),
        }
    }

    pub fn ok(self) -> Option<T> {
        match self {
            Reply::Ok(value) => Some(value),
            Reply::Unavailable => None,
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Reply<U> {
        match self {
            Reply::Ok(value) => Reply::Ok(f(value)),
            Reply::Unavailable => Reply::Unavailable,
        }
    }

    pub fn and_then<U>(self, f: impl FnOnce(T) -> Reply<U>) -> Reply<U> {
        match self {
            Reply::Ok(value) => f(value),
            Reply::Unavailable => Reply::Unavailable,
        }
    }
}

impl<T> From<Option<T>> for Reply<T> {
    fn from(value: Option<T>) -> Self {
        value.map_or(Reply::Unavailable, Reply::Ok)
    }
}

impl Reply<String> {
    /// Parse trimmed text output
    pub fn parse<N: FromStr>(self) -> Reply<N> {
        self.and_then(|text| text.trim().parse().ok().into())
    }

    /// Treat empty output as no answer
    pub fn non_empty(self) -> Reply<String> {
        self.and_then(|text| {
            let text = text.trim();
            if text.is_empty() {
                Reply::Unavailable
            } else {
                Reply::Ok(text.to_string())
            }
        })
    }

    /// Interpret `on`/`off` output
    pub fn switch(self) -> Reply<bool> {
        self.and_then(|text| match text.trim().to_ascii_lowercase().as_str() {
            "on" | "true" | "1" => Reply::Ok(true),
            "off" | "false" | "0" => Reply::Ok(false),
            _ => Reply::Unavailable,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(s: &str) -> Reply<String> {
        Reply::Ok(s.to_string())
    }

    #[test]
    fn parse_tolerates_whitespace_and_rejects_garbage() {
        assert_eq!(text(" 42\n").parse::<u32>(), Reply::Ok(42));
        assert_eq!(text("loud").parse::<u32>(), Reply::Unavailable);
        assert_eq!(text("").parse::<u32>(), Reply::Unavailable);
        assert_eq!(Reply::<String>::Unavailable.parse::<u32>(), Reply::Unavailable);
    }

    #[test]
    fn switch_reads_on_and_off() {
        assert_eq!(text("on").switch(), Reply::Ok(true));
        assert_eq!(text("off\n").switch(), Reply::Ok(false));
        assert_eq!(text("maybe").switch(), Reply::Unavailable);
    }

    #[test]
    fn or_supplies_default_only_when_unavailable() {
        assert_eq!(Reply::Ok(3).or(50), 3);
        assert_eq!(Reply::Unavailable.or(50), 50);
    }

    #[test]
    fn non_empty_drops_blank_output() {
        assert_eq!(text("  ").non_empty(), Reply::Unavailable);
        assert_eq!(text(" Mix ").non_empty(), Reply::Ok("Mix".to_string()));
    }
}
