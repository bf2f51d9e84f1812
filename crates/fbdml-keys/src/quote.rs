//! Identifier quoting for the RETURNING clause.

/// How column names are written into an appended RETURNING clause.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuoteStrategy {
    /// Names are written as-is.
    NoQuotes,
    /// Names are wrapped in double quotes, with embedded quotes doubled.
    DoubleQuotes,
}

impl QuoteStrategy {
    /// Dialect 3 supports quoted identifiers; dialects 1 and 2 do not.
    #[must_use]
    pub const fn for_dialect(dialect: u8) -> Self {
        if dialect >= 3 {
            Self::DoubleQuotes
        } else {
            Self::NoQuotes
        }
    }

    /// Appends `name` to `out` using this strategy.
    pub fn append_quoted(self, name: &str, out: &mut String) {
        match self {
            Self::NoQuotes => out.push_str(name),
            Self::DoubleQuotes => {
                out.reserve(name.len() + 2);
                out.push('"');
                for c in name.chars() {
                    if c == '"' {
                        out.push('"');
                    }
                    out.push(c);
                }
                out.push('"');
            }
        }
    }

    #[must_use]
    pub fn quote(self, name: &str) -> String {
        let mut out = String::new();
        self.append_quoted(name, &mut out);
        out
    }
}
