/// Quotes an identifier for usage in Postgres.
///
/// Identifiers are always quoted, so mixed case names and keywords from the
/// source survive unchanged. Embedded double quotes are doubled.
pub fn quote_identifier(identifier: impl AsRef<str>) -> String {
    let escaped = identifier.as_ref().replace('"', r#""""#);

    format!("\"{escaped}\"")
}

/// Words Postgres reserves outright, which can never be used as a bare table name.
static RESERVED_KEYWORDS: &[&str] = &[
    "all", "analyse", "analyze", "and", "any", "array", "as", "asc", "asymmetric",
    "authorization", "binary", "both", "case", "cast", "check", "collate", "collation",
    "column", "concurrently", "constraint", "create", "cross", "current_catalog",
    "current_date", "current_role", "current_schema", "current_time", "current_timestamp",
    "current_user", "default", "deferrable", "desc", "distinct", "do", "else", "end",
    "except", "false", "fetch", "for", "foreign", "freeze", "from", "full", "grant", "group",
    "having", "ilike", "in", "initially", "inner", "intersect", "into", "is", "isnull", "join",
    "lateral", "leading", "left", "like", "limit", "localtime", "localtimestamp", "natural",
    "not", "notnull", "null", "offset", "on", "only", "or", "order", "outer", "overlaps",
    "placing", "primary", "references", "returning", "right", "select", "session_user",
    "similar", "some", "symmetric", "system_user", "table", "tablesample", "then", "to",
    "trailing", "true", "union", "unique", "user", "using", "variadic", "verbose", "when",
    "where", "window", "with",
];

/// Quotes an identifier only if Postgres would not read it back unchanged.
///
/// Plain lowercase names are left bare, anything else goes through [`quote_identifier`].
pub(crate) fn quote_identifier_if_needed(identifier: &str) -> String {
    let mut chars = identifier.chars();

    let safe = matches!(chars.next(), Some('a'..='z' | '_'))
        && chars.all(|c| matches!(c, 'a'..='z' | '0'..='9' | '_'))
        && !RESERVED_KEYWORDS.contains(&identifier);

    if safe {
        identifier.to_string()
    } else {
        quote_identifier(identifier)
    }
}

/// A trait for types that can be quoted.
pub(crate) trait Quotable {
    /// Quotes the value as an identifier.
    fn quote(&self) -> String;
}

impl<S> Quotable for S
where
    S: AsRef<str>,
{
    fn quote(&self) -> String {
        quote_identifier(self)
    }
}

/// A trait for types that can be quoted as an iterator.
pub(crate) trait QuotableIter: Sized {
    fn quote(self) -> IteratorQuoter<Self>;
}

impl<I> QuotableIter for I
where
    I: Iterator,
    I::Item: AsRef<str>,
{
    fn quote(self) -> IteratorQuoter<Self> {
        IteratorQuoter { iter: self }
    }
}

/// The iterator implementation used when quoting an iterator of values
pub(crate) struct IteratorQuoter<I> {
    iter: I,
}

impl<I> Iterator for IteratorQuoter<I>
where
    I: Iterator,
    I::Item: AsRef<str>,
{
    type Item = String;

    fn next(&mut self) -> Option<Self::Item> {
        self.iter.next().map(quote_identifier)
    }
}

/// Quotes a string value for usage in Postgres.
pub(crate) fn quote_value_string(s: &str) -> String {
    format!("'{}'", s.replace('\'', "''"))
}
