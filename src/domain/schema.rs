//! Schema name classification.
//!
//! The cluster registers its own internal schemas next to user ones. A name
//! is reserved when any blocklisted token occurs anywhere in it. The match
//! is a plain, case-sensitive substring test, so `com.googleapis.Foo` counts
//! as reserved too; that breadth is kept as-is.

/// Namespace tokens of schemas that are never shown as user schemas.
pub const RESERVED_SCHEMA_TOKENS: [&str; 5] = [
    "org.infinispan.protostream",
    "org.infinispan.persistence",
    "org.infinispan.query",
    "org.infinispan.commons",
    "google",
];

/// Whether a schema belongs to the user or to the cluster internals.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaKind {
    User,
    Reserved,
}

impl std::fmt::Display for SchemaKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::User => write!(f, "user"),
            Self::Reserved => write!(f, "reserved"),
        }
    }
}

/// Classifies a single schema name.
#[must_use]
pub fn classify_schema(name: &str) -> SchemaKind {
    if RESERVED_SCHEMA_TOKENS
        .iter()
        .any(|token| name.contains(token))
    {
        SchemaKind::Reserved
    } else {
        SchemaKind::User
    }
}

/// Keeps only user schemas, preserving input order.
pub fn filter_schemas<S: AsRef<str>>(names: &[S]) -> Vec<String> {
    names
        .iter()
        .map(AsRef::<str>::as_ref)
        .filter(|name| classify_schema(name) == SchemaKind::User)
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_drops_reserved() {
        let names = ["org.infinispan.query.Foo", "com.example.Bar"];
        assert_eq!(filter_schemas(&names), ["com.example.Bar"]);
    }

    #[test]
    fn test_filter_is_substring_based() {
        let names = [
            "google/protobuf/any.proto",
            "com.googleadjacent.Foo",
            "my.org.infinispan.commons.Copy",
            "shop.Order",
        ];
        assert_eq!(filter_schemas(&names), ["shop.Order"]);
    }

    #[test]
    fn test_filter_is_case_sensitive() {
        let names = ["com.Google.Maps"];
        assert_eq!(filter_schemas(&names), ["com.Google.Maps"]);
    }

    #[test]
    fn test_filter_preserves_order_and_is_idempotent() {
        let names = vec![
            "zeta.Z".to_string(),
            "org.infinispan.persistence.Entry".to_string(),
            "alpha.A".to_string(),
        ];
        let once = filter_schemas(&names);
        assert_eq!(once, ["zeta.Z", "alpha.A"]);
        assert_eq!(filter_schemas(&once), once);
    }

    #[test]
    fn test_classify() {
        assert_eq!(
            classify_schema("org.infinispan.protostream.WrappedMessage"),
            SchemaKind::Reserved
        );
        assert_eq!(classify_schema("library.Book"), SchemaKind::User);
        assert_eq!(SchemaKind::Reserved.to_string(), "reserved");
    }
}
