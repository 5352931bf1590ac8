//! Serde helpers for tolerant decoding of API payloads.

use serde::de::{self, Visitor};
use serde::Deserializer;
use std::fmt;

/// Record identifiers that may arrive as JSON strings or integers.
pub mod id_string {
    use super::{de, fmt, Deserializer, Visitor};

    struct IdVisitor;

    impl Visitor<'_> for IdVisitor {
        type Value = String;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("a string or integer identifier")
        }

        fn visit_u64<E>(self, value: u64) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(value.to_string())
        }

        fn visit_i64<E>(self, value: i64) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(value.to_string())
        }

        fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(value.to_string())
        }

        fn visit_string<E>(self, value: String) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(value)
        }
    }

    /// Deserializes an identifier from a string or number.
    ///
    /// # Errors
    ///
    /// Returns an error if the value is neither a string nor an integer.
    pub fn deserialize<'de, D>(deserializer: D) -> Result<String, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(IdVisitor)
    }

    /// Optional identifiers; `null` and missing fields become `None`.
    pub mod option {
        use super::{Deserializer, IdVisitor, de, fmt};
        use serde::de::Visitor;

        struct OptionVisitor;

        impl<'de> Visitor<'de> for OptionVisitor {
            type Value = Option<String>;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("optional identifier")
            }

            fn visit_none<E>(self) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                Ok(None)
            }

            fn visit_unit<E>(self) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                Ok(None)
            }

            fn visit_some<D>(self, deserializer: D) -> Result<Self::Value, D::Error>
            where
                D: Deserializer<'de>,
            {
                deserializer.deserialize_any(IdVisitor).map(Some)
            }
        }

        /// Deserializes an optional identifier from a string or number.
        ///
        /// # Errors
        ///
        /// Returns an error if a present value is neither a string nor an integer.
        pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
        where
            D: Deserializer<'de>,
        {
            deserializer.deserialize_option(OptionVisitor)
        }
    }
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    struct Record {
        #[serde(deserialize_with = "super::id_string::deserialize")]
        id: String,
        #[serde(default, deserialize_with = "super::id_string::option::deserialize")]
        parent_id: Option<String>,
    }

    #[test]
    fn test_numeric_and_string_ids() {
        let numeric: Record = serde_json::from_str(r#"{"id": 42, "parent_id": 7}"#).unwrap();
        assert_eq!(numeric.id, "42");
        assert_eq!(numeric.parent_id.as_deref(), Some("7"));

        let text: Record = serde_json::from_str(r#"{"id": "clx9abc"}"#).unwrap();
        assert_eq!(text.id, "clx9abc");
        assert_eq!(text.parent_id, None);
    }

    #[test]
    fn test_null_optional_id() {
        let record: Record = serde_json::from_str(r#"{"id": "a", "parent_id": null}"#).unwrap();
        assert_eq!(record.parent_id, None);
    }

    #[test]
    fn test_rejects_non_scalar_id() {
        let result = serde_json::from_str::<Record>(r#"{"id": [1]}"#);
        assert!(result.is_err());
    }
}
