//! Closed string vocabularies with a permissive escape hatch
//!
//! Command types, data types and attribute names are persisted as plain
//! strings. Each vocabulary is a closed enum plus an `Unrecognized` variant
//! that keeps the original text, so a value outside the vocabulary survives
//! a serialize/parse cycle unchanged while still being detectable.

macro_rules! closed_vocabulary {
    (
        $(#[$meta:meta])*
        pub enum $name:ident {
            $( $(#[$vmeta:meta])* $variant:ident => $text:literal, )+
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
        #[serde(from = "String", into = "String")]
        pub enum $name {
            $( $(#[$vmeta])* $variant, )+
            /// Text outside the vocabulary, kept verbatim
            Unrecognized(String),
        }

        impl $name {
            /// Every recognized value, in declaration order
            pub const KNOWN: &'static [$name] = &[ $( $name::$variant, )+ ];

            /// Persisted text form
            pub fn as_str(&self) -> &str {
                match self {
                    $( $name::$variant => $text, )+
                    $name::Unrecognized(text) => text.as_str(),
                }
            }

            /// Whether the value belongs to the vocabulary
            pub fn is_recognized(&self) -> bool {
                !matches!(self, $name::Unrecognized(_))
            }

            /// Parse persisted text; never fails
            pub fn parse(text: &str) -> Self {
                match text {
                    $( $text => $name::$variant, )+
                    other => $name::Unrecognized(other.to_string()),
                }
            }
        }

        impl From<&str> for $name {
            fn from(text: &str) -> Self {
                $name::parse(text)
            }
        }

        impl From<String> for $name {
            fn from(text: String) -> Self {
                $name::parse(&text)
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> Self {
                match value {
                    $name::Unrecognized(text) => text,
                    known => known.as_str().to_string(),
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}
