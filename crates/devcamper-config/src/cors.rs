use std::time::Duration;

use serde::Deserialize;

/// Cross-origin settings for browser clients of the API
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CorsConfig {
    /// Allowed origins (`"*"` or explicit list)
    #[serde(default)]
    pub origins: AnyOrList,
    /// Allowed methods (`"*"` or explicit list)
    #[serde(default)]
    pub methods: AnyOrList,
    /// Allowed request headers (`"*"` or explicit list)
    #[serde(default)]
    pub headers: AnyOrList,
    #[serde(default)]
    pub credentials: bool,
    /// Preflight cache lifetime in seconds
    #[serde(default)]
    pub max_age: Option<u64>,
}

impl CorsConfig {
    pub fn max_age_duration(&self) -> Option<Duration> {
        self.max_age.map(Duration::from_secs)
    }
}

/// A wildcard or an explicit list of values
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum AnyOrList {
    #[default]
    Any,
    List(Vec<String>),
}

impl AnyOrList {
    pub const fn is_any(&self) -> bool {
        matches!(self, Self::Any)
    }
}

impl<'de> Deserialize<'de> for AnyOrList {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        use serde::de;

        struct Visitor;

        impl<'de> de::Visitor<'de> for Visitor {
            type Value = AnyOrList;

            fn expecting(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                formatter.write_str("\"*\" or an array of strings")
            }

            fn visit_str<E>(self, v: &str) -> Result<AnyOrList, E>
            where
                E: de::Error,
            {
                Ok(if v == "*" {
                    AnyOrList::Any
                } else {
                    AnyOrList::List(vec![v.to_owned()])
                })
            }

            fn visit_seq<A>(self, mut seq: A) -> Result<AnyOrList, A::Error>
            where
                A: de::SeqAccess<'de>,
            {
                let mut values = Vec::new();
                while let Some(value) = seq.next_element::<String>()? {
                    // A wildcard anywhere in the list widens it to "any"
                    if value == "*" {
                        return Ok(AnyOrList::Any);
                    }
                    values.push(value);
                }
                Ok(AnyOrList::List(values))
            }
        }

        deserializer.deserialize_any(Visitor)
    }
}
