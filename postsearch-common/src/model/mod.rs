pub mod post;
pub mod user;

use derive_where::derive_where;
use serde::{
    Deserialize, Deserializer, Serialize, Serializer,
    de::{self, Visitor},
};
use std::{
    fmt::{self, Display, Formatter},
    marker::PhantomData,
};

/// Opaque string identifier of a `Marker` entity.
///
/// The remote API sends integers, so deserialization accepts both strings and
/// integers and normalises them to their decimal string form. Any string is
/// accepted, the empty one included; such an id simply never joins.
#[derive_where(Clone, Eq, PartialEq, Ord, PartialOrd, Debug, Hash)]
pub struct Id<Marker>(String, PhantomData<Marker>);

impl<Marker> Id<Marker> {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into(), PhantomData)
    }

    #[must_use]
    pub fn get(&self) -> &str {
        &self.0
    }

    /// Reads the same identifier as belonging to another entity kind.
    ///
    /// Nothing guarantees that the result refers to an existing entity.
    #[must_use]
    pub fn reinterpret<Other>(&self) -> Id<Other> {
        Id(self.0.clone(), PhantomData)
    }
}

impl<Marker> Display for Id<Marker> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        Display::fmt(&self.0, f)
    }
}

impl<Marker> From<u64> for Id<Marker> {
    fn from(value: u64) -> Self {
        Self::new(value.to_string())
    }
}

impl<Marker> Serialize for Id<Marker> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

impl<'de, Marker> Deserialize<'de> for Id<Marker> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct IdVisitor<Marker>(PhantomData<Marker>);

        impl<Marker> Visitor<'_> for IdVisitor<Marker> {
            type Value = Id<Marker>;

            fn expecting(&self, f: &mut Formatter<'_>) -> fmt::Result {
                f.write_str("a string or an integer identifier")
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
                Ok(Id::from(v))
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
                Ok(Id::new(v.to_string()))
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
                Ok(Id::new(v))
            }
        }

        deserializer.deserialize_any(IdVisitor(PhantomData))
    }
}
