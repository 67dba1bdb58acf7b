use std::{borrow::Cow, fmt, marker::PhantomData};

use schemars::{
    gen::SchemaGenerator,
    schema::{InstanceType, Schema, SchemaObject},
    JsonSchema,
};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

pub trait HasId {
    type IdType;
}

/// An identifier tagged with the type of record it identifies, so a user id
/// can not be passed where a bus stop id is expected. On the wire it is just
/// the raw value.
pub struct Id<T: HasId>(T::IdType, PhantomData<T>);

impl<T: HasId> Id<T> {
    pub fn new(inner: T::IdType) -> Self {
        Self(inner, PhantomData)
    }

    pub fn inner(&self) -> &T::IdType {
        &self.0
    }

    /// Views the id as the id of another record type with the same raw
    /// representation, e.g. a user as a generic located entity.
    pub fn cast<U>(self) -> Id<U>
    where
        U: HasId<IdType = T::IdType>,
    {
        Id::new(self.0)
    }

    pub fn raw_ref<R>(&self) -> &R
    where
        T::IdType: AsRef<R>,
        R: ?Sized,
    {
        self.0.as_ref()
    }
}

impl<T: HasId> Id<T>
where
    T::IdType: Clone,
{
    pub fn raw(&self) -> T::IdType {
        self.0.clone()
    }
}

impl<T: HasId> From<&str> for Id<T>
where
    T::IdType: From<String>,
{
    fn from(value: &str) -> Self {
        Self::new(value.to_owned().into())
    }
}

impl<T: HasId> Clone for Id<T>
where
    T::IdType: Clone,
{
    fn clone(&self) -> Self {
        Self::new(self.0.clone())
    }
}

impl<T: HasId> PartialEq for Id<T>
where
    T::IdType: PartialEq,
{
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0
    }
}

impl<T: HasId> fmt::Debug for Id<T>
where
    T::IdType: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Id({:?})", self.0)
    }
}

impl<T: HasId> fmt::Display for Id<T>
where
    T::IdType: fmt::Display,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl<T: HasId> Serialize for Id<T>
where
    T::IdType: Serialize,
{
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.0.serialize(serializer)
    }
}

impl<'de, T: HasId> Deserialize<'de> for Id<T>
where
    T::IdType: Deserialize<'de>,
{
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        T::IdType::deserialize(deserializer).map(Self::new)
    }
}

impl<T: HasId + JsonSchema> JsonSchema for Id<T> {
    fn schema_name() -> String {
        format!("{}Id", T::schema_name())
    }

    fn schema_id() -> Cow<'static, str> {
        Cow::Owned(format!("{}Id", T::schema_id()))
    }

    fn json_schema(_gen: &mut SchemaGenerator) -> Schema {
        SchemaObject {
            instance_type: Some(InstanceType::String.into()),
            format: Some("id".to_owned()),
            ..Default::default()
        }
        .into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Stop;

    impl HasId for Stop {
        type IdType = String;
    }

    struct Place;

    impl HasId for Place {
        type IdType = String;
    }

    #[test]
    fn serializes_as_the_raw_value() {
        let id = Id::<Stop>::from("bree-street");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"bree-street\"");
        let back: Id<Stop> = serde_json::from_str("\"bree-street\"").unwrap();
        assert_eq!(back, id);
        assert_eq!(id.to_string(), "bree-street");
    }

    #[test]
    fn cast_keeps_the_raw_value() {
        let place: Id<Place> = Id::<Stop>::from("park-station").cast();
        assert_eq!(place.raw_ref::<str>(), "park-station");
    }
}
