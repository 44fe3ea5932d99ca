//! Query modes and construction variants

use phf::phf_map;
use serde::{Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// How user input reaches the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QueryMode {
    /// Inputs concatenated into a `$where` script.
    Insecure,
    /// Inputs bound as literal field values.
    Secure,
}

impl QueryMode {
    pub const ALL: [QueryMode; 2] = [QueryMode::Insecure, QueryMode::Secure];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Insecure => "insecure",
            Self::Secure => "secure",
        }
    }

    /// Variants reachable in this mode.
    pub fn variants(self) -> impl Iterator<Item = QueryVariant> {
        QueryVariant::ALL
            .into_iter()
            .filter(move |variant| variant.supports(self))
    }
}

impl fmt::Display for QueryMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for QueryMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "insecure" => Ok(Self::Insecure),
            "secure" => Ok(Self::Secure),
            other => Err(format!("unknown query mode '{other}'")),
        }
    }
}

impl Serialize for QueryMode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Query construction API used to build the search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QueryVariant {
    /// `QueryDocument::put`
    Put,
    /// `QueryDocument::put_all` from a map
    PutAll,
    /// `QueryDocument::append` chaining
    Append,
    /// `QueryDocument::with(key, value)`
    ConstructorKv,
    /// `QueryDocument::from_map`
    ConstructorMap,
    /// Map serialized to JSON text, then `QueryDocument::parse`
    Parse,
    /// `QueryDocumentBuilder::start().add(..)`
    BuilderAdd,
    /// `QueryDocumentBuilder::start().append(..)`
    BuilderAppend,
    /// `QueryDocumentBuilder::start_with(key, value)`
    BuilderStartKv,
    /// `QueryDocumentBuilder::start_from(map)`
    BuilderStartMap,
    /// Native `filters::and(filters::eq(..), ..)`; secure mode only
    BsonFilter,
}

static VARIANTS_BY_SLUG: phf::Map<&'static str, QueryVariant> = phf_map! {
    "basicdbobject-put" => QueryVariant::Put,
    "basicdbobject-putall" => QueryVariant::PutAll,
    "basicdbobject-append" => QueryVariant::Append,
    "basicdbobject-constructor-kv" => QueryVariant::ConstructorKv,
    "basicdbobject-constructor-map" => QueryVariant::ConstructorMap,
    "basicdbobject-parse" => QueryVariant::Parse,
    "basicdbobjectbuilder-add" => QueryVariant::BuilderAdd,
    "basicdbobjectbuilder-append" => QueryVariant::BuilderAppend,
    "basicdbobjectbuilder-start-kv" => QueryVariant::BuilderStartKv,
    "basicdbobjectbuilder-start-map" => QueryVariant::BuilderStartMap,
    "bson-filter" => QueryVariant::BsonFilter,
};

impl QueryVariant {
    pub const ALL: [QueryVariant; 11] = [
        QueryVariant::BsonFilter,
        QueryVariant::Put,
        QueryVariant::PutAll,
        QueryVariant::Append,
        QueryVariant::ConstructorKv,
        QueryVariant::ConstructorMap,
        QueryVariant::Parse,
        QueryVariant::BuilderAdd,
        QueryVariant::BuilderAppend,
        QueryVariant::BuilderStartKv,
        QueryVariant::BuilderStartMap,
    ];

    /// URL path segment naming this variant.
    pub fn slug(self) -> &'static str {
        match self {
            Self::Put => "basicdbobject-put",
            Self::PutAll => "basicdbobject-putall",
            Self::Append => "basicdbobject-append",
            Self::ConstructorKv => "basicdbobject-constructor-kv",
            Self::ConstructorMap => "basicdbobject-constructor-map",
            Self::Parse => "basicdbobject-parse",
            Self::BuilderAdd => "basicdbobjectbuilder-add",
            Self::BuilderAppend => "basicdbobjectbuilder-append",
            Self::BuilderStartKv => "basicdbobjectbuilder-start-kv",
            Self::BuilderStartMap => "basicdbobjectbuilder-start-map",
            Self::BsonFilter => "bson-filter",
        }
    }

    pub fn from_slug(slug: &str) -> Option<Self> {
        VARIANTS_BY_SLUG.get(slug).copied()
    }

    pub fn supports(self, mode: QueryMode) -> bool {
        !(self == Self::BsonFilter && mode == QueryMode::Insecure)
    }

    pub fn description(self) -> &'static str {
        match self {
            Self::Put => "QueryDocument::put for each criterion",
            Self::PutAll => "QueryDocument::put_all from a map",
            Self::Append => "chained QueryDocument::append",
            Self::ConstructorKv => "QueryDocument::with(key, value) constructor",
            Self::ConstructorMap => "QueryDocument::from_map constructor",
            Self::Parse => "map serialized to JSON, then QueryDocument::parse",
            Self::BuilderAdd => "QueryDocumentBuilder::start().add(..)",
            Self::BuilderAppend => "QueryDocumentBuilder::start().append(..)",
            Self::BuilderStartKv => "QueryDocumentBuilder::start_with(key, value)",
            Self::BuilderStartMap => "QueryDocumentBuilder::start_from(map)",
            Self::BsonFilter => "native filters::and(filters::eq(..), filters::eq(..))",
        }
    }
}

impl fmt::Display for QueryVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

impl FromStr for QueryVariant {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_slug(s).ok_or_else(|| format!("unknown query variant '{s}'"))
    }
}

impl Serialize for QueryVariant {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.slug())
    }
}
