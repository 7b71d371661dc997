//! Domain types for the orchid catalog.
//!
//! Wire shapes follow the remote catalog's JSON (camelCase keys). The remote
//! stores whatever clients send, so ids, numbers and the `status` flag are
//! decoded leniently: ids may arrive as numbers, numbers as numeric strings,
//! and `status` as `0`/`1`.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

/// Key prefix under which favorite records live in the local store.
pub const FAVORITE_KEY_PREFIX: &str = "orchid_";

// ---------------------------------------------------------------------------
// Newtypes
// ---------------------------------------------------------------------------

/// Opaque identifier of a catalog item.
///
/// Always held as a string; numeric ids from the wire are converted.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ItemId(pub String);

impl ItemId {
    /// Local store key of this item's favorite record (`orchid_<id>`).
    pub fn favorite_key(&self) -> String {
        format!("{FAVORITE_KEY_PREFIX}{}", self.0)
    }

    /// Inverse of [`ItemId::favorite_key`]; `None` for keys outside the prefix.
    pub fn from_favorite_key(key: &str) -> Option<Self> {
        key.strip_prefix(FAVORITE_KEY_PREFIX)
            .filter(|rest| !rest.is_empty())
            .map(Self::from)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<String> for ItemId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for ItemId {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

impl Serialize for ItemId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for ItemId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Text(String),
            Int(i64),
        }

        match Raw::deserialize(deserializer)? {
            Raw::Text(s) => Ok(Self(s)),
            Raw::Int(n) => Ok(Self(n.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// Lenient field decoders
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
#[serde(untagged)]
enum RawNumber {
    Num(f64),
    Text(String),
}

fn parse_raw_number<E: de::Error>(raw: RawNumber) -> Result<Option<f64>, E> {
    match raw {
        RawNumber::Num(n) => Ok(Some(n)),
        RawNumber::Text(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                return Ok(None);
            }
            trimmed
                .parse::<f64>()
                .map(Some)
                .map_err(|_| E::custom(format!("expected a number, got {s:?}")))
        }
    }
}

fn lenient_f64<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    match Option::<RawNumber>::deserialize(deserializer)? {
        Some(raw) => Ok(parse_raw_number(raw)?.unwrap_or_default()),
        None => Ok(0.0),
    }
}

fn lenient_opt_f64<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<f64>, D::Error> {
    match Option::<RawNumber>::deserialize(deserializer)? {
        Some(raw) => parse_raw_number(raw),
        None => Ok(None),
    }
}

fn lenient_bool<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawBool {
        Bool(bool),
        Num(f64),
        Text(String),
    }

    match Option::<RawBool>::deserialize(deserializer)? {
        None => Ok(false),
        Some(RawBool::Bool(b)) => Ok(b),
        Some(RawBool::Num(n)) => Ok(n != 0.0),
        Some(RawBool::Text(s)) => match s.trim().to_ascii_lowercase().as_str() {
            "true" | "1" => Ok(true),
            "false" | "0" | "" => Ok(false),
            other => Err(de::Error::custom(format!("expected a boolean, got {other:?}"))),
        },
    }
}

fn lenient_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

// ---------------------------------------------------------------------------
// Catalog items
// ---------------------------------------------------------------------------

/// A catalog record as returned by the remote service.
///
/// `status` doubles as the "is favorite" flag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    pub id: ItemId,
    #[serde(default, deserialize_with = "lenient_string")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub weight: f64,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub rating: f64,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub price: f64,
    #[serde(default, deserialize_with = "lenient_string")]
    pub image: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub color: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub bonus: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub origin: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub category: String,
    #[serde(default, deserialize_with = "lenient_bool")]
    pub is_top_of_the_week: bool,
    #[serde(default, deserialize_with = "lenient_bool")]
    pub status: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Body of a create request. The remote assigns the id.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewItem {
    pub name: String,
    pub weight: f64,
    pub rating: f64,
    pub price: f64,
    pub image: String,
    pub color: String,
    pub bonus: String,
    pub origin: String,
    pub category: String,
    pub is_top_of_the_week: bool,
    pub status: bool,
}

/// Partial update body; absent fields are left untouched remotely.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rating: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bonus: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub origin: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_top_of_the_week: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<bool>,
}

impl ItemPatch {
    /// The favorite-toggle body: `{"status": <status>}`.
    pub fn status(status: bool) -> Self {
        Self {
            status: Some(status),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Apply this patch to a local copy of an item.
    pub fn apply_to(&self, item: &mut Item) {
        if let Some(v) = &self.name {
            item.name = v.clone();
        }
        if let Some(v) = self.weight {
            item.weight = v;
        }
        if let Some(v) = self.rating {
            item.rating = v;
        }
        if let Some(v) = self.price {
            item.price = v;
        }
        if let Some(v) = &self.image {
            item.image = v.clone();
        }
        if let Some(v) = &self.color {
            item.color = v.clone();
        }
        if let Some(v) = &self.bonus {
            item.bonus = v.clone();
        }
        if let Some(v) = &self.origin {
            item.origin = v.clone();
        }
        if let Some(v) = &self.category {
            item.category = v.clone();
        }
        if let Some(v) = self.is_top_of_the_week {
            item.is_top_of_the_week = v;
        }
        if let Some(v) = self.status {
            item.status = v;
        }
    }
}

// ---------------------------------------------------------------------------
// Favorites
// ---------------------------------------------------------------------------

/// Display fields captured when an item is favorited.
#[derive(Debug, Clone, PartialEq)]
pub struct FavoriteSnapshot {
    pub name: String,
    pub image: String,
    pub weight: Option<f64>,
    pub rating: Option<f64>,
}

impl From<&Item> for FavoriteSnapshot {
    fn from(item: &Item) -> Self {
        Self {
            name: item.name.clone(),
            image: item.image.clone(),
            weight: Some(item.weight),
            rating: Some(item.rating),
        }
    }
}

/// Local projection of a favorited item, stored as JSON under `orchid_<id>`.
///
/// `weight` and `rating` are optional so that records holding only
/// `id`/`status`/`image`/`name` still load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FavoriteRecord {
    pub id: ItemId,
    #[serde(default, deserialize_with = "lenient_bool")]
    pub status: bool,
    #[serde(default, deserialize_with = "lenient_string")]
    pub image: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub name: String,
    #[serde(
        default,
        deserialize_with = "lenient_opt_f64",
        skip_serializing_if = "Option::is_none"
    )]
    pub weight: Option<f64>,
    #[serde(
        default,
        deserialize_with = "lenient_opt_f64",
        skip_serializing_if = "Option::is_none"
    )]
    pub rating: Option<f64>,
}

impl FavoriteRecord {
    pub fn new(id: ItemId, snapshot: FavoriteSnapshot) -> Self {
        Self {
            id,
            status: true,
            image: snapshot.image,
            name: snapshot.name,
            weight: snapshot.weight,
            rating: snapshot.rating,
        }
    }

    pub fn from_item(item: &Item) -> Self {
        Self::new(item.id.clone(), FavoriteSnapshot::from(item))
    }

    pub fn storage_key(&self) -> String {
        self.id.favorite_key()
    }
}

// ---------------------------------------------------------------------------
// Accounts
// ---------------------------------------------------------------------------

/// Identity-provider user profile kept alongside the session token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub uid: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
    /// Token lifetime in seconds, as reported by the provider.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_in: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signed_in_at: Option<DateTime<Utc>>,
}

/// Proof of authentication: the provider's access token plus its user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub token: String,
    pub user: User,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn item_id_accepts_numbers_and_strings() {
        let a: ItemId = serde_json::from_str("7").expect("number id");
        let b: ItemId = serde_json::from_str("\"7\"").expect("string id");
        assert_eq!(a, b);
        assert_eq!(serde_json::to_string(&a).unwrap(), "\"7\"");
    }

    #[test]
    fn favorite_key_roundtrip() {
        let id = ItemId::from("42");
        assert_eq!(id.favorite_key(), "orchid_42");
        assert_eq!(ItemId::from_favorite_key("orchid_42"), Some(id));
        assert_eq!(ItemId::from_favorite_key("userToken"), None);
        assert_eq!(ItemId::from_favorite_key("orchid_"), None);
    }

    #[test]
    fn item_decodes_sparse_and_stringly_payload() {
        let item: Item = serde_json::from_str(
            r#"{"id":"3","name":"Phal","weight":"12","rating":4.5,"status":1,"createdAt":"x"}"#,
        )
        .expect("decode");
        assert_eq!(item.id, ItemId::from("3"));
        assert_eq!(item.weight, 12.0);
        assert_eq!(item.rating, 4.5);
        assert!(item.status);
        assert_eq!(item.price, 0.0);
        assert!(item.origin.is_empty());
        assert!(!item.is_top_of_the_week);
    }

    #[test]
    fn item_rejects_non_numeric_weight() {
        let err = serde_json::from_str::<Item>(r#"{"id":"3","weight":"heavy"}"#).unwrap_err();
        assert!(err.to_string().contains("expected a number"));
    }

    #[test]
    fn status_patch_serializes_only_status() {
        let json = serde_json::to_value(ItemPatch::status(false)).unwrap();
        assert_eq!(json, serde_json::json!({ "status": false }));
    }

    #[test]
    fn patch_apply_leaves_absent_fields() {
        let mut item: Item =
            serde_json::from_str(r#"{"id":"1","name":"A","origin":"Peru"}"#).unwrap();
        let patch = ItemPatch {
            name: Some("B".into()),
            rating: Some(3.0),
            ..ItemPatch::default()
        };
        patch.apply_to(&mut item);
        assert_eq!(item.name, "B");
        assert_eq!(item.rating, 3.0);
        assert_eq!(item.origin, "Peru");
    }

    #[test]
    fn favorite_record_loads_reduced_variant() {
        let rec: FavoriteRecord =
            serde_json::from_str(r#"{"id":"9","status":true,"image":"u","name":"N"}"#).unwrap();
        assert_eq!(rec.weight, None);
        assert_eq!(rec.rating, None);
        assert_eq!(rec.storage_key(), "orchid_9");
    }

    #[test]
    fn new_item_uses_camel_case() {
        let item = NewItem {
            name: "n".into(),
            weight: 1.0,
            rating: 1.0,
            price: 1.0,
            image: "https://x".into(),
            color: String::new(),
            bonus: "b".into(),
            origin: "o".into(),
            category: "c".into(),
            is_top_of_the_week: true,
            status: true,
        };
        let json = serde_json::to_value(&item).unwrap();
        assert_eq!(json["isTopOfTheWeek"], true);
        assert!(json.get("id").is_none());
    }
}
