/// ID types for Bass Booster entities
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

#[cfg(feature = "sqlx-support")]
use sqlx::{
    encode::IsNull,
    error::BoxDynError,
    sqlite::{SqliteArgumentValue, SqliteTypeInfo, SqliteValueRef},
    Decode, Encode, Sqlite, Type,
};

/// Track identifier
///
/// Immutable once a track has been created.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TrackId(String);

impl TrackId {
    /// Create a track ID from an existing value
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Generate a new random track ID
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Get the inner string
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TrackId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Blob identifier
///
/// Generated on save. Carries the payload's file extension (if any) so the
/// stored file stays recognizable to decoders, e.g. `0b9c…e1.mp3`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BlobId(String);

impl BlobId {
    /// Create a blob ID from an existing value
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Generate a new blob ID, optionally suffixed with an extension
    pub fn generate(extension: Option<&str>) -> Self {
        let id = Uuid::new_v4().to_string();
        match extension.map(str::trim).filter(|ext| !ext.is_empty()) {
            Some(ext) => Self(format!("{}.{}", id, ext.trim_start_matches('.').to_lowercase())),
            None => Self(id),
        }
    }

    /// Get the inner string
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// A blob ID is used as a file name, so it must not escape its directory
    pub fn is_safe_file_name(&self) -> bool {
        !self.0.is_empty()
            && !self.0.contains(['/', '\\'])
            && self.0 != "."
            && self.0 != ".."
    }
}

impl fmt::Display for BlobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(feature = "sqlx-support")]
macro_rules! sqlite_string_id {
    ($ty:ident) => {
        impl Type<Sqlite> for $ty {
            fn type_info() -> SqliteTypeInfo {
                <String as Type<Sqlite>>::type_info()
            }
        }

        impl<'q> Encode<'q, Sqlite> for $ty {
            fn encode_by_ref(
                &self,
                args: &mut Vec<SqliteArgumentValue<'q>>,
            ) -> Result<IsNull, BoxDynError> {
                <String as Encode<Sqlite>>::encode_by_ref(&self.0, args)
            }
        }

        impl<'r> Decode<'r, Sqlite> for $ty {
            fn decode(value: SqliteValueRef<'r>) -> Result<Self, BoxDynError> {
                let s = <String as Decode<Sqlite>>::decode(value)?;
                Ok($ty(s))
            }
        }
    };
}

#[cfg(feature = "sqlx-support")]
sqlite_string_id!(TrackId);

#[cfg(feature = "sqlx-support")]
sqlite_string_id!(BlobId);
