use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};

use data_encoding::BASE64URL_NOPAD;
use err_derive::Error;
use rand::distributions::{Distribution, Standard};
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

/// A typed identifier. The phantom parameter pins an id to its entity, so
/// an order id cannot be passed where a menu-item id is expected.
pub struct Id<T> {
    val: u64,
    phantom: PhantomData<T>,
}

impl<T> Hash for Id<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.val.hash(state);
    }
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum IdParseError {
    #[error(display = "invalid prefix")]
    InvalidPrefix,
    #[error(display = "unparseable id")]
    Unparseable,
}

pub trait Entity {
    const PREFIX: &'static str;
}

const DIVIDER: &str = "-";

impl<T> Id<T> {
    /// Content-addressed id: the same value always hashes to the same id.
    pub fn hashed<H: Hash>(entity: &H) -> Self {
        let mut h = siphasher::sip::SipHasher24::new_with_keys(0, 0);
        entity.hash(&mut h);
        Id {
            val: h.finish(),
            phantom: PhantomData,
        }
    }
}

/// Hands out ids in allocation order, starting from 1.
#[derive(Debug)]
pub struct IdGen {
    next: AtomicU64,
}

impl Default for IdGen {
    fn default() -> Self {
        IdGen::new()
    }
}

impl IdGen {
    pub fn new() -> Self {
        IdGen {
            next: AtomicU64::new(1),
        }
    }

    pub fn generate<T>(&self) -> Id<T> {
        let val = self.next.fetch_add(1, AtomicOrdering::SeqCst);
        Id {
            val,
            phantom: PhantomData,
        }
    }
}

impl<T> Distribution<Id<T>> for Standard {
    fn sample<R: ?Sized + rand::Rng>(&self, rng: &mut R) -> Id<T> {
        let val = rng.gen();
        Id {
            val,
            phantom: PhantomData,
        }
    }
}

impl<T: Entity> fmt::Display for Id<T> {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        write!(
            fmt,
            "{}{}{}",
            T::PREFIX,
            DIVIDER,
            BASE64URL_NOPAD.encode(&self.val.to_be_bytes())
        )
    }
}

impl<T> fmt::Debug for Id<T> {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        fmt.debug_struct("Id")
            .field("val", &format_args!("{:016x}", self.val))
            .finish()
    }
}

impl<T: Entity> std::str::FromStr for Id<T> {
    type Err = IdParseError;
    fn from_str(src: &str) -> Result<Self, Self::Err> {
        if T::PREFIX.len() > src.len() {
            return Err(IdParseError::InvalidPrefix);
        }
        let (start, remainder) = src.split_at(T::PREFIX.len());
        if start != T::PREFIX {
            return Err(IdParseError::InvalidPrefix);
        }
        if remainder.is_empty() {
            return Err(IdParseError::Unparseable);
        }
        let (divider, b64) = remainder.split_at(1);
        if divider != DIVIDER {
            return Err(IdParseError::Unparseable);
        }

        let bytes = BASE64URL_NOPAD
            .decode(b64.as_bytes())
            .map_err(|_| IdParseError::Unparseable)?;
        if bytes.len() != 8 {
            return Err(IdParseError::Unparseable);
        }
        let mut buf = [0u8; 8];
        buf.copy_from_slice(&bytes);
        Ok(Id {
            val: u64::from_be_bytes(buf),
            phantom: PhantomData,
        })
    }
}

impl<T> Default for Id<T> {
    fn default() -> Self {
        Id {
            val: 0,
            phantom: PhantomData,
        }
    }
}

impl<T> PartialEq for Id<T> {
    fn eq(&self, other: &Self) -> bool {
        self.val == other.val
    }
}

impl<T> Eq for Id<T> {}

impl<T> PartialOrd for Id<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T> Ord for Id<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.val.cmp(&other.val)
    }
}

impl<T> Clone for Id<T> {
    fn clone(&self) -> Self {
        Id {
            val: self.val,
            phantom: self.phantom,
        }
    }
}

impl<T> Copy for Id<T> {}

impl<T: Entity> Serialize for Id<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de, T: Entity> Deserialize<'de> for Id<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct IdStrVisitor<T>(PhantomData<T>);
        impl<'vi, T: Entity> de::Visitor<'vi> for IdStrVisitor<T> {
            type Value = Id<T>;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                write!(formatter, "an Id string")
            }

            fn visit_str<E: de::Error>(self, value: &str) -> Result<Id<T>, E> {
                value.parse::<Id<T>>().map_err(E::custom)
            }
        }

        deserializer.deserialize_str(IdStrVisitor(PhantomData))
    }
}
