use std::{fmt, marker::PhantomData, mem::size_of};

use log::debug;
use serde::{
    de::{self, IgnoredAny, SeqAccess, Visitor},
    Deserialize, Deserializer, Serialize, Serializer,
};

use crate::{errors::IndexerError, InlineStorage};

/// Reads a storage block from its raw byte image. The input need not be aligned.
pub(crate) fn read_storage<S: InlineStorage>(bytes: &[u8]) -> crate::Result<S> {
    bytemuck::try_pod_read_unaligned(bytes).map_err(|_| {
        debug!(
            "byte image of {} bytes does not match storage of {} bytes",
            bytes.len(),
            size_of::<S>()
        );
        IndexerError::ByteLength {
            expected: size_of::<S>(),
            actual: bytes.len(),
        }
    })
}

/// Storage is serialized as a flat sequence in layout order.
pub(crate) fn serialize_storage<S, Ser>(
    storage: &S,
    serializer: Ser,
) -> Result<Ser::Ok, Ser::Error>
where
    S: InlineStorage,
    S::Element: Serialize,
    Ser: Serializer,
{
    serializer.collect_seq(storage.as_slice())
}

pub(crate) fn deserialize_storage<'de, S, D>(deserializer: D) -> Result<S, D::Error>
where
    S: InlineStorage,
    S::Element: Deserialize<'de>,
    D: Deserializer<'de>,
{
    deserializer.deserialize_seq(StorageVisitor(PhantomData))
}

struct StorageVisitor<S>(PhantomData<S>);

impl<'de, S> Visitor<'de> for StorageVisitor<S>
where
    S: InlineStorage,
    S::Element: Deserialize<'de>,
{
    type Value = S;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "a sequence of exactly {} elements", S::LEN)
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<S, A::Error> {
        let mut storage = S::zeroed();
        for (idx, slot) in storage.as_mut_slice().iter_mut().enumerate() {
            *slot = seq
                .next_element()?
                .ok_or_else(|| de::Error::invalid_length(idx, &self))?;
        }
        if seq.next_element::<IgnoredAny>()?.is_some() {
            return Err(de::Error::invalid_length(S::LEN + 1, &self));
        }
        Ok(storage)
    }
}
