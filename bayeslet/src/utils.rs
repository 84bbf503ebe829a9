use std::borrow::Borrow;
use std::hash::Hash;
use std::mem;
use std::ops::{Deref, DerefMut};

use bincode::{
    de::{BorrowDecoder, Decoder},
    enc::Encoder,
    error::{DecodeError, EncodeError},
    BorrowDecode, Decode, Encode,
};
use hashbrown::HashMap;

#[derive(Clone, Debug, Default, PartialEq)]
pub struct SerializableHashMap<K, V>(pub HashMap<K, V>)
where
    K: Eq + Hash;

impl<K, V> Deref for SerializableHashMap<K, V>
where
    K: Eq + Hash,
{
    type Target = HashMap<K, V>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<K, V> DerefMut for SerializableHashMap<K, V>
where
    K: Eq + Hash,
{
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

// Encoded as the number of entries followed by key-value pairs, the same layout as a `Vec` of
// pairs.
impl<K, V> Decode for SerializableHashMap<K, V>
where
    K: Decode + Eq + Hash,
    V: Decode,
{
    fn decode<D: Decoder>(decoder: &mut D) -> Result<Self, DecodeError> {
        let len = u64::decode(decoder)?;
        let len = usize::try_from(len).map_err(|_| DecodeError::OutsideUsizeRange(len))?;
        decoder.claim_container_read::<(K, V)>(len)?;
        let mut map = HashMap::with_capacity(len);
        for _ in 0..len {
            decoder.unclaim_bytes_read(mem::size_of::<(K, V)>());
            let k = K::decode(decoder)?;
            let v = V::decode(decoder)?;
            map.insert(k, v);
        }
        Ok(Self(map))
    }
}

impl<'de, K, V> BorrowDecode<'de> for SerializableHashMap<K, V>
where
    K: Decode + Eq + Hash,
    V: Decode,
{
    fn borrow_decode<D: BorrowDecoder<'de>>(decoder: &mut D) -> Result<Self, DecodeError> {
        Decode::decode(decoder)
    }
}

impl<K, V> Encode for SerializableHashMap<K, V>
where
    K: Encode + Eq + Hash,
    V: Encode,
{
    fn encode<E: Encoder>(&self, encoder: &mut E) -> Result<(), EncodeError> {
        Encode::encode(&(self.0.len() as u64), encoder)?;
        for (k, v) in self.0.iter() {
            Encode::encode(k, encoder)?;
            Encode::encode(v, encoder)?;
        }
        Ok(())
    }
}

/// Assigns consecutive IDs to keys in order of first appearance.
pub struct Indexer<K> {
    ids: HashMap<K, usize>,
    keys: Vec<K>,
}

impl<K> Indexer<K>
where
    K: Clone + Eq + Hash,
{
    pub fn new() -> Self {
        Self {
            ids: HashMap::new(),
            keys: vec![],
        }
    }

    pub fn get_id<Q>(&mut self, key: &Q) -> usize
    where
        K: Borrow<Q>,
        Q: ?Sized + ToOwned<Owned = K> + Eq + Hash,
    {
        if let Some(&id) = self.ids.get(key) {
            id
        } else {
            let id = self.keys.len();
            self.keys.push(key.to_owned());
            self.ids.insert(key.to_owned(), id);
            id
        }
    }

    pub fn into_keys(self) -> Vec<K> {
        self.keys
    }
}
