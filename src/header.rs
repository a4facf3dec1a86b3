//! The GeoPackage geometry blob header, see the
//! [specification](https://www.geopackage.org/spec130/#gpb_format)
//!
//! ```text
//! magic "GP" (2) | version (1) | flags (1) | srs_id (4) | envelope (0/32/48/64)
//! ```

use std::collections::{BTreeMap, HashMap};
use std::hash::Hash;
use std::sync::Mutex;

use byteorder::{BigEndian, ByteOrder, LittleEndian};
use lazy_static::lazy_static;

use crate::reader::WkbReader;
use crate::result::{Error, Result};

/// magic number that is GP in ASCII
pub const GP_MAGIC: [u8; 2] = [0x47, 0x50];
/// version number, 0 means version 1
pub const GP_VERSION: u8 = 0;
pub const HEADER_LEN: usize = 8;

const HEADER_CACHE_CAPACITY: usize = 256;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnvelopeType {
    Missing,
    XY,
    XYZ,
    XYM,
    XYZM,
}

impl EnvelopeType {
    fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(EnvelopeType::Missing),
            1 => Some(EnvelopeType::XY),
            2 => Some(EnvelopeType::XYZ),
            3 => Some(EnvelopeType::XYM),
            4 => Some(EnvelopeType::XYZM),
            _ => None,
        }
    }

    fn code(self) -> u8 {
        match self {
            EnvelopeType::Missing => 0,
            EnvelopeType::XY => 1,
            EnvelopeType::XYZ => 2,
            EnvelopeType::XYM => 3,
            EnvelopeType::XYZM => 4,
        }
    }

    /// Size in bytes of the envelope that follows the fixed header
    pub fn size(self) -> usize {
        match self {
            EnvelopeType::Missing => 0,
            EnvelopeType::XY => 32,
            EnvelopeType::XYZ | EnvelopeType::XYM => 48,
            EnvelopeType::XYZM => 64,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GeometryFlags {
    pub extended: bool,
    pub empty_geom: bool,
    pub little_endian: bool,
    pub envelope: EnvelopeType,
}

impl GeometryFlags {
    // https://www.geopackage.org/spec130/#flags_layout
    fn from_byte(b: u8) -> Result<Self> {
        if b >> 6 != 0 {
            return Err(Error::malformed_header(
                3,
                format!("reserved flag bits set in {b:#010b}"),
            ));
        }
        let extended = ((b >> 5) & 1) > 0;
        if extended {
            return Err(Error::malformed_header(
                3,
                "extended geometry types are not supported",
            ));
        }
        let empty_geom = ((b >> 4) & 1) > 0;
        let little_endian = (b & 1) > 0;
        let code = (b >> 1) & 0b111;
        let envelope = EnvelopeType::from_code(code).ok_or_else(|| {
            Error::malformed_header(3, format!("invalid envelope contents indicator {code}"))
        })?;
        Ok(GeometryFlags {
            extended,
            empty_geom,
            little_endian,
            envelope,
        })
    }

    fn to_byte(self) -> u8 {
        let mut flags = 0u8;
        flags |= (self.extended as u8) << 5;
        flags |= (self.empty_geom as u8) << 4;
        flags |= self.envelope.code() << 1;
        flags |= self.little_endian as u8;

        flags
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GeoPackageHeader {
    pub version: u8,
    pub flags: GeometryFlags,
    pub srs_id: i32,
}

impl GeoPackageHeader {
    /// The header this crate writes: little-endian, no envelope
    pub fn new(srs_id: i32, is_empty: bool) -> Self {
        GeoPackageHeader {
            version: GP_VERSION,
            flags: GeometryFlags {
                extended: false,
                empty_geom: is_empty,
                little_endian: true,
                envelope: EnvelopeType::Missing,
            },
            srs_id,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.flags.empty_geom
    }

    /// Where the WKB body starts, counted from the start of the blob
    pub fn body_offset(&self) -> usize {
        HEADER_LEN + self.flags.envelope.size()
    }

    pub fn to_bytes(&self) -> [u8; HEADER_LEN] {
        let mut header = [0u8; HEADER_LEN];
        header[..2].copy_from_slice(&GP_MAGIC);
        header[2] = self.version;
        header[3] = self.flags.to_byte();
        if self.flags.little_endian {
            LittleEndian::write_i32(&mut header[4..], self.srs_id);
        } else {
            BigEndian::write_i32(&mut header[4..], self.srs_id);
        }
        header
    }

    /// Parses the fixed 8 bytes at the start of `bytes`; the envelope is not
    /// inspected here, see [`split_blob`]
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let mut rdr = WkbReader::new(bytes);
        let magic = rdr.take(2)?;
        if magic != GP_MAGIC {
            return Err(Error::malformed_header(
                0,
                format!("expected magic \"GP\", found {magic:02x?}"),
            ));
        }
        let version = rdr.read_u8()?;
        if version != GP_VERSION {
            return Err(Error::malformed_header(
                2,
                format!("unsupported version {version}"),
            ));
        }
        let flags = GeometryFlags::from_byte(rdr.read_u8()?)?;
        let srs_id = match flags.little_endian {
            true => rdr.read_i32::<LittleEndian>()?,
            false => rdr.read_i32::<BigEndian>()?,
        };
        Ok(GeoPackageHeader {
            version,
            flags,
            srs_id,
        })
    }
}

/// A small least-recently-used map. Every entry is stamped with the tick of
/// its last use, and `order` maps ticks back to keys, so refreshing and
/// evicting are both logarithmic.
pub(crate) struct BoundedCache<K, V> {
    capacity: usize,
    tick: u64,
    entries: HashMap<K, (V, u64)>,
    order: BTreeMap<u64, K>,
}

impl<K: Hash + Eq + Clone, V: Clone> BoundedCache<K, V> {
    pub(crate) fn new(capacity: usize) -> Self {
        BoundedCache {
            capacity,
            tick: 0,
            entries: HashMap::with_capacity(capacity),
            order: BTreeMap::new(),
        }
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    fn next_tick(&mut self) -> u64 {
        self.tick += 1;
        self.tick
    }

    pub(crate) fn get(&mut self, key: &K) -> Option<V> {
        let tick = self.next_tick();
        let (value, last_used) = self.entries.get_mut(key)?;
        let stale = std::mem::replace(last_used, tick);
        let value = value.clone();
        if let Some(k) = self.order.remove(&stale) {
            self.order.insert(tick, k);
        }
        Some(value)
    }

    pub(crate) fn insert(&mut self, key: K, value: V) {
        if self.capacity == 0 {
            return;
        }
        let tick = self.next_tick();
        if let Some((_, stale)) = self.entries.insert(key.clone(), (value, tick)) {
            self.order.remove(&stale);
        }
        self.order.insert(tick, key);
        while self.entries.len() > self.capacity {
            match self.order.pop_first() {
                Some((_, oldest)) => {
                    self.entries.remove(&oldest);
                }
                None => break,
            }
        }
    }
}

lazy_static! {
    static ref ENCODED_HEADERS: Mutex<BoundedCache<(i32, bool), [u8; HEADER_LEN]>> =
        Mutex::new(BoundedCache::new(HEADER_CACHE_CAPACITY));
    static ref DECODED_HEADERS: Mutex<BoundedCache<[u8; HEADER_LEN], GeoPackageHeader>> =
        Mutex::new(BoundedCache::new(HEADER_CACHE_CAPACITY));
}

/// Header bytes for `(srs_id, is_empty)`, memoized
pub(crate) fn make_header(srs_id: i32, is_empty: bool) -> [u8; HEADER_LEN] {
    let key = (srs_id, is_empty);
    // a poisoned cache only costs us the memoization
    if let Ok(mut cache) = ENCODED_HEADERS.lock() {
        if let Some(header) = cache.get(&key) {
            return header;
        }
        let header = GeoPackageHeader::new(srs_id, is_empty).to_bytes();
        cache.insert(key, header);
        return header;
    }
    GeoPackageHeader::new(srs_id, is_empty).to_bytes()
}

/// Parses the fixed header of a blob, memoized on its literal bytes
pub(crate) fn unpack_header(bytes: &[u8]) -> Result<GeoPackageHeader> {
    let key: [u8; HEADER_LEN] = match bytes.get(..HEADER_LEN) {
        Some(fixed) => {
            let mut key = [0u8; HEADER_LEN];
            key.copy_from_slice(fixed);
            key
        }
        // let the parser report exactly where the blob ran out
        None => return GeoPackageHeader::from_bytes(bytes),
    };
    if let Some(header) = DECODED_HEADERS.lock().ok().and_then(|mut c| c.get(&key)) {
        return Ok(header);
    }
    let header = GeoPackageHeader::from_bytes(&key)?;
    if let Ok(mut cache) = DECODED_HEADERS.lock() {
        cache.insert(key, header);
    }
    Ok(header)
}

/// Splits a GeoPackage blob into its header and WKB body, skipping any
/// envelope. The returned offset is where the body starts in `blob`.
pub fn split_blob(blob: &[u8]) -> Result<(GeoPackageHeader, &[u8], usize)> {
    let header = unpack_header(blob)?;
    let offset = header.body_offset();
    let mut rdr = WkbReader::new(blob);
    rdr.take(offset)?;
    Ok((header, &blob[offset..], offset))
}
