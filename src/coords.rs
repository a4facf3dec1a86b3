//! Packing and unpacking of coordinate arrays.
//!
//! Output is always little-endian. Input follows whatever byte order the
//! enclosing WKB record declared, passed in as `T: ByteOrder`.

use byteorder::ByteOrder;

use crate::dimension::Coordinate;
use crate::reader::WkbReader;
use crate::result::Result;

pub(crate) const COUNT_LEN: usize = 4;
/// byte order marker + type code
pub(crate) const PREFIX_LEN: usize = 5;
pub(crate) const BIG_ENDIAN: u8 = 0;
pub(crate) const LITTLE_ENDIAN: u8 = 1;

pub(crate) fn write_prefix(out: &mut Vec<u8>, type_code: u32) {
    out.push(LITTLE_ENDIAN);
    out.extend_from_slice(&type_code.to_le_bytes());
}

/// WKB count fields are u32, so a collection can hold at most `u32::MAX`
/// items. Larger ones are a caller bug: debug builds panic, release builds
/// saturate the count.
fn write_count(out: &mut Vec<u8>, count: usize) {
    debug_assert!(
        u32::try_from(count).is_ok(),
        "{count} items do not fit a WKB count"
    );
    let count = u32::try_from(count).unwrap_or(u32::MAX);
    out.extend_from_slice(&count.to_le_bytes());
}

pub(crate) fn write_coord<C: Coordinate>(out: &mut Vec<u8>, coord: &C) {
    for v in coord.ordinates() {
        out.extend_from_slice(&v.to_le_bytes());
    }
}

/// count, then the bare tuples
pub(crate) fn pack_flat<C: Coordinate>(coords: &[C], out: &mut Vec<u8>) {
    pack_points(coords, None, out)
}

/// count, then the tuples; with a `subheader` type code every tuple becomes a
/// complete WKB point record of its own
pub(crate) fn pack_points<C: Coordinate>(coords: &[C], subheader: Option<u32>, out: &mut Vec<u8>) {
    out.reserve(COUNT_LEN + coords.len() * (PREFIX_LEN + C::STRIDE * 8));
    write_count(out, coords.len());
    for coord in coords {
        if let Some(type_code) = subheader {
            write_prefix(out, type_code);
        }
        write_coord(out, coord);
    }
}

/// count, then whatever each child writes for itself
pub(crate) fn pack_nested<G>(
    children: &[G],
    out: &mut Vec<u8>,
    mut write_child: impl FnMut(&G, &mut Vec<u8>),
) {
    write_count(out, children.len());
    for child in children {
        write_child(child, out);
    }
}

/// Reads a single bare tuple
pub(crate) fn unpack_coord<T: ByteOrder, C: Coordinate>(r: &mut WkbReader<'_>) -> Result<C> {
    let bytes = r.take(C::STRIDE * 8)?;
    let mut ordinates = [0.0; 4];
    let ordinates = &mut ordinates[..C::STRIDE];
    T::read_f64_into(bytes, ordinates);
    Ok(C::from_ordinates(ordinates))
}

/// Reads `count` bare tuples; the count itself was consumed by the caller
pub(crate) fn unpack_coords<T: ByteOrder, C: Coordinate>(
    r: &mut WkbReader<'_>,
    count: usize,
) -> Result<Vec<C>> {
    let bytes = r.take(count.saturating_mul(C::STRIDE * 8))?;
    let mut ordinates = vec![0.0; count * C::STRIDE];
    T::read_f64_into(bytes, &mut ordinates);
    Ok(ordinates
        .chunks_exact(C::STRIDE)
        .map(C::from_ordinates)
        .collect())
}

pub(crate) fn unpack_flat<T: ByteOrder, C: Coordinate>(r: &mut WkbReader<'_>) -> Result<Vec<C>> {
    let count = r.read_count::<T>(C::STRIDE * 8)?;
    unpack_coords::<T, C>(r, count)
}

/// Reads a count and then that many children. Each child advances the shared
/// cursor by exactly the bytes it consumed, which is how variable-length
/// children are located one after another.
pub(crate) fn unpack_nested<'a, T: ByteOrder, G>(
    r: &mut WkbReader<'a>,
    min_child_len: usize,
    mut read_child: impl FnMut(&mut WkbReader<'a>) -> Result<G>,
) -> Result<Vec<G>> {
    let count = r.read_count::<T>(min_child_len)?;
    let mut children = Vec::with_capacity(count);
    for _ in 0..count {
        children.push(read_child(r)?);
    }
    Ok(children)
}
