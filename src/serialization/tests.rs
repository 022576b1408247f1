extern crate rand;

use super::*;
use self::rand::Rng;

#[test]
fn zig_zag_encode_0() {
    assert_eq!(0, zig_zag_encode(0));
}

#[test]
fn zig_zag_encode_neg_1() {
    assert_eq!(1, zig_zag_encode(-1));
}

#[test]
fn zig_zag_encode_1() {
    assert_eq!(2, zig_zag_encode(1));
}

#[test]
fn zig_zag_encode_i64_max() {
    assert_eq!(u64::max_value() - 1, zig_zag_encode(i64::max_value()));
}

#[test]
fn zig_zag_encode_i64_min() {
    assert_eq!(u64::max_value(), zig_zag_encode(i64::min_value()));
}

#[test]
fn zig_zag_decode_i64_min() {
    assert_eq!(i64::min_value(), zig_zag_decode(u64::max_value()))
}

#[test]
fn zig_zag_decode_i64_max() {
    assert_eq!(i64::max_value(), zig_zag_decode(u64::max_value() - 1))
}

#[test]
fn zig_zag_roundtrip_random() {
    let mut rng = rand::thread_rng();

    for _ in 0..1_000_000{
        let r = rng.gen::<i64>();
        let encoded = zig_zag_encode(r);
        let decoded = zig_zag_decode(encoded);

        assert_eq!(r, decoded);
    }
}

#[test]
fn deserialize_roundtrips_compressed_histogram() {
    let mut h = crate::Histogram::<u64>::new_with_bounds(1, u64::max_value(), 3).unwrap();
    h.record(1).unwrap();
    h.record(1_000_000).unwrap();
    h.record_n(42, 7).unwrap();

    let mut buf = Vec::new();
    V2DeflateSerializer::new().serialize(&h, &mut buf).unwrap();

    let deser_h: crate::Histogram<u64> = Deserializer::new()
        .deserialize(&mut std::io::Cursor::new(&buf))
        .unwrap();

    assert_eq!(h, deser_h);
}

#[test]
fn deserialize_rejects_zero_run_overrunning_counts_len() {
    // cookie, payload_len, normalizing_offset, num_digits, low, high, int_double_ratio
    let mut buf = Vec::new();
    buf.extend_from_slice(&V2_COOKIE.to_be_bytes());

    let h = crate::Histogram::<u64>::new_with_bounds(1, 2, 0).unwrap();
    let counts_len = h.distinct_values() as i64;

    // a single zero-run token that skips far past the end of the counts array
    let overrun = zig_zag_encode(-(counts_len + 1_000));
    let mut payload = Vec::new();
    let mut varint_buf = overrun;
    loop {
        let mut b = (varint_buf & 0x7F) as u8;
        varint_buf >>= 7;
        if varint_buf != 0 {
            b |= 0x80;
        }
        payload.push(b);
        if varint_buf == 0 {
            break;
        }
    }

    buf.extend_from_slice(&(payload.len() as u32).to_be_bytes());
    buf.extend_from_slice(&0_u32.to_be_bytes());
    buf.extend_from_slice(&0_u32.to_be_bytes());
    buf.extend_from_slice(&1_u64.to_be_bytes());
    buf.extend_from_slice(&2_u64.to_be_bytes());
    buf.extend_from_slice(&1.0_f64.to_be_bytes());
    buf.extend_from_slice(&payload);

    let result: Result<crate::Histogram<u64>, DeserializeError> =
        Deserializer::new().deserialize(&mut std::io::Cursor::new(&buf));

    assert_eq!(Err(DeserializeError::EncodedArrayTooLong), result);
}
