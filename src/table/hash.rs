use crate::ast::Value;

pub const FNV_OFFSET: u64 = 14695981039346656037;
pub const FNV_PRIME: u64 = 1099511628211;

// Prefixes folded in ahead of non-string payloads, so e.g. `true` and the
// one-byte string "\x01" don't systematically collide.
const TAG_NUMBER: u8 = 1;
const TAG_BOOL: u8 = 2;
const TAG_NIL: u8 = 3;

/// 64-bit FNV-1a, continuing from `hash`.
/// https://en.wikipedia.org/wiki/Fowler–Noll–Vo_hash_function
fn fnv1a(mut hash: u64, bytes: &[u8]) -> u64 {
    for byte in bytes {
        hash ^= *byte as u64;
        hash = hash.wrapping_mul(FNV_PRIME);
    }
    hash
}

/// Hash a key. Strings are plain FNV-1a over their bytes; every other kind
/// hashes a tag byte followed by its payload. Values that are `is`-equal
/// always hash the same.
pub fn hash(value: &Value) -> u64 {
    match value {
        Value::Str(s) => fnv1a(FNV_OFFSET, s.as_bytes()),
        Value::Number(n) => {
            // 0.0 == -0.0, so they need the same bits
            let n = if *n == 0.0 { 0.0 } else { *n };
            fnv1a(fnv1a(FNV_OFFSET, &[TAG_NUMBER]), &n.to_bits().to_le_bytes())
        },
        Value::Bool(b) => fnv1a(FNV_OFFSET, &[TAG_BOOL, *b as u8]),
        Value::Nil => fnv1a(FNV_OFFSET, &[TAG_NIL]),
    }
}

/// The slot a key's probe sequence starts at. `cap` must be a power of two.
pub fn slot_index(value: &Value, cap: usize) -> usize {
    debug_assert!(cap.is_power_of_two());
    (hash(value) & (cap as u64 - 1)) as usize
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fnv1a_reference_values() {
        assert_eq!(hash(&Value::from("")), FNV_OFFSET);
        assert_eq!(hash(&Value::from("a")), 0xaf63dc4c8601ec8c);
        assert_eq!(hash(&Value::from("foobar")), 0x85944171f73967e8);
    }

    #[test]
    fn test_deterministic() {
        let foo = Value::from("foo");
        assert_eq!(hash(&foo), hash(&Value::from("foo")));
        assert_eq!(hash(&foo), hash(&foo));
    }

    #[test]
    fn test_equal_numbers_hash_equal() {
        assert_eq!(hash(&Value::Number(0.0)), hash(&Value::Number(-0.0)));
        assert_ne!(hash(&Value::Number(1.0)), hash(&Value::Number(2.0)));
    }

    #[test]
    fn test_every_kind_hashes() {
        let hashes = [
            hash(&Value::Number(1.0)),
            hash(&Value::Bool(true)),
            hash(&Value::Bool(false)),
            hash(&Value::Nil),
            hash(&Value::from("nil")),
        ];
        for (i, a) in hashes.iter().enumerate() {
            for b in &hashes[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn test_slot_index_in_range() {
        for cap in [16, 32, 1024] {
            for key in ["a", "bb", "ccc", "hello world"] {
                assert!(slot_index(&Value::from(key), cap) < cap);
            }
        }
    }
}
