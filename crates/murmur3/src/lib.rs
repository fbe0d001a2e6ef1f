//! MurmurHash3 x86_32 implementation.
//!
//! Original algorithm by Austin Appleby. All rights to the original belong to the author.
//! The hash is a `const fn`, so field tables can carry precomputed name hashes.
//! Blocks are read little-endian regardless of target, output is stable across platforms.

const C1: u32 = 0xcc9e2d51;
const C2: u32 = 0x1b873593;

/// Compute MurmurHash3 x86_32 over `data` with the given seed.
#[inline]
pub const fn hash32(data: &[u8], seed: u32) -> u32 {
    let len = data.len();
    let nblocks = len / 4;
    let mut h1 = seed;

    // Body - process 4-byte blocks
    let mut i = 0;
    while i < nblocks {
        let offset = i * 4;
        let k1 = u32::from_le_bytes([
            data[offset],
            data[offset + 1],
            data[offset + 2],
            data[offset + 3],
        ]);

        h1 ^= mix_k1(k1);
        h1 = h1.rotate_left(13);
        h1 = h1.wrapping_mul(5).wrapping_add(0xe6546b64);
        i += 1;
    }

    // Tail - fall-through switch emulation
    let tail = nblocks * 4;
    let mut k1: u32 = 0;
    let rem = len & 3;
    if rem >= 3 {
        k1 ^= (data[tail + 2] as u32) << 16;
    }
    if rem >= 2 {
        k1 ^= (data[tail + 1] as u32) << 8;
    }
    if rem >= 1 {
        k1 ^= data[tail] as u32;
        h1 ^= mix_k1(k1);
    }

    // Finalization
    h1 ^= len as u32;
    fmix32(h1)
}

/// Hash a string with seed 0.
#[inline]
pub const fn hash_str(s: &str) -> u32 {
    hash32(s.as_bytes(), 0)
}

#[inline]
const fn mix_k1(k1: u32) -> u32 {
    k1.wrapping_mul(C1).rotate_left(15).wrapping_mul(C2)
}

/// Final avalanche mix for 32-bit values.
#[inline]
const fn fmix32(mut h: u32) -> u32 {
    h ^= h >> 16;
    h = h.wrapping_mul(0x85ebca6b);
    h ^= h >> 13;
    h = h.wrapping_mul(0xc2b2ae35);
    h ^= h >> 16;
    h
}
