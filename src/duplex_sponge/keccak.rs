//! Keccak-based duplex sponge implementation
//!
//! This module implements a duplex sponge construction directly over the
//! Keccak-f\[1600\] permutation. The identifier is written into the capacity part
//! of the state, so protocols with different identifiers never share a sponge state.

use crate::duplex_sponge::DuplexSpongeInterface;
use zerocopy::IntoBytes;

const RATE: usize = 136;
const WIDTH_WORDS: usize = 25;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Phase {
    Absorbing,
    Squeezing,
}

/// Duplex sponge construction using Keccak-f\[1600\].
///
/// Input overwrites the rate part of the state; the state is permuted whenever the
/// rate is exhausted or when switching from absorbing to squeezing.
#[derive(Clone)]
pub struct KeccakDuplexSponge {
    state: [u64; WIDTH_WORDS],
    phase: Phase,
    position: usize,
}

impl KeccakDuplexSponge {
    fn bytes_mut(&mut self) -> &mut [u8] {
        self.state.as_mut_bytes()
    }

    fn permute(&mut self) {
        keccak::f1600(&mut self.state);
        self.position = 0;
    }
}

impl DuplexSpongeInterface for KeccakDuplexSponge {
    fn new(iv: [u8; 32]) -> Self {
        let mut sponge = Self {
            state: [0u64; WIDTH_WORDS],
            phase: Phase::Absorbing,
            position: 0,
        };
        sponge.bytes_mut()[RATE..RATE + iv.len()].copy_from_slice(&iv);
        sponge
    }

    fn absorb(&mut self, mut input: &[u8]) {
        if self.phase == Phase::Squeezing {
            self.phase = Phase::Absorbing;
            self.position = 0;
        }
        while !input.is_empty() {
            if self.position == RATE {
                self.permute();
            }
            let take = usize::min(RATE - self.position, input.len());
            let start = self.position;
            self.bytes_mut()[start..start + take].copy_from_slice(&input[..take]);
            self.position += take;
            input = &input[take..];
        }
    }

    fn squeeze(&mut self, length: usize) -> Vec<u8> {
        if self.phase == Phase::Absorbing {
            self.phase = Phase::Squeezing;
            self.position = RATE;
        }
        let mut output = Vec::with_capacity(length);
        while output.len() < length {
            if self.position == RATE {
                self.permute();
            }
            let take = usize::min(RATE - self.position, length - output.len());
            output.extend_from_slice(&self.state.as_bytes()[self.position..self.position + take]);
            self.position += take;
        }
        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absorb_is_associative() {
        let tag = *b"absorb-associativity-domain-----";

        let mut sponge1 = KeccakDuplexSponge::new(tag);
        sponge1.absorb(b"hello world");
        let out1 = sponge1.squeeze(32);

        let mut sponge2 = KeccakDuplexSponge::new(tag);
        sponge2.absorb(b"hello");
        sponge2.absorb(b" world");
        let out2 = sponge2.squeeze(32);

        assert_eq!(out1, out2);
    }

    #[test]
    fn long_inputs_cross_the_rate() {
        let tag = [7u8; 32];
        let input = vec![0x5a; 3 * RATE + 11];

        let mut sponge1 = KeccakDuplexSponge::new(tag);
        sponge1.absorb(&input);
        let out1 = sponge1.squeeze(RATE + 5);

        let mut sponge2 = KeccakDuplexSponge::new(tag);
        for chunk in input.chunks(50) {
            sponge2.absorb(chunk);
        }
        let mut out2 = sponge2.squeeze(RATE);
        out2.extend(sponge2.squeeze(5));

        assert_eq!(out1, out2);
    }

    #[test]
    fn identifier_separates_domains() {
        let mut one = KeccakDuplexSponge::new([1u8; 32]);
        let mut two = KeccakDuplexSponge::new([2u8; 32]);
        one.absorb(b"x");
        two.absorb(b"x");
        assert_ne!(one.squeeze(32), two.squeeze(32));
    }
}
