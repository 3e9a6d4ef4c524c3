use std::fmt::{self, Debug, Formatter};
use crate::grammar::TermId;

type BitBlock = u64;

const BLOCK_NBITS: usize = std::mem::size_of::<BitBlock>() * 8;

/// A set of terminals of one grammar.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct TokenSet {
  slice: Box<[BitBlock]>,
}

impl TokenSet {
  pub fn new(num_tokens: usize) -> Self {
    let len = (num_tokens + BLOCK_NBITS - 1) / BLOCK_NBITS;
    Self {
      slice: vec![0; len].into_boxed_slice(),
    }
  }

  pub fn from_token(num_tokens: usize, token: TermId) -> Self {
    let mut s = Self::new(num_tokens);
    s.insert(token);
    s
  }

  pub fn clear(&mut self) {
    for x in self.slice.iter_mut() {
      *x = 0;
    }
  }

  /// Returns whether the token was newly inserted.
  pub fn insert(&mut self, token: TermId) -> bool {
    let (block, mask) = locate(token);
    let old = self.slice[block];
    self.slice[block] |= mask;
    old != self.slice[block]
  }

  pub fn contains(&self, token: TermId) -> bool {
    let (block, mask) = locate(token);
    self.slice.get(block).map_or(false, |b| b & mask != 0)
  }

  /// Returns whether the set has changed.
  pub fn union_with(&mut self, other: &TokenSet) -> bool {
    let mut changed = false;
    for i in 0..self.slice.len() {
      let old = self.slice[i];
      self.slice[i] |= other.slice[i];
      changed |= old != self.slice[i];
    }
    changed
  }

  pub fn is_empty(&self) -> bool {
    self.slice.iter().all(|&b| b == 0)
  }

  pub fn is_subset(&self, other: &TokenSet) -> bool {
    self.slice.iter().zip(other.slice.iter()).all(|(a, b)| a & !b == 0)
  }

  pub fn iter(&self) -> Iter {
    Iter {
      slice: &*self.slice,
      bit: 0,
      index: 0,
    }
  }
}

fn locate(token: TermId) -> (usize, BitBlock) {
  let token = token.index();
  (token / BLOCK_NBITS, 1 << (token % BLOCK_NBITS))
}

pub struct Iter<'a> {
  slice: &'a [BitBlock],
  bit: usize,
  index: usize,
}

impl<'a> Iterator for Iter<'a> {
  type Item = TermId;

  fn next(&mut self) -> Option<TermId> {
    while self.index < self.slice.len() {
      if self.bit < BLOCK_NBITS {
        let bit = (self.slice[self.index] & !((1 << self.bit) - 1))
          .trailing_zeros() as usize;
        if bit < BLOCK_NBITS {
          self.bit = bit + 1;
          return Some(TermId((self.index * BLOCK_NBITS + bit) as u32));
        }
      }

      self.index += 1;
      self.bit = 0;
    }
    None
  }
}

impl<'a> IntoIterator for &'a TokenSet {
  type Item = TermId;
  type IntoIter = Iter<'a>;

  fn into_iter(self) -> Iter<'a> {
    self.iter()
  }
}

impl Debug for TokenSet {
  fn fmt(&self, f: &mut Formatter) -> fmt::Result {
    f.debug_set().entries(self.iter().map(|t| t.0)).finish()
  }
}

#[cfg(test)]
mod tests {
  use super::TokenSet;
  use crate::grammar::TermId;
  use pretty_assertions::assert_eq;

  #[test]
  fn insert() {
    let mut set = TokenSet::new(15);

    assert!(set.insert(TermId(7)));
    assert!(set.insert(TermId(3)));
    assert!(!set.insert(TermId(7)));
    assert!(set.insert(TermId(14)));

    let vec = set.iter().map(|t| t.0).collect::<Vec<_>>();

    assert_eq!(vec, vec![3, 7, 14]);
    assert!(set.contains(TermId(14)));
    assert!(!set.contains(TermId(4)));
  }

  #[test]
  fn spans_blocks() {
    let mut set = TokenSet::new(130);
    set.insert(TermId(0));
    set.insert(TermId(63));
    set.insert(TermId(64));
    set.insert(TermId(129));

    let vec = set.iter().map(|t| t.0).collect::<Vec<_>>();

    assert_eq!(vec, vec![0, 63, 64, 129]);
  }

  #[test]
  fn union() {
    let mut a = TokenSet::from_token(10, TermId(1));
    let b = TokenSet::from_token(10, TermId(5));

    assert!(a.union_with(&b));
    assert!(!a.union_with(&b));
    assert!(b.is_subset(&a));
    assert!(!a.is_subset(&b));

    a.clear();
    assert!(a.is_empty());
  }
}
