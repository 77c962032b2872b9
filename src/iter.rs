use core::iter::FusedIterator;

use crate::decoder::Decoder;
use crate::ZiError;

/// Iterator over the elements of an array.
///
/// Each element is walked once when it is yielded. A malformed element yields `Some(Err(_))`
/// and ends the iteration.
#[derive(Debug, Clone)]
pub struct ArrayIter<'a> {
    cur: Decoder<'a>,
    remaining: usize,
}

impl<'a> ArrayIter<'a> {
    pub(crate) const fn new(first: Decoder<'a>, len: usize) -> Self {
        Self {
            cur: first,
            remaining: len,
        }
    }
}

impl<'a> Iterator for ArrayIter<'a> {
    type Item = Result<Decoder<'a>, ZiError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let item = self.cur;
        match item.next() {
            Ok(after) => {
                self.cur = after;
                self.remaining -= 1;
                Some(Ok(item))
            }
            Err(e) => {
                self.remaining = 0;
                Some(Err(e))
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, Some(self.remaining))
    }
}

impl FusedIterator for ArrayIter<'_> {}

/// Iterator over the `(key, value)` pairs of a map, in wire order.
#[derive(Debug, Clone)]
pub struct MapIter<'a> {
    cur: Decoder<'a>,
    remaining: usize,
}

impl<'a> MapIter<'a> {
    pub(crate) const fn new(first: Decoder<'a>, len: usize) -> Self {
        Self {
            cur: first,
            remaining: len,
        }
    }

    fn step(&mut self) -> Result<(Decoder<'a>, Decoder<'a>), ZiError> {
        let key = self.cur;
        let value = key.next()?;
        self.cur = value.next()?;
        Ok((key, value))
    }
}

impl<'a> Iterator for MapIter<'a> {
    type Item = Result<(Decoder<'a>, Decoder<'a>), ZiError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        match self.step() {
            Ok(pair) => {
                self.remaining -= 1;
                Some(Ok(pair))
            }
            Err(e) => {
                self.remaining = 0;
                Some(Err(e))
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, Some(self.remaining))
    }
}

impl FusedIterator for MapIter<'_> {}
