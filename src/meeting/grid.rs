//! Availability grids sampled on the increment lattice.
//!
//! The validator and finder only ever look at minutes `t + o` where both the
//! start `t` and the offset `o` are multiples of the increment, so each
//! person's coverage can be sampled once per run into two bitsets
//! (available / regular) and every later scan becomes bit tests and ANDs.
//!
//! # Lattice
//!
//! - Start times: `t = k * increment` for every `t < WEEK_MINUTES`.
//! - Offsets: `o = j * increment` for every `o < meeting_length`. A trailing
//!   partial segment of the meeting is not sampled.
//! - Samples: index `i` stands for minute `i * increment`; the lattice runs
//!   past the end of the week by up to one meeting length and is not wrapped.

use crate::models::{Coverage, Person, WEEK_MINUTES};

/// Shape of the sampling lattice for one meeting length and increment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotGeometry {
    meeting_length: u32,
    increment: u32,
    starts: usize,
    offsets: usize,
}

impl SlotGeometry {
    /// Creates the lattice geometry.
    ///
    /// # Panics
    /// Panics if `meeting_length` or `increment` is zero.
    pub fn new(meeting_length: u32, increment: u32) -> Self {
        assert!(increment > 0, "time increment must be positive");
        assert!(meeting_length > 0, "meeting length must be positive");
        Self {
            meeting_length,
            increment,
            starts: WEEK_MINUTES.div_ceil(increment) as usize,
            offsets: meeting_length.div_ceil(increment) as usize,
        }
    }

    /// Meeting length (minutes).
    #[inline]
    pub fn meeting_length(&self) -> u32 {
        self.meeting_length
    }

    /// Increment between candidate start times (minutes).
    #[inline]
    pub fn increment(&self) -> u32 {
        self.increment
    }

    /// Number of candidate start times.
    #[inline]
    pub fn start_count(&self) -> usize {
        self.starts
    }

    /// Number of sampled offsets per meeting.
    #[inline]
    pub fn offset_count(&self) -> usize {
        self.offsets
    }

    /// Number of sample points in the lattice.
    #[inline]
    pub fn sample_count(&self) -> usize {
        self.starts + self.offsets - 1
    }

    /// Minute offset of a sample (or start) index.
    #[inline]
    pub fn minute_at(&self, index: usize) -> u32 {
        index as u32 * self.increment
    }

    /// Start index for a minute that lies on the lattice.
    #[inline]
    pub fn index_of(&self, minute: u32) -> usize {
        (minute / self.increment) as usize
    }
}

/// A fixed-length bitset over lattice samples.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SampleMask {
    words: Vec<u64>,
    len: usize,
}

impl SampleMask {
    /// All bits clear.
    pub fn empty(len: usize) -> Self {
        Self {
            words: vec![0; len.div_ceil(64)],
            len,
        }
    }

    /// All bits set.
    pub fn full(len: usize) -> Self {
        let mut mask = Self {
            words: vec![u64::MAX; len.div_ceil(64)],
            len,
        };
        mask.clear_tail();
        mask
    }

    fn clear_tail(&mut self) {
        let rem = self.len % 64;
        if rem != 0 {
            if let Some(last) = self.words.last_mut() {
                *last &= (1u64 << rem) - 1;
            }
        }
    }

    /// Number of samples.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the mask has zero length.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Reads a bit.
    #[inline]
    pub fn get(&self, index: usize) -> bool {
        index < self.len && self.words[index / 64] & (1u64 << (index % 64)) != 0
    }

    /// Sets a bit.
    #[inline]
    pub fn set(&mut self, index: usize) {
        self.words[index / 64] |= 1u64 << (index % 64);
    }

    /// In-place intersection.
    pub fn and_with(&mut self, other: &SampleMask) {
        for (w, o) in self.words.iter_mut().zip(&other.words) {
            *w &= o;
        }
    }

    /// Whether every bit in `[from, from + count)` is set.
    pub fn all_set(&self, from: usize, count: usize) -> bool {
        (from..from + count).all(|i| self.get(i))
    }

    /// First start index `< start_limit` opening a run of at least `run` set bits.
    pub fn first_run(&self, run: usize, start_limit: usize) -> Option<usize> {
        let mut length = 0;
        for i in 0..self.len {
            if self.get(i) {
                length += 1;
                if length >= run {
                    let start = i + 1 - run;
                    return (start < start_limit).then_some(start);
                }
            } else {
                length = 0;
            }
        }
        None
    }
}

/// One person's coverage sampled over a [`SlotGeometry`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AvailabilityGrid {
    available: SampleMask,
    regular: SampleMask,
}

impl AvailabilityGrid {
    /// Samples a person's coverage at every lattice point.
    pub fn build(person: &Person, geometry: &SlotGeometry, use_if_needed: bool) -> Self {
        let len = geometry.sample_count();
        let mut available = SampleMask::empty(len);
        let mut regular = SampleMask::empty(len);

        for i in 0..len {
            match person.coverage_at(geometry.minute_at(i), use_if_needed) {
                Coverage::Regular => {
                    available.set(i);
                    regular.set(i);
                }
                Coverage::IfNeeded => available.set(i),
                Coverage::Unavailable => {}
            }
        }

        Self { available, regular }
    }

    /// Coverage at a sample index.
    #[inline]
    pub fn coverage(&self, index: usize) -> Coverage {
        if self.regular.get(index) {
            Coverage::Regular
        } else if self.available.get(index) {
            Coverage::IfNeeded
        } else {
            Coverage::Unavailable
        }
    }

    /// Samples where the person can attend at all.
    #[inline]
    pub fn available(&self) -> &SampleMask {
        &self.available
    }

    /// Whether regular availability alone covers every sampled offset of
    /// the meeting starting at `start_index`.
    pub fn regular_covers(&self, start_index: usize, geometry: &SlotGeometry) -> bool {
        self.regular.all_set(start_index, geometry.offset_count())
    }
}
