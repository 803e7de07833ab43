//! Growable output buffer for streamed decode
//!
//! Capacity starts at a fixed size and doubles whenever an append would
//! overflow it. Growth uses fallible reservation, so running out of memory
//! is reported as `NotEnoughMemory` instead of aborting the process.

use crate::error::Result;
use crate::types::{Sample, Signal};

/// Accumulates converted samples across decoded frames
#[derive(Debug)]
pub struct SampleAccumulator {
    data: Vec<Sample>,
    growths: usize,
}

impl SampleAccumulator {
    /// Allocate the initial capacity up front
    pub fn with_capacity(initial_capacity: usize) -> Result<Self> {
        let mut data = Vec::new();
        data.try_reserve_exact(initial_capacity.max(1))?;
        Ok(Self { data, growths: 0 })
    }

    /// Append samples, doubling capacity until they fit
    pub fn extend(&mut self, samples: &[Sample]) -> Result<()> {
        let needed = self.data.len() + samples.len();
        if needed > self.data.capacity() {
            let mut capacity = self.data.capacity().max(1);
            while capacity < needed {
                capacity *= 2;
                self.growths += 1;
            }
            self.data.try_reserve_exact(capacity - self.data.len())?;
            log::debug!(
                "Sample buffer grown to {} samples ({} growths)",
                capacity,
                self.growths
            );
        }
        self.data.extend_from_slice(samples);
        Ok(())
    }

    /// Drop samples past `len`
    pub fn truncate(&mut self, len: usize) {
        self.data.truncate(len);
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.data.capacity()
    }

    /// Number of doubling events so far
    #[inline]
    pub fn growths(&self) -> usize {
        self.growths
    }

    /// Finish accumulation and stamp the sample rate
    pub fn into_signal(self, sample_rate: u32) -> Result<Signal> {
        Signal::new(self.data, sample_rate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_doubling_growth() {
        let mut acc = SampleAccumulator::with_capacity(1024).unwrap();
        assert!(acc.capacity() >= 1024);

        let chunk: Vec<Sample> = (0..1000).map(|i| i as Sample).collect();
        acc.extend(&chunk).unwrap();
        assert_eq!(acc.growths(), 0);

        // 2000 > 1024 -> one doubling to 2048
        acc.extend(&chunk).unwrap();
        assert_eq!(acc.growths(), 1);
        assert!(acc.capacity() >= 2048);

        // 5000 needs two more doublings (4096, 8192)
        acc.extend(&vec![0.0; 3000]).unwrap();
        assert_eq!(acc.growths(), 3);
        assert_eq!(acc.len(), 5000);
    }

    #[test]
    fn test_order_preserved_across_growth() {
        let mut acc = SampleAccumulator::with_capacity(16).unwrap();
        let mut expected = Vec::new();
        for block in 0..100 {
            let chunk: Vec<Sample> = (0..37).map(|i| (block * 37 + i) as Sample).collect();
            expected.extend_from_slice(&chunk);
            acc.extend(&chunk).unwrap();
        }

        let signal = acc.into_signal(44100).unwrap();
        assert_eq!(signal.samples(), expected.as_slice());
        assert_eq!(signal.sample_rate(), 44100);
    }

    #[test]
    fn test_truncate() {
        let mut acc = SampleAccumulator::with_capacity(8).unwrap();
        acc.extend(&[1.0, 2.0, 3.0, 4.0]).unwrap();
        acc.truncate(2);
        assert_eq!(acc.len(), 2);
        acc.truncate(10);
        assert_eq!(acc.len(), 2);
    }
}
