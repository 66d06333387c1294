//! Lock-free single-producer/single-consumer output ring.
//!
//! Decouples the generation thread (producer) from whatever drains samples
//! for playback (consumer). Writes and reads are wait-free per sample; the
//! two halves are never serialized with the engine's voice lock.

use rtrb::RingBuffer;

/// Creates the two halves of an output ring holding `capacity` samples.
pub fn ring(capacity: usize) -> (OutputBuffer, OutputTap) {
    let (producer, consumer) = RingBuffer::new(capacity);
    (
        OutputBuffer {
            producer,
            dropped: 0,
        },
        OutputTap { consumer },
    )
}

/// Producer half, owned by the generation thread.
pub struct OutputBuffer {
    producer: rtrb::Producer<f32>,
    dropped: u64,
}

impl OutputBuffer {
    /// Pushes one sample. If the consumer has fallen a full ring behind, the
    /// sample is dropped and counted rather than blocking the cycle.
    pub fn push(&mut self, sample: f32) {
        if self.producer.push(sample).is_err() {
            if self.dropped == 0 {
                log::warn!("output ring full; dropping samples");
            }
            self.dropped += 1;
        }
    }

    /// Samples dropped so far because the ring was full.
    pub fn dropped(&self) -> u64 {
        self.dropped
    }
}

/// Consumer half, handed to the playback drain.
pub struct OutputTap {
    consumer: rtrb::Consumer<f32>,
}

impl OutputTap {
    pub fn pop(&mut self) -> Option<f32> {
        self.consumer.pop().ok()
    }

    /// Fills `out` from the ring, zero-filling the tail on underrun.
    /// Returns how many samples actually came from the ring.
    pub fn fill(&mut self, out: &mut [f32]) -> usize {
        let mut filled = 0;
        for slot in out.iter_mut() {
            match self.consumer.pop() {
                Ok(sample) => {
                    *slot = sample;
                    filled += 1;
                }
                Err(_) => *slot = 0.0,
            }
        }
        filled
    }

    /// Samples currently waiting in the ring.
    pub fn len(&self) -> usize {
        self.consumer.slots()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn samples_come_out_in_order() {
        let (mut buffer, mut tap) = ring(8);
        buffer.push(0.1);
        buffer.push(0.2);
        buffer.push(0.3);
        assert_eq!(tap.pop(), Some(0.1));
        assert_eq!(tap.pop(), Some(0.2));
        assert_eq!(tap.pop(), Some(0.3));
        assert_eq!(tap.pop(), None);
    }

    #[test]
    fn full_ring_drops_instead_of_blocking() {
        let (mut buffer, mut tap) = ring(4);
        for i in 0..10 {
            buffer.push(i as f32);
        }
        assert_eq!(buffer.dropped(), 6);
        // The first four made it through untouched.
        assert_eq!(tap.pop(), Some(0.0));
        assert_eq!(tap.pop(), Some(1.0));
    }

    #[test]
    fn fill_zero_pads_on_underrun() {
        let (mut buffer, mut tap) = ring(8);
        buffer.push(0.5);
        let mut out = [1.0_f32; 4];
        let filled = tap.fill(&mut out);
        assert_eq!(filled, 1);
        assert_eq!(out, [0.5, 0.0, 0.0, 0.0]);
    }
}
