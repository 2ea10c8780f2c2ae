//! Outbound byte queue shared by the plaintext and Noise frame helpers.
//!
//! A non-blocking socket write can accept fewer bytes than requested; the
//! queue tracks an offset into the head buffer so a partial write resumes
//! exactly where it left off on the next flush attempt.

use std::collections::VecDeque;
use std::io::Write;

use crate::error::{FrameError, Result};

#[derive(Debug, Default)]
pub struct TxQueue {
    buffers: VecDeque<Vec<u8>>,
    head_offset: usize,
}

impl TxQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a fully-formed buffer to the tail of the queue.
    pub fn push(&mut self, buf: Vec<u8>) {
        if !buf.is_empty() {
            self.buffers.push_back(buf);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.buffers.is_empty()
    }

    /// Attempts to drain the queue into `writer`. Stops at the first
    /// would-block or short write. Returns `Ok(())` whether or not the
    /// queue fully drained; callers check [`TxQueue::is_empty`] afterward.
    pub fn flush(&mut self, writer: &mut impl Write) -> Result<()> {
        while let Some(front) = self.buffers.front() {
            match writer.write(&front[self.head_offset..]) {
                Ok(0) => return Err(FrameError::ConnectionClosed),
                Ok(n) => {
                    self.head_offset += n;
                    if self.head_offset >= front.len() {
                        self.buffers.pop_front();
                        self.head_offset = 0;
                    } else {
                        return Ok(());
                    }
                }
                Err(err) => {
                    let frame_err: FrameError = err.into();
                    if frame_err.is_would_block() {
                        return Ok(());
                    }
                    return Err(frame_err);
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct ChunkedWriter {
        written: Vec<u8>,
        accept: usize,
    }

    impl Write for ChunkedWriter {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            let n = buf.len().min(self.accept);
            self.written.extend_from_slice(&buf[..n]);
            Ok(n)
        }
        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn partial_write_resumes_at_offset() {
        let mut queue = TxQueue::new();
        queue.push(vec![1, 2, 3, 4, 5]);
        let mut writer = ChunkedWriter {
            written: Vec::new(),
            accept: 2,
        };
        queue.flush(&mut writer).unwrap();
        assert!(!queue.is_empty());
        queue.flush(&mut writer).unwrap();
        queue.flush(&mut writer).unwrap();
        assert!(queue.is_empty());
        assert_eq!(writer.written, vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn would_block_is_not_an_error() {
        struct BlockingWriter;
        impl Write for BlockingWriter {
            fn write(&mut self, _buf: &[u8]) -> std::io::Result<usize> {
                Err(std::io::Error::from(std::io::ErrorKind::WouldBlock))
            }
            fn flush(&mut self) -> std::io::Result<()> {
                Ok(())
            }
        }
        let mut queue = TxQueue::new();
        queue.push(vec![1, 2, 3]);
        let mut writer = BlockingWriter;
        assert!(queue.flush(&mut writer).is_ok());
        assert!(!queue.is_empty());
    }
}
