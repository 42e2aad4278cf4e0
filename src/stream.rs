// Streaming Morse decoder.
//
// MorseDecoder drives the byte-level Decoder over any `Read` source:
//   - Input is read in fixed-size chunks and decoded in place per chunk
//   - The path code carries across chunk boundaries
//   - Output goes to any `Write` sink as each chunk completes

use std::io::{ErrorKind, Read, Write};

use crate::decoder::{DecodeError, DecodeOptions, Decoder};

/// Size of the reusable input chunk.
pub const CHUNK_SIZE: usize = 64 * 1024;

/// Streaming decoder with progress tracking.
///
/// Produces exactly the bytes [`crate::decoder::decode_with`] would produce
/// for the concatenated input, with only one chunk in memory at a time.
pub struct MorseDecoder<R: Read> {
    reader: R,
    decoder: Decoder,
    bytes_written: u64,
    chunks: u64,
    /// Reusable chunk buffer, decoded in place.
    chunk: Vec<u8>,
}

impl<R: Read> MorseDecoder<R> {
    pub fn new(reader: R) -> Self {
        Self::with_options(reader, DecodeOptions::default())
    }

    pub fn with_options(reader: R, options: DecodeOptions) -> Self {
        Self {
            reader,
            decoder: Decoder::with_options(options),
            bytes_written: 0,
            chunks: 0,
            chunk: vec![0; CHUNK_SIZE],
        }
    }

    /// Decode the whole input, writing output to `writer`.
    ///
    /// Returns the total number of bytes written.
    pub fn decode_to<W: Write>(&mut self, writer: &mut W) -> Result<u64, DecodeError> {
        while self.decode_chunk_to(writer)?.is_some() {}
        Ok(self.bytes_written)
    }

    /// Decode one chunk of input.
    ///
    /// Returns `Ok(None)` once the input is exhausted and the trailing run
    /// has been handled.
    pub fn decode_chunk_to<W: Write>(
        &mut self,
        writer: &mut W,
    ) -> Result<Option<usize>, DecodeError> {
        let n = loop {
            match self.reader.read(&mut self.chunk) {
                Ok(n) => break n,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            }
        };

        if n == 0 {
            if let Some(out) = self.decoder.finish()? {
                writer.write_all(&[out])?;
                self.bytes_written += 1;
            }
            return Ok(None);
        }

        let mut write = 0;
        for read in 0..n {
            if let Some(out) = self.decoder.push(self.chunk[read])? {
                self.chunk[write] = out;
                write += 1;
            }
        }
        writer.write_all(&self.chunk[..write])?;

        self.bytes_written += write as u64;
        self.chunks += 1;
        log::trace!("chunk {}: {n} bytes in, {write} bytes out", self.chunks);
        Ok(Some(write))
    }

    /// Input bytes consumed so far.
    pub fn bytes_read(&self) -> u64 {
        self.decoder.bytes_consumed()
    }

    /// Decoded bytes written so far.
    pub fn bytes_written(&self) -> u64 {
        self.bytes_written
    }

    /// Non-empty chunks read so far.
    pub fn chunks_read(&self) -> u64 {
        self.chunks
    }

    pub fn into_inner(self) -> R {
        self.reader
    }
}
