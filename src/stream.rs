//! # Streaming Transform
//!
//! Chunked front end over [`AdapterSession`].
//!
//! Input chunks are buffered until the input ends; the concatenation is then
//! handed to the session's byte API and the result is emitted in chunks of at
//! most [`STREAM_CHUNK_SIZE`] bytes. The packed format and its authentication tag
//! need the whole ciphertext, so nothing is emitted before the input is
//! exhausted and errors surface only at that point, exactly as with the buffer
//! API. Output concatenates to the same bytes the buffer API returns for the
//! same input and randomness.
//!
//! A transform is single-use: after its last chunk, or after an error, it yields
//! `None` forever.

use crate::aliases::PasswordString;
use crate::consts::STREAM_CHUNK_SIZE;
use crate::error::AdapterError;
use crate::session::AdapterSession;
use std::io::{Read, Write};
use std::mem;
use tracing::trace;

/// Which way a [`TransformStream`] runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Plaintext chunks in, packed record chunks out.
    Encrypt,
    /// Packed record chunks in, plaintext chunks out.
    Decrypt,
}

enum StreamState<I> {
    Buffering(I),
    Emitting { output: Vec<u8>, offset: usize },
    Finished,
}

/// Lazy, finite sequence of output chunks; see the module docs.
pub struct TransformStream<'a, I> {
    session: &'a AdapterSession,
    password: &'a PasswordString,
    direction: Direction,
    state: StreamState<I>,
}

impl<'a, I> TransformStream<'a, I> {
    fn new(
        session: &'a AdapterSession,
        password: &'a PasswordString,
        direction: Direction,
        input: I,
    ) -> Self {
        Self {
            session,
            password,
            direction,
            state: StreamState::Buffering(input),
        }
    }

    /// Direction of this transform.
    pub fn direction(&self) -> Direction {
        self.direction
    }

    fn finalize(&self, buffered: &[u8]) -> Result<Vec<u8>, AdapterError> {
        trace!(
            direction = ?self.direction,
            input_len = buffered.len(),
            "stream input complete, delegating to session"
        );
        match self.direction {
            Direction::Encrypt => self.session.encrypt_bytes(buffered, self.password),
            Direction::Decrypt => self.session.decrypt_bytes(buffered, self.password),
        }
    }
}

impl<I> Iterator for TransformStream<'_, I>
where
    I: Iterator,
    I::Item: AsRef<[u8]>,
{
    type Item = Result<Vec<u8>, AdapterError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            match mem::replace(&mut self.state, StreamState::Finished) {
                StreamState::Buffering(input) => {
                    let mut buffered = Vec::new();
                    for chunk in input {
                        buffered.extend_from_slice(chunk.as_ref());
                    }
                    match self.finalize(&buffered) {
                        Ok(output) => {
                            self.state = StreamState::Emitting { output, offset: 0 };
                        }
                        // state stays Finished: the error is terminal
                        Err(err) => return Some(Err(err)),
                    }
                }
                StreamState::Emitting { output, offset } => {
                    if offset >= output.len() {
                        return None;
                    }
                    let end = (offset + STREAM_CHUNK_SIZE).min(output.len());
                    let chunk = output[offset..end].to_vec();
                    self.state = StreamState::Emitting {
                        output,
                        offset: end,
                    };
                    return Some(Ok(chunk));
                }
                StreamState::Finished => return None,
            }
        }
    }
}

impl AdapterSession {
    /// Chunked encryption: plaintext chunks in, packed record chunks out.
    ///
    /// Uses the session parameters current when the input ends.
    pub fn encrypt_stream<'a, C>(
        &'a self,
        password: &'a PasswordString,
        chunks: C,
    ) -> TransformStream<'a, C::IntoIter>
    where
        C: IntoIterator,
        C::Item: AsRef<[u8]>,
    {
        TransformStream::new(self, password, Direction::Encrypt, chunks.into_iter())
    }

    /// Chunked decryption: packed record chunks in, plaintext chunks out.
    ///
    /// Learns the record's parameters exactly like [`decrypt`](Self::decrypt).
    pub fn decrypt_stream<'a, C>(
        &'a self,
        password: &'a PasswordString,
        chunks: C,
    ) -> TransformStream<'a, C::IntoIter>
    where
        C: IntoIterator,
        C::Item: AsRef<[u8]>,
    {
        TransformStream::new(self, password, Direction::Decrypt, chunks.into_iter())
    }
}

/// Read all of `input`, encrypt it, and write the packed record to `output`.
pub fn encrypt_reader<R, W>(
    session: &AdapterSession,
    input: R,
    output: W,
    password: &PasswordString,
) -> Result<(), AdapterError>
where
    R: Read,
    W: Write,
{
    pump(session, input, output, password, Direction::Encrypt)
}

/// Read a packed record from `input`, decrypt it, and write the plaintext to `output`.
pub fn decrypt_reader<R, W>(
    session: &AdapterSession,
    input: R,
    output: W,
    password: &PasswordString,
) -> Result<(), AdapterError>
where
    R: Read,
    W: Write,
{
    pump(session, input, output, password, Direction::Decrypt)
}

fn pump<R, W>(
    session: &AdapterSession,
    mut input: R,
    mut output: W,
    password: &PasswordString,
    direction: Direction,
) -> Result<(), AdapterError>
where
    R: Read,
    W: Write,
{
    let mut buffered = Vec::new();
    input.read_to_end(&mut buffered)?;

    let input = std::iter::once(buffered);
    for chunk in TransformStream::new(session, password, direction, input) {
        output.write_all(&chunk?)?;
    }
    output.flush()?;
    Ok(())
}
