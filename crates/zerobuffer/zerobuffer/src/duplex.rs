//! Duplex channel (spec §4.6): two one-way buffers, `req-<channel>` and
//! `resp-<channel>`, composed into a request/response transport.
//!
//! The server handler has two shapes — copy-return and fill-in-place — and
//! spec §9 is explicit that these should be a capability set the caller
//! opts into, not an inheritance hierarchy: `ServerHandler` and
//! `ServerHandlerMut` are independent traits, and `DuplexServer<H>` exposes
//! a `serve_one` for whichever one `H` implements.

use crate::error::{Result, ZeroBufferError};
use crate::reader::Reader;
use crate::writer::Writer;
use std::time::{Duration, Instant};
use zerobuffer_config::RuntimeConfig;
use zerobuffer_core::BufferConfig;

/// Sizing used by `DuplexServer::create`/`DuplexClient::connect` when the
/// caller doesn't supply a `BufferConfig` — spec §6.3 shows these
/// constructors taking only a channel name. 1 MiB comfortably covers the
/// duplex echo scenario's largest frame (spec §8 scenario 8, 65536 bytes).
pub const DEFAULT_DUPLEX_METADATA_SIZE: u64 = 0;
pub const DEFAULT_DUPLEX_PAYLOAD_SIZE: u64 = 1 << 20;

fn default_duplex_config() -> BufferConfig {
    BufferConfig::new(DEFAULT_DUPLEX_METADATA_SIZE, DEFAULT_DUPLEX_PAYLOAD_SIZE)
}

fn req_name(channel: &str) -> String {
    format!("req-{channel}")
}

fn resp_name(channel: &str) -> String {
    format!("resp-{channel}")
}

/// Connects a `Writer` to a buffer that the peer may not have created yet,
/// retrying `BufferNotFound` until the peer catches up or `runtime`'s
/// default timeout elapses. Bootstrapping a duplex channel has no
/// prescribed ordering between server and client (spec is silent on this),
/// so both sides retry the other's not-yet-created buffer rather than
/// requiring one side to start first.
fn connect_writer_with_retry(name: &str, runtime: &RuntimeConfig) -> Result<Writer> {
    let deadline = Instant::now() + runtime.default_timeout();
    loop {
        match Writer::connect_with_runtime(name, runtime) {
            Ok(writer) => return Ok(writer),
            Err(ZeroBufferError::BufferNotFound(_)) if Instant::now() < deadline => {
                std::thread::sleep(Duration::from_millis(20));
            }
            Err(e) => return Err(e),
        }
    }
}

/// Copy-return request handler: receives a borrowed view of the request and
/// returns an owned response buffer, which the server copies into the
/// response ring.
pub trait ServerHandler {
    fn handle(&mut self, request: &[u8], request_sequence: u64) -> Vec<u8>;
}

/// Fill-in-place request handler: writes the response directly into a
/// writable view of the response ring, returning how many bytes it wrote,
/// avoiding the extra copy `ServerHandler` implies.
pub trait ServerHandlerMut {
    fn handle_into(&mut self, request: &[u8], request_sequence: u64, response: &mut [u8]) -> usize;
}

pub struct DuplexServer<H> {
    req: Reader,
    resp: Writer,
    handler: H,
}

impl<H> DuplexServer<H> {
    pub fn create(channel: &str, cfg: BufferConfig, handler: H) -> Result<Self> {
        Self::create_with_runtime(channel, cfg, handler, &RuntimeConfig::default())
    }

    pub fn create_with_runtime(channel: &str, cfg: BufferConfig, handler: H, runtime: &RuntimeConfig) -> Result<Self> {
        let req = Reader::create_with_runtime(&req_name(channel), cfg, runtime)?;
        let resp = connect_writer_with_retry(&resp_name(channel), runtime)?;
        Ok(Self { req, resp, handler })
    }

    pub fn is_client_connected(&self, timeout: Duration) -> bool {
        self.req.is_writer_connected(timeout)
    }
}

impl<H: ServerHandler> DuplexServer<H> {
    /// Handles exactly one request: blocks for it, runs the handler, writes
    /// the response.
    pub fn serve_one(&mut self, timeout: Duration) -> Result<()> {
        let frame = self.req.read_frame(timeout)?;
        let sequence = frame.sequence();
        let response = self.handler.handle(&frame, sequence);
        drop(frame);
        self.resp.write_frame(&response, timeout)
    }
}

impl<H: ServerHandlerMut> DuplexServer<H> {
    /// Fill-in-place variant of `serve_one`.
    pub fn serve_one_in_place(&mut self, timeout: Duration) -> Result<()> {
        let frame = self.req.read_frame(timeout)?;
        let sequence = frame.sequence();
        let max_len = self.resp.max_frame_body_len();
        let handler = &mut self.handler;
        self.resp.write_frame_with(max_len, timeout, |buf| handler.handle_into(&frame, sequence, buf))?;
        Ok(())
    }
}

pub struct DuplexClient {
    req: Writer,
    resp: Reader,
}

impl DuplexClient {
    pub fn connect(channel: &str) -> Result<Self> {
        Self::connect_with_config(channel, default_duplex_config())
    }

    pub fn connect_with_config(channel: &str, cfg: BufferConfig) -> Result<Self> {
        Self::connect_with_runtime(channel, cfg, &RuntimeConfig::default())
    }

    pub fn connect_with_runtime(channel: &str, cfg: BufferConfig, runtime: &RuntimeConfig) -> Result<Self> {
        let resp = Reader::create_with_runtime(&resp_name(channel), cfg, runtime)?;
        let req = connect_writer_with_retry(&req_name(channel), runtime)?;
        Ok(Self { req, resp })
    }

    /// Writes a request and blocks for the next response (spec §4.6):
    /// correlation is by FIFO order since there is exactly one client.
    pub fn send_request_and_wait(&mut self, bytes: &[u8], timeout: Duration) -> Result<Vec<u8>> {
        self.req.write_frame(bytes, timeout)?;
        let frame = self.resp.read_frame(timeout)?;
        Ok(frame.to_vec())
    }

    pub fn is_server_connected(&self) -> bool {
        self.req.is_reader_connected()
    }
}
