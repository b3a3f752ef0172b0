//! In-process protocol tests (spec §8): these don't need distinct OS
//! processes to exercise the ring/wrap/metadata/duplex rules, only distinct
//! `Reader`/`Writer` values sharing one named buffer. Liveness/death
//! scenarios, which need a real dead pid, live in `e2e_cross_process.rs`.

use std::time::Duration;
use zerobuffer::{BufferConfig, DuplexClient, DuplexServer, Reader, ServerHandler, Writer, ZeroBufferError};

fn unique_name(case: &str) -> String {
    let nanos = std::time::SystemTime::now().duration_since(std::time::UNIX_EPOCH).unwrap().as_nanos();
    format!("zb-it-{}-{case}-{nanos}", std::process::id())
}

const TIMEOUT: Duration = Duration::from_secs(2);

#[test]
fn exact_fit_frame_fills_ring_exactly() {
    // spec §8 scenario 1.
    let name = unique_name("exact-fit");
    let mut reader = Reader::create(&name, BufferConfig::new(0, 10240)).unwrap();
    let mut writer = Writer::connect(&name).unwrap();

    let body = vec![7u8; 10224];
    writer.write_frame(&body, TIMEOUT).unwrap();

    // A second write without a read blocks on sem-r until release.
    let second = vec![9u8; 8];
    let blocked = writer.write_frame(&second, Duration::from_millis(50));
    assert!(matches!(blocked, Err(ZeroBufferError::Timeout)));

    let frame = reader.read_frame(TIMEOUT).unwrap();
    assert_eq!(&frame[..], &body[..]);
    assert_eq!(frame.sequence(), 1);
    reader.release_frame(frame);

    writer.write_frame(&second, TIMEOUT).unwrap();
    let frame = reader.read_frame(TIMEOUT).unwrap();
    assert_eq!(&frame[..], &second[..]);
    reader.release_frame(frame);
}

#[test]
fn wrap_around_delivers_gap_free_sequence_numbers() {
    // spec §8 scenario 2.
    let name = unique_name("wrap-around");
    let mut reader = Reader::create(&name, BufferConfig::new(0, 10240)).unwrap();
    let mut writer = Writer::connect(&name).unwrap();

    let first = vec![1u8; 6144];
    writer.write_frame(&first, TIMEOUT).unwrap();
    let frame = reader.read_frame(TIMEOUT).unwrap();
    assert_eq!(frame.sequence(), 1);
    assert_eq!(&frame[..], &first[..]);
    reader.release_frame(frame);

    let second = vec![2u8; 7168];
    writer.write_frame(&second, TIMEOUT).unwrap();
    let frame = reader.read_frame(TIMEOUT).unwrap();
    assert_eq!(frame.sequence(), 2, "wrap marker is absorbed internally, never surfaced");
    assert_eq!(&frame[..], &second[..]);
    reader.release_frame(frame);
}

#[test]
fn wrap_around_with_an_unread_frame_still_in_flight() {
    // The test above drains the ring before the second write, so
    // bytes_in_use hits 0 and the ring resets instead of ever writing a
    // wrap marker. Here the second frame (`b`) is left unread across the
    // wrap so the marker path actually runs, and the reader must still see
    // gap-free sequence numbers with the marker itself never surfaced.
    let name = unique_name("wrap-in-flight");
    let mut reader = Reader::create(&name, BufferConfig::new(0, 256)).unwrap();
    let mut writer = Writer::connect(&name).unwrap();

    let a = vec![0xAAu8; 8];
    writer.write_frame(&a, TIMEOUT).unwrap(); // total 24: write_pos 0 -> 24

    let b = vec![0xBBu8; 200];
    writer.write_frame(&b, TIMEOUT).unwrap(); // total 216: write_pos 24 -> 240, 16 left at the tail

    let frame = reader.read_frame(TIMEOUT).unwrap();
    assert_eq!(frame.sequence(), 1);
    assert_eq!(&frame[..], &a[..]);
    reader.release_frame(frame);

    // c needs 24 bytes; only 16 remain at the tail, so this has to wrap
    // while b is still unread.
    let c = vec![0xCCu8; 8];
    writer.write_frame(&c, TIMEOUT).unwrap();

    let frame = reader.read_frame(TIMEOUT).unwrap();
    assert_eq!(frame.sequence(), 2, "b comes out before the marker is ever reached");
    assert_eq!(&frame[..], &b[..]);
    reader.release_frame(frame);

    let frame = reader.read_frame(TIMEOUT).unwrap();
    assert_eq!(frame.sequence(), 3, "gap-free: the wrap marker is absorbed internally, never surfaced");
    assert_eq!(&frame[..], &c[..]);
    reader.release_frame(frame);
}

#[test]
fn minimum_and_zero_length_frames() {
    // spec §8 scenario 3.
    let name = unique_name("min-zero");
    let mut reader = Reader::create(&name, BufferConfig::new(0, 1024)).unwrap();
    let mut writer = Writer::connect(&name).unwrap();

    assert!(matches!(writer.write_frame(&[], TIMEOUT), Err(ZeroBufferError::InvalidFrameSize)));

    writer.write_frame(&[0xAB], TIMEOUT).unwrap();
    let frame = reader.read_frame(TIMEOUT).unwrap();
    assert_eq!(&frame[..], &[0xAB]);
    reader.release_frame(frame);
}

#[test]
fn writer_before_reader_fails_with_buffer_not_found() {
    // spec §8 scenario 4.
    let name = unique_name("no-reader");
    assert!(matches!(Writer::connect(&name), Err(ZeroBufferError::BufferNotFound(_))));
}

#[test]
fn concurrent_create_race_has_exactly_one_winner() {
    // spec §8 scenario 5.
    let name = unique_name("race");
    let mut handles = Vec::new();
    for _ in 0..8 {
        let name = name.clone();
        handles.push(std::thread::spawn(move || Reader::create(&name, BufferConfig::new(0, 4096))));
    }

    let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    let successes = results.iter().filter(|r| r.is_ok()).count();
    assert_eq!(successes, 1, "exactly one Reader::create should win the race");
    let failures_are_already_exists = results
        .iter()
        .filter(|r| r.is_err())
        .all(|r| matches!(r, Err(ZeroBufferError::BufferAlreadyExists(_))));
    assert!(failures_are_already_exists);
}

#[test]
fn metadata_is_write_once_and_observable_by_reader() {
    let name = unique_name("metadata");
    let reader = Reader::create(&name, BufferConfig::new(32, 1024)).unwrap();
    assert_eq!(reader.get_metadata(), Vec::<u8>::new());

    let mut writer = Writer::connect(&name).unwrap();
    writer.set_metadata(b"codec=raw").unwrap();
    assert!(matches!(writer.set_metadata(b"again"), Err(ZeroBufferError::MetadataAlreadySet)));

    assert_eq!(reader.get_metadata(), b"codec=raw");
    assert_eq!(reader.get_metadata_view(), b"codec=raw");
}

struct Echo;
impl ServerHandler for Echo {
    fn handle(&mut self, request: &[u8], _sequence: u64) -> Vec<u8> {
        request.to_vec()
    }
}

#[test]
fn duplex_echo_preserves_order_and_contents() {
    // spec §8 scenario 8.
    let channel = unique_name("echo");
    let mut server = DuplexServer::create(&channel, BufferConfig::new(0, 1 << 17), Echo).unwrap();
    let mut client = DuplexClient::connect(&channel).unwrap();

    let server_thread = std::thread::spawn(move || {
        for _ in 0..3 {
            server.serve_one(TIMEOUT).unwrap();
        }
    });

    for size in [1usize, 1024, 65536] {
        let body = vec![(size % 251) as u8; size];
        let response = client.send_request_and_wait(&body, TIMEOUT).unwrap();
        assert_eq!(response, body);
    }

    server_thread.join().unwrap();
}
