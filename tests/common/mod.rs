//! Shared test support
//!
//! - `FakeConnector`: scripted in-memory streams with a connect counter
//! - `ConformanceServer`: a real TCP server speaking the protocol

#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::io::{self, BufRead, BufReader, Cursor, Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;

use nomos_client::{ClientConfig, Connector};
use parking_lot::Mutex;

// =============================================================================
// Logging
// =============================================================================

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

// =============================================================================
// Header Helpers
// =============================================================================

/// OK header announcing `len` payload bytes
pub fn ok_header(len: usize) -> Vec<u8> {
    format!("O {:08x}\n", len).into_bytes()
}

/// Error header with an 8-character code
pub fn error_header(code: &str) -> Vec<u8> {
    assert!(code.len() <= 8, "error code must fit the header");
    format!("E {:<8}\n", code).into_bytes()
}

/// Deterministic, non-repeating-looking payload
pub fn pattern(len: usize) -> Vec<u8> {
    (0..len).map(|i| (i.wrapping_mul(31) ^ (i >> 7)) as u8).collect()
}

pub fn fake_config() -> ClientConfig {
    ClientConfig::builder().host("fake").port(1).build().unwrap()
}

// =============================================================================
// Fake Connector
// =============================================================================

/// What one connect hands out
struct Script {
    response: Vec<u8>,
    step: usize,
    fail_writes: bool,
}

/// In-memory stream serving a fixed response in `step`-sized reads
pub struct ScriptedStream {
    input: Cursor<Vec<u8>>,
    step: usize,
    fail_writes: bool,
    written: Arc<Mutex<Vec<u8>>>,
}

impl Read for ScriptedStream {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let len = buf.len().min(self.step);
        self.input.read(&mut buf[..len])
    }
}

impl Write for ScriptedStream {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if self.fail_writes {
            return Err(io::Error::new(io::ErrorKind::BrokenPipe, "scripted write failure"));
        }
        // Short writes exercise the caller's write loop
        let len = buf.len().min(self.step);
        self.written.lock().extend_from_slice(&buf[..len]);
        Ok(len)
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Connector handing out one scripted stream per connect
///
/// Connects beyond the scripted ones are refused.
pub struct FakeConnector {
    scripts: VecDeque<Script>,
    connects: Arc<AtomicUsize>,
    written: Arc<Mutex<Vec<u8>>>,
}

impl FakeConnector {
    pub fn new() -> Self {
        Self {
            scripts: VecDeque::new(),
            connects: Arc::new(AtomicUsize::new(0)),
            written: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Next connect serves `response`, reads unrestricted
    pub fn stream(self, response: Vec<u8>) -> Self {
        self.chunked_stream(response, usize::MAX)
    }

    /// Next connect serves `response` at most `step` bytes per read
    pub fn chunked_stream(mut self, response: Vec<u8>, step: usize) -> Self {
        self.scripts.push_back(Script {
            response,
            step,
            fail_writes: false,
        });
        self
    }

    /// Next connect yields a stream whose writes fail
    pub fn broken_stream(mut self, response: Vec<u8>) -> Self {
        self.scripts.push_back(Script {
            response,
            step: usize::MAX,
            fail_writes: true,
        });
        self
    }

    /// Counts every connect attempt, refused ones included
    pub fn connect_counter(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.connects)
    }

    /// Everything written across all streams
    pub fn written(&self) -> Arc<Mutex<Vec<u8>>> {
        Arc::clone(&self.written)
    }
}

impl Connector for FakeConnector {
    type Stream = ScriptedStream;

    fn connect(&mut self) -> io::Result<ScriptedStream> {
        self.connects.fetch_add(1, Ordering::SeqCst);
        match self.scripts.pop_front() {
            Some(script) => Ok(ScriptedStream {
                input: Cursor::new(script.response),
                step: script.step,
                fail_writes: script.fail_writes,
                written: Arc::clone(&self.written),
            }),
            None => Err(io::Error::new(
                io::ErrorKind::ConnectionRefused,
                "no scripted stream left",
            )),
        }
    }

    fn target(&self) -> &str {
        "fake:1"
    }
}

pub fn written_text(written: &Arc<Mutex<Vec<u8>>>) -> String {
    String::from_utf8_lossy(&written.lock()).into_owned()
}

// =============================================================================
// Conformance Server
// =============================================================================

/// Fetching this key makes the server answer with a reset and hang up
pub const RESET_KEY: &str = "force-reset";

type EntryKey = (String, String, String);

/// Minimal in-process protocol server backed by a HashMap
pub struct ConformanceServer {
    port: u16,
    accepted: Arc<AtomicUsize>,
    store: Arc<Mutex<HashMap<EntryKey, Vec<u8>>>>,
}

impl ConformanceServer {
    pub fn start() -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
        let port = listener.local_addr().expect("addr").port();
        let accepted = Arc::new(AtomicUsize::new(0));
        let store = Arc::new(Mutex::new(HashMap::new()));

        let accepted_clone = Arc::clone(&accepted);
        let store_clone = Arc::clone(&store);
        thread::spawn(move || {
            for stream in listener.incoming() {
                let Ok(stream) = stream else { break };
                accepted_clone.fetch_add(1, Ordering::SeqCst);
                let store = Arc::clone(&store_clone);
                thread::spawn(move || {
                    let _ = serve(stream, store);
                });
            }
        });

        Self {
            port,
            accepted,
            store,
        }
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn config(&self) -> ClientConfig {
        ClientConfig::builder()
            .host("127.0.0.1")
            .port(self.port)
            .connect_timeout_ms(1000)
            .build()
            .unwrap()
    }

    /// Connections accepted so far
    pub fn accepted(&self) -> usize {
        self.accepted.load(Ordering::SeqCst)
    }

    pub fn entry_count(&self) -> usize {
        self.store.lock().len()
    }
}

fn serve(stream: TcpStream, store: Arc<Mutex<HashMap<EntryKey, Vec<u8>>>>) -> io::Result<()> {
    let mut writer = stream.try_clone()?;
    let mut reader = BufReader::new(stream);
    let mut line = Vec::new();

    loop {
        line.clear();
        if reader.read_until(b'\n', &mut line)? == 0 {
            return Ok(());
        }
        if line.last() != Some(&b'\n') {
            return Ok(());
        }
        line.pop();

        let text = String::from_utf8_lossy(&line).into_owned();
        let fields: Vec<&str> = text.split(',').collect();
        if fields.len() < 5 || fields[0] != "V01" {
            writer.write_all(&error_header("ERR_CR00"))?;
            return Ok(());
        }
        let key = (
            fields[2].to_string(),
            fields[3].to_string(),
            fields[4].to_string(),
        );

        match (fields[1], fields.len()) {
            ("G", 6) => {
                if key.2 == RESET_KEY {
                    writer.write_all(&error_header("ERR_CR00"))?;
                    return Ok(());
                }
                let value = store.lock().get(&key).cloned();
                match value {
                    Some(value) => {
                        let mut frame = ok_header(value.len());
                        frame.extend_from_slice(&value);
                        writer.write_all(&frame)?;
                    }
                    None => writer.write_all(&error_header("ERR_NF"))?,
                }
            }
            ("P", 7) => {
                let Ok(len) = fields[6].parse::<usize>() else {
                    writer.write_all(&error_header("ERR_CR00"))?;
                    return Ok(());
                };
                let mut value = vec![0u8; len];
                reader.read_exact(&mut value)?;
                store.lock().insert(key, value);
                writer.write_all(b"OK00000000\n")?;
            }
            ("T", 6) => {
                if store.lock().contains_key(&key) {
                    writer.write_all(b"OK00000000\n")?;
                } else {
                    writer.write_all(&error_header("ERR_NF"))?;
                }
            }
            ("R", 5) => {
                if store.lock().remove(&key).is_some() {
                    writer.write_all(b"OK00000000\n")?;
                } else {
                    writer.write_all(&error_header("ERR_NF"))?;
                }
            }
            _ => {
                writer.write_all(&error_header("ERR_CR00"))?;
                return Ok(());
            }
        }
        writer.flush()?;
    }
}
