//! In-Memory Mocks für alle Kollaborateure von esp-core
//!
//! Geteilter Zustand liegt in `Rc<RefCell<..>>` / `Rc<Cell<..>>`,
//! damit Tests nach der Übergabe an Logger/Notifier/Supervisor noch hineinsehen können.

#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::collections::{BTreeMap, VecDeque};
use std::panic::{self, AssertUnwindSafe};
use std::rc::Rc;

use embedded_storage::nor_flash::{
    ErrorType, MultiwriteNorFlash, NorFlash, NorFlashErrorKind, ReadNorFlash,
};
use esp_core::http::Request;
use esp_core::{
    BlinkPattern, Blinker, Button, Clock, Connectivity, Delay, InputPin, Level, LedError,
    LogRecord, LogSink, LogStore, Logger, Response, Restart, SmartLedWriter, StoreError,
    Transport, TransportError, WifiCredentials,
};
use rgb::RGB8;

// ============================================================================
// Zeit
// ============================================================================

#[derive(Clone, Default)]
pub struct MockClock {
    now: Rc<Cell<u64>>,
}

impl MockClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self, ms: u64) {
        self.now.set(ms);
    }

    pub fn advance(&self, ms: u64) {
        self.now.set(self.now.get() + ms);
    }
}

impl Clock for MockClock {
    fn now_ms(&self) -> u64 {
        self.now.get()
    }
}

/// Zeichnet alle Wartezeiten auf und stellt optional eine Uhr vor
#[derive(Clone, Default)]
pub struct MockDelay {
    pub calls: Rc<RefCell<Vec<u64>>>,
    clock: Option<MockClock>,
}

impl MockDelay {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_clock(clock: MockClock) -> Self {
        Self {
            calls: Rc::default(),
            clock: Some(clock),
        }
    }

    pub fn calls(&self) -> Vec<u64> {
        self.calls.borrow().clone()
    }
}

impl Delay for MockDelay {
    async fn delay_ms(&mut self, ms: u64) {
        self.calls.borrow_mut().push(ms);
        if let Some(clock) = &self.clock {
            clock.advance(ms);
        }
    }
}

// ============================================================================
// Logging
// ============================================================================

/// Datei-Store im RAM
#[derive(Clone, Default)]
pub struct MockLogStore {
    pub files: Rc<RefCell<BTreeMap<String, Vec<u8>>>>,
    pub fail_append: Rc<Cell<bool>>,
    pub fail_rename: Rc<Cell<bool>>,
}

impl MockLogStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn content(&self, path: &str) -> Option<String> {
        self.files
            .borrow()
            .get(path)
            .map(|bytes| String::from_utf8_lossy(bytes).into_owned())
    }

    pub fn names(&self) -> Vec<String> {
        self.files.borrow().keys().cloned().collect()
    }

    pub fn insert(&self, path: &str, content: &str) {
        self.files
            .borrow_mut()
            .insert(path.to_string(), content.as_bytes().to_vec());
    }
}

impl LogStore for MockLogStore {
    fn size(&mut self, path: &str) -> Result<Option<u64>, StoreError> {
        Ok(self.files.borrow().get(path).map(|f| f.len() as u64))
    }

    fn append(&mut self, path: &str, bytes: &[u8]) -> Result<(), StoreError> {
        if self.fail_append.get() {
            return Err(StoreError::Io);
        }
        self.files
            .borrow_mut()
            .entry(path.to_string())
            .or_default()
            .extend_from_slice(bytes);
        Ok(())
    }

    fn rename(&mut self, from: &str, to: &str) -> Result<(), StoreError> {
        if self.fail_rename.get() {
            return Err(StoreError::Io);
        }
        let mut files = self.files.borrow_mut();
        let content = files.remove(from).ok_or(StoreError::NotFound)?;
        files.insert(to.to_string(), content);
        Ok(())
    }

    fn remove(&mut self, path: &str) -> Result<(), StoreError> {
        self.files
            .borrow_mut()
            .remove(path)
            .map(|_| ())
            .ok_or(StoreError::NotFound)
    }
}

/// Sink der alle akzeptierten Records sammelt
#[derive(Clone)]
pub struct RecordingSink {
    pub level: Level,
    pub records: Rc<RefCell<Vec<LogRecord>>>,
    pub fail: Rc<Cell<bool>>,
}

impl RecordingSink {
    pub fn new(level: Level) -> Self {
        Self {
            level,
            records: Rc::default(),
            fail: Rc::default(),
        }
    }

    pub fn messages(&self) -> Vec<String> {
        self.records
            .borrow()
            .iter()
            .map(|r| r.message.clone())
            .collect()
    }

    pub fn messages_at(&self, level: Level) -> Vec<String> {
        self.records
            .borrow()
            .iter()
            .filter(|r| r.level == level)
            .map(|r| r.message.clone())
            .collect()
    }
}

impl LogSink for RecordingSink {
    fn emit(&mut self, record: &LogRecord) -> Result<(), StoreError> {
        if self.fail.get() {
            return Err(StoreError::Io);
        }
        if record.level >= self.level {
            self.records.borrow_mut().push(record.clone());
        }
        Ok(())
    }
}

/// Logger "led_controller" mit einem DEBUG RecordingSink
pub fn recording_logger() -> (Logger, RecordingSink) {
    let sink = RecordingSink::new(Level::Debug);
    let mut logger = Logger::new("led_controller", MockClock::new());
    logger.add_sink(sink.clone());
    (logger, sink)
}

// ============================================================================
// NOR-Flash
// ============================================================================

/// NOR-Flash im RAM: Programmieren kann nur 1 → 0, Erase setzt Sektoren auf 0xFF
///
/// Wörter dürfen mehrfach programmiert werden (`MultiwriteNorFlash`),
/// `rewrite_count` zählt Schreibzugriffe auf bereits programmierte Wörter.
pub struct MockFlash {
    pub data: Vec<u8>,
    pub erase_count: usize,
    pub write_count: usize,
    pub rewrite_count: usize,
    programmed: Vec<bool>,
}

impl MockFlash {
    pub const SECTOR: usize = 4096;

    pub fn new(sectors: usize) -> Self {
        Self {
            data: vec![0xFF; sectors * Self::SECTOR],
            erase_count: 0,
            write_count: 0,
            rewrite_count: 0,
            programmed: vec![false; sectors * Self::SECTOR / Self::WRITE_SIZE],
        }
    }
}

impl ErrorType for MockFlash {
    type Error = NorFlashErrorKind;
}

impl ReadNorFlash for MockFlash {
    const READ_SIZE: usize = 4;

    fn read(&mut self, offset: u32, bytes: &mut [u8]) -> Result<(), Self::Error> {
        let start = offset as usize;
        if start % Self::READ_SIZE != 0 || bytes.len() % Self::READ_SIZE != 0 {
            return Err(NorFlashErrorKind::NotAligned);
        }
        let end = start + bytes.len();
        if end > self.data.len() {
            return Err(NorFlashErrorKind::OutOfBounds);
        }
        bytes.copy_from_slice(&self.data[start..end]);
        Ok(())
    }

    fn capacity(&self) -> usize {
        self.data.len()
    }
}

impl NorFlash for MockFlash {
    const WRITE_SIZE: usize = 4;
    const ERASE_SIZE: usize = Self::SECTOR;

    fn erase(&mut self, from: u32, to: u32) -> Result<(), Self::Error> {
        let (from, to) = (from as usize, to as usize);
        if from % Self::ERASE_SIZE != 0 || to % Self::ERASE_SIZE != 0 || from > to {
            return Err(NorFlashErrorKind::NotAligned);
        }
        if to > self.data.len() {
            return Err(NorFlashErrorKind::OutOfBounds);
        }
        self.data[from..to].fill(0xFF);
        self.programmed[from / Self::WRITE_SIZE..to / Self::WRITE_SIZE].fill(false);
        self.erase_count += 1;
        Ok(())
    }

    fn write(&mut self, offset: u32, bytes: &[u8]) -> Result<(), Self::Error> {
        let start = offset as usize;
        if start % Self::WRITE_SIZE != 0 || bytes.len() % Self::WRITE_SIZE != 0 {
            return Err(NorFlashErrorKind::NotAligned);
        }
        let end = start + bytes.len();
        if end > self.data.len() {
            return Err(NorFlashErrorKind::OutOfBounds);
        }
        for (cell, &byte) in self.data[start..end].iter_mut().zip(bytes) {
            // Bits können nur gelöscht werden
            if byte & !*cell != 0 {
                return Err(NorFlashErrorKind::Other);
            }
            *cell &= byte;
        }

        let words = &mut self.programmed[start / Self::WRITE_SIZE..end / Self::WRITE_SIZE];
        if words.iter().any(|&word| word) {
            self.rewrite_count += 1;
        }
        words.fill(true);
        self.write_count += 1;
        Ok(())
    }
}

impl MultiwriteNorFlash for MockFlash {}

// ============================================================================
// Netzwerk
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedRequest {
    pub method: &'static str,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

/// Transport mit vorgegebenen Ergebnissen, danach immer `TransportError::Io`
#[derive(Default)]
pub struct MockTransport {
    pub script: VecDeque<Result<Response, TransportError>>,
    pub requests: Vec<RecordedRequest>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self::default()
    }

    pub fn then_fail(mut self, error: TransportError) -> Self {
        self.script.push_back(Err(error));
        self
    }

    pub fn then_respond(mut self, status: u16, body: &str) -> Self {
        self.script.push_back(Ok(Response {
            status,
            body: body.to_string(),
        }));
        self
    }

    pub fn call_count(&self) -> usize {
        self.requests.len()
    }
}

impl Transport for MockTransport {
    async fn submit(&mut self, request: &Request<'_>) -> Result<Response, TransportError> {
        self.requests.push(RecordedRequest {
            method: request.method.as_str(),
            url: request.url.to_string(),
            headers: request.headers.to_vec(),
            body: request.body.to_string(),
        });
        self.script.pop_front().unwrap_or(Err(TransportError::Io))
    }
}

pub struct MockConnectivity {
    pub connected: bool,
    pub connect_calls: usize,
    pub last_ssid: Option<String>,
    pub fail_connect: bool,
    pub address: String,
}

impl MockConnectivity {
    pub fn connected() -> Self {
        Self {
            connected: true,
            ..Self::disconnected()
        }
    }

    pub fn disconnected() -> Self {
        Self {
            connected: false,
            connect_calls: 0,
            last_ssid: None,
            fail_connect: false,
            address: "192.168.1.42".to_string(),
        }
    }
}

impl Connectivity for MockConnectivity {
    fn is_connected(&self) -> bool {
        self.connected
    }

    async fn connect(&mut self, credentials: &WifiCredentials) -> Result<(), TransportError> {
        self.connect_calls += 1;
        self.last_ssid = Some(credentials.ssid.clone());
        if self.fail_connect {
            return Err(TransportError::ConnectionFailed);
        }
        self.connected = true;
        Ok(())
    }

    fn address(&self) -> Option<String> {
        self.connected.then(|| self.address.clone())
    }
}

// ============================================================================
// GPIO / System
// ============================================================================

/// Liefert vorgegebene Pegel, der letzte wiederholt sich
pub struct MockInputPin {
    pub readings: VecDeque<bool>,
    pub last: bool,
    pub reads: usize,
}

impl MockInputPin {
    pub fn new(readings: &[bool]) -> Self {
        Self {
            readings: readings.iter().copied().collect(),
            last: false,
            reads: 0,
        }
    }
}

impl InputPin for MockInputPin {
    fn is_high(&mut self) -> bool {
        self.reads += 1;
        if let Some(level) = self.readings.pop_front() {
            self.last = level;
        }
        self.last
    }
}

/// Taster nach Zeitplan `(start_ms, hold_ms)`
///
/// Jede Abfrage liest die Uhr und stellt sie danach 1 ms vor.
/// Die gemessene Haltedauer entspricht damit genau `hold_ms`.
pub struct MockButton {
    clock: MockClock,
    presses: Vec<(u64, u64)>,
}

impl MockButton {
    /// Nach dem letzten Druck wird so lange gewartet, dann panic statt Endlosschleife
    const IDLE_LIMIT_MS: u64 = 60_000;

    pub fn new(clock: MockClock, presses: &[(u64, u64)]) -> Self {
        Self {
            clock,
            presses: presses.to_vec(),
        }
    }
}

impl Button for MockButton {
    fn is_asserted(&mut self) -> bool {
        let now = self.clock.now_ms();
        self.clock.advance(1);

        let schedule_end = self
            .presses
            .iter()
            .map(|(start, hold)| start + hold)
            .max()
            .unwrap_or(0);
        assert!(
            now <= schedule_end + Self::IDLE_LIMIT_MS,
            "button schedule exhausted"
        );

        self.presses
            .iter()
            .any(|&(start, hold)| now >= start && now < start + hold)
    }
}

#[derive(Clone, Default)]
pub struct MockBlinker {
    pub history: Rc<RefCell<Vec<BlinkPattern>>>,
}

impl MockBlinker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn history(&self) -> Vec<BlinkPattern> {
        self.history.borrow().clone()
    }

    pub fn current(&self) -> Option<BlinkPattern> {
        self.history.borrow().last().copied()
    }
}

impl Blinker for MockBlinker {
    fn set_pattern(&mut self, pattern: BlinkPattern) {
        self.history.borrow_mut().push(pattern);
    }
}

pub const RESTART_MARKER: &str = "device restart";

/// Zählt Neustarts und bricht per panic ab (`restart` kehrt nie zurück)
#[derive(Clone, Default)]
pub struct MockRestart {
    pub count: Rc<Cell<u32>>,
}

impl MockRestart {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Restart for MockRestart {
    fn restart(&mut self) -> ! {
        self.count.set(self.count.get() + 1);
        panic!("{}", RESTART_MARKER);
    }
}

/// Führt `f` aus und meldet ob es per `MockRestart` abgebrochen wurde
pub fn runs_into_restart<F: FnOnce()>(f: F) -> bool {
    let result = panic::catch_unwind(AssertUnwindSafe(f));
    match result {
        Ok(()) => false,
        Err(payload) => {
            let message = payload
                .downcast_ref::<String>()
                .cloned()
                .or_else(|| payload.downcast_ref::<&str>().map(|s| s.to_string()))
                .unwrap_or_default();
            assert_eq!(message, RESTART_MARKER, "unexpected panic");
            true
        }
    }
}

// ============================================================================
// LED
// ============================================================================

#[derive(Default)]
pub struct MockLedWriter {
    pub last_color: Option<RGB8>,
    pub write_count: usize,
    pub fail_next_write: bool,
}

impl MockLedWriter {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SmartLedWriter for MockLedWriter {
    fn write(&mut self, color: RGB8) -> Result<(), LedError> {
        if self.fail_next_write {
            self.fail_next_write = false;
            return Err(LedError::WriteFailed);
        }

        self.last_color = Some(color);
        self.write_count += 1;
        Ok(())
    }
}

// ============================================================================
// Konfiguration
// ============================================================================

pub const VALID_CONFIG: &str = r#"{
    "wifi": {"ssid": "Werkstatt", "password": "geheim123"},
    "govee": {
        "url": "http://192.168.1.20:8080/router/api/v1/device/control",
        "headers": {"Content-Type": "application/json", "Govee-API-Key": "abc-123"},
        "data": {
            "device": "AA:BB:CC:DD:EE:FF:00:11",
            "model": "H6159",
            "cmd": {"name": "turn", "value": "off"}
        }
    }
}"#;
