//! Log Store auf rohem NOR-Flash
//!
//! Der Flash-Bereich ist in gleich große Slots geteilt, ein Slot pro Datei:
//!
//! ```text
//! ┌──────────────────────┬──────────────────────────────────────────┐
//! │ Header (1 Sektor)    │ Daten (append-only)                      │
//! │ 32-Byte Namens-      │ Text-Bytes, Ende = erstes 0xFF           │
//! │ Einträge, letzter    │                                          │
//! │ gültiger gewinnt     │                                          │
//! └──────────────────────┴──────────────────────────────────────────┘
//! ```
//!
//! - Umbenennen = neuen Namens-Eintrag anhängen (kein Erase der Daten)
//! - Löschen = benutzte Daten-Sektoren + Header löschen
//! - Anhängen programmiert das teilweise belegte Wort erneut, der Treiber
//!   muss daher `MultiwriteNorFlash` sein
//! - Länge wird beim Mount aus dem ersten gelöschten Byte (0xFF) rekonstruiert,
//!   daher darf 0xFF nie in den Daten vorkommen (UTF-8 Text enthält es nie)

use alloc::string::String;
use alloc::vec::Vec;

use embedded_storage::nor_flash::MultiwriteNorFlash;

use crate::traits::{LogStore, StoreError};

/// Maximale Länge eines Dateinamens in Bytes
pub const NAME_MAX: usize = 27;

const ENTRY_SIZE: usize = 32;
const ENTRY_MAGIC: u8 = 0x4C;
const ERASED: u8 = 0xFF;
const SCAN_CHUNK: usize = 256;

#[derive(Debug, Clone, Default)]
struct Slot {
    name: Option<String>,
    /// Datenlänge in Bytes
    len: u32,
    /// Belegte Header-Einträge (auch ungültige)
    header_used: u32,
}

/// Dateibasierter Log Store über `embedded_storage::nor_flash::MultiwriteNorFlash`
///
/// Für `RotatingFileSink` werden `backup_count + 1` Slots benötigt.
pub struct FlashLogStore<F: MultiwriteNorFlash> {
    flash: F,
    base: u32,
    slot_size: u32,
    slots: Vec<Slot>,
}

impl<F: MultiwriteNorFlash> FlashLogStore<F> {
    /// Schreib-/Lese-Granularität
    const ALIGN: usize = if F::READ_SIZE > F::WRITE_SIZE {
        F::READ_SIZE
    } else {
        F::WRITE_SIZE
    };

    /// Mountet den Bereich `[base, base + slot_size * slot_count)`
    ///
    /// Liest alle Header und rekonstruiert Namen und Längen.
    pub fn new(flash: F, base: u32, slot_size: u32, slot_count: usize) -> Result<Self, StoreError> {
        let erase = F::ERASE_SIZE as u32;
        let align = Self::ALIGN;
        let total = u64::from(slot_size) * slot_count as u64;

        let geometry_ok = align > 0
            && align <= ENTRY_SIZE
            && ENTRY_SIZE % align == 0
            && SCAN_CHUNK % align == 0
            && F::ERASE_SIZE >= ENTRY_SIZE
            && slot_count > 0
            && base % erase == 0
            && slot_size % erase == 0
            && slot_size > erase
            && u64::from(base) + total <= flash.capacity() as u64;
        if !geometry_ok {
            return Err(StoreError::Geometry);
        }

        let mut store = Self {
            flash,
            base,
            slot_size,
            slots: Vec::with_capacity(slot_count),
        };

        for index in 0..slot_count {
            let mut slot = store.read_header(index)?;
            let duplicate = store
                .slots
                .iter()
                .any(|other| other.name.is_some() && other.name == slot.name);
            if duplicate {
                slot.name = None;
            }
            if slot.name.is_some() {
                slot.len = store.scan_len(index)?;
            }
            store.slots.push(slot);
        }

        Ok(store)
    }

    /// Gibt den Flash-Treiber zurück (z.B. für erneutes Mounten)
    pub fn into_inner(self) -> F {
        self.flash
    }

    /// Namen aller existierenden Dateien
    pub fn files(&self) -> impl Iterator<Item = &str> {
        self.slots.iter().filter_map(|slot| slot.name.as_deref())
    }

    /// Nutzbare Datenbytes pro Datei
    pub fn capacity_per_file(&self) -> u32 {
        self.slot_size - F::ERASE_SIZE as u32
    }

    /// Liest den kompletten Inhalt einer Datei
    pub fn read_all(&mut self, path: &str) -> Result<Vec<u8>, StoreError> {
        let index = self.find(path).ok_or(StoreError::NotFound)?;
        let len = self.slots[index].len as usize;
        let start = self.data_start(index);

        let mut out = Vec::with_capacity(len);
        let mut chunk = [0u8; SCAN_CHUNK];
        let mut offset = 0usize;
        while offset < len {
            let n = (len - offset).min(SCAN_CHUNK);
            let aligned = round_up(n, Self::ALIGN);
            self.flash
                .read(start + offset as u32, &mut chunk[..aligned])
                .map_err(|_| StoreError::Io)?;
            out.extend_from_slice(&chunk[..n]);
            offset += n;
        }
        Ok(out)
    }

    fn slot_start(&self, index: usize) -> u32 {
        self.base + self.slot_size * index as u32
    }

    fn data_start(&self, index: usize) -> u32 {
        self.slot_start(index) + F::ERASE_SIZE as u32
    }

    fn entries_per_header(&self) -> u32 {
        (F::ERASE_SIZE / ENTRY_SIZE) as u32
    }

    fn find(&self, path: &str) -> Option<usize> {
        self.slots
            .iter()
            .position(|slot| slot.name.as_deref() == Some(path))
    }

    fn read_header(&mut self, index: usize) -> Result<Slot, StoreError> {
        let start = self.slot_start(index);
        let mut slot = Slot::default();
        let mut entry = [0u8; ENTRY_SIZE];

        for i in 0..self.entries_per_header() {
            self.flash
                .read(start + i * ENTRY_SIZE as u32, &mut entry)
                .map_err(|_| StoreError::Io)?;
            if entry[0] == ERASED {
                break;
            }
            slot.header_used = i + 1;
            if let Some(name) = decode_entry(&entry) {
                slot.name = Some(name);
            }
        }
        Ok(slot)
    }

    /// Position des ersten gelöschten Bytes im Datenbereich
    fn scan_len(&mut self, index: usize) -> Result<u32, StoreError> {
        let start = self.data_start(index);
        let capacity = self.capacity_per_file() as usize;
        let mut chunk = [0u8; SCAN_CHUNK];
        let mut offset = 0usize;

        while offset < capacity {
            let n = (capacity - offset).min(SCAN_CHUNK);
            self.flash
                .read(start + offset as u32, &mut chunk[..n])
                .map_err(|_| StoreError::Io)?;
            if let Some(pos) = chunk[..n].iter().position(|&b| b == ERASED) {
                return Ok((offset + pos) as u32);
            }
            offset += n;
        }
        Ok(capacity as u32)
    }

    /// Programmiert `bytes` ab `offset`, teilweise belegte Wörter werden
    /// mit identischen Bits erneut geschrieben
    fn program(&mut self, offset: u32, bytes: &[u8]) -> Result<(), StoreError> {
        let align = Self::ALIGN as u32;
        let end = offset + bytes.len() as u32;
        let mut chunk_start = offset - offset % align;
        let chunk_end_total = round_up(end as usize, Self::ALIGN) as u32;
        let mut buffer = [ERASED; ENTRY_SIZE];

        while chunk_start < chunk_end_total {
            let n = (chunk_end_total - chunk_start).min(ENTRY_SIZE as u32) as usize;
            let buf = &mut buffer[..n];
            self.flash
                .read(chunk_start, buf)
                .map_err(|_| StoreError::Io)?;

            for (i, byte) in buf.iter_mut().enumerate() {
                let address = chunk_start + i as u32;
                if address >= offset && address < end {
                    *byte = bytes[(address - offset) as usize];
                }
            }

            self.flash
                .write(chunk_start, buf)
                .map_err(|_| StoreError::Io)?;
            chunk_start += n as u32;
        }
        Ok(())
    }

    fn write_name(&mut self, index: usize, name: &str) -> Result<(), StoreError> {
        if self.slots[index].header_used >= self.entries_per_header() {
            let start = self.slot_start(index);
            self.flash
                .erase(start, start + F::ERASE_SIZE as u32)
                .map_err(|_| StoreError::Io)?;
            self.slots[index].header_used = 0;
        }

        let entry = encode_entry(name)?;
        let offset = self.slot_start(index) + self.slots[index].header_used * ENTRY_SIZE as u32;
        self.program(offset, &entry)?;

        let slot = &mut self.slots[index];
        slot.header_used += 1;
        slot.name = Some(String::from(name));
        Ok(())
    }

    /// Löscht benutzte Daten-Sektoren, danach den Header
    fn erase_slot(&mut self, index: usize, full: bool) -> Result<(), StoreError> {
        let erase = F::ERASE_SIZE as u32;
        let data_start = self.data_start(index);
        let used = if full {
            self.capacity_per_file()
        } else {
            round_up(self.slots[index].len as usize, F::ERASE_SIZE) as u32
        };

        if used > 0 {
            self.flash
                .erase(data_start, data_start + used)
                .map_err(|_| StoreError::Io)?;
        }
        let start = self.slot_start(index);
        self.flash
            .erase(start, start + erase)
            .map_err(|_| StoreError::Io)?;

        self.slots[index] = Slot::default();
        Ok(())
    }

    fn is_region_blank(&mut self, index: usize) -> Result<bool, StoreError> {
        let start = self.data_start(index);
        let capacity = self.capacity_per_file() as usize;
        let mut chunk = [0u8; SCAN_CHUNK];
        let mut offset = 0usize;

        while offset < capacity {
            let n = (capacity - offset).min(SCAN_CHUNK);
            self.flash
                .read(start + offset as u32, &mut chunk[..n])
                .map_err(|_| StoreError::Io)?;
            if chunk[..n].iter().any(|&b| b != ERASED) {
                return Ok(false);
            }
            offset += n;
        }
        Ok(true)
    }

    /// Belegt einen freien Slot für `path`
    fn allocate(&mut self, path: &str) -> Result<usize, StoreError> {
        validate_name(path)?;
        let index = self
            .slots
            .iter()
            .position(|slot| slot.name.is_none())
            .ok_or(StoreError::Full)?;

        // Unbenutzter Flash oder Reste eines abgebrochenen Löschvorgangs
        if self.slots[index].header_used > 0 || !self.is_region_blank(index)? {
            self.erase_slot(index, true)?;
        }

        self.write_name(index, path)?;
        Ok(index)
    }
}

impl<F: MultiwriteNorFlash> LogStore for FlashLogStore<F> {
    fn size(&mut self, path: &str) -> Result<Option<u64>, StoreError> {
        Ok(self.find(path).map(|index| u64::from(self.slots[index].len)))
    }

    fn append(&mut self, path: &str, bytes: &[u8]) -> Result<(), StoreError> {
        if bytes.contains(&ERASED) {
            return Err(StoreError::InvalidData);
        }

        let index = match self.find(path) {
            Some(index) => index,
            None => self.allocate(path)?,
        };

        let len = self.slots[index].len;
        let new_len = u64::from(len) + bytes.len() as u64;
        if new_len > u64::from(self.capacity_per_file()) {
            return Err(StoreError::Full);
        }
        if bytes.is_empty() {
            return Ok(());
        }

        let offset = self.data_start(index) + len;
        self.program(offset, bytes)?;
        self.slots[index].len = new_len as u32;
        Ok(())
    }

    fn rename(&mut self, from: &str, to: &str) -> Result<(), StoreError> {
        validate_name(to)?;
        let source = self.find(from).ok_or(StoreError::NotFound)?;
        if from == to {
            return Ok(());
        }

        if let Some(target) = self.find(to) {
            self.erase_slot(target, false)?;
        }
        self.write_name(source, to)
    }

    fn remove(&mut self, path: &str) -> Result<(), StoreError> {
        let index = self.find(path).ok_or(StoreError::NotFound)?;
        self.erase_slot(index, false)
    }
}

fn round_up(value: usize, align: usize) -> usize {
    value.div_ceil(align) * align
}

fn validate_name(name: &str) -> Result<(), StoreError> {
    if name.is_empty() || name.len() > NAME_MAX {
        return Err(StoreError::NameTooLong);
    }
    Ok(())
}

fn encode_entry(name: &str) -> Result<[u8; ENTRY_SIZE], StoreError> {
    validate_name(name)?;
    let mut entry = [0u8; ENTRY_SIZE];
    entry[0] = ENTRY_MAGIC;
    entry[1] = name.len() as u8;
    entry[2..2 + name.len()].copy_from_slice(name.as_bytes());
    Ok(entry)
}

fn decode_entry(entry: &[u8; ENTRY_SIZE]) -> Option<String> {
    let len = entry[1] as usize;
    if entry[0] != ENTRY_MAGIC || len == 0 || len > NAME_MAX {
        return None;
    }
    core::str::from_utf8(&entry[2..2 + len])
        .ok()
        .map(String::from)
}
