//! Binding to the ocgcore C API.
//!
//! The engine calls back into the host for card data, scripts and log lines.
//! Each duel owns a boxed [`Callbacks`] whose address is handed to the engine
//! as the callback payload; the box outlives the handle because it is dropped
//! only after `OCG_DestroyDuel`.
//!
//! ocgcore returns all messages of a step as one buffer of `u32`
//! length-prefixed records. [`NativeEngine`] splits that buffer after every
//! step and serves the records one by one, in the legacy format.

#![allow(unsafe_code)]

use std::collections::VecDeque;
use std::ffi::{c_char, c_int, c_void, CStr};
use std::ptr;

use tracing::{debug, info, warn};

use crate::cards::CardStore;
use crate::error::{EngineError, EngineResult};
use crate::gateway::{DuelEngine, MessageFormat, StepStatus};
use crate::options::{CardPlacement, DuelOptions};
use crate::scripts::ScriptLoader;

const OCG_DUEL_CREATION_SUCCESS: c_int = 0;
const OCG_LOG_TYPE_ERROR: c_int = 0;
const OCG_LOG_TYPE_FROM_SCRIPT: c_int = 1;

/// Zero-terminated, empty set-code list handed out with every card.
static NO_SETCODES: [u16; 1] = [0];

type OcgDuel = *mut c_void;

#[repr(C)]
struct OcgCardData {
    code: u32,
    alias: u32,
    setcodes: *const u16,
    type_flags: u32,
    level: u32,
    attribute: u32,
    race: u64,
    attack: i32,
    defense: i32,
    lscale: u32,
    rscale: u32,
    link_marker: u32,
}

#[repr(C)]
struct OcgPlayer {
    starting_lp: u32,
    starting_draw_count: u32,
    draw_count_per_turn: u32,
}

type DataReader = unsafe extern "C" fn(*mut c_void, u32, *mut OcgCardData);
type ScriptReader = unsafe extern "C" fn(*mut c_void, OcgDuel, *const c_char) -> c_int;
type LogHandler = unsafe extern "C" fn(*mut c_void, *const c_char, c_int);
type DataReaderDone = unsafe extern "C" fn(*mut c_void, *mut OcgCardData);

#[repr(C)]
struct OcgDuelOptions {
    seed: [u64; 4],
    flags: u64,
    team1: OcgPlayer,
    team2: OcgPlayer,
    card_reader: DataReader,
    payload1: *mut c_void,
    script_reader: ScriptReader,
    payload2: *mut c_void,
    log_handler: LogHandler,
    payload3: *mut c_void,
    card_reader_done: DataReaderDone,
    payload4: *mut c_void,
    enable_unsafe_libraries: u8,
}

#[repr(C)]
struct OcgNewCardInfo {
    team: u8,
    duelist: u8,
    code: u32,
    con: u8,
    loc: u32,
    seq: u32,
    pos: u32,
}

#[link(name = "ocgcore")]
extern "C" {
    fn OCG_CreateDuel(out_duel: *mut OcgDuel, options: *const OcgDuelOptions) -> c_int;
    fn OCG_DestroyDuel(duel: OcgDuel);
    fn OCG_DuelNewCard(duel: OcgDuel, info: *const OcgNewCardInfo);
    fn OCG_StartDuel(duel: OcgDuel);
    fn OCG_DuelProcess(duel: OcgDuel) -> c_int;
    fn OCG_DuelGetMessage(duel: OcgDuel, length: *mut u32) -> *mut c_void;
    fn OCG_DuelSetResponse(duel: OcgDuel, buffer: *const c_void, length: u32);
    fn OCG_LoadScript(duel: OcgDuel, buffer: *const c_char, length: u32, name: *const c_char)
        -> c_int;
}

/// Host state reachable from the engine callbacks.
struct Callbacks {
    cards: CardStore,
    scripts: Box<dyn ScriptLoader>,
}

unsafe extern "C" fn read_card(payload: *mut c_void, code: u32, data: *mut OcgCardData) {
    // SAFETY: payload is the `Callbacks` box owned by the duel, data points to
    // a card record owned by the engine for the duration of the call.
    let callbacks = &*(payload as *const Callbacks);
    let data = &mut *data;
    *data = OcgCardData {
        code,
        alias: 0,
        setcodes: NO_SETCODES.as_ptr(),
        type_flags: 0,
        level: 0,
        attribute: 0,
        race: 0,
        attack: 0,
        defense: 0,
        lscale: 0,
        rscale: 0,
        link_marker: 0,
    };
    let Some(stats) = callbacks.cards.lookup(code) else {
        debug!(code, "card not in store");
        return;
    };
    data.alias = stats.alias;
    data.type_flags = stats.type_flags;
    data.level = stats.level;
    data.attribute = stats.attribute;
    data.race = stats.race;
    data.attack = stats.attack;
    data.defense = stats.defense;
    data.lscale = stats.left_scale;
    data.rscale = stats.right_scale;
    data.link_marker = stats.link_marker;
}

unsafe extern "C" fn read_card_done(_payload: *mut c_void, _data: *mut OcgCardData) {}

unsafe extern "C" fn read_script(payload: *mut c_void, duel: OcgDuel, name: *const c_char) -> c_int {
    // SAFETY: as in `read_card`; name is a NUL-terminated string from the engine.
    let callbacks = &*(payload as *const Callbacks);
    let name_str = CStr::from_ptr(name).to_string_lossy();
    let Some(script) = callbacks.scripts.load(&name_str) else {
        return 0;
    };
    let Ok(len) = u32::try_from(script.len()) else {
        warn!(name = %name_str, "script too large");
        return 0;
    };
    OCG_LoadScript(duel, script.as_ptr().cast(), len, name)
}

unsafe extern "C" fn log_line(_payload: *mut c_void, line: *const c_char, kind: c_int) {
    // SAFETY: line is a NUL-terminated string from the engine.
    let line = CStr::from_ptr(line).to_string_lossy();
    match kind {
        OCG_LOG_TYPE_ERROR => warn!(target: "ocgcore", "{line}"),
        OCG_LOG_TYPE_FROM_SCRIPT => info!(target: "ocgcore", "{line}"),
        _ => debug!(target: "ocgcore", "{line}"),
    }
}

/// A duel running inside the native engine.
pub struct NativeEngine {
    duel: OcgDuel,
    // Read by the engine through the payload pointer.
    _callbacks: Box<Callbacks>,
    queue: VecDeque<Vec<u8>>,
}

// SAFETY: the handle is only touched through `&mut self`, so calls into the
// engine never overlap; the callback state is `Send + Sync`.
unsafe impl Send for NativeEngine {}

impl NativeEngine {
    pub fn create(
        options: &DuelOptions,
        cards: CardStore,
        scripts: Box<dyn ScriptLoader>,
    ) -> EngineResult<Self> {
        let callbacks = Box::new(Callbacks { cards, scripts });
        let payload = ptr::addr_of!(*callbacks).cast_mut().cast::<c_void>();
        let player = || OcgPlayer {
            starting_lp: options.starting_lp,
            starting_draw_count: options.starting_hand,
            draw_count_per_turn: options.draw_per_turn,
        };
        let raw = OcgDuelOptions {
            seed: options.seed,
            flags: 0,
            team1: player(),
            team2: player(),
            card_reader: read_card,
            payload1: payload,
            script_reader: read_script,
            payload2: payload,
            log_handler: log_line,
            payload3: payload,
            card_reader_done: read_card_done,
            payload4: payload,
            enable_unsafe_libraries: 0,
        };
        let mut duel: OcgDuel = ptr::null_mut();
        // SAFETY: both pointers are valid for the call; the payload stays
        // alive in `_callbacks` for as long as the duel.
        let code = unsafe { OCG_CreateDuel(&mut duel, &raw) };
        if code != OCG_DUEL_CREATION_SUCCESS || duel.is_null() {
            return Err(EngineError::CreateFailed { code });
        }
        debug!(seed = ?options.seed, "native duel created");
        Ok(Self {
            duel,
            _callbacks: callbacks,
            queue: VecDeque::new(),
        })
    }

    fn handle(&self) -> EngineResult<OcgDuel> {
        if self.duel.is_null() {
            return Err(EngineError::Released);
        }
        Ok(self.duel)
    }

    fn fill_queue(&mut self, duel: OcgDuel) {
        let mut len = 0u32;
        // SAFETY: the returned buffer is owned by the engine and valid until
        // the next call on this duel; it is copied out before returning.
        let buffer = unsafe {
            let data = OCG_DuelGetMessage(duel, &mut len);
            if data.is_null() || len == 0 {
                return;
            }
            std::slice::from_raw_parts(data.cast::<u8>(), len as usize).to_vec()
        };
        split_records(&buffer, &mut self.queue);
    }
}

/// Splits `u32` length-prefixed records; a short tail is dropped.
fn split_records(mut buffer: &[u8], out: &mut VecDeque<Vec<u8>>) {
    while buffer.len() >= 4 {
        let len = u32::from_le_bytes([buffer[0], buffer[1], buffer[2], buffer[3]]) as usize;
        let Some(record) = buffer.get(4..4 + len) else {
            warn!(len, available = buffer.len() - 4, "short message record");
            return;
        };
        out.push_back(record.to_vec());
        buffer = &buffer[4 + len..];
    }
}

impl DuelEngine for NativeEngine {
    fn message_format(&self) -> MessageFormat {
        MessageFormat::Legacy
    }

    fn place_card(&mut self, placement: &CardPlacement) -> EngineResult<()> {
        let duel = self.handle()?;
        let info = OcgNewCardInfo {
            team: placement.team,
            duelist: placement.duelist,
            code: placement.code,
            con: placement.controller,
            loc: placement.location,
            seq: placement.sequence,
            pos: placement.position,
        };
        // SAFETY: live handle, info valid for the call.
        unsafe { OCG_DuelNewCard(duel, &info) };
        Ok(())
    }

    fn start(&mut self) -> EngineResult<()> {
        let duel = self.handle()?;
        // SAFETY: live handle.
        unsafe { OCG_StartDuel(duel) };
        Ok(())
    }

    fn step(&mut self) -> EngineResult<StepStatus> {
        let duel = self.handle()?;
        self.queue.clear();
        // SAFETY: live handle.
        let raw = unsafe { OCG_DuelProcess(duel) };
        let status = StepStatus::from_raw(raw)?;
        self.fill_queue(duel);
        Ok(status)
    }

    fn next_message(&mut self) -> EngineResult<Option<Vec<u8>>> {
        self.handle()?;
        Ok(self.queue.pop_front())
    }

    fn submit_answer(&mut self, bytes: &[u8]) -> EngineResult<()> {
        let duel = self.handle()?;
        let len = u32::try_from(bytes.len()).map_err(|_| EngineError::CallFailed {
            operation: "submit_answer",
            reason: format!("answer of {} bytes", bytes.len()),
        })?;
        // SAFETY: live handle; the engine copies the buffer.
        unsafe { OCG_DuelSetResponse(duel, bytes.as_ptr().cast(), len) };
        Ok(())
    }

    fn release(&mut self) {
        if self.duel.is_null() {
            return;
        }
        // SAFETY: live handle, nulled right after so it is destroyed once.
        unsafe { OCG_DestroyDuel(self.duel) };
        self.duel = ptr::null_mut();
        self.queue.clear();
    }
}

impl Drop for NativeEngine {
    fn drop(&mut self) {
        self.release();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_length_prefixed_records() {
        let mut buffer = Vec::new();
        for record in [&[90u8, 0, 1][..], &[40, 1][..]] {
            buffer.extend_from_slice(&(record.len() as u32).to_le_bytes());
            buffer.extend_from_slice(record);
        }
        let mut queue = VecDeque::new();
        split_records(&buffer, &mut queue);
        assert_eq!(queue, VecDeque::from([vec![90, 0, 1], vec![40, 1]]));
    }

    #[test]
    fn short_tail_is_dropped() {
        let mut buffer = 2u32.to_le_bytes().to_vec();
        buffer.extend_from_slice(&[5, 1]);
        buffer.extend_from_slice(&9u32.to_le_bytes());
        buffer.push(3);
        let mut queue = VecDeque::new();
        split_records(&buffer, &mut queue);
        assert_eq!(queue, VecDeque::from([vec![5, 1]]));
    }
}
